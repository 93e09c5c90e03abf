//! Recently viewed creators - bounded, most-recent-first, no duplicates

use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::common::CreatorId;
use crate::config::Config;
use crate::kernel::storage::{load_json, persist_json};
use crate::kernel::BaseKeyValueStore;

pub const RECENTLY_VIEWED_SLOT: &str = "recently_viewed";

pub struct RecentlyViewed {
    substrate: Arc<dyn BaseKeyValueStore>,
    key: String,
    capacity: usize,
    ids: RwLock<Vec<CreatorId>>,
}

impl RecentlyViewed {
    pub fn open(substrate: Arc<dyn BaseKeyValueStore>, config: &Config) -> Self {
        let key = config.storage_key(RECENTLY_VIEWED_SLOT);
        let capacity = config.recently_viewed_capacity;

        let mut ids: Vec<CreatorId> = load_json(substrate.as_ref(), &key).unwrap_or_default();
        ids.truncate(capacity);

        Self {
            substrate,
            key,
            capacity,
            ids: RwLock::new(ids),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Move `id` to the front, dropping the oldest entry past capacity.
    pub fn record(&self, id: &CreatorId) {
        let mut ids = self.ids.write().unwrap_or_else(|e| e.into_inner());
        ids.retain(|existing| existing != id);
        ids.insert(0, id.clone());
        ids.truncate(self.capacity);

        debug!(creator_id = %id, len = ids.len(), "Recorded recent view");
        persist_json(self.substrate.as_ref(), &self.key, &*ids);
    }

    /// The first `limit` entries, newest first. `None` returns everything.
    pub fn list(&self, limit: Option<usize>) -> Vec<CreatorId> {
        let ids = self.ids.read().unwrap_or_else(|e| e.into_inner());
        let limit = limit.unwrap_or(self.capacity).min(ids.len());
        ids[..limit].to_vec()
    }

    /// Drop an entry, e.g. after the creator was deleted.
    pub fn forget(&self, id: &CreatorId) {
        let mut ids = self.ids.write().unwrap_or_else(|e| e.into_inner());
        let before = ids.len();
        ids.retain(|existing| existing != id);
        if ids.len() != before {
            persist_json(self.substrate.as_ref(), &self.key, &*ids);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::storage::MemoryStore;

    fn recent() -> RecentlyViewed {
        RecentlyViewed::open(Arc::new(MemoryStore::new()), &Config::default())
    }

    fn id(n: usize) -> CreatorId {
        CreatorId::new(format!("c{}", n))
    }

    #[test]
    fn repeated_records_do_not_grow_the_list() {
        let recent = recent();
        for _ in 0..25 {
            recent.record(&id(1));
        }
        assert_eq!(recent.list(None), vec![id(1)]);
    }

    #[test]
    fn keeps_the_ten_most_recent() {
        let recent = recent();
        for n in 1..=15 {
            recent.record(&id(n));
        }

        let expected: Vec<CreatorId> = (6..=15).rev().map(id).collect();
        assert_eq!(recent.list(None), expected);
    }

    #[test]
    fn revisiting_promotes_to_front() {
        let recent = recent();
        recent.record(&id(1));
        recent.record(&id(2));
        recent.record(&id(3));
        recent.record(&id(1));

        assert_eq!(recent.list(None), vec![id(1), id(3), id(2)]);
        assert_eq!(recent.list(Some(2)), vec![id(1), id(3)]);
        assert_eq!(recent.list(Some(50)).len(), 3);
    }

    #[test]
    fn capacity_follows_config_and_reload_trims() {
        let substrate = Arc::new(MemoryStore::new());
        let big = RecentlyViewed::open(substrate.clone(), &Config::default());
        for n in 1..=10 {
            big.record(&id(n));
        }

        let config = Config {
            recently_viewed_capacity: 3,
            ..Config::default()
        };
        let small = RecentlyViewed::open(substrate, &config);
        assert_eq!(small.list(None), vec![id(10), id(9), id(8)]);
    }

    #[test]
    fn forget_removes_entry() {
        let recent = recent();
        recent.record(&id(1));
        recent.record(&id(2));
        recent.forget(&id(1));
        assert_eq!(recent.list(None), vec![id(2)]);
    }
}
