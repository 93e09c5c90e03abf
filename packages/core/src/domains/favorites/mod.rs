//! Favorites domain - the set of creators a session has starred

use std::collections::BTreeSet;
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::common::CreatorId;
use crate::config::Config;
use crate::kernel::storage::{load_json, persist_json};
use crate::kernel::BaseKeyValueStore;

pub const FAVORITES_SLOT: &str = "favorites";

pub struct Favorites {
    substrate: Arc<dyn BaseKeyValueStore>,
    key: String,
    ids: RwLock<BTreeSet<CreatorId>>,
}

impl Favorites {
    pub fn open(substrate: Arc<dyn BaseKeyValueStore>, config: &Config) -> Self {
        let key = config.storage_key(FAVORITES_SLOT);
        let ids: BTreeSet<CreatorId> = load_json(substrate.as_ref(), &key).unwrap_or_default();

        Self {
            substrate,
            key,
            ids: RwLock::new(ids),
        }
    }

    /// Returns `true` if `id` was not already a favorite.
    pub fn add(&self, id: &CreatorId) -> bool {
        let mut ids = self.ids.write().unwrap_or_else(|e| e.into_inner());
        let added = ids.insert(id.clone());
        if added {
            debug!(creator_id = %id, "Favorite added");
            persist_json(self.substrate.as_ref(), &self.key, &*ids);
        }
        added
    }

    /// Returns `true` if `id` was a favorite.
    pub fn remove(&self, id: &CreatorId) -> bool {
        let mut ids = self.ids.write().unwrap_or_else(|e| e.into_inner());
        let removed = ids.remove(id);
        if removed {
            debug!(creator_id = %id, "Favorite removed");
            persist_json(self.substrate.as_ref(), &self.key, &*ids);
        }
        removed
    }

    /// Flip membership; returns whether `id` is a favorite afterwards.
    pub fn toggle(&self, id: &CreatorId) -> bool {
        if self.contains(id) {
            !self.remove(id)
        } else {
            self.add(id)
        }
    }

    pub fn contains(&self, id: &CreatorId) -> bool {
        self.ids
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains(id)
    }

    pub fn list(&self) -> Vec<CreatorId> {
        self.ids
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.ids.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
