// TestDependencies - mock implementations for testing
//
// Provides mock ports that can be wired into CoreDeps for tests.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use super::storage::MemoryStore;
use super::{BaseBusinessApi, BaseEntityApi, BaseKeyValueStore, CoreDeps, StorageError};
use crate::common::{BusinessId, Id};
use crate::config::Config;
use crate::domains::creators::models::Creator;
use crate::domains::overlay::OverlayEntity;
use crate::domains::reviews::models::Review;
use crate::domains::subscriptions::SubscriptionSnapshot;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

// =============================================================================
// Mock Entity API
// =============================================================================

/// In-memory remote store for one entity kind
pub struct MockEntityApi<E: OverlayEntity> {
    records: Arc<Mutex<Vec<E>>>,
    calls: Arc<Mutex<Vec<String>>>,
    failing: Arc<Mutex<bool>>,
}

impl<E: OverlayEntity> MockEntityApi<E> {
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            failing: Arc::new(Mutex::new(false)),
        }
    }

    /// Seed the remote dataset
    pub fn with_records(self, records: Vec<E>) -> Self {
        *lock(&self.records) = records;
        self
    }

    /// Make every call fail until [`set_failing(false)`](Self::set_failing)
    pub fn failing(self) -> Self {
        self.set_failing(true);
        self
    }

    pub fn set_failing(&self, failing: bool) {
        *lock(&self.failing) = failing;
    }

    /// Current remote dataset
    pub fn records(&self) -> Vec<E> {
        lock(&self.records).clone()
    }

    pub fn record(&self, id: &Id<E::Marker>) -> Option<E> {
        lock(&self.records).iter().find(|e| e.id() == id).cloned()
    }

    /// Calls made so far, e.g. `"update:c1"`
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    fn enter(&self, call: String) -> Result<()> {
        lock(&self.calls).push(call.clone());
        if *lock(&self.failing) {
            return Err(anyhow!("mock {} failure: {}", E::KIND, call));
        }
        Ok(())
    }
}

impl<E: OverlayEntity> Default for MockEntityApi<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: OverlayEntity> BaseEntityApi<E> for MockEntityApi<E> {
    async fn fetch_all(&self) -> Result<Vec<E>> {
        self.enter("fetch_all".to_string())?;
        Ok(self.records())
    }

    async fn fetch_by_id(&self, id: &Id<E::Marker>) -> Result<Option<E>> {
        self.enter(format!("fetch_by_id:{}", id))?;
        Ok(self.record(id))
    }

    async fn create(&self, entity: &E) -> Result<E> {
        self.enter(format!("create:{}", entity.id()))?;
        let mut records = lock(&self.records);
        if records.iter().any(|e| e.id() == entity.id()) {
            return Err(anyhow!("{} {} already exists", E::KIND, entity.id()));
        }
        records.push(entity.clone());
        Ok(entity.clone())
    }

    async fn update(&self, id: &Id<E::Marker>, patch: &E::Patch) -> Result<E> {
        self.enter(format!("update:{}", id))?;
        let mut records = lock(&self.records);
        let record = records
            .iter_mut()
            .find(|e| e.id() == id)
            .ok_or_else(|| anyhow!("{} {} not found", E::KIND, id))?;
        record.apply(patch);
        Ok(record.clone())
    }

    async fn delete(&self, id: &Id<E::Marker>) -> Result<()> {
        self.enter(format!("delete:{}", id))?;
        lock(&self.records).retain(|e| e.id() != id);
        Ok(())
    }
}

// =============================================================================
// Mock Business API
// =============================================================================

enum QueuedSubscription {
    Snapshot(SubscriptionSnapshot),
    Failure(String),
    Delayed(Duration, SubscriptionSnapshot),
}

/// Business API answering from a queue; falls back to a fixed snapshot
pub struct MockBusinessApi {
    queue: Arc<Mutex<VecDeque<QueuedSubscription>>>,
    fallback: SubscriptionSnapshot,
    calls: Arc<Mutex<Vec<BusinessId>>>,
}

impl MockBusinessApi {
    pub fn new() -> Self {
        Self {
            queue: Arc::new(Mutex::new(VecDeque::new())),
            fallback: SubscriptionSnapshot::none(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Snapshot returned once the queue is empty
    pub fn with_default(mut self, snapshot: SubscriptionSnapshot) -> Self {
        self.fallback = snapshot;
        self
    }

    pub fn with_snapshot(self, snapshot: SubscriptionSnapshot) -> Self {
        lock(&self.queue).push_back(QueuedSubscription::Snapshot(snapshot));
        self
    }

    pub fn with_failure(self, message: impl Into<String>) -> Self {
        lock(&self.queue).push_back(QueuedSubscription::Failure(message.into()));
        self
    }

    /// Answer with `snapshot` after `delay`
    pub fn with_delayed(self, delay: Duration, snapshot: SubscriptionSnapshot) -> Self {
        lock(&self.queue).push_back(QueuedSubscription::Delayed(delay, snapshot));
        self
    }

    pub fn calls(&self) -> Vec<BusinessId> {
        lock(&self.calls).clone()
    }
}

impl Default for MockBusinessApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseBusinessApi for MockBusinessApi {
    async fn fetch_subscription(&self, business_id: &BusinessId) -> Result<SubscriptionSnapshot> {
        lock(&self.calls).push(business_id.clone());

        let next = lock(&self.queue).pop_front();
        match next {
            Some(QueuedSubscription::Snapshot(snapshot)) => Ok(snapshot),
            Some(QueuedSubscription::Failure(message)) => Err(anyhow!(message)),
            Some(QueuedSubscription::Delayed(delay, snapshot)) => {
                tokio::time::sleep(delay).await;
                Ok(snapshot)
            }
            None => Ok(self.fallback.clone()),
        }
    }
}

// =============================================================================
// Failing substrate
// =============================================================================

/// Substrate whose writes always fail; reads see what was seeded.
#[derive(Default)]
pub struct FailingStore {
    seeded: MemoryStore,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value that reads will return
    pub fn with_item(self, key: &str, value: &str) -> Self {
        let _ = self.seeded.set_item(key, value);
        self
    }
}

impl BaseKeyValueStore for FailingStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.seeded.get_item(key)
    }

    fn set_item(&self, key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::QuotaExceeded {
            key: key.to_string(),
        })
    }

    fn remove_item(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("read-only substrate".to_string()))
    }
}

// =============================================================================
// TestDependencies - Builder for test dependencies
// =============================================================================

#[derive(Clone)]
pub struct TestDependencies {
    pub config: Config,
    pub substrate: Arc<dyn BaseKeyValueStore>,
    pub creator_api: Arc<MockEntityApi<Creator>>,
    pub review_api: Arc<MockEntityApi<Review>>,
    pub business_api: Arc<MockBusinessApi>,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            substrate: Arc::new(MemoryStore::new()),
            creator_api: Arc::new(MockEntityApi::new()),
            review_api: Arc::new(MockEntityApi::new()),
            business_api: Arc::new(MockBusinessApi::new()),
        }
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Share a substrate, e.g. to reopen the core over the same storage
    pub fn substrate(mut self, substrate: Arc<dyn BaseKeyValueStore>) -> Self {
        self.substrate = substrate;
        self
    }

    pub fn mock_creators(mut self, api: MockEntityApi<Creator>) -> Self {
        self.creator_api = Arc::new(api);
        self
    }

    pub fn mock_reviews(mut self, api: MockEntityApi<Review>) -> Self {
        self.review_api = Arc::new(api);
        self
    }

    pub fn mock_business(mut self, api: MockBusinessApi) -> Self {
        self.business_api = Arc::new(api);
        self
    }

    /// Wire the mocks into a `CoreDeps`
    pub fn into_deps(self) -> CoreDeps {
        CoreDeps::new(
            self.config,
            self.substrate,
            self.creator_api,
            self.review_api,
            self.business_api,
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
