// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Moderation, merging and reconciliation live in the domains and only talk
// to the outside world through these ports.
//
// Naming convention: Base* for trait names (e.g., BaseKeyValueStore, BaseEntityApi)

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

use crate::common::{BusinessId, Id};
use crate::domains::overlay::OverlayEntity;
use crate::domains::subscriptions::SubscriptionSnapshot;

// =============================================================================
// Persistent Key-Value Substrate (Infrastructure - process-local storage)
// =============================================================================

/// Errors raised by a substrate adapter
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage quota exceeded writing {key}")]
    QuotaExceeded { key: String },

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Synchronous string-keyed store with best-effort durability.
///
/// Callers treat it as overwrite-by-key; no multi-key atomicity is assumed.
pub trait BaseKeyValueStore: Send + Sync {
    /// Read a value; `Ok(None)` when the key was never written.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the value stored under `key`.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

// =============================================================================
// Remote Entity API (Infrastructure - managed data store)
// =============================================================================

/// Remote persistence API for one entity kind.
///
/// Transport and authentication belong to the adapter. Implementations must
/// keep client-generated IDs on `create`.
#[async_trait]
pub trait BaseEntityApi<E: OverlayEntity>: Send + Sync {
    /// Fetch every record of this kind (the base dataset)
    async fn fetch_all(&self) -> Result<Vec<E>>;

    /// Fetch one record, `None` if the remote store has no such ID
    async fn fetch_by_id(&self, id: &Id<E::Marker>) -> Result<Option<E>>;

    /// Create a record, returning the canonical copy
    async fn create(&self, entity: &E) -> Result<E>;

    /// Apply a partial update, returning the canonical copy
    async fn update(&self, id: &Id<E::Marker>, patch: &E::Patch) -> Result<E>;

    /// Delete a record
    async fn delete(&self, id: &Id<E::Marker>) -> Result<()>;
}

// =============================================================================
// Business API (Infrastructure - live subscription status)
// =============================================================================

#[async_trait]
pub trait BaseBusinessApi: Send + Sync {
    /// Read the canonical subscription status for a business
    async fn fetch_subscription(&self, business_id: &BusinessId) -> Result<SubscriptionSnapshot>;
}
