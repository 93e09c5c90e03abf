//! Overlay domain - sparse local modifications merged onto remote entities
//!
//! Reads always go through the merge so callers never observe a
//! half-applied state. Nothing here talks to the network.

pub mod modification;
pub mod store;

pub use modification::{assign, overwrite, Modification, Patch};
pub use store::{OverlaySlots, OverlayStore, PendingChange, UpdateOutcome};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::common::{EntityKind, Id};

/// An entity kind the overlay store can manage.
pub trait OverlayEntity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Marker type of this entity's ID.
    type Marker: 'static;

    /// Closed set of mutable fields for this kind.
    type Patch: Patch;

    const KIND: EntityKind;

    fn id(&self) -> &Id<Self::Marker>;

    /// Apply every field set in `patch`, leaving the rest untouched.
    fn apply(&mut self, patch: &Self::Patch);

    /// Whether the entity shows up in default (non-admin) listings.
    fn is_publicly_listed(&self) -> bool;

    /// Serialize for the locally-created slot.
    fn to_record(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }

    /// Deserialize from the locally-created slot.
    fn from_record(record: serde_json::Value) -> serde_json::Result<Self> {
        serde_json::from_value(record)
    }
}
