use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A closed, per-kind partial of an entity's mutable fields.
pub trait Patch:
    Default + Clone + PartialEq + std::fmt::Debug + Serialize + DeserializeOwned + Send + Sync
{
    /// Shallow merge: every field set in `newer` overwrites the same field here.
    fn merge(&mut self, newer: Self);

    /// Drop what `pushed` already delivered to the remote store, keeping
    /// changes made since. Only additive fields need this; the rest are
    /// resent harmlessly on the next push.
    fn rebase(&mut self, _pushed: &Self) {}

    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Modification record kept per entity ID.
///
/// Serialized flat: the patch fields sit next to the `deleted` tombstone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Modification<P> {
    #[serde(flatten)]
    pub fields: P,
    #[serde(default, skip_serializing_if = "is_false")]
    pub deleted: bool,
}

impl<P: Patch> Modification<P> {
    pub fn tombstone() -> Self {
        Self {
            fields: P::default(),
            deleted: true,
        }
    }

    pub fn merge(&mut self, newer: P) {
        self.fields.merge(newer);
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Overwrite `slot` when `newer` carries a value.
#[inline]
pub fn overwrite<T>(slot: &mut Option<T>, newer: Option<T>) {
    if newer.is_some() {
        *slot = newer;
    }
}

/// Copy a patch field onto the entity when it is set.
#[inline]
pub fn assign<T: Clone>(target: &mut T, value: &Option<T>) {
    if let Some(value) = value {
        *target = value.clone();
    }
}
