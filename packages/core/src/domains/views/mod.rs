//! Profile view counting - at most one increment per creator per session
//!
//! The flag set lives only in memory; a fresh process is a fresh session.

use std::collections::HashSet;
use std::sync::Mutex;

use tracing::debug;

use crate::common::{CoreResult, CreatorId};
use crate::domains::creators::models::{Creator, CreatorPatch};
use crate::domains::overlay::OverlayStore;

#[derive(Default)]
pub struct ViewCounter {
    counted: Mutex<HashSet<CreatorId>>,
}

impl ViewCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a view of `creator_id` unless this session already did.
    ///
    /// Returns `Ok(true)` when the counter moved. An unknown or deleted
    /// creator fails with `NotFound` and leaves the flag unset.
    pub fn try_increment(
        &self,
        creator_id: &CreatorId,
        creators: &OverlayStore<Creator>,
    ) -> CoreResult<bool> {
        // Held across the overlay write so two racing calls cannot both count
        let mut counted = self.counted.lock().unwrap_or_else(|e| e.into_inner());
        if counted.contains(creator_id) {
            debug!(creator_id = %creator_id, "View already counted this session");
            return Ok(false);
        }

        let outcome = creators.update_with(creator_id, |_| {
            Ok(Some(CreatorPatch {
                profile_views_delta: Some(1),
                ..Default::default()
            }))
        })?;

        counted.insert(creator_id.clone());
        debug!(
            creator_id = %creator_id,
            profile_views = outcome.entity().profile_views,
            "Profile view counted"
        );
        Ok(true)
    }

    pub fn has_counted(&self, creator_id: &CreatorId) -> bool {
        self.counted
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(creator_id)
    }

    /// Start a new logical session.
    pub fn reset_session(&self) {
        self.counted
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}
