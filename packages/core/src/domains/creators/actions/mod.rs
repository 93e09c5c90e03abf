//! Creator actions - entry points the UI calls
//!
//! Each action checks the session actor, consults the machine where there
//! is one, then goes through the overlay store.

pub mod moderation;
pub mod mutations;
pub mod queries;

pub use moderation::*;
pub use mutations::*;
pub use queries::*;

use crate::common::{AdminCapability, CoreResult, CreatorId};
use crate::kernel::CoreDeps;

/// The owning creator passes; anyone else needs `capability`.
pub(crate) fn require_owner_or(
    creator_id: &CreatorId,
    capability: AdminCapability,
    deps: &CoreDeps,
) -> CoreResult<()> {
    if deps.session.owns_creator(creator_id) {
        return Ok(());
    }
    deps.session.actor().can(capability).check()?;
    Ok(())
}
