//! Creator moderation actions (admin only)

use tracing::{debug, info};

use crate::common::{AdminCapability, CoreResult, CreatorId};
use crate::domains::creators::machines::{CreatorAction, CreatorMachine};
use crate::domains::creators::models::Creator;
use crate::kernel::CoreDeps;

/// Run a moderation action through the machine inside one read-merge-write.
pub fn moderate_creator(
    creator_id: &CreatorId,
    action: CreatorAction,
    deps: &CoreDeps,
) -> CoreResult<Creator> {
    deps.session
        .actor()
        .can(AdminCapability::ModerateCreators)
        .check()?;

    let outcome = deps
        .creators
        .update_with(creator_id, |current| CreatorMachine::decide(current, &action))?;

    if outcome.is_changed() {
        info!(
            creator_id = %creator_id,
            action = action.name(),
            status = %outcome.entity().status,
            "Creator moderated"
        );
    } else {
        debug!(creator_id = %creator_id, action = action.name(), "Creator already in target state");
    }

    Ok(outcome.into_entity())
}

pub fn approve_creator(creator_id: &CreatorId, deps: &CoreDeps) -> CoreResult<Creator> {
    moderate_creator(creator_id, CreatorAction::Approve, deps)
}

/// Reject a pending creator; `reason` must be non-blank.
pub fn reject_creator(
    creator_id: &CreatorId,
    reason: Option<String>,
    deps: &CoreDeps,
) -> CoreResult<Creator> {
    moderate_creator(creator_id, CreatorAction::Reject { reason }, deps)
}

pub fn deactivate_creator(creator_id: &CreatorId, deps: &CoreDeps) -> CoreResult<Creator> {
    moderate_creator(creator_id, CreatorAction::Deactivate, deps)
}

pub fn set_creator_pending(creator_id: &CreatorId, deps: &CoreDeps) -> CoreResult<Creator> {
    moderate_creator(creator_id, CreatorAction::SetPending, deps)
}
