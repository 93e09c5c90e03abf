//! Review moderation actions (admin only)

use tracing::{debug, info};

use crate::common::{AdminCapability, CoreResult, ReviewId};
use crate::domains::reviews::machines::{ReviewAction, ReviewMachine};
use crate::domains::reviews::models::Review;
use crate::kernel::CoreDeps;

pub fn moderate_review(
    review_id: &ReviewId,
    action: ReviewAction,
    deps: &CoreDeps,
) -> CoreResult<Review> {
    deps.session
        .actor()
        .can(AdminCapability::ModerateReviews)
        .check()?;

    let outcome = deps
        .reviews
        .update_with(review_id, |current| {
            Ok(ReviewMachine::decide(current, &action))
        })?;

    if outcome.is_changed() {
        info!(
            review_id = %review_id,
            action = action.name(),
            status = %outcome.entity().status,
            "Review moderated"
        );
    } else {
        debug!(review_id = %review_id, action = action.name(), "Review already in target state");
    }

    Ok(outcome.into_entity())
}

pub fn approve_review(review_id: &ReviewId, deps: &CoreDeps) -> CoreResult<Review> {
    moderate_review(review_id, ReviewAction::Approve, deps)
}

/// Reject a pending review or revoke an approved one.
pub fn reject_review(
    review_id: &ReviewId,
    reason: Option<String>,
    deps: &CoreDeps,
) -> CoreResult<Review> {
    moderate_review(review_id, ReviewAction::Reject { reason }, deps)
}
