//! Creator replies to reviews
//!
//! Only the creator the review is about may reply. Admins moderate the
//! review itself, not the reply.

use tracing::info;

use crate::common::{AuthError, CoreResult, ReviewId};
use crate::domains::reviews::machines::{ReplyAction, ReplyMachine};
use crate::domains::reviews::models::Review;
use crate::kernel::CoreDeps;

fn reply(review_id: &ReviewId, action: ReplyAction, deps: &CoreDeps) -> CoreResult<Review> {
    let today = deps.today();
    let session = &deps.session;

    let outcome = deps.reviews.update_with(review_id, |current| {
        if !session.owns_creator(&current.creator_id) {
            return Err(AuthError::PermissionDenied(
                "only the reviewed creator may reply".to_string(),
            )
            .into());
        }
        ReplyMachine::decide(current, &action, today).map(Some)
    })?;

    info!(review_id = %review_id, action = action.name(), "Review reply changed");
    Ok(outcome.into_entity())
}

pub fn add_reply(
    review_id: &ReviewId,
    text: impl Into<String>,
    deps: &CoreDeps,
) -> CoreResult<Review> {
    reply(review_id, ReplyAction::Add { text: text.into() }, deps)
}

pub fn edit_reply(
    review_id: &ReviewId,
    text: impl Into<String>,
    deps: &CoreDeps,
) -> CoreResult<Review> {
    reply(review_id, ReplyAction::Edit { text: text.into() }, deps)
}

pub fn delete_reply(review_id: &ReviewId, deps: &CoreDeps) -> CoreResult<Review> {
    reply(review_id, ReplyAction::Delete, deps)
}
