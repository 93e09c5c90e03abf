//! Review query actions

use crate::common::{
    AdminCapability, BusinessId, CoreError, CoreResult, CreatorId, EntityKind, ReviewId,
};
use crate::domains::reviews::models::{Review, ReviewStatus};
use crate::kernel::CoreDeps;

/// Reviews targeting `creator_id`. `only_approved` keeps the public ones.
pub fn reviews_for_creator(
    creator_id: &CreatorId,
    only_approved: bool,
    deps: &CoreDeps,
) -> Vec<Review> {
    deps.reviews
        .list(!only_approved)
        .into_iter()
        .filter(|r| &r.creator_id == creator_id)
        .collect()
}

/// Every review written by `business_id`, in any status.
pub fn reviews_for_business(business_id: &BusinessId, deps: &CoreDeps) -> Vec<Review> {
    deps.reviews
        .list(true)
        .into_iter()
        .filter(|r| &r.business_id == business_id)
        .collect()
}

/// Moderation queue (admin only).
pub fn pending_reviews(deps: &CoreDeps) -> CoreResult<Vec<Review>> {
    deps.session
        .actor()
        .can(AdminCapability::ModerateReviews)
        .check()?;

    Ok(deps
        .reviews
        .list(true)
        .into_iter()
        .filter(|r| r.status == ReviewStatus::Pending)
        .collect())
}

/// Every live review (admin only).
pub fn all_reviews(deps: &CoreDeps) -> CoreResult<Vec<Review>> {
    deps.session
        .actor()
        .can(AdminCapability::ModerateReviews)
        .check()?;

    Ok(deps.reviews.list(true))
}

/// Reviews on a creator's profile as this session may see them.
pub fn visible_reviews_for_creator(creator_id: &CreatorId, deps: &CoreDeps) -> Vec<Review> {
    reviews_for_creator(creator_id, false, deps)
        .into_iter()
        .filter(|r| deps.session.can_view_review(r))
        .collect()
}

pub fn get_review(review_id: &ReviewId, deps: &CoreDeps) -> CoreResult<Review> {
    deps.reviews
        .get(review_id)
        .ok_or_else(|| CoreError::not_found(EntityKind::Review, review_id))
}

/// Whether `business_id` already has a live review of `creator_id`, in any status.
pub fn has_reviewed(business_id: &BusinessId, creator_id: &CreatorId, deps: &CoreDeps) -> bool {
    deps.reviews
        .list(true)
        .iter()
        .any(|r| &r.business_id == business_id && &r.creator_id == creator_id)
}
