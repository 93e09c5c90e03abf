//! Review authoring actions

use tracing::info;

use super::{has_reviewed, require_author_or};
use crate::common::{AdminCapability, CoreError, CoreResult, ReviewId};
use crate::domains::creators::actions::get_creator;
use crate::domains::reviews::models::{NewReview, Rating, Review, ReviewPatch, UpdateReview};
use crate::kernel::CoreDeps;

fn validate_comment(comment: &str, deps: &CoreDeps) -> CoreResult<()> {
    let max = deps.config.review_comment_max_len;
    if comment.chars().count() > max {
        return Err(CoreError::validation(format!(
            "Review comment must be at most {} characters",
            max
        )));
    }
    Ok(())
}

/// Write a review without the one-per-creator check.
///
/// Callers are expected to check [`has_reviewed`] first; see
/// [`submit_review`] for the checked path.
pub fn create_review(input: NewReview, deps: &CoreDeps) -> CoreResult<Review> {
    require_author_or(&input.business_id, AdminCapability::ManageReviews, deps)?;

    let rating = Rating::new(input.rating)?;
    validate_comment(&input.comment, deps)?;
    get_creator(&input.creator_id, deps)?;

    let mut input = input;
    if input.business_name.is_none() {
        input.business_name = deps.session.business_name();
    }

    info!(
        creator_id = %input.creator_id,
        business_id = %input.business_id,
        rating = %rating,
        "Creating review"
    );

    let review = deps
        .reviews
        .insert_created(Review::from_new(input, rating, deps.today()))?;

    info!(review_id = %review.id, "Review created");
    Ok(review)
}

/// Write a review, refusing a second one from the same business.
pub fn submit_review(input: NewReview, deps: &CoreDeps) -> CoreResult<Review> {
    if has_reviewed(&input.business_id, &input.creator_id, deps) {
        return Err(CoreError::DuplicateReview);
    }
    create_review(input, deps)
}

/// Edit rating or comment (author or admin).
pub fn update_review(
    review_id: &ReviewId,
    input: UpdateReview,
    deps: &CoreDeps,
) -> CoreResult<Review> {
    let review = super::get_review(review_id, deps)?;
    require_author_or(&review.business_id, AdminCapability::ManageReviews, deps)?;

    let rating = input.rating.map(Rating::new).transpose()?;
    if let Some(comment) = &input.comment {
        validate_comment(comment, deps)?;
    }

    info!(review_id = %review_id, "Updating review");

    deps.reviews.update(
        review_id,
        ReviewPatch {
            rating,
            comment: input.comment,
            ..Default::default()
        },
    )
}

/// Soft-delete a review (author or admin).
pub fn delete_review(review_id: &ReviewId, deps: &CoreDeps) -> CoreResult<()> {
    let review = super::get_review(review_id, deps)?;
    require_author_or(&review.business_id, AdminCapability::ManageReviews, deps)?;

    info!(review_id = %review_id, creator_id = %review.creator_id, "Deleting review");

    deps.reviews.soft_delete(review_id)
}
