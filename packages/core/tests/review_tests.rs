//! Integration tests for reviews: authoring, moderation, visibility and replies.

mod common;

use crate::common::{approved_creator, review, TestHarness};
use marketplace_core::common::{AuthError, BusinessId, CoreError, CreatorId, ReviewId};
use marketplace_core::domains::creators::actions::creator_rating;
use marketplace_core::domains::reviews::actions::{
    add_reply, all_reviews, approve_review, create_review, delete_reply, delete_review,
    edit_reply, has_reviewed, pending_reviews, reject_review, reviews_for_business,
    reviews_for_creator, submit_review, update_review, visible_reviews_for_creator,
};
use marketplace_core::domains::reviews::models::{NewReview, Review, ReviewStatus, UpdateReview};
use test_context::test_context;

fn new_review(creator: &str, business: &str, stars: u8) -> NewReview {
    NewReview::builder()
        .creator_id(creator)
        .business_id(business)
        .rating(stars)
        .comment("Fast turnaround, great edits")
        .build()
}

fn seed_three_statuses(ctx: &TestHarness) {
    ctx.seed_creators(vec![approved_creator("c1")]);
    ctx.seed_reviews(vec![
        review("r-pending", "c1", "b1", ReviewStatus::Pending, 3),
        review("r-approved", "c1", "b2", ReviewStatus::Approved, 5),
        review("r-rejected", "c1", "b3", ReviewStatus::Rejected, 1),
    ]);
}

fn ids(reviews: &[Review]) -> Vec<String> {
    reviews.iter().map(|r| r.id.to_string()).collect()
}

// =============================================================================
// Visibility
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn only_approved_filter(ctx: &TestHarness) {
    seed_three_statuses(ctx);
    let c1 = CreatorId::from("c1");

    assert_eq!(ids(&reviews_for_creator(&c1, true, &ctx.deps)), vec!["r-approved"]);
    assert_eq!(reviews_for_creator(&c1, false, &ctx.deps).len(), 3);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn profile_shows_reviews_by_viewer(ctx: &TestHarness) {
    seed_three_statuses(ctx);
    let c1 = CreatorId::from("c1");

    // Guest: approved only
    assert_eq!(ids(&visible_reviews_for_creator(&c1, &ctx.deps)), vec!["r-approved"]);

    // Target creator: approved + pending
    ctx.sign_in_creator("c1");
    assert_eq!(
        ids(&visible_reviews_for_creator(&c1, &ctx.deps)),
        vec!["r-pending", "r-approved"]
    );

    // Rejected review's author sees it, with the reason
    ctx.sign_in_business("b3");
    assert_eq!(
        ids(&visible_reviews_for_creator(&c1, &ctx.deps)),
        vec!["r-approved", "r-rejected"]
    );

    ctx.sign_in_admin();
    assert_eq!(visible_reviews_for_creator(&c1, &ctx.deps).len(), 3);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn aggregate_rating_counts_only_approved(ctx: &TestHarness) {
    seed_three_statuses(ctx);
    let c1 = CreatorId::from("c1");

    let summary = creator_rating(&c1, &ctx.deps);
    assert_eq!(summary.count, 1);
    assert_eq!(summary.average, 5.0);

    ctx.sign_in_admin();
    approve_review(&ReviewId::from("r-pending"), &ctx.deps).unwrap();

    let summary = creator_rating(&c1, &ctx.deps);
    assert_eq!(summary.count, 2);
    assert_eq!(summary.average, 4.0);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn admin_queues_require_admin(ctx: &TestHarness) {
    seed_three_statuses(ctx);

    ctx.sign_in_business("b1");
    assert!(matches!(
        pending_reviews(&ctx.deps).unwrap_err(),
        CoreError::Auth(AuthError::AdminRequired)
    ));

    ctx.sign_in_admin();
    assert_eq!(ids(&pending_reviews(&ctx.deps).unwrap()), vec!["r-pending"]);
    assert_eq!(all_reviews(&ctx.deps).unwrap().len(), 3);
}

// =============================================================================
// Authoring
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn uniqueness_is_a_caller_precondition(ctx: &TestHarness) {
    ctx.seed_creators(vec![approved_creator("c1")]);
    ctx.sign_in_business("b1");
    let b1 = BusinessId::from("b1");
    let c1 = CreatorId::from("c1");

    assert!(!has_reviewed(&b1, &c1, &ctx.deps));
    let first = create_review(new_review("c1", "b1", 4), &ctx.deps).unwrap();
    assert_eq!(first.status, ReviewStatus::Pending);
    assert_eq!(first.business_name.as_deref(), Some("Business b1"));
    assert!(has_reviewed(&b1, &c1, &ctx.deps));

    // Skipping the check produces a second row
    create_review(new_review("c1", "b1", 2), &ctx.deps).unwrap();
    assert_eq!(reviews_for_business(&b1, &ctx.deps).len(), 2);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn submit_refuses_a_second_review(ctx: &TestHarness) {
    ctx.seed_creators(vec![approved_creator("c1")]);
    ctx.sign_in_business("b1");

    submit_review(new_review("c1", "b1", 4), &ctx.deps).unwrap();
    let err = submit_review(new_review("c1", "b1", 5), &ctx.deps).unwrap_err();

    assert!(matches!(err, CoreError::DuplicateReview));
    assert_eq!(reviews_for_business(&BusinessId::from("b1"), &ctx.deps).len(), 1);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn review_input_is_validated(ctx: &TestHarness) {
    ctx.seed_creators(vec![approved_creator("c1")]);
    ctx.sign_in_business("b1");

    let err = create_review(new_review("c1", "b1", 6), &ctx.deps).unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));

    let long = NewReview::builder()
        .creator_id("c1")
        .business_id("b1")
        .rating(3u8)
        .comment("x".repeat(1001))
        .build();
    assert!(matches!(
        create_review(long, &ctx.deps).unwrap_err(),
        CoreError::Validation(_)
    ));

    let err = create_review(new_review("ghost", "b1", 3), &ctx.deps).unwrap_err();
    assert!(err.is_not_found());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn only_the_author_writes_as_a_business(ctx: &TestHarness) {
    ctx.seed_creators(vec![approved_creator("c1")]);
    ctx.sign_in_business("b2");

    let err = create_review(new_review("c1", "b1", 4), &ctx.deps).unwrap_err();
    assert!(matches!(err, CoreError::Auth(AuthError::PermissionDenied(_))));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn author_edits_and_deletes(ctx: &TestHarness) {
    seed_three_statuses(ctx);
    ctx.sign_in_business("b2");
    let id = ReviewId::from("r-approved");

    let edited = update_review(
        &id,
        UpdateReview {
            rating: Some(4),
            comment: Some("Good, slightly late".into()),
        },
        &ctx.deps,
    )
    .unwrap();
    assert_eq!(edited.rating.value(), 4);
    assert_eq!(edited.comment, "Good, slightly late");

    // Another business cannot touch it
    ctx.sign_in_business("b1");
    assert!(delete_review(&id, &ctx.deps).is_err());

    ctx.sign_in_business("b2");
    delete_review(&id, &ctx.deps).unwrap();
    assert!(!has_reviewed(&BusinessId::from("b2"), &CreatorId::from("c1"), &ctx.deps));
    assert_eq!(creator_rating(&CreatorId::from("c1"), &ctx.deps).count, 0);
}

// =============================================================================
// Moderation
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn review_moderation_cycle(ctx: &TestHarness) {
    seed_three_statuses(ctx);
    ctx.sign_in_admin();
    let id = ReviewId::from("r-pending");

    let rejected = reject_review(&id, None, &ctx.deps).unwrap();
    assert_eq!(rejected.status, ReviewStatus::Rejected);
    assert!(rejected.rejection_reason.is_none());

    let approved = approve_review(&id, &ctx.deps).unwrap();
    assert_eq!(approved.status, ReviewStatus::Approved);

    // Revoke with a reason
    let revoked =
        reject_review(&id, Some("Contains contact details".into()), &ctx.deps).unwrap();
    assert_eq!(revoked.status, ReviewStatus::Rejected);
    assert_eq!(revoked.rejection_reason.as_deref(), Some("Contains contact details"));

    // Same-state request is a silent no-op
    let before = ctx.deps.reviews.modification(&id);
    reject_review(&id, Some("different".into()), &ctx.deps).unwrap();
    assert_eq!(ctx.deps.reviews.modification(&id), before);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn review_moderation_is_admin_only(ctx: &TestHarness) {
    seed_three_statuses(ctx);
    ctx.sign_in_creator("c1");

    let err = approve_review(&ReviewId::from("r-pending"), &ctx.deps).unwrap_err();
    assert!(matches!(err, CoreError::Auth(AuthError::AdminRequired)));
}

// =============================================================================
// Replies
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn reply_lifecycle(ctx: &TestHarness) {
    seed_three_statuses(ctx);
    let approved = ReviewId::from("r-approved");
    let pending = ReviewId::from("r-pending");

    ctx.sign_in_creator("c1");

    // Only approved reviews take a first reply
    let err = add_reply(&pending, "Thanks", &ctx.deps).unwrap_err();
    assert!(matches!(err, CoreError::InvalidTransition { .. }));

    let replied = add_reply(&approved, "Thanks for the kind words!", &ctx.deps).unwrap();
    let reply = replied.reply.expect("reply stored");
    assert_eq!(reply.creator_reply, "Thanks for the kind words!");
    assert_eq!(reply.creator_reply_at, ctx.deps.today());

    assert!(add_reply(&approved, "Again", &ctx.deps).is_err());

    // Moderation does not block later edits
    ctx.sign_in_admin();
    reject_review(&approved, Some("Revoked".into()), &ctx.deps).unwrap();
    ctx.sign_in_creator("c1");

    let edited = edit_reply(&approved, "Edited reply", &ctx.deps).unwrap();
    assert_eq!(edited.reply.unwrap().creator_reply, "Edited reply");

    let cleared = delete_reply(&approved, &ctx.deps).unwrap();
    assert!(cleared.reply.is_none());
    assert!(delete_reply(&approved, &ctx.deps).is_err());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn only_the_reviewed_creator_replies(ctx: &TestHarness) {
    seed_three_statuses(ctx);
    let approved = ReviewId::from("r-approved");

    for sign_in in [
        TestHarness::sign_in_admin as fn(&TestHarness),
        |ctx: &TestHarness| ctx.sign_in_creator("c2"),
        |ctx: &TestHarness| ctx.sign_in_business("b2"),
    ] {
        sign_in(ctx);
        let err = add_reply(&approved, "Not mine", &ctx.deps).unwrap_err();
        assert!(matches!(err, CoreError::Auth(AuthError::PermissionDenied(_))));
    }

    let review = ctx.deps.reviews.get(&approved).unwrap();
    assert!(review.reply.is_none());
}
