use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::common::{BusinessId, CoreError, CreatorId, EntityKind, ReviewId};
use crate::domains::overlay::{assign, overwrite, OverlayEntity, Patch};

/// Review moderation status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReviewStatus::Pending => write!(f, "pending"),
            ReviewStatus::Approved => write!(f, "approved"),
            ReviewStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl std::str::FromStr for ReviewStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ReviewStatus::Pending),
            "approved" => Ok(ReviewStatus::Approved),
            "rejected" => Ok(ReviewStatus::Rejected),
            _ => Err(CoreError::validation(format!("Invalid review status: {}", s))),
        }
    }
}

/// Star rating, 1 through 5
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self, CoreError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(CoreError::validation(format!(
                "Rating must be between {} and {}, got {}",
                Self::MIN,
                Self::MAX,
                value
            )))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rating::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The target creator's public answer to a review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewReply {
    pub creator_reply: String,
    pub creator_reply_at: NaiveDate,
}

/// Review model - a business's rating of a creator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub creator_id: CreatorId,
    pub business_id: BusinessId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,

    pub rating: Rating,
    #[serde(default)]
    pub comment: String,

    #[serde(default)]
    pub status: ReviewStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,

    /// Flattened on the wire as `creatorReply` / `creatorReplyAt`
    #[serde(flatten)]
    pub reply: Option<ReviewReply>,

    pub created_at: NaiveDate,
}

/// Input for writing a review
#[derive(Debug, Clone, TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct NewReview {
    pub creator_id: CreatorId,
    pub business_id: BusinessId,
    /// Raw star value, validated into a [`Rating`]
    pub rating: u8,
    #[builder(default)]
    pub comment: String,
    #[builder(default)]
    pub business_name: Option<String>,
}

/// Input for an author's edit
#[derive(Debug, Clone, Default)]
pub struct UpdateReview {
    pub rating: Option<u8>,
    pub comment: Option<String>,
}

/// Overlay modification fields for a review
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ReviewStatus>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub rejection_reason: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub reply: Option<Option<ReviewReply>>,
}

impl Patch for ReviewPatch {
    fn merge(&mut self, newer: Self) {
        overwrite(&mut self.rating, newer.rating);
        overwrite(&mut self.comment, newer.comment);
        overwrite(&mut self.status, newer.status);
        overwrite(&mut self.rejection_reason, newer.rejection_reason);
        overwrite(&mut self.reply, newer.reply);
    }
}

impl Review {
    /// Build a pending review from validated input.
    pub fn from_new(input: NewReview, rating: Rating, today: NaiveDate) -> Self {
        Self {
            id: ReviewId::generate(),
            creator_id: input.creator_id,
            business_id: input.business_id,
            business_name: input.business_name,
            rating,
            comment: input.comment,
            status: ReviewStatus::Pending,
            rejection_reason: None,
            reply: None,
            created_at: today,
        }
    }

    pub fn is_approved(&self) -> bool {
        self.status == ReviewStatus::Approved
    }

    pub fn has_reply(&self) -> bool {
        self.reply.is_some()
    }
}

impl OverlayEntity for Review {
    type Marker = crate::common::entity_ids::Review;
    type Patch = ReviewPatch;

    const KIND: EntityKind = EntityKind::Review;

    fn id(&self) -> &ReviewId {
        &self.id
    }

    fn apply(&mut self, patch: &ReviewPatch) {
        assign(&mut self.rating, &patch.rating);
        assign(&mut self.comment, &patch.comment);
        assign(&mut self.status, &patch.status);
        assign(&mut self.rejection_reason, &patch.rejection_reason);
        assign(&mut self.reply, &patch.reply);
    }

    fn is_publicly_listed(&self) -> bool {
        self.is_approved()
    }
}

/// Aggregate rating, recomputed on every read
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    /// Mean of approved ratings, `0.0` when there are none
    pub average: f64,
    pub count: usize,
}

impl RatingSummary {
    /// Summarize the approved reviews in `reviews`; others are ignored.
    pub fn from_reviews<'a>(reviews: impl IntoIterator<Item = &'a Review>) -> Self {
        let (sum, count) = reviews
            .into_iter()
            .filter(|r| r.is_approved())
            .fold((0u32, 0usize), |(sum, count), r| {
                (sum + u32::from(r.rating.value()), count + 1)
            });

        if count == 0 {
            return Self::default();
        }

        Self {
            average: f64::from(sum) / count as f64,
            count,
        }
    }
}

#[cfg(test)]
impl Review {
    pub(crate) fn sample(id: &str, creator_id: &str, business_id: &str) -> Self {
        Self {
            id: ReviewId::from(id),
            creator_id: CreatorId::from(creator_id),
            business_id: BusinessId::from(business_id),
            business_name: None,
            rating: Rating(4),
            comment: "Delivered on time".to_string(),
            status: ReviewStatus::Pending,
            rejection_reason: None,
            reply: None,
            created_at: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
        }
    }
}
