//! Test fixtures for building entities.

use chrono::NaiveDate;
use marketplace_core::common::{BusinessId, CreatorId, ReviewId};
use marketplace_core::domains::creators::models::{ContactInfo, Creator, CreatorStatus};
use marketplace_core::domains::reviews::models::{Rating, Review, ReviewStatus};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid fixture date")
}

/// A creator in `status` with a filled-in profile
pub fn creator(id: &str, name: &str, status: CreatorStatus) -> Creator {
    Creator {
        id: CreatorId::from(id),
        owner_id: Some(format!("acct-{}", id).into()),
        name: name.to_string(),
        bio: format!("{} makes short-form video", name),
        location: "Lisbon".to_string(),
        price: 150,
        categories: vec!["travel".to_string()],
        platforms: vec!["tiktok".to_string(), "instagram".to_string()],
        languages: vec!["en".to_string(), "pt".to_string()],
        portfolio: Vec::new(),
        contact: ContactInfo {
            email: Some(format!("{}@example.com", id)),
            ..Default::default()
        },
        followers: Some(12_000),
        avatar_url: None,
        status,
        rejection_reason: None,
        profile_views: 0,
        created_at: date(2026, 1, 10),
    }
}

pub fn approved_creator(id: &str) -> Creator {
    creator(id, &format!("Creator {}", id), CreatorStatus::Approved)
}

pub fn pending_creator(id: &str) -> Creator {
    creator(id, &format!("Creator {}", id), CreatorStatus::Pending)
}

/// A review of `creator_id` by `business_id`
pub fn review(
    id: &str,
    creator_id: &str,
    business_id: &str,
    status: ReviewStatus,
    stars: u8,
) -> Review {
    Review {
        id: ReviewId::from(id),
        creator_id: CreatorId::from(creator_id),
        business_id: BusinessId::from(business_id),
        business_name: Some(format!("Business {}", business_id)),
        rating: Rating::new(stars).expect("valid fixture rating"),
        comment: "Great collaboration".to_string(),
        status,
        rejection_reason: None,
        reply: None,
        created_at: date(2026, 2, 1),
    }
}
