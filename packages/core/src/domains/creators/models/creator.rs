use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::common::{AccountId, CoreError, CreatorId, EntityKind};
use crate::domains::overlay::{assign, overwrite, OverlayEntity, Patch};

/// Creator lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum CreatorStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Deactivated,
}

impl std::fmt::Display for CreatorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CreatorStatus::Pending => write!(f, "pending"),
            CreatorStatus::Approved => write!(f, "approved"),
            CreatorStatus::Rejected => write!(f, "rejected"),
            CreatorStatus::Deactivated => write!(f, "deactivated"),
        }
    }
}

impl std::str::FromStr for CreatorStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(CreatorStatus::Pending),
            "approved" => Ok(CreatorStatus::Approved),
            "rejected" => Ok(CreatorStatus::Rejected),
            "deactivated" => Ok(CreatorStatus::Deactivated),
            _ => Err(CoreError::validation(format!("Invalid creator status: {}", s))),
        }
    }
}

/// A portfolio entry on a creator profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioItem {
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

/// Contact fields shown to subscribed businesses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

/// Creator model - a content creator's marketplace profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Creator {
    pub id: CreatorId,
    /// Account that owns this profile
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<AccountId>,

    // Profile
    pub name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub location: String,
    /// Starting price per engagement, whole currency units
    #[serde(default)]
    pub price: u32,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub platforms: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub portfolio: Vec<PortfolioItem>,
    #[serde(default)]
    pub contact: ContactInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followers: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,

    // Moderation
    #[serde(default)]
    pub status: CreatorStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,

    // Analytics
    #[serde(default)]
    pub profile_views: u64,

    pub created_at: NaiveDate,
}

/// Input for registering a new creator
#[derive(Debug, Clone, TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct RegisterCreator {
    pub name: String,
    #[builder(default)]
    pub owner_id: Option<AccountId>,
    #[builder(default)]
    pub bio: String,
    #[builder(default)]
    pub location: String,
    #[builder(default)]
    pub price: u32,
    #[builder(default)]
    pub categories: Vec<String>,
    #[builder(default)]
    pub platforms: Vec<String>,
    #[builder(default)]
    pub languages: Vec<String>,
    #[builder(default)]
    pub portfolio: Vec<PortfolioItem>,
    #[builder(default)]
    pub contact: ContactInfo,
    #[builder(default)]
    pub followers: Option<u64>,
    #[builder(default)]
    pub avatar_url: Option<String>,
}

/// Input for a profile edit (owner or admin)
#[derive(Debug, Clone, Default)]
pub struct UpdateCreator {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub price: Option<u32>,
    pub categories: Option<Vec<String>>,
    pub platforms: Option<Vec<String>>,
    pub languages: Option<Vec<String>>,
    pub portfolio: Option<Vec<PortfolioItem>>,
    pub contact: Option<ContactInfo>,
    pub followers: Option<Option<u64>>,
    pub avatar_url: Option<Option<String>>,
}

/// Overlay modification fields for a creator.
///
/// Double options distinguish "leave alone" (`None`) from "clear"
/// (`Some(None)`) for nullable fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatorPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platforms: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portfolio: Option<Vec<PortfolioItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<ContactInfo>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub followers: Option<Option<u64>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub avatar_url: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CreatorStatus>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub rejection_reason: Option<Option<String>>,
    /// Views counted locally and not yet pushed. Additive: merging sums
    /// and applying adds, so a higher remote count is never masked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_views_delta: Option<u64>,
}

impl From<UpdateCreator> for CreatorPatch {
    fn from(input: UpdateCreator) -> Self {
        Self {
            name: input.name,
            bio: input.bio,
            location: input.location,
            price: input.price,
            categories: input.categories,
            platforms: input.platforms,
            languages: input.languages,
            portfolio: input.portfolio,
            contact: input.contact,
            followers: input.followers,
            avatar_url: input.avatar_url,
            ..Default::default()
        }
    }
}

impl Patch for CreatorPatch {
    fn merge(&mut self, newer: Self) {
        overwrite(&mut self.name, newer.name);
        overwrite(&mut self.bio, newer.bio);
        overwrite(&mut self.location, newer.location);
        overwrite(&mut self.price, newer.price);
        overwrite(&mut self.categories, newer.categories);
        overwrite(&mut self.platforms, newer.platforms);
        overwrite(&mut self.languages, newer.languages);
        overwrite(&mut self.portfolio, newer.portfolio);
        overwrite(&mut self.contact, newer.contact);
        overwrite(&mut self.followers, newer.followers);
        overwrite(&mut self.avatar_url, newer.avatar_url);
        overwrite(&mut self.status, newer.status);
        overwrite(&mut self.rejection_reason, newer.rejection_reason);
        self.profile_views_delta = match (self.profile_views_delta, newer.profile_views_delta) {
            (Some(a), Some(b)) => Some(a.saturating_add(b)),
            (a, b) => a.or(b),
        };
    }

    fn rebase(&mut self, pushed: &Self) {
        if let Some(sent) = pushed.profile_views_delta {
            self.profile_views_delta = self
                .profile_views_delta
                .map(|local| local.saturating_sub(sent))
                .filter(|&left| left > 0);
        }
    }
}

impl Creator {
    /// Build a fresh pending creator from a registration.
    pub fn from_registration(input: RegisterCreator, today: NaiveDate) -> Self {
        Self {
            id: CreatorId::generate(),
            owner_id: input.owner_id,
            name: input.name,
            bio: input.bio,
            location: input.location,
            price: input.price,
            categories: input.categories,
            platforms: input.platforms,
            languages: input.languages,
            portfolio: input.portfolio,
            contact: input.contact,
            followers: input.followers,
            avatar_url: input.avatar_url,
            status: CreatorStatus::Pending,
            rejection_reason: None,
            profile_views: 0,
            created_at: today,
        }
    }

    /// Legacy consumers read a boolean `approved` alongside `status`.
    pub fn is_approved(&self) -> bool {
        self.status == CreatorStatus::Approved
    }

    /// Serialize with the legacy `approved` flag derived from `status`.
    pub fn to_legacy_json(&self) -> serde_json::Result<serde_json::Value> {
        let mut value = serde_json::to_value(self)?;
        if let Some(object) = value.as_object_mut() {
            object.insert("approved".into(), serde_json::Value::Bool(self.is_approved()));
        }
        Ok(value)
    }

    /// Deserialize a record that may predate `status`.
    ///
    /// A record with only the legacy flag maps `approved: true` to approved
    /// and anything else to pending. When both are present, `status` wins.
    pub fn from_legacy_json(mut value: serde_json::Value) -> serde_json::Result<Self> {
        if let Some(object) = value.as_object_mut() {
            if !object.contains_key("status") {
                let approved = object
                    .get("approved")
                    .and_then(serde_json::Value::as_bool)
                    .unwrap_or(false);
                let status = if approved {
                    CreatorStatus::Approved
                } else {
                    CreatorStatus::Pending
                };
                object.insert("status".into(), serde_json::to_value(status)?);
            }
            object.remove("approved");
        }
        serde_json::from_value(value)
    }

    #[cfg(test)]
    pub(crate) fn sample(id: &str, name: &str) -> Self {
        Self {
            id: CreatorId::from(id),
            owner_id: None,
            name: name.to_string(),
            bio: String::new(),
            location: String::new(),
            price: 100,
            categories: vec!["lifestyle".into()],
            platforms: vec!["instagram".into()],
            languages: vec!["en".into()],
            portfolio: Vec::new(),
            contact: ContactInfo::default(),
            followers: None,
            avatar_url: None,
            status: CreatorStatus::Pending,
            rejection_reason: None,
            profile_views: 0,
            created_at: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
        }
    }
}

impl OverlayEntity for Creator {
    type Marker = crate::common::entity_ids::Creator;
    type Patch = CreatorPatch;

    const KIND: EntityKind = EntityKind::Creator;

    fn id(&self) -> &CreatorId {
        &self.id
    }

    fn apply(&mut self, patch: &CreatorPatch) {
        assign(&mut self.name, &patch.name);
        assign(&mut self.bio, &patch.bio);
        assign(&mut self.location, &patch.location);
        assign(&mut self.price, &patch.price);
        assign(&mut self.categories, &patch.categories);
        assign(&mut self.platforms, &patch.platforms);
        assign(&mut self.languages, &patch.languages);
        assign(&mut self.portfolio, &patch.portfolio);
        assign(&mut self.contact, &patch.contact);
        assign(&mut self.followers, &patch.followers);
        assign(&mut self.avatar_url, &patch.avatar_url);
        assign(&mut self.status, &patch.status);
        assign(&mut self.rejection_reason, &patch.rejection_reason);
        if let Some(delta) = patch.profile_views_delta {
            self.profile_views = self.profile_views.saturating_add(delta);
        }
    }

    fn is_publicly_listed(&self) -> bool {
        self.is_approved()
    }

    fn to_record(&self) -> serde_json::Result<serde_json::Value> {
        self.to_legacy_json()
    }

    fn from_record(record: serde_json::Value) -> serde_json::Result<Self> {
        Self::from_legacy_json(record)
    }
}
