use serde::{Deserialize, Serialize};

use crate::common::{AccountId, ActorType, BusinessId, CreatorId};
use crate::domains::subscriptions::SubscriptionSnapshot;

/// Who is behind the current session, as reported by the identity provider.
///
/// The cached subscription snapshot rides along so it survives a reload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SessionIdentity {
    pub actor_type: ActorType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor_id: Option<AccountId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owned_creator_id: Option<CreatorId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owned_business_id: Option<BusinessId>,
    /// Display name attached to reviews this business writes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription: Option<SubscriptionSnapshot>,
}

impl SessionIdentity {
    pub fn guest() -> Self {
        Self::default()
    }

    pub fn admin(account: impl Into<AccountId>) -> Self {
        Self {
            actor_type: ActorType::Admin,
            actor_id: Some(account.into()),
            ..Default::default()
        }
    }

    pub fn creator(account: impl Into<AccountId>, creator_id: impl Into<CreatorId>) -> Self {
        Self {
            actor_type: ActorType::Creator,
            actor_id: Some(account.into()),
            owned_creator_id: Some(creator_id.into()),
            ..Default::default()
        }
    }

    pub fn business(account: impl Into<AccountId>, business_id: impl Into<BusinessId>) -> Self {
        Self {
            actor_type: ActorType::Business,
            actor_id: Some(account.into()),
            owned_business_id: Some(business_id.into()),
            ..Default::default()
        }
    }

    pub fn with_business_name(mut self, name: impl Into<String>) -> Self {
        self.business_name = Some(name.into());
        self
    }

    pub fn with_subscription(mut self, snapshot: SubscriptionSnapshot) -> Self {
        self.subscription = Some(snapshot);
        self
    }
}
