use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::common::CoreError;

/// Billing state of a business subscription
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Trialing,
    PastDue,
    Canceled,
    Expired,
    /// Never subscribed
    #[default]
    None,
}

impl std::fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubscriptionStatus::Active => write!(f, "active"),
            SubscriptionStatus::Trialing => write!(f, "trialing"),
            SubscriptionStatus::PastDue => write!(f, "past_due"),
            SubscriptionStatus::Canceled => write!(f, "canceled"),
            SubscriptionStatus::Expired => write!(f, "expired"),
            SubscriptionStatus::None => write!(f, "none"),
        }
    }
}

impl std::str::FromStr for SubscriptionStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(SubscriptionStatus::Active),
            "trialing" => Ok(SubscriptionStatus::Trialing),
            "past_due" => Ok(SubscriptionStatus::PastDue),
            "canceled" => Ok(SubscriptionStatus::Canceled),
            "expired" => Ok(SubscriptionStatus::Expired),
            "none" => Ok(SubscriptionStatus::None),
            _ => Err(CoreError::validation(format!(
                "Invalid subscription status: {}",
                s
            ))),
        }
    }
}

/// One reading of a business's subscription
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionSnapshot {
    pub status: SubscriptionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<NaiveDate>,
}

impl SubscriptionSnapshot {
    pub fn new(status: SubscriptionStatus) -> Self {
        Self {
            status,
            plan: None,
            expires_at: None,
        }
    }

    /// Snapshot for a business with no subscription on record
    pub fn none() -> Self {
        Self::new(SubscriptionStatus::None)
    }

    pub fn with_plan(mut self, plan: impl Into<String>) -> Self {
        self.plan = Some(plan.into());
        self
    }

    pub fn expiring(mut self, date: NaiveDate) -> Self {
        self.expires_at = Some(date);
        self
    }

    /// Only an exactly `active` status grants subscriber access.
    pub fn is_active(&self) -> bool {
        self.status == SubscriptionStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn snapshot_wire_format() {
        let snapshot = SubscriptionSnapshot::new(SubscriptionStatus::PastDue)
            .with_plan("pro")
            .expiring(NaiveDate::from_ymd_opt(2026, 12, 31).unwrap());

        assert_eq!(
            serde_json::to_value(&snapshot).unwrap(),
            json!({ "status": "past_due", "plan": "pro", "expiresAt": "2026-12-31" })
        );
    }

    #[test]
    fn only_active_counts_as_active() {
        assert!(SubscriptionSnapshot::new(SubscriptionStatus::Active).is_active());
        assert!(!SubscriptionSnapshot::new(SubscriptionStatus::Trialing).is_active());
        assert!(!SubscriptionSnapshot::none().is_active());
    }

    #[test]
    fn status_round_trips_through_display() {
        for status in [
            SubscriptionStatus::Active,
            SubscriptionStatus::PastDue,
            SubscriptionStatus::None,
        ] {
            assert_eq!(status.to_string().parse::<SubscriptionStatus>().unwrap(), status);
        }
    }
}
