//! Subscriptions domain - cached vs canonical subscription status

pub mod models;
pub mod reconciler;

pub use models::{SubscriptionSnapshot, SubscriptionStatus};
pub use reconciler::SubscriptionReconciler;
