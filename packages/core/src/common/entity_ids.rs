//! Typed ID definitions for all marketplace entities.
//!
//! ```rust
//! use marketplace_core::common::{BusinessId, CreatorId};
//!
//! let creator_id = CreatorId::from("c1");
//! let business_id = BusinessId::from("b1");
//!
//! // This would be a compile error:
//! // let wrong: CreatorId = business_id;
//! ```

pub use super::id::Id;

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for Creator entities (content creator profiles).
pub struct Creator;

/// Marker type for Review entities (business-authored reviews of creators).
pub struct Review;

/// Marker type for Business entities (subscribers that hire creators).
pub struct Business;

/// Marker type for signed-in accounts (the actor behind a session).
pub struct Account;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

/// Typed ID for Creator entities.
pub type CreatorId = Id<Creator>;

/// Typed ID for Review entities.
pub type ReviewId = Id<Review>;

/// Typed ID for Business entities.
pub type BusinessId = Id<Business>;

/// Typed ID for accounts.
pub type AccountId = Id<Account>;
