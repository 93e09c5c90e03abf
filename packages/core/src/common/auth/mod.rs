/// Authorization module for the marketplace core
///
/// Provides a fluent API for authorization checks in action code:
///
/// ```rust
/// use marketplace_core::common::auth::{Actor, ActorType, AdminCapability};
/// use marketplace_core::common::AccountId;
///
/// let actor = Actor::new(ActorType::Admin, Some(AccountId::from("admin-1")));
/// assert!(actor.can(AdminCapability::ModerateCreators).check().is_ok());
/// ```
///
/// Ownership rules (a creator editing their own profile, a business editing
/// its own review) live on `SessionContext`; this module only answers
/// "is this actor an admin for this capability".
mod builder;
mod capability;
mod errors;

pub use builder::{Actor, ActorType, CapabilityBuilder};
pub use capability::AdminCapability;
pub use errors::AuthError;
