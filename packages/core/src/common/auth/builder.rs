use serde::{Deserialize, Serialize};

use super::{AdminCapability, AuthError};
use crate::common::entity_ids::AccountId;

/// Kind of actor behind a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActorType {
    #[default]
    Guest,
    Creator,
    Business,
    Admin,
}

impl ActorType {
    pub fn is_admin(&self) -> bool {
        matches!(self, ActorType::Admin)
    }

    pub fn is_guest(&self) -> bool {
        matches!(self, ActorType::Guest)
    }
}

impl std::fmt::Display for ActorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActorType::Guest => write!(f, "guest"),
            ActorType::Creator => write!(f, "creator"),
            ActorType::Business => write!(f, "business"),
            ActorType::Admin => write!(f, "admin"),
        }
    }
}

/// Entry point for authorization checks
///
/// Usage:
/// ```
/// use marketplace_core::common::auth::{Actor, ActorType, AdminCapability, AuthError};
///
/// let result = Actor::new(ActorType::Business, None)
///     .can(AdminCapability::ModerateReviews)
///     .check();
/// assert_eq!(result, Err(AuthError::AuthenticationRequired));
/// ```
#[derive(Debug, Clone)]
pub struct Actor {
    actor_type: ActorType,
    actor_id: Option<AccountId>,
}

impl Actor {
    /// Create a new actor for authorization checks
    ///
    /// # Arguments
    /// * `actor_type` - Role from the session identity provider
    /// * `actor_id` - Account behind the session (`None` for guests)
    pub fn new(actor_type: ActorType, actor_id: Option<AccountId>) -> Self {
        Self {
            actor_type,
            actor_id,
        }
    }

    pub fn guest() -> Self {
        Self::new(ActorType::Guest, None)
    }

    pub fn actor_type(&self) -> ActorType {
        self.actor_type
    }

    pub fn actor_id(&self) -> Option<&AccountId> {
        self.actor_id.as_ref()
    }

    /// Specify what capability the actor needs
    pub fn can(&self, capability: AdminCapability) -> CapabilityBuilder<'_> {
        CapabilityBuilder {
            actor: self,
            capability,
        }
    }
}

/// Builder after specifying capability
pub struct CapabilityBuilder<'a> {
    actor: &'a Actor,
    capability: AdminCapability,
}

impl CapabilityBuilder<'_> {
    /// Perform the authorization check
    pub fn check(self) -> Result<(), AuthError> {
        check_admin_permission(self.actor, self.capability)
    }
}

/// Core permission check function
///
/// The actor type comes from the session identity provider, which already
/// authenticated the account. Server-side enforcement is the remote store's
/// job; this check keeps the local view from offering actions the server
/// would refuse.
fn check_admin_permission(actor: &Actor, capability: AdminCapability) -> Result<(), AuthError> {
    if actor.actor_type.is_guest() || actor.actor_id.is_none() {
        return Err(AuthError::AuthenticationRequired);
    }

    if !actor.actor_type.is_admin() {
        tracing::debug!(
            actor_type = %actor.actor_type,
            capability = capability.describe(),
            "Admin capability denied"
        );
        return Err(AuthError::AdminRequired);
    }

    Ok(())
}
