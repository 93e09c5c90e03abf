// Common types and utilities shared across the core

pub mod auth;
pub mod entity_ids;
pub mod errors;
pub mod id;

pub use auth::{Actor, ActorType, AdminCapability, AuthError};
pub use entity_ids::*;
pub use errors::{CoreError, CoreResult, EntityKind};
pub use id::Id;
