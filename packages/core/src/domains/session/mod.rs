//! Session domain - the active actor and its ownership predicates

pub mod context;
pub mod identity;

pub use context::SessionContext;
pub use identity::SessionIdentity;
