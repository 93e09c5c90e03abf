// Creator Marketplace - client-side reconciliation core
//
// Keeps a local, mutable view of remotely owned creators, reviews and
// subscriptions consistent across reloads, optimistic edits and moderation.
//
// Everything is wired through kernel::CoreDeps; the UI calls the action
// functions in domains/*/actions.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;

pub use config::*;
pub use kernel::CoreDeps;
