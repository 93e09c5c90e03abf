//! Creators domain - profiles and their moderation lifecycle

pub mod actions;
pub mod machines;
pub mod models;

pub use machines::{CreatorAction, CreatorMachine};
pub use models::{Creator, CreatorPatch, CreatorStatus, RegisterCreator, UpdateCreator};
