//! Reviews domain - business reviews of creators, moderation and replies

pub mod actions;
pub mod machines;
pub mod models;

pub use machines::{ReplyAction, ReplyMachine, ReviewAction, ReviewMachine};
pub use models::{
    NewReview, Rating, RatingSummary, Review, ReviewPatch, ReviewReply, ReviewStatus, UpdateReview,
};
