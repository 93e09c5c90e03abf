pub mod creators;
pub mod favorites;
pub mod overlay;
pub mod recently_viewed;
pub mod reviews;
pub mod session;
pub mod subscriptions;
pub mod sync;
pub mod views;
