//! Creator query actions

use tracing::debug;

use crate::common::{AuthError, CoreError, CoreResult, CreatorId, EntityKind};
use crate::domains::creators::models::{Creator, CreatorStatus};
use crate::domains::reviews::models::RatingSummary;
use crate::kernel::CoreDeps;

/// List creators.
///
/// `include_all` returns every live creator to an admin. Everyone else
/// gets the approved creators plus, for a creator, their own profile.
pub fn list_creators(include_all: bool, deps: &CoreDeps) -> Vec<Creator> {
    if include_all && deps.session.is_admin() {
        return deps.creators.list(true);
    }

    match deps.session.owned_creator_id() {
        Some(own) => deps
            .creators
            .list(true)
            .into_iter()
            .filter(|c| c.is_approved() || c.id == own)
            .collect(),
        None => deps.creators.list(false),
    }
}

/// Merged view of one creator; `NotFound` when absent or deleted.
pub fn get_creator(creator_id: &CreatorId, deps: &CoreDeps) -> CoreResult<Creator> {
    deps.creators
        .get(creator_id)
        .ok_or_else(|| CoreError::not_found(EntityKind::Creator, creator_id))
}

/// Status of the signed-in creator's own profile, if any.
pub(crate) fn viewer_status(deps: &CoreDeps) -> Option<CreatorStatus> {
    deps.session
        .owned_creator_id()
        .and_then(|own| deps.creators.get(&own))
        .map(|c| c.status)
}

/// Open a creator's profile page.
///
/// Checks visibility, then (for anyone but the owner) records the visit in
/// the recently-viewed list and counts the view once per session.
pub fn view_creator_profile(creator_id: &CreatorId, deps: &CoreDeps) -> CoreResult<Creator> {
    let creator = get_creator(creator_id, deps)?;

    if !deps.session.can_view_creator(&creator, viewer_status(deps)) {
        debug!(
            creator_id = %creator_id,
            actor_type = %deps.session.actor_type(),
            "Profile hidden from viewer"
        );
        return Err(
            AuthError::PermissionDenied(format!("creator {} is not visible", creator_id)).into(),
        );
    }

    if deps.session.owns_creator(creator_id) {
        return Ok(creator);
    }

    deps.recently_viewed.record(creator_id);
    if deps.views.try_increment(creator_id, &deps.creators)? {
        return get_creator(creator_id, deps);
    }
    Ok(creator)
}

/// Recently viewed creators that still exist, newest first.
pub fn recently_viewed_creators(limit: Option<usize>, deps: &CoreDeps) -> Vec<Creator> {
    deps.recently_viewed
        .list(limit)
        .iter()
        .filter_map(|id| deps.creators.get(id))
        .collect()
}

/// Favorite creators that still exist.
pub fn favorite_creators(deps: &CoreDeps) -> Vec<Creator> {
    deps.favorites
        .list()
        .iter()
        .filter_map(|id| deps.creators.get(id))
        .collect()
}

/// Average of approved review ratings for `creator_id`.
pub fn creator_rating(creator_id: &CreatorId, deps: &CoreDeps) -> RatingSummary {
    let approved = deps.reviews.list(false);
    RatingSummary::from_reviews(approved.iter().filter(|r| &r.creator_id == creator_id))
}
