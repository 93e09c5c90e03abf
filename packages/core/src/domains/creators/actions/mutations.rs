//! Creator mutation actions

use tracing::info;

use super::require_owner_or;
use crate::common::{AdminCapability, AuthError, CoreError, CoreResult, CreatorId};
use crate::domains::creators::models::{Creator, CreatorPatch, RegisterCreator, UpdateCreator};
use crate::kernel::CoreDeps;

/// Register a new creator profile (starts pending).
///
/// The profile is kept in the created slot until it is pushed to the
/// remote store.
pub fn register_creator(input: RegisterCreator, deps: &CoreDeps) -> CoreResult<Creator> {
    let actor = deps.session.actor();
    let account = actor
        .actor_id()
        .cloned()
        .ok_or(AuthError::AuthenticationRequired)?;

    if input.name.trim().is_empty() {
        return Err(CoreError::validation("Creator name is required"));
    }

    let mut input = input;
    if input.owner_id.is_none() && !actor.actor_type().is_admin() {
        input.owner_id = Some(account);
    }

    info!(name = %input.name, "Registering creator");

    let creator = deps
        .creators
        .insert_created(Creator::from_registration(input, deps.today()))?;

    info!(creator_id = %creator.id, "Creator registered");
    Ok(creator)
}

/// Edit profile fields (owner or admin).
pub fn update_creator(
    creator_id: &CreatorId,
    input: UpdateCreator,
    deps: &CoreDeps,
) -> CoreResult<Creator> {
    require_owner_or(creator_id, AdminCapability::ManageCreators, deps)?;

    if matches!(&input.name, Some(name) if name.trim().is_empty()) {
        return Err(CoreError::validation("Creator name cannot be blank"));
    }

    info!(creator_id = %creator_id, "Updating creator");

    deps.creators.update(creator_id, CreatorPatch::from(input))
}

/// Soft-delete a creator (owner or admin).
pub fn delete_creator(creator_id: &CreatorId, deps: &CoreDeps) -> CoreResult<()> {
    require_owner_or(creator_id, AdminCapability::ManageCreators, deps)?;

    info!(creator_id = %creator_id, "Deleting creator");

    deps.creators.soft_delete(creator_id)?;
    deps.favorites.remove(creator_id);
    deps.recently_viewed.forget(creator_id);
    Ok(())
}

/// Star a creator. Only live creators can be favorited.
pub fn add_favorite(creator_id: &CreatorId, deps: &CoreDeps) -> CoreResult<bool> {
    super::get_creator(creator_id, deps)?;
    Ok(deps.favorites.add(creator_id))
}

pub fn remove_favorite(creator_id: &CreatorId, deps: &CoreDeps) -> bool {
    deps.favorites.remove(creator_id)
}
