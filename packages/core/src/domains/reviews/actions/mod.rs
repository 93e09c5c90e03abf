//! Review actions - queries, authoring, moderation and creator replies

pub mod moderation;
pub mod mutations;
pub mod queries;
pub mod replies;

pub use moderation::*;
pub use mutations::*;
pub use queries::*;
pub use replies::*;

use crate::common::{AdminCapability, AuthError, BusinessId, CoreResult};
use crate::kernel::CoreDeps;

/// The authoring business passes; anyone else needs `capability`.
pub(crate) fn require_author_or(
    business_id: &BusinessId,
    capability: AdminCapability,
    deps: &CoreDeps,
) -> CoreResult<()> {
    if deps.session.owns_business(business_id) {
        return Ok(());
    }
    deps.session
        .actor()
        .can(capability)
        .check()
        .map_err(|e| match e {
            AuthError::AdminRequired => {
                AuthError::PermissionDenied(format!("only business {} may do this", business_id))
            }
            other => other,
        })?;
    Ok(())
}
