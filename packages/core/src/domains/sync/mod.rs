//! Remote sync - pull base datasets, push local changes
//!
//! Hydration replaces the overlay's base with the remote store's records;
//! local modifications and created entities keep winning on read. Pushing
//! sends each pending change and settles it only once the remote store has
//! accepted it, so a failed push leaves the local change in place.

use tracing::{info, warn};

use crate::common::{CoreError, CoreResult};
use crate::domains::overlay::{OverlayEntity, OverlayStore, PendingChange};
use crate::kernel::{BaseEntityApi, CoreDeps};

/// Counts from one push pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    pub failed: usize,
}

impl SyncReport {
    pub fn total(&self) -> usize {
        self.created + self.updated + self.deleted + self.failed
    }

    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

async fn hydrate<E: OverlayEntity>(
    store: &OverlayStore<E>,
    api: &dyn BaseEntityApi<E>,
) -> CoreResult<usize> {
    let entities = api.fetch_all().await.map_err(CoreError::Remote)?;
    let count = entities.len();
    store.replace_base(entities);
    info!(kind = %E::KIND, count, "Base dataset hydrated");
    Ok(count)
}

/// Pull every creator from the remote store into the overlay base.
pub async fn hydrate_creators(deps: &CoreDeps) -> CoreResult<usize> {
    hydrate(&deps.creators, deps.creator_api.as_ref()).await
}

/// Pull every review from the remote store into the overlay base.
pub async fn hydrate_reviews(deps: &CoreDeps) -> CoreResult<usize> {
    hydrate(&deps.reviews, deps.review_api.as_ref()).await
}

/// Hydrate both kinds concurrently. Returns `(creators, reviews)`.
pub async fn hydrate_all(deps: &CoreDeps) -> CoreResult<(usize, usize)> {
    futures::try_join!(hydrate_creators(deps), hydrate_reviews(deps))
}

async fn push<E: OverlayEntity>(
    store: &OverlayStore<E>,
    api: &dyn BaseEntityApi<E>,
) -> SyncReport {
    let mut report = SyncReport::default();

    for change in store.pending_changes() {
        match change {
            PendingChange::Create {
                entity,
                modification,
            } => match api.create(&entity).await {
                Ok(canonical) => {
                    store.settle_created(canonical, modification.as_ref());
                    report.created += 1;
                }
                Err(e) => {
                    warn!(
                        kind = %E::KIND,
                        id = %entity.id(),
                        error = %e,
                        "Remote create failed, keeping local copy"
                    );
                    report.failed += 1;
                }
            },
            PendingChange::Update { id, modification } => {
                match api.update(&id, &modification.fields).await {
                    Ok(canonical) => {
                        store.settle_updated(canonical, &modification);
                        report.updated += 1;
                    }
                    Err(e) => {
                        warn!(
                            kind = %E::KIND,
                            id = %id,
                            error = %e,
                            "Remote update failed, keeping local modification"
                        );
                        report.failed += 1;
                    }
                }
            }
            PendingChange::Delete { id, .. } => match api.delete(&id).await {
                Ok(()) => {
                    store.settle_deleted(&id);
                    report.deleted += 1;
                }
                Err(e) => {
                    warn!(
                        kind = %E::KIND,
                        id = %id,
                        error = %e,
                        "Remote delete failed, keeping tombstone"
                    );
                    report.failed += 1;
                }
            },
        }
    }

    info!(
        kind = %E::KIND,
        created = report.created,
        updated = report.updated,
        deleted = report.deleted,
        failed = report.failed,
        "Pushed local changes"
    );
    report
}

/// Send pending creator changes to the remote store.
pub async fn push_creators(deps: &CoreDeps) -> SyncReport {
    push(&deps.creators, deps.creator_api.as_ref()).await
}

/// Send pending review changes to the remote store.
pub async fn push_reviews(deps: &CoreDeps) -> SyncReport {
    push(&deps.reviews, deps.review_api.as_ref()).await
}
