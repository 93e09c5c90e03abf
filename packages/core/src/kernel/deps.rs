//! Core dependencies for actions (using traits for testability)
//!
//! `CoreDeps` is the composition root: every store and service the actions
//! touch is built here from explicit ports and handed around by reference.

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::domains::creators::models::Creator;
use crate::domains::favorites::Favorites;
use crate::domains::overlay::{OverlaySlots, OverlayStore};
use crate::domains::recently_viewed::RecentlyViewed;
use crate::domains::reviews::models::Review;
use crate::domains::session::SessionContext;
use crate::domains::subscriptions::SubscriptionReconciler;
use crate::domains::views::ViewCounter;
use crate::kernel::storage::{FileStore, MemoryStore};
use crate::kernel::{BaseBusinessApi, BaseEntityApi, BaseKeyValueStore};

/// Core dependencies accessible to actions
#[derive(Clone)]
pub struct CoreDeps {
    pub config: Arc<Config>,
    pub substrate: Arc<dyn BaseKeyValueStore>,

    // Remote ports
    pub creator_api: Arc<dyn BaseEntityApi<Creator>>,
    pub review_api: Arc<dyn BaseEntityApi<Review>>,
    pub business_api: Arc<dyn BaseBusinessApi>,

    // Local state
    pub session: Arc<SessionContext>,
    pub creators: Arc<OverlayStore<Creator>>,
    pub reviews: Arc<OverlayStore<Review>>,
    pub favorites: Arc<Favorites>,
    pub recently_viewed: Arc<RecentlyViewed>,
    /// Session-scoped, never persisted
    pub views: Arc<ViewCounter>,
    pub subscriptions: Arc<SubscriptionReconciler>,
}

impl CoreDeps {
    /// Wire every component over `substrate`, restoring persisted state.
    pub fn new(
        config: Config,
        substrate: Arc<dyn BaseKeyValueStore>,
        creator_api: Arc<dyn BaseEntityApi<Creator>>,
        review_api: Arc<dyn BaseEntityApi<Review>>,
        business_api: Arc<dyn BaseBusinessApi>,
    ) -> Self {
        let session = Arc::new(SessionContext::open(substrate.clone(), &config));
        let subscriptions = Arc::new(SubscriptionReconciler::new(
            business_api.clone(),
            session.clone(),
            config.reconcile_timeout,
        ));

        Self {
            creators: Arc::new(OverlayStore::open(
                substrate.clone(),
                OverlaySlots::for_kind(&config, "creators"),
            )),
            reviews: Arc::new(OverlayStore::open(
                substrate.clone(),
                OverlaySlots::for_kind(&config, "reviews"),
            )),
            favorites: Arc::new(Favorites::open(substrate.clone(), &config)),
            recently_viewed: Arc::new(RecentlyViewed::open(substrate.clone(), &config)),
            views: Arc::new(ViewCounter::new()),
            session,
            subscriptions,
            creator_api,
            review_api,
            business_api,
            substrate,
            config: Arc::new(config),
        }
    }

    /// Pick the substrate from config: a `FileStore` when a storage
    /// directory is set, process memory otherwise.
    pub fn from_config(
        config: Config,
        creator_api: Arc<dyn BaseEntityApi<Creator>>,
        review_api: Arc<dyn BaseEntityApi<Review>>,
        business_api: Arc<dyn BaseBusinessApi>,
    ) -> Result<Self> {
        let substrate: Arc<dyn BaseKeyValueStore> = match &config.storage_dir {
            Some(dir) => {
                info!(dir = %dir.display(), "Using file-backed storage");
                Arc::new(
                    FileStore::open(dir)
                        .with_context(|| format!("Failed to open storage at {}", dir.display()))?,
                )
            }
            None => {
                info!("Using in-memory storage");
                Arc::new(MemoryStore::new())
            }
        };

        Ok(Self::new(
            config,
            substrate,
            creator_api,
            review_api,
            business_api,
        ))
    }

    /// Date stamped on new records and replies.
    pub fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}
