//! Session identity context.
//!
//! Holds the active actor and answers the ownership and visibility
//! questions every other component asks before acting.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info};

use super::SessionIdentity;
use crate::common::{Actor, ActorType, BusinessId, CreatorId};
use crate::config::Config;
use crate::domains::creators::models::{Creator, CreatorStatus};
use crate::domains::reviews::models::{Review, ReviewStatus};
use crate::domains::subscriptions::SubscriptionSnapshot;
use crate::kernel::storage::{load_json, persist_json, remove_slot};
use crate::kernel::BaseKeyValueStore;

pub const SESSION_SLOT: &str = "session";

pub struct SessionContext {
    substrate: Arc<dyn BaseKeyValueStore>,
    key: String,
    identity: RwLock<SessionIdentity>,
}

impl SessionContext {
    /// Restore the persisted identity, or start as a guest.
    pub fn open(substrate: Arc<dyn BaseKeyValueStore>, config: &Config) -> Self {
        let key = config.storage_key(SESSION_SLOT);
        let identity: SessionIdentity = load_json(substrate.as_ref(), &key).unwrap_or_default();
        debug!(actor_type = %identity.actor_type, "Session restored");

        Self {
            substrate,
            key,
            identity: RwLock::new(identity),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionIdentity> {
        self.identity.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionIdentity> {
        self.identity.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn sign_in(&self, identity: SessionIdentity) {
        info!(actor_type = %identity.actor_type, "Session signed in");
        let mut current = self.write();
        *current = identity;
        persist_json(self.substrate.as_ref(), &self.key, &*current);
    }

    pub fn sign_out(&self) {
        info!("Session signed out");
        *self.write() = SessionIdentity::guest();
        remove_slot(self.substrate.as_ref(), &self.key);
    }

    pub fn identity(&self) -> SessionIdentity {
        self.read().clone()
    }

    pub fn actor(&self) -> Actor {
        let identity = self.read();
        Actor::new(identity.actor_type, identity.actor_id.clone())
    }

    pub fn actor_type(&self) -> ActorType {
        self.read().actor_type
    }

    pub fn is_admin(&self) -> bool {
        self.read().actor_type.is_admin()
    }

    pub fn owned_creator_id(&self) -> Option<CreatorId> {
        self.read().owned_creator_id.clone()
    }

    pub fn owned_business_id(&self) -> Option<BusinessId> {
        self.read().owned_business_id.clone()
    }

    pub fn business_name(&self) -> Option<String> {
        self.read().business_name.clone()
    }

    pub fn owns_creator(&self, creator_id: &CreatorId) -> bool {
        let identity = self.read();
        identity.actor_type == ActorType::Creator
            && identity.owned_creator_id.as_ref() == Some(creator_id)
    }

    pub fn owns_business(&self, business_id: &BusinessId) -> bool {
        let identity = self.read();
        identity.actor_type == ActorType::Business
            && identity.owned_business_id.as_ref() == Some(business_id)
    }

    // =========================================================================
    // Visibility
    // =========================================================================

    /// Whether this session may open `target`'s profile.
    ///
    /// `viewer_status` is the status of the viewer's own creator profile,
    /// when the viewer is a creator. Pending and rejected creators are
    /// confined to their own profile.
    pub fn can_view_creator(&self, target: &Creator, viewer_status: Option<CreatorStatus>) -> bool {
        if self.is_admin() || self.owns_creator(&target.id) {
            return true;
        }

        if self.actor_type() == ActorType::Creator
            && matches!(
                viewer_status,
                Some(CreatorStatus::Pending) | Some(CreatorStatus::Rejected)
            )
        {
            return false;
        }

        target.is_approved()
    }

    pub fn can_view_review(&self, review: &Review) -> bool {
        match review.status {
            ReviewStatus::Approved => true,
            ReviewStatus::Pending => {
                self.is_admin()
                    || self.owns_business(&review.business_id)
                    || self.owns_creator(&review.creator_id)
            }
            ReviewStatus::Rejected => self.is_admin() || self.owns_business(&review.business_id),
        }
    }

    // =========================================================================
    // Subscription
    // =========================================================================

    pub fn cached_subscription(&self) -> Option<SubscriptionSnapshot> {
        self.read().subscription.clone()
    }

    /// Overwrite the cached snapshot and persist the identity.
    pub fn replace_subscription(&self, snapshot: SubscriptionSnapshot) {
        let mut identity = self.write();
        identity.subscription = Some(snapshot);
        persist_json(self.substrate.as_ref(), &self.key, &*identity);
    }

    /// Subscriber-gated features: a business needs a displayed status of
    /// exactly `active`; admins and creators always pass; guests never do.
    pub fn has_active_subscription(&self) -> bool {
        let identity = self.read();
        match identity.actor_type {
            ActorType::Admin | ActorType::Creator => true,
            ActorType::Guest => false,
            ActorType::Business => identity
                .subscription
                .as_ref()
                .map(SubscriptionSnapshot::is_active)
                .unwrap_or(false),
        }
    }
}
