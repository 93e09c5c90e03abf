//! Dual-source subscription reconciliation.
//!
//! `cached` answers immediately from the session; `reconcile` asks the
//! business API for the canonical value and folds it back into the
//! session. Only the most recently issued reconcile for a business may
//! write: each call takes a token from a monotonic counter and records it
//! as that business's latest; a response whose token has been superseded
//! is dropped. Reads for different businesses never supersede each other.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tracing::{debug, info, warn};

use super::SubscriptionSnapshot;
use crate::common::BusinessId;
use crate::domains::session::SessionContext;
use crate::kernel::BaseBusinessApi;

pub struct SubscriptionReconciler {
    api: Arc<dyn BaseBusinessApi>,
    session: Arc<SessionContext>,
    next_token: AtomicU64,
    latest: Mutex<HashMap<BusinessId, u64>>,
    timeout: Duration,
}

impl SubscriptionReconciler {
    pub fn new(
        api: Arc<dyn BaseBusinessApi>,
        session: Arc<SessionContext>,
        timeout: Duration,
    ) -> Self {
        Self {
            api,
            session,
            next_token: AtomicU64::new(0),
            latest: Mutex::new(HashMap::new()),
            timeout,
        }
    }

    fn latest(&self) -> MutexGuard<'_, HashMap<BusinessId, u64>> {
        self.latest.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// The session's cached snapshot for `business_id`, if the session
    /// belongs to that business.
    pub fn cached(&self, business_id: &BusinessId) -> Option<SubscriptionSnapshot> {
        if self.session.owns_business(business_id) {
            self.session.cached_subscription()
        } else {
            None
        }
    }

    /// Read the canonical status and fold it into the session.
    ///
    /// Never fails: a failed or timed-out read returns the cached snapshot
    /// (or [`SubscriptionSnapshot::none`] when there is nothing cached).
    pub async fn reconcile(&self, business_id: &BusinessId) -> SubscriptionSnapshot {
        let token = self.next_token.fetch_add(1, Ordering::SeqCst) + 1;
        self.latest().insert(business_id.clone(), token);
        let fallback = || {
            self.cached(business_id)
                .unwrap_or_else(SubscriptionSnapshot::none)
        };

        let canonical =
            match tokio::time::timeout(self.timeout, self.api.fetch_subscription(business_id)).await
            {
                Ok(Ok(snapshot)) => snapshot,
                Ok(Err(e)) => {
                    warn!(
                        business_id = %business_id,
                        error = %e,
                        "Subscription reconciliation failed, keeping cached status"
                    );
                    return fallback();
                }
                Err(_) => {
                    warn!(
                        business_id = %business_id,
                        timeout_ms = self.timeout.as_millis() as u64,
                        "Subscription reconciliation timed out, keeping cached status"
                    );
                    return fallback();
                }
            };

        if self.latest().get(business_id) != Some(&token) {
            debug!(business_id = %business_id, token, "Discarding superseded subscription read");
            return fallback();
        }

        match self.cached(business_id) {
            Some(cached) if cached == canonical => {
                debug!(
                    business_id = %business_id,
                    status = %canonical.status,
                    "Subscription status confirmed"
                );
            }
            Some(cached) => {
                info!(
                    business_id = %business_id,
                    cached = %cached.status,
                    canonical = %canonical.status,
                    "Subscription status corrected"
                );
                self.session.replace_subscription(canonical.clone());
            }
            None if self.session.owns_business(business_id) => {
                info!(
                    business_id = %business_id,
                    status = %canonical.status,
                    "Subscription status cached"
                );
                self.session.replace_subscription(canonical.clone());
            }
            None => {}
        }

        canonical
    }
}
