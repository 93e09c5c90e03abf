//! Test harness wiring the core over in-memory mocks.
//!
//! Every test gets a fresh `CoreDeps`; the substrate is kept on the
//! harness so a test can reopen the core over the same storage.

use std::sync::Arc;

use marketplace_core::common::{BusinessId, CreatorId};
use marketplace_core::domains::creators::models::Creator;
use marketplace_core::domains::reviews::models::Review;
use marketplace_core::domains::session::SessionIdentity;
use marketplace_core::domains::subscriptions::SubscriptionSnapshot;
use marketplace_core::kernel::storage::MemoryStore;
use marketplace_core::kernel::telemetry::init_test_tracing;
use marketplace_core::kernel::test_dependencies::{MockBusinessApi, MockEntityApi};
use marketplace_core::kernel::{BaseKeyValueStore, CoreDeps, TestDependencies};
use marketplace_core::Config;
use test_context::AsyncTestContext;

/// Test harness that owns the core and its mocks.
///
/// # Example using test-context
///
/// ```ignore
/// use test_context::test_context;
///
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &TestHarness) {
///     ctx.sign_in_admin();
///     // ... test code
/// }
/// ```
pub struct TestHarness {
    pub deps: CoreDeps,
    pub substrate: Arc<MemoryStore>,
    pub creator_api: Arc<MockEntityApi<Creator>>,
    pub review_api: Arc<MockEntityApi<Review>>,
    pub business_api: Arc<MockBusinessApi>,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new()
    }

    async fn teardown(self) {
        // Everything lives in memory and is dropped with the harness
    }
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_dependencies(TestDependencies::new())
    }

    /// Build over caller-supplied mocks. The substrate is always a fresh
    /// `MemoryStore` owned by the harness.
    pub fn with_dependencies(test_deps: TestDependencies) -> Self {
        init_test_tracing();

        let substrate = Arc::new(MemoryStore::new());
        let test_deps = test_deps.substrate(substrate.clone());

        Self {
            substrate,
            creator_api: test_deps.creator_api.clone(),
            review_api: test_deps.review_api.clone(),
            business_api: test_deps.business_api.clone(),
            deps: test_deps.into_deps(),
        }
    }

    pub fn with_business_api(api: MockBusinessApi) -> Self {
        Self::with_dependencies(TestDependencies::new().mock_business(api))
    }

    pub fn with_config(config: Config) -> Self {
        Self::with_dependencies(TestDependencies::new().config(config))
    }

    /// A second core over the same substrate and mocks, as after a reload.
    pub fn reopen(&self) -> CoreDeps {
        let substrate: Arc<dyn BaseKeyValueStore> = self.substrate.clone();
        CoreDeps::new(
            (*self.deps.config).clone(),
            substrate,
            self.creator_api.clone(),
            self.review_api.clone(),
            self.business_api.clone(),
        )
    }

    // =========================================================================
    // Sessions
    // =========================================================================

    pub fn sign_in_admin(&self) {
        self.deps.session.sign_in(SessionIdentity::admin("admin-1"));
    }

    pub fn sign_in_creator(&self, creator_id: &str) {
        self.deps.session.sign_in(SessionIdentity::creator(
            format!("acct-{}", creator_id),
            CreatorId::from(creator_id),
        ));
    }

    pub fn sign_in_business(&self, business_id: &str) {
        self.deps.session.sign_in(
            SessionIdentity::business(
                format!("acct-{}", business_id),
                BusinessId::from(business_id),
            )
            .with_business_name(format!("Business {}", business_id)),
        );
    }

    pub fn sign_in_business_with(&self, business_id: &str, snapshot: SubscriptionSnapshot) {
        self.deps.session.sign_in(
            SessionIdentity::business(
                format!("acct-{}", business_id),
                BusinessId::from(business_id),
            )
            .with_subscription(snapshot),
        );
    }

    pub fn sign_out(&self) {
        self.deps.session.sign_out();
    }

    // =========================================================================
    // Seeding
    // =========================================================================

    /// Install creators as the base dataset (as if hydrated).
    pub fn seed_creators(&self, creators: Vec<Creator>) {
        self.deps.creators.replace_base(creators);
    }

    pub fn seed_reviews(&self, reviews: Vec<Review>) {
        self.deps.reviews.replace_base(reviews);
    }
}
