/// Admin capabilities in the marketplace
///
/// Every capability is admin-only. Moderation is the only admin surface the
/// core knows about; everything else is gated by ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminCapability {
    /// Approve, reject, deactivate or re-queue creators
    ModerateCreators,

    /// Approve, reject or revoke reviews
    ModerateReviews,

    /// Edit or delete any creator profile
    ManageCreators,

    /// Edit or delete any review
    ManageReviews,

    /// Full admin access to all operations
    FullAdmin,
}

impl AdminCapability {
    pub fn describe(&self) -> &'static str {
        match self {
            AdminCapability::ModerateCreators => "moderate creators",
            AdminCapability::ModerateReviews => "moderate reviews",
            AdminCapability::ManageCreators => "manage creators",
            AdminCapability::ManageReviews => "manage reviews",
            AdminCapability::FullAdmin => "full admin",
        }
    }
}
