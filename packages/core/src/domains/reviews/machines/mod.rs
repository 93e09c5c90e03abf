//! Review moderation and reply state machines
//!
//! Pure decision logic - NO IO. Moderation moves a review between
//! pending, approved and rejected; the reply sub-lifecycle is independent
//! of moderation once a reply exists.

use chrono::NaiveDate;

use crate::common::{CoreError, CoreResult, EntityKind};
use crate::domains::reviews::models::{Review, ReviewPatch, ReviewReply, ReviewStatus};

// =============================================================================
// Moderation
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewAction {
    Approve,
    /// Reject a pending review or revoke an approved one. The reason is optional.
    Reject { reason: Option<String> },
}

impl ReviewAction {
    pub fn name(&self) -> &'static str {
        match self {
            ReviewAction::Approve => "approve",
            ReviewAction::Reject { .. } => "reject",
        }
    }
}

pub struct ReviewMachine;

impl ReviewMachine {
    /// `None` when the review already sits in the requested state.
    ///
    /// Every move between the three states is allowed except back to
    /// pending, which no action requests.
    pub fn decide(current: &Review, action: &ReviewAction) -> Option<ReviewPatch> {
        match action {
            ReviewAction::Approve => {
                if current.status == ReviewStatus::Approved {
                    return None;
                }
                Some(ReviewPatch {
                    status: Some(ReviewStatus::Approved),
                    rejection_reason: Some(None),
                    ..Default::default()
                })
            }
            ReviewAction::Reject { reason } => {
                if current.status == ReviewStatus::Rejected {
                    return None;
                }
                let reason = reason
                    .as_deref()
                    .map(str::trim)
                    .filter(|r| !r.is_empty())
                    .map(str::to_string);
                Some(ReviewPatch {
                    status: Some(ReviewStatus::Rejected),
                    rejection_reason: Some(reason),
                    ..Default::default()
                })
            }
        }
    }
}

// =============================================================================
// Replies
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyAction {
    Add { text: String },
    Edit { text: String },
    Delete,
}

impl ReplyAction {
    pub fn name(&self) -> &'static str {
        match self {
            ReplyAction::Add { .. } => "reply to",
            ReplyAction::Edit { .. } => "edit the reply on",
            ReplyAction::Delete => "delete the reply on",
        }
    }
}

pub struct ReplyMachine;

impl ReplyMachine {
    /// Decide the reply patch. Ownership is checked by the caller.
    ///
    /// - add: review approved, no reply yet, non-blank text
    /// - edit: reply exists (any review status), non-blank text, date refreshed
    /// - delete: reply exists (any review status)
    pub fn decide(
        current: &Review,
        action: &ReplyAction,
        today: NaiveDate,
    ) -> CoreResult<ReviewPatch> {
        let reply = match action {
            ReplyAction::Add { text } => {
                if current.status != ReviewStatus::Approved {
                    return Err(CoreError::InvalidTransition {
                        kind: EntityKind::Review,
                        from: current.status.to_string(),
                        action: action.name(),
                    });
                }
                if current.has_reply() {
                    return Err(CoreError::validation("Review already has a reply"));
                }
                Some(Self::reply(text, today)?)
            }
            ReplyAction::Edit { text } => {
                Self::require_reply(current)?;
                Some(Self::reply(text, today)?)
            }
            ReplyAction::Delete => {
                Self::require_reply(current)?;
                None
            }
        };

        Ok(ReviewPatch {
            reply: Some(reply),
            ..Default::default()
        })
    }

    fn require_reply(current: &Review) -> CoreResult<()> {
        if current.has_reply() {
            Ok(())
        } else {
            Err(CoreError::validation("Review has no reply"))
        }
    }

    fn reply(text: &str, today: NaiveDate) -> CoreResult<ReviewReply> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CoreError::validation("Reply text is required"));
        }
        Ok(ReviewReply {
            creator_reply: text.to_string(),
            creator_reply_at: today,
        })
    }
}
