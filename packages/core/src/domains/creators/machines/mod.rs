//! Creator moderation state machine
//!
//! Pure decision logic - NO IO, only state transitions. The action layer
//! runs `decide` inside the overlay store's read-merge-write so a decision
//! and its write can never be split.
//!
//! ```text
//! pending ──approve──▶ approved ──deactivate──▶ deactivated
//!    │                   ▲   │                      │
//!  reject(reason)        │  set_pending         approve / set_pending
//!    ▼                   │   ▼                      ▼
//! rejected ──approve─────┘ pending ◀───────────── (either)
//! ```
//!
//! `deactivated -> rejected` is not a transition.

use crate::common::{CoreError, CoreResult, EntityKind};
use crate::domains::creators::models::{Creator, CreatorPatch, CreatorStatus};

/// Admin moderation actions on a creator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreatorAction {
    Approve,
    Reject { reason: Option<String> },
    Deactivate,
    SetPending,
}

impl CreatorAction {
    pub fn name(&self) -> &'static str {
        match self {
            CreatorAction::Approve => "approve",
            CreatorAction::Reject { .. } => "reject",
            CreatorAction::Deactivate => "deactivate",
            CreatorAction::SetPending => "set pending",
        }
    }

    /// Status this action moves a creator to
    pub fn target(&self) -> CreatorStatus {
        match self {
            CreatorAction::Approve => CreatorStatus::Approved,
            CreatorAction::Reject { .. } => CreatorStatus::Rejected,
            CreatorAction::Deactivate => CreatorStatus::Deactivated,
            CreatorAction::SetPending => CreatorStatus::Pending,
        }
    }

    /// Statuses this action may leave from
    fn allowed_from(&self) -> &'static [CreatorStatus] {
        use CreatorStatus::*;
        match self {
            CreatorAction::Approve => &[Pending, Rejected, Deactivated],
            CreatorAction::Reject { .. } => &[Pending],
            CreatorAction::Deactivate => &[Approved],
            CreatorAction::SetPending => &[Approved, Rejected, Deactivated],
        }
    }
}

/// Creator moderation state machine
pub struct CreatorMachine;

impl CreatorMachine {
    /// Decide the patch for `action` on `current`.
    ///
    /// - `Ok(None)`: the creator is already in the target state (silent no-op)
    /// - `Ok(Some(patch))`: apply the transition
    /// - `Err(..)`: validation failure or disallowed transition, nothing changes
    pub fn decide(current: &Creator, action: &CreatorAction) -> CoreResult<Option<CreatorPatch>> {
        let reason = match action {
            CreatorAction::Reject { reason } => Some(Self::required_reason(reason.as_deref())?),
            _ => None,
        };

        let target = action.target();
        if current.status == target {
            return Ok(None);
        }

        if !action.allowed_from().contains(&current.status) {
            return Err(CoreError::InvalidTransition {
                kind: EntityKind::Creator,
                from: current.status.to_string(),
                action: action.name(),
            });
        }

        Ok(Some(CreatorPatch {
            status: Some(target),
            // Only a rejection carries a reason; every other target clears it
            rejection_reason: Some(reason),
            ..Default::default()
        }))
    }

    fn required_reason(reason: Option<&str>) -> CoreResult<String> {
        match reason.map(str::trim) {
            Some(r) if !r.is_empty() => Ok(r.to_string()),
            _ => Err(CoreError::validation("A rejection reason is required")),
        }
    }
}
