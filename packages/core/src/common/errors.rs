use thiserror::Error;

use super::auth::AuthError;

/// Entity kinds the core tracks, used in error and log context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Creator,
    Review,
    Business,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Creator => write!(f, "creator"),
            EntityKind::Review => write!(f, "review"),
            EntityKind::Business => write!(f, "business"),
        }
    }
}

/// Errors surfaced to the caller of a core operation.
///
/// Persistence and reconciliation failures never appear here: the
/// core absorbs those and logs them, degrading to the last known good state.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Cannot {action} a {kind} that is {from}")]
    InvalidTransition {
        kind: EntityKind,
        from: String,
        action: &'static str,
    },

    #[error("Business has already reviewed this creator")]
    DuplicateReview,

    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Remote store error: {0}")]
    Remote(#[source] anyhow::Error),
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::Validation(message.into())
    }

    pub fn not_found(kind: EntityKind, id: impl std::fmt::Display) -> Self {
        CoreError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::NotFound { .. })
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
