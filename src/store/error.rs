use thiserror::Error;

use crate::record::RecordId;

/// Error type for record store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The id was never created, or the record has been deleted.
    #[error("{kind} with id {id} not found")]
    NotFound { kind: &'static str, id: RecordId },
    /// Invalid payload, or an update that carries no fields.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Another live record already holds this payload's unique key.
    #[error("{kind} {key} already exists")]
    Conflict { kind: &'static str, key: String },
    /// A writer panicked while holding the store lock.
    #[error("store lock poisoned during {0}")]
    LockPoisoned(&'static str),
}

impl StoreError {
    pub fn not_found(kind: &'static str, id: RecordId) -> Self {
        StoreError::NotFound { kind, id }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        StoreError::InvalidArgument(message.into())
    }

    pub fn conflict(kind: &'static str, key: impl Into<String>) -> Self {
        StoreError::Conflict {
            kind,
            key: key.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, StoreError::InvalidArgument(_))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }

    /// Map this error to an HTTP-style status code.
    pub fn status_code(&self) -> u16 {
        match self {
            StoreError::NotFound { .. } => 404,
            StoreError::InvalidArgument(_) => 400,
            StoreError::Conflict { .. } => 409,
            StoreError::LockPoisoned(_) => 500,
        }
    }
}
