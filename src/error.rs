use thiserror::Error;

/// Errors surfaced by the credential store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Input rejected before any storage call was made.
    #[error("invalid {field}: {reason}")]
    Validation {
        field: &'static str,
        reason: &'static str,
    },

    #[error("a user with this email already exists")]
    EmailTaken,

    #[error("user {0} not found")]
    NotFound(i64),

    #[error("password hashing failed: {0}")]
    Hash(String),

    /// Any other storage failure, propagated unchanged.
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    pub(crate) fn validation(field: &'static str, reason: &'static str) -> Self {
        StoreError::Validation { field, reason }
    }
}
