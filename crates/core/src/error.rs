//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// `BadRequest` and `NotFound` are the only failures a caller can act on; the
/// boundary reports their message verbatim. Everything the storage collaborator
/// raises travels as `Storage` and is never shown to the caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The request is malformed or violates an entity constraint.
    #[error("{0}")]
    BadRequest(String),

    /// A lookup by identifier missed.
    #[error("{0}")]
    NotFound(String),

    /// The storage collaborator failed.
    #[error("storage failure: {0}")]
    Storage(#[from] StoreError),
}

impl DomainError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// True for the typed errors a caller is allowed to see.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::BadRequest(_) | Self::NotFound(_))
    }
}

/// Storage collaborator error.
///
/// These are infrastructure failures as opposed to domain errors. Stores
/// report a missing row through `Option`/`bool` returns, never through this
/// type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A referenced row does not exist (foreign key violation).
    #[error("foreign key violation: {0}")]
    ForeignKey(String),

    /// A stored row could not be mapped back into a domain entity.
    #[error("corrupt row: {0}")]
    Corrupt(String),

    /// The backend is unreachable (pool closed, connection refused, timeout).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Any other database failure.
    #[error("database error: {0}")]
    Database(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_display_their_message_verbatim() {
        assert_eq!(
            DomainError::bad_request("no fields to update").to_string(),
            "no fields to update"
        );
        assert_eq!(
            DomainError::not_found("product not found").to_string(),
            "product not found"
        );
    }

    #[test]
    fn storage_errors_are_not_client_errors() {
        let err: DomainError = StoreError::Unavailable("pool closed".into()).into();
        assert!(!err.is_client_error());
        assert!(DomainError::bad_request("x").is_client_error());
        assert!(DomainError::not_found("x").is_client_error());
    }
}
