//! Error types for the money recorder.

use std::fmt;

/// Domain-level errors (malformed input, caught before any store access).
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Unique keys the store itself enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    CurrencyName,
    CurrencySymbol,
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniqueField::CurrencyName => write!(f, "currency name"),
            UniqueField::CurrencySymbol => write!(f, "currency symbol"),
        }
    }
}

/// Repository-level errors (data access failures).
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Transaction error: {0}")]
    Transaction(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Unique constraint violated on {0}")]
    UniqueViolation(UniqueField),
}

/// Errors returned by the currency and statement managers.
///
/// Every variant is terminal for the operation that raised it; a failed
/// operation leaves the store unchanged.
#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
    #[error("Duplicate currency name: {0}")]
    DuplicateName(String),

    #[error("Duplicate currency symbol: {0}")]
    DuplicateSymbol(String),

    #[error("Currency not found: {0}")]
    CurrencyNotFound(String),

    #[error("Statement not found: {0}")]
    StatementNotFound(String),

    /// Programmer-contract failure: empty required text, nil id, zero page.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Repository(RepoError),
}

impl From<DomainError> for ManagerError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => ManagerError::InvalidArgument(msg),
        }
    }
}

impl From<RepoError> for ManagerError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Domain(e) => e.into(),
            other => ManagerError::Repository(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_invalid_argument() {
        let err: ManagerError = RepoError::Domain(DomainError::Validation("bad".into())).into();
        assert!(matches!(err, ManagerError::InvalidArgument(msg) if msg == "bad"));
    }

    #[test]
    fn test_store_failure_stays_repository_error() {
        let err: ManagerError = RepoError::Database("disk full".into()).into();
        assert!(matches!(err, ManagerError::Repository(RepoError::Database(_))));
    }
}
