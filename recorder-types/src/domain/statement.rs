//! Statement domain model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::audit::Audit;
use super::currency::CurrencyId;
use super::user::UserId;
use super::MAX_NAME_LEN;
use crate::error::DomainError;

/// Unique identifier for a Statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatementId(Uuid);

impl StatementId {
    /// Creates a new random StatementId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a StatementId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Returns the UUID value.
    pub fn into_uuid(self) -> Uuid {
        self.0
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl Default for StatementId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for StatementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for StatementId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A named ledger denominated in exactly one currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    pub id: StatementId,
    /// Human-readable name; not required to be unique
    pub name: String,
    /// Denominating currency. May dangle once that currency is deleted.
    pub currency_id: CurrencyId,
    pub audit: Audit,
}

impl Statement {
    /// Creates a new statement with a fresh id, stamped as created now.
    ///
    /// # Validation
    /// - Name cannot be empty or longer than `MAX_NAME_LEN` characters
    /// - Currency id cannot be nil
    pub fn new(
        name: String,
        currency_id: CurrencyId,
        created_by: UserId,
    ) -> Result<Self, DomainError> {
        Self::validate(&name, currency_id)?;

        Ok(Self {
            id: StatementId::new(),
            name,
            currency_id,
            audit: Audit::created(created_by),
        })
    }

    /// Creates a statement with all fields specified (for database reconstruction).
    pub fn from_parts(id: StatementId, name: String, currency_id: CurrencyId, audit: Audit) -> Self {
        Self {
            id,
            name,
            currency_id,
            audit,
        }
    }

    /// Checks the mutable fields of a statement.
    pub fn validate(name: &str, currency_id: CurrencyId) -> Result<(), DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::Validation(
                "Statement name cannot be empty".into(),
            ));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(DomainError::Validation(format!(
                "Statement name cannot exceed {MAX_NAME_LEN} characters"
            )));
        }
        if currency_id.is_nil() {
            return Err(DomainError::Validation(
                "Statement currency id cannot be nil".into(),
            ));
        }
        Ok(())
    }
}
