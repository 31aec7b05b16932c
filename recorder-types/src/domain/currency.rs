//! Currency domain model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::audit::Audit;
use super::user::UserId;
use super::MAX_NAME_LEN;
use crate::error::DomainError;

/// Unique identifier for a Currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyId(Uuid);

impl CurrencyId {
    /// Creates a new random CurrencyId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a CurrencyId from an existing UUID.
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

    /// True for the all-zero UUID, which never identifies a record.
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl Default for CurrencyId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CurrencyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CurrencyId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A named, symbol-tagged unit of account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub id: CurrencyId,
    /// Display name, unique under trimmed case-insensitive comparison
    pub name: String,
    /// Short symbol, unique under the same rule as `name`
    pub symbol: String,
    pub audit: Audit,
}

impl Currency {
    /// Creates a new currency with a fresh id, stamped as created now.
    ///
    /// # Validation
    /// - Name and symbol cannot be empty or whitespace
    /// - Name is at most `MAX_NAME_LEN` characters
    pub fn new(name: String, symbol: String, created_by: UserId) -> Result<Self, DomainError> {
        Self::validate(&name, &symbol)?;

        Ok(Self {
            id: CurrencyId::new(),
            name,
            symbol,
            audit: Audit::created(created_by),
        })
    }

    /// Creates a currency with all fields specified (for database reconstruction).
    pub fn from_parts(id: CurrencyId, name: String, symbol: String, audit: Audit) -> Self {
        Self {
            id,
            name,
            symbol,
            audit,
        }
    }

    /// Checks the mutable fields of a currency.
    pub fn validate(name: &str, symbol: &str) -> Result<(), DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::Validation(
                "Currency name cannot be empty".into(),
            ));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(DomainError::Validation(format!(
                "Currency name cannot exceed {MAX_NAME_LEN} characters"
            )));
        }
        if symbol.trim().is_empty() {
            return Err(DomainError::Validation(
                "Currency symbol cannot be empty".into(),
            ));
        }
        Ok(())
    }

    /// True if `name` collides with this currency's name.
    pub fn name_matches(&self, name: &str) -> bool {
        uniqueness_key(&self.name) == uniqueness_key(name)
    }

    /// True if `symbol` collides with this currency's symbol.
    pub fn symbol_matches(&self, symbol: &str) -> bool {
        uniqueness_key(&self.symbol) == uniqueness_key(symbol)
    }
}

/// Normal form under which currency names and symbols must be unique.
pub fn uniqueness_key(value: &str) -> String {
    value.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_creation() {
        let currency = Currency::new("Euro".into(), "EUR".into(), UserId::new(1)).unwrap();
        assert_eq!(currency.name, "Euro");
        assert_eq!(currency.symbol, "EUR");
        assert_eq!(currency.audit.created_by, UserId::new(1));
        assert!(!currency.id.is_nil());
    }

    #[test]
    fn test_blank_name_fails() {
        let result = Currency::new("  ".into(), "EUR".into(), UserId::new(1));
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_blank_symbol_fails() {
        let result = Currency::new("Euro".into(), "".into(), UserId::new(1));
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_name_length_limit_counts_chars() {
        let at_limit = "é".repeat(MAX_NAME_LEN);
        assert!(Currency::validate(&at_limit, "EUR").is_ok());

        let over = "x".repeat(MAX_NAME_LEN + 1);
        assert!(matches!(
            Currency::validate(&over, "EUR"),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_name_matches_ignores_case_and_padding() {
        let currency = Currency::new("Euro".into(), "EUR".into(), UserId::new(1)).unwrap();
        assert!(currency.name_matches("euro "));
        assert!(currency.symbol_matches(" eur"));
        assert!(!currency.name_matches("Euros"));
    }
}
