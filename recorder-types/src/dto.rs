//! Manager requests and read projections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::{Currency, CurrencyId, StatementId, UserId};
use crate::query::ParseSortError;

// ─────────────────────────────────────────────────────────────────────────────
// Currency DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to create a new currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCurrencyRequest {
    pub name: String,
    pub symbol: String,
    pub created_by: UserId,
}

/// Request to replace the mutable fields of a currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCurrencyRequest {
    pub id: CurrencyId,
    pub name: String,
    pub symbol: String,
    pub updated_by: UserId,
}

/// Single-currency projection returned by `get_currency`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencySummary {
    pub id: CurrencyId,
    pub name: String,
    pub symbol: String,
}

impl From<&Currency> for CurrencySummary {
    fn from(currency: &Currency) -> Self {
        Self {
            id: currency.id,
            name: currency.name.clone(),
            symbol: currency.symbol.clone(),
        }
    }
}

/// Currency row of a list query, with audit user ids resolved to names.
///
/// A `None` name means the audit user id has no matching user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyView {
    pub id: CurrencyId,
    pub name: String,
    pub symbol: String,
    pub created_by: Option<String>,
    pub created_on: DateTime<Utc>,
    pub updated_by: Option<String>,
    pub updated_on: DateTime<Utc>,
}

/// Keys a currency list can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurrencySortBy {
    Name,
    Symbol,
    CreatedOn,
    CreatedBy,
    UpdatedOn,
    UpdatedBy,
}

impl fmt::Display for CurrencySortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl FromStr for CurrencySortBy {
    type Err = ParseSortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_key(s).as_str() {
            "name" => Ok(CurrencySortBy::Name),
            "symbol" => Ok(CurrencySortBy::Symbol),
            "createdon" => Ok(CurrencySortBy::CreatedOn),
            "createdby" => Ok(CurrencySortBy::CreatedBy),
            "updatedon" => Ok(CurrencySortBy::UpdatedOn),
            "updatedby" => Ok(CurrencySortBy::UpdatedBy),
            _ => Err(ParseSortError(s.to_string())),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Statement DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to create a new statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStatementRequest {
    pub name: String,
    pub currency_id: CurrencyId,
    pub created_by: UserId,
}

/// Request to replace the mutable fields of a statement.
///
/// Changing `currency_id` moves the statement to another currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatementRequest {
    pub id: StatementId,
    pub name: String,
    pub currency_id: CurrencyId,
    pub updated_by: UserId,
}

/// Single-statement projection returned by `get_statement`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementDetails {
    pub id: StatementId,
    pub name: String,
    pub currency_id: CurrencyId,
    /// The denominating currency; `None` once that currency has been deleted.
    pub currency: Option<Currency>,
}

/// Statement row of a list query, with audit user ids resolved to names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementView {
    pub id: StatementId,
    pub name: String,
    pub currency_id: CurrencyId,
    pub currency: Option<CurrencySummary>,
    pub created_by: Option<String>,
    pub created_on: DateTime<Utc>,
    pub updated_by: Option<String>,
    pub updated_on: DateTime<Utc>,
}

/// Keys a statement list can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatementSortBy {
    Name,
    CreatedOn,
    CreatedBy,
    UpdatedOn,
    UpdatedBy,
}

impl fmt::Display for StatementSortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl FromStr for StatementSortBy {
    type Err = ParseSortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_key(s).as_str() {
            "name" => Ok(StatementSortBy::Name),
            "createdon" => Ok(StatementSortBy::CreatedOn),
            "createdby" => Ok(StatementSortBy::CreatedBy),
            "updatedon" => Ok(StatementSortBy::UpdatedOn),
            "updatedby" => Ok(StatementSortBy::UpdatedBy),
            _ => Err(ParseSortError(s.to_string())),
        }
    }
}

/// Accepts `CreatedOn`, `created_on` and `created-on` alike.
fn normalize_key(s: &str) -> String {
    s.chars()
        .filter(|c| *c != '_' && *c != '-')
        .collect::<String>()
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_currency_sort_key() {
        assert_eq!(
            "created_on".parse::<CurrencySortBy>().unwrap(),
            CurrencySortBy::CreatedOn
        );
        assert_eq!("Symbol".parse::<CurrencySortBy>().unwrap(), CurrencySortBy::Symbol);
    }

    #[test]
    fn test_statements_have_no_symbol_key() {
        assert!("symbol".parse::<StatementSortBy>().is_err());
    }

    #[test]
    fn test_sort_key_display_round_trips() {
        let key = StatementSortBy::UpdatedBy;
        assert_eq!(key.to_string().parse::<StatementSortBy>().unwrap(), key);
    }
}
