//! Translation of sqlx errors into repository errors.

use recorder_types::{RepoError, UniqueField};

/// Unique expression index on `lower(trim(title))` of `currencies`.
pub(crate) const CURRENCY_NAME_INDEX: &str = "ux_currencies_title";
/// Unique expression index on `lower(trim(symbol))` of `currencies`.
pub(crate) const CURRENCY_SYMBOL_INDEX: &str = "ux_currencies_symbol";

/// Maps a failed query, recognising violations of the currency unique indexes.
///
/// Postgres reports the index through `constraint()`; SQLite only names it in
/// the message (`UNIQUE constraint failed: index 'ux_currencies_title'`).
pub(crate) fn map_db_error(err: sqlx::Error) -> RepoError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            let detail = db.constraint().unwrap_or_else(|| db.message());
            if detail.contains(CURRENCY_NAME_INDEX) {
                return RepoError::UniqueViolation(UniqueField::CurrencyName);
            }
            if detail.contains(CURRENCY_SYMBOL_INDEX) {
                return RepoError::UniqueViolation(UniqueField::CurrencySymbol);
            }
        }
    }
    RepoError::Database(err.to_string())
}

/// Maps a failure to begin or commit a transaction.
///
/// SQLite defers nothing, but Postgres may raise a unique violation at commit.
pub(crate) fn map_tx_error(err: sqlx::Error) -> RepoError {
    match map_db_error(err) {
        RepoError::Database(msg) => RepoError::Transaction(msg),
        other => other,
    }
}
