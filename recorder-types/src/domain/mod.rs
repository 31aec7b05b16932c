//! Persisted records managed by the bookkeeping core.

pub mod audit;
pub mod currency;
pub mod statement;
pub mod user;

pub use audit::Audit;
pub use currency::{Currency, CurrencyId};
pub use statement::{Statement, StatementId};
pub use user::{User, UserId};

/// Longest currency or statement name the stores accept, in characters.
pub const MAX_NAME_LEN: usize = 512;
