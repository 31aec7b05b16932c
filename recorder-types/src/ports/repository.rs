//! Repository port traits.
//!
//! This is the primary port in our hexagonal architecture.
//! Adapters (InMemory, SQLite, Postgres) implement both traits.

use crate::domain::{Currency, CurrencyId, Statement, StatementId, User, UserId};
use crate::error::RepoError;

/// Produces one scoped unit of work per manager operation.
///
/// Cloning a factory is cheap; clones hand out units of work over the same
/// underlying store.
#[async_trait::async_trait]
pub trait RepositoryFactory: Clone + Send + Sync + 'static {
    type UnitOfWork: Repository;

    /// Acquires a fresh unit of work.
    async fn begin(&self) -> Result<Self::UnitOfWork, RepoError>;
}

/// A unit of work over the Currency, Statement and User collections.
///
/// Writes are staged and only become visible to other units of work on
/// `commit`. Dropping a unit of work without committing discards everything
/// it staged. Reads observe the unit of work's own staged writes.
#[async_trait::async_trait]
pub trait Repository: Send {
    // ─────────────────────────────────────────────────────────────────────────────
    // Currencies
    // ─────────────────────────────────────────────────────────────────────────────

    async fn find_currency(&mut self, id: CurrencyId) -> Result<Option<Currency>, RepoError>;

    /// All currencies, in no particular order.
    async fn list_currencies(&mut self) -> Result<Vec<Currency>, RepoError>;

    async fn add_currency(&mut self, currency: &Currency) -> Result<(), RepoError>;

    /// Marks an already stored currency as modified, staging its new field values.
    ///
    /// Fails with `RepoError::NotFound` if no currency has this id.
    async fn mark_currency_modified(&mut self, currency: &Currency) -> Result<(), RepoError>;

    async fn remove_currency(&mut self, id: CurrencyId) -> Result<(), RepoError>;

    // ─────────────────────────────────────────────────────────────────────────────
    // Statements
    // ─────────────────────────────────────────────────────────────────────────────

    async fn find_statement(&mut self, id: StatementId) -> Result<Option<Statement>, RepoError>;

    /// All statements, in no particular order.
    async fn list_statements(&mut self) -> Result<Vec<Statement>, RepoError>;

    async fn add_statement(&mut self, statement: &Statement) -> Result<(), RepoError>;

    /// Marks an already stored statement as modified, staging its new field values.
    async fn mark_statement_modified(&mut self, statement: &Statement) -> Result<(), RepoError>;

    async fn remove_statement(&mut self, id: StatementId) -> Result<(), RepoError>;

    // ─────────────────────────────────────────────────────────────────────────────
    // Users (read-only for the managers)
    // ─────────────────────────────────────────────────────────────────────────────

    async fn find_user(&mut self, id: UserId) -> Result<Option<User>, RepoError>;

    async fn list_users(&mut self) -> Result<Vec<User>, RepoError>;

    /// Inserts a user. Used for seeding; the managers never call it.
    async fn add_user(&mut self, user: &User) -> Result<(), RepoError>;

    // ─────────────────────────────────────────────────────────────────────────────
    // Unit of work
    // ─────────────────────────────────────────────────────────────────────────────

    /// Makes every staged change visible atomically.
    ///
    /// A currency whose name or symbol collides with another stored currency
    /// fails with `RepoError::UniqueViolation`, either from the staging write
    /// or from this call; nothing is applied in that case.
    async fn commit(self) -> Result<(), RepoError>;
}
