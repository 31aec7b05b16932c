//! PostgreSQL repository adapter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use recorder_types::{
    Audit, Currency, CurrencyId, RepoError, Repository, RepositoryFactory, Statement,
    StatementId, User, UserId,
};

use crate::db_error::{map_db_error, map_tx_error};

// ─────────────────────────────────────────────────────────────────────────────
// PostgreSQL Repository
// ─────────────────────────────────────────────────────────────────────────────

/// PostgreSQL repository. Clones share the connection pool.
#[derive(Clone)]
pub struct PostgresRepo {
    pool: PgPool,
}

/// Executes SQL statements from a migration file, splitting by semicolons.
async fn execute_migration(pool: &PgPool, sql: &str, name: &str) -> Result<(), anyhow::Error> {
    for statement in sql.split(';') {
        let stmt = statement.trim();
        if !stmt.is_empty() {
            sqlx::query(stmt)
                .execute(pool)
                .await
                .map_err(|e| anyhow::anyhow!("Migration {} failed: {}", name, e))?;
        }
    }
    Ok(())
}

/// Runs all database migrations.
async fn run_migrations(pool: &PgPool) -> Result<(), anyhow::Error> {
    execute_migration(
        pool,
        include_str!("../migrations/0001_create_tables_pg.sql"),
        "0001",
    )
    .await
}

impl PostgresRepo {
    /// Creates a new PostgreSQL repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        run_migrations(&pool).await?;
        tracing::info!("Postgres repository ready");
        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the database schema (for testing with existing pool).
    pub async fn create_schema(&self) -> Result<(), RepoError> {
        run_migrations(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))
    }
}

#[async_trait]
impl RepositoryFactory for PostgresRepo {
    type UnitOfWork = PostgresUnitOfWork;

    async fn begin(&self) -> Result<PostgresUnitOfWork, RepoError> {
        let tx = self.pool.begin().await.map_err(map_tx_error)?;
        Ok(PostgresUnitOfWork { tx })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rows
// ─────────────────────────────────────────────────────────────────────────────

#[derive(FromRow)]
struct CurrencyRow {
    id: Uuid,
    title: String,
    symbol: String,
    created_on: DateTime<Utc>,
    created_by: i64,
    updated_on: DateTime<Utc>,
    updated_by: i64,
}

impl From<CurrencyRow> for Currency {
    fn from(row: CurrencyRow) -> Self {
        Currency::from_parts(
            CurrencyId::from_uuid(row.id),
            row.title,
            row.symbol,
            Audit {
                created_by: UserId::new(row.created_by),
                created_on: row.created_on,
                updated_by: UserId::new(row.updated_by),
                updated_on: row.updated_on,
            },
        )
    }
}

#[derive(FromRow)]
struct StatementRow {
    id: Uuid,
    title: String,
    currency_id: Uuid,
    created_on: DateTime<Utc>,
    created_by: i64,
    updated_on: DateTime<Utc>,
    updated_by: i64,
}

impl From<StatementRow> for Statement {
    fn from(row: StatementRow) -> Self {
        Statement::from_parts(
            StatementId::from_uuid(row.id),
            row.title,
            CurrencyId::from_uuid(row.currency_id),
            Audit {
                created_by: UserId::new(row.created_by),
                created_on: row.created_on,
                updated_by: UserId::new(row.updated_by),
                updated_on: row.updated_on,
            },
        )
    }
}

#[derive(FromRow)]
struct UserRow {
    id: i64,
    name: Option<String>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User::new(UserId::new(row.id), row.name.unwrap_or_default())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Unit of work
// ─────────────────────────────────────────────────────────────────────────────

/// One Postgres transaction. Dropping it without `commit` rolls back.
pub struct PostgresUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl Repository for PostgresUnitOfWork {
    async fn find_currency(&mut self, id: CurrencyId) -> Result<Option<Currency>, RepoError> {
        let row: Option<CurrencyRow> = sqlx::query_as(
            r#"SELECT id, title, symbol, created_on, created_by, updated_on, updated_by
               FROM currencies WHERE id = $1"#,
        )
        .bind(id.into_uuid())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(row.map(Currency::from))
    }

    async fn list_currencies(&mut self) -> Result<Vec<Currency>, RepoError> {
        let rows: Vec<CurrencyRow> = sqlx::query_as(
            r#"SELECT id, title, symbol, created_on, created_by, updated_on, updated_by
               FROM currencies"#,
        )
        .fetch_all(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Currency::from).collect())
    }

    async fn add_currency(&mut self, currency: &Currency) -> Result<(), RepoError> {
        sqlx::query(
            r#"INSERT INTO currencies (id, title, symbol, created_on, created_by, updated_on, updated_by)
               VALUES ($1, $2, $3, $4, $5, $6, $7)"#,
        )
        .bind(currency.id.into_uuid())
        .bind(&currency.name)
        .bind(&currency.symbol)
        .bind(currency.audit.created_on)
        .bind(currency.audit.created_by.get())
        .bind(currency.audit.updated_on)
        .bind(currency.audit.updated_by.get())
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    async fn mark_currency_modified(&mut self, currency: &Currency) -> Result<(), RepoError> {
        let result = sqlx::query(
            r#"UPDATE currencies SET title = $1, symbol = $2, updated_on = $3, updated_by = $4
               WHERE id = $5"#,
        )
        .bind(&currency.name)
        .bind(&currency.symbol)
        .bind(currency.audit.updated_on)
        .bind(currency.audit.updated_by.get())
        .bind(currency.id.into_uuid())
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn remove_currency(&mut self, id: CurrencyId) -> Result<(), RepoError> {
        let result = sqlx::query(r#"DELETE FROM currencies WHERE id = $1"#)
            .bind(id.into_uuid())
            .execute(&mut *self.tx)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn find_statement(&mut self, id: StatementId) -> Result<Option<Statement>, RepoError> {
        let row: Option<StatementRow> = sqlx::query_as(
            r#"SELECT id, title, currency_id, created_on, created_by, updated_on, updated_by
               FROM statements WHERE id = $1"#,
        )
        .bind(id.into_uuid())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(row.map(Statement::from))
    }

    async fn list_statements(&mut self) -> Result<Vec<Statement>, RepoError> {
        let rows: Vec<StatementRow> = sqlx::query_as(
            r#"SELECT id, title, currency_id, created_on, created_by, updated_on, updated_by
               FROM statements"#,
        )
        .fetch_all(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Statement::from).collect())
    }

    async fn add_statement(&mut self, statement: &Statement) -> Result<(), RepoError> {
        sqlx::query(
            r#"INSERT INTO statements (id, title, currency_id, created_on, created_by, updated_on, updated_by)
               VALUES ($1, $2, $3, $4, $5, $6, $7)"#,
        )
        .bind(statement.id.into_uuid())
        .bind(&statement.name)
        .bind(statement.currency_id.into_uuid())
        .bind(statement.audit.created_on)
        .bind(statement.audit.created_by.get())
        .bind(statement.audit.updated_on)
        .bind(statement.audit.updated_by.get())
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    async fn mark_statement_modified(&mut self, statement: &Statement) -> Result<(), RepoError> {
        let result = sqlx::query(
            r#"UPDATE statements SET title = $1, currency_id = $2, updated_on = $3, updated_by = $4
               WHERE id = $5"#,
        )
        .bind(&statement.name)
        .bind(statement.currency_id.into_uuid())
        .bind(statement.audit.updated_on)
        .bind(statement.audit.updated_by.get())
        .bind(statement.id.into_uuid())
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn remove_statement(&mut self, id: StatementId) -> Result<(), RepoError> {
        let result = sqlx::query(r#"DELETE FROM statements WHERE id = $1"#)
            .bind(id.into_uuid())
            .execute(&mut *self.tx)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn find_user(&mut self, id: UserId) -> Result<Option<User>, RepoError> {
        let row: Option<UserRow> = sqlx::query_as(r#"SELECT id, name FROM users WHERE id = $1"#)
            .bind(id.get())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_db_error)?;

        Ok(row.map(User::from))
    }

    async fn list_users(&mut self) -> Result<Vec<User>, RepoError> {
        let rows: Vec<UserRow> = sqlx::query_as(r#"SELECT id, name FROM users"#)
            .fetch_all(&mut *self.tx)
            .await
            .map_err(map_db_error)?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn add_user(&mut self, user: &User) -> Result<(), RepoError> {
        sqlx::query(r#"INSERT INTO users (id, name) VALUES ($1, $2)"#)
            .bind(user.id.get())
            .bind(&user.name)
            .execute(&mut *self.tx)
            .await
            .map_err(map_db_error)?;

        Ok(())
    }

    async fn commit(self) -> Result<(), RepoError> {
        self.tx.commit().await.map_err(map_tx_error)
    }
}
