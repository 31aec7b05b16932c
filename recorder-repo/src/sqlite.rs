//! SQLite repository adapter.
#![allow(clippy::collapsible_if)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{FromRow, Sqlite, SqlitePool, Transaction};
use std::str::FromStr;
use uuid::Uuid;

use recorder_types::{
    Audit, Currency, CurrencyId, RepoError, Repository, RepositoryFactory, Statement,
    StatementId, User, UserId,
};

use crate::db_error::{map_db_error, map_tx_error};

// ─────────────────────────────────────────────────────────────────────────────
// SQLite Repository
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite repository implementation. Clones share the connection pool.
#[derive(Clone)]
pub struct SqliteRepo {
    pool: SqlitePool,
}

impl SqliteRepo {
    /// Creates a new SQLite repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            // Remove query parameters
            let path = path.split('?').next().unwrap_or(path);
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool_options = if database_url.contains(":memory:") {
            // An in-memory database lives and dies with its single connection.
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };
        let pool = pool_options.connect_with(options).await?;

        let repo = Self { pool };
        repo.create_schema().await?;
        tracing::info!("SQLite repository ready");
        Ok(repo)
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Creates the database schema (for testing with existing pool).
    pub async fn create_schema(&self) -> Result<(), RepoError> {
        let ddl = include_str!("../migrations/0001_create_tables.sql");
        for statement in ddl.split(';') {
            let stmt = statement.trim();
            if !stmt.is_empty() {
                sqlx::query(stmt)
                    .execute(&self.pool)
                    .await
                    .map_err(map_db_error)?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl RepositoryFactory for SqliteRepo {
    type UnitOfWork = SqliteUnitOfWork;

    async fn begin(&self) -> Result<SqliteUnitOfWork, RepoError> {
        let tx = self.pool.begin().await.map_err(map_tx_error)?;
        Ok(SqliteUnitOfWork { tx })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rows
// ─────────────────────────────────────────────────────────────────────────────

#[derive(FromRow)]
struct CurrencyRow {
    id: String,
    title: String,
    symbol: String,
    created_on: String,
    created_by: i64,
    updated_on: String,
    updated_by: i64,
}

impl CurrencyRow {
    fn into_domain(self) -> Result<Currency, RepoError> {
        Ok(Currency::from_parts(
            CurrencyId::from_uuid(parse_uuid(&self.id)?),
            self.title,
            self.symbol,
            Audit {
                created_by: UserId::new(self.created_by),
                created_on: parse_time(&self.created_on)?,
                updated_by: UserId::new(self.updated_by),
                updated_on: parse_time(&self.updated_on)?,
            },
        ))
    }
}

#[derive(FromRow)]
struct StatementRow {
    id: String,
    title: String,
    currency_id: String,
    created_on: String,
    created_by: i64,
    updated_on: String,
    updated_by: i64,
}

impl StatementRow {
    fn into_domain(self) -> Result<Statement, RepoError> {
        Ok(Statement::from_parts(
            StatementId::from_uuid(parse_uuid(&self.id)?),
            self.title,
            CurrencyId::from_uuid(parse_uuid(&self.currency_id)?),
            Audit {
                created_by: UserId::new(self.created_by),
                created_on: parse_time(&self.created_on)?,
                updated_by: UserId::new(self.updated_by),
                updated_on: parse_time(&self.updated_on)?,
            },
        ))
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

fn parse_uuid(value: &str) -> Result<Uuid, RepoError> {
    Uuid::parse_str(value).map_err(|e| RepoError::Database(format!("bad id {value}: {e}")))
}

fn parse_time(value: &str) -> Result<DateTime<Utc>, RepoError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| RepoError::Database(format!("bad timestamp {value}: {e}")))
}

// ─────────────────────────────────────────────────────────────────────────────
// Unit of work
// ─────────────────────────────────────────────────────────────────────────────

/// One SQLite transaction. Dropping it without `commit` rolls back.
pub struct SqliteUnitOfWork {
    tx: Transaction<'static, Sqlite>,
}

#[async_trait]
impl Repository for SqliteUnitOfWork {
    async fn find_currency(&mut self, id: CurrencyId) -> Result<Option<Currency>, RepoError> {
        let row: Option<CurrencyRow> = sqlx::query_as(
            r#"SELECT id, title, symbol, created_on, created_by, updated_on, updated_by
               FROM currencies WHERE id = ?"#,
        )
        .bind(id.to_string())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        row.map(CurrencyRow::into_domain).transpose()
    }

    async fn list_currencies(&mut self) -> Result<Vec<Currency>, RepoError> {
        let rows: Vec<CurrencyRow> = sqlx::query_as(
            r#"SELECT id, title, symbol, created_on, created_by, updated_on, updated_by
               FROM currencies"#,
        )
        .fetch_all(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(CurrencyRow::into_domain).collect()
    }

    async fn add_currency(&mut self, currency: &Currency) -> Result<(), RepoError> {
        sqlx::query(
            r#"INSERT INTO currencies (id, title, symbol, created_on, created_by, updated_on, updated_by)
               VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(currency.id.to_string())
        .bind(&currency.name)
        .bind(&currency.symbol)
        .bind(currency.audit.created_on.to_rfc3339())
        .bind(currency.audit.created_by.get())
        .bind(currency.audit.updated_on.to_rfc3339())
        .bind(currency.audit.updated_by.get())
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    async fn mark_currency_modified(&mut self, currency: &Currency) -> Result<(), RepoError> {
        let result = sqlx::query(
            r#"UPDATE currencies SET title = ?, symbol = ?, updated_on = ?, updated_by = ?
               WHERE id = ?"#,
        )
        .bind(&currency.name)
        .bind(&currency.symbol)
        .bind(currency.audit.updated_on.to_rfc3339())
        .bind(currency.audit.updated_by.get())
        .bind(currency.id.to_string())
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn remove_currency(&mut self, id: CurrencyId) -> Result<(), RepoError> {
        let result = sqlx::query(r#"DELETE FROM currencies WHERE id = ?"#)
            .bind(id.to_string())
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
               FROM statements WHERE id = ?"#,
        )
        .bind(id.to_string())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        row.map(StatementRow::into_domain).transpose()
    }

    async fn list_statements(&mut self) -> Result<Vec<Statement>, RepoError> {
        let rows: Vec<StatementRow> = sqlx::query_as(
            r#"SELECT id, title, currency_id, created_on, created_by, updated_on, updated_by
               FROM statements"#,
        )
        .fetch_all(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(StatementRow::into_domain).collect()
    }

    async fn add_statement(&mut self, statement: &Statement) -> Result<(), RepoError> {
        sqlx::query(
            r#"INSERT INTO statements (id, title, currency_id, created_on, created_by, updated_on, updated_by)
               VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(statement.id.to_string())
        .bind(&statement.name)
        .bind(statement.currency_id.to_string())
        .bind(statement.audit.created_on.to_rfc3339())
        .bind(statement.audit.created_by.get())
        .bind(statement.audit.updated_on.to_rfc3339())
        .bind(statement.audit.updated_by.get())
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    async fn mark_statement_modified(&mut self, statement: &Statement) -> Result<(), RepoError> {
        let result = sqlx::query(
            r#"UPDATE statements SET title = ?, currency_id = ?, updated_on = ?, updated_by = ?
               WHERE id = ?"#,
        )
        .bind(&statement.name)
        .bind(statement.currency_id.to_string())
        .bind(statement.audit.updated_on.to_rfc3339())
        .bind(statement.audit.updated_by.get())
        .bind(statement.id.to_string())
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn remove_statement(&mut self, id: StatementId) -> Result<(), RepoError> {
        let result = sqlx::query(r#"DELETE FROM statements WHERE id = ?"#)
            .bind(id.to_string())
            .execute(&mut *self.tx)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn find_user(&mut self, id: UserId) -> Result<Option<User>, RepoError> {
        let row: Option<UserRow> = sqlx::query_as(r#"SELECT id, name FROM users WHERE id = ?"#)
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
        sqlx::query(r#"INSERT INTO users (id, name) VALUES (?, ?)"#)
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
