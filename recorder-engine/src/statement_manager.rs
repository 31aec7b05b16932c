//! Statement Manager
//!
//! Lifecycle and query operations for statements. A statement must name an
//! existing currency whenever it is written; that is checked against the
//! store on every create and update, never cached.

use std::cmp::Ordering;
use std::collections::HashMap;

use recorder_types::{
    CreateStatementRequest, Currency, CurrencyId, CurrencySummary, ManagerError, Paging,
    RepoError, Repository, RepositoryFactory, Sort, Statement, StatementDetails, StatementId,
    StatementSortBy, StatementView, UpdateStatementRequest, UserId,
};

use crate::currency_manager::{matches_keyword, user_names};
use crate::outcome::log_failure;

/// Application service for statements.
pub struct StatementManager<F: RepositoryFactory> {
    factory: F,
}

impl<F: RepositoryFactory> StatementManager<F> {
    /// Creates a manager that opens units of work from `factory`.
    pub fn new(factory: F) -> Self {
        Self { factory }
    }

    /// Returns a reference to the underlying repository factory.
    pub fn factory(&self) -> &F {
        &self.factory
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Commands
    // ─────────────────────────────────────────────────────────────────────────────

    /// Creates a statement in an existing currency and returns its new id.
    pub async fn create_statement(
        &self,
        req: CreateStatementRequest,
    ) -> Result<StatementId, ManagerError> {
        self.try_create(req)
            .await
            .inspect_err(|e| log_failure("create_statement", e))
    }

    async fn try_create(&self, req: CreateStatementRequest) -> Result<StatementId, ManagerError> {
        let statement = Statement::new(req.name, req.currency_id, req.created_by)?;

        let mut uow = self.factory.begin().await?;
        require_currency(&mut uow, statement.currency_id).await?;

        uow.add_statement(&statement).await?;
        uow.commit().await?;

        tracing::info!(
            id = %statement.id,
            currency_id = %statement.currency_id,
            "statement created"
        );
        Ok(statement.id)
    }

    /// Replaces the name and currency of an existing statement.
    ///
    /// A missing statement is reported before a missing currency.
    pub async fn update_statement(&self, req: UpdateStatementRequest) -> Result<(), ManagerError> {
        self.try_update(req)
            .await
            .inspect_err(|e| log_failure("update_statement", e))
    }

    async fn try_update(&self, req: UpdateStatementRequest) -> Result<(), ManagerError> {
        require_id(req.id)?;
        Statement::validate(&req.name, req.currency_id)?;

        let mut uow = self.factory.begin().await?;
        let mut statement = uow
            .find_statement(req.id)
            .await?
            .ok_or_else(|| ManagerError::StatementNotFound(req.id.to_string()))?;
        require_currency(&mut uow, req.currency_id).await?;

        let previous = statement.currency_id;
        statement.name = req.name;
        statement.currency_id = req.currency_id;
        statement.audit.touch(req.updated_by);

        uow.mark_statement_modified(&statement)
            .await
            .map_err(|e| not_found(e, statement.id))?;
        uow.commit().await?;

        if previous != statement.currency_id {
            tracing::info!(
                id = %statement.id,
                from = %previous,
                to = %statement.currency_id,
                "statement moved to another currency"
            );
        } else {
            tracing::info!(id = %statement.id, "statement updated");
        }
        Ok(())
    }

    /// Deletes a statement.
    pub async fn delete_statement(&self, id: StatementId) -> Result<(), ManagerError> {
        self.try_delete(id)
            .await
            .inspect_err(|e| log_failure("delete_statement", e))
    }

    async fn try_delete(&self, id: StatementId) -> Result<(), ManagerError> {
        require_id(id)?;

        let mut uow = self.factory.begin().await?;
        if uow.find_statement(id).await?.is_none() {
            return Err(ManagerError::StatementNotFound(id.to_string()));
        }
        uow.remove_statement(id)
            .await
            .map_err(|e| not_found(e, id))?;
        uow.commit().await?;

        tracing::info!(%id, "statement deleted");
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────────

    /// Gets a statement by id together with its currency.
    ///
    /// `currency` is `None` only when the currency was deleted after the
    /// statement was last written.
    pub async fn get_statement(&self, id: StatementId) -> Result<StatementDetails, ManagerError> {
        self.try_get(id)
            .await
            .inspect_err(|e| log_failure("get_statement", e))
    }

    async fn try_get(&self, id: StatementId) -> Result<StatementDetails, ManagerError> {
        require_id(id)?;

        let mut uow = self.factory.begin().await?;
        let statement = uow
            .find_statement(id)
            .await?
            .ok_or_else(|| ManagerError::StatementNotFound(id.to_string()))?;
        let currency = uow.find_currency(statement.currency_id).await?;

        if currency.is_none() {
            tracing::debug!(%id, currency_id = %statement.currency_id, "statement is orphaned");
        }
        Ok(StatementDetails {
            id: statement.id,
            name: statement.name,
            currency_id: statement.currency_id,
            currency,
        })
    }

    /// Lists statements whose name contains `keyword`, with their currency
    /// and audit users resolved.
    ///
    /// Filtering, sorting and paging follow the same rules as
    /// `CurrencyManager::get_currencies`.
    pub async fn get_statements(
        &self,
        keyword: &str,
        sort: Option<Sort<StatementSortBy>>,
        paging: Option<Paging>,
    ) -> Result<Vec<StatementView>, ManagerError> {
        self.try_list(keyword, sort, paging)
            .await
            .inspect_err(|e| log_failure("get_statements", e))
    }

    async fn try_list(
        &self,
        keyword: &str,
        sort: Option<Sort<StatementSortBy>>,
        paging: Option<Paging>,
    ) -> Result<Vec<StatementView>, ManagerError> {
        let mut uow = self.factory.begin().await?;
        let statements = uow.list_statements().await?;
        let currencies: HashMap<CurrencyId, Currency> = uow
            .list_currencies()
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();
        let names = user_names(uow.list_users().await?);

        let mut rows: Vec<StatementView> = statements
            .iter()
            .filter(|s| matches_keyword(&s.name, keyword))
            .map(|s| to_view(s, &currencies, &names))
            .collect();

        if let Some(sort) = sort {
            sort.apply(&mut rows, comparator(sort.by));
        }
        let rows = match paging {
            Some(paging) => paging.window(rows),
            None => rows,
        };

        tracing::debug!(keyword, ?sort, ?paging, rows = rows.len(), "statements listed");
        Ok(rows)
    }

    /// Counts statements matching the same keyword filter as `get_statements`.
    pub async fn get_statement_count(&self, keyword: &str) -> Result<usize, ManagerError> {
        self.try_count(keyword)
            .await
            .inspect_err(|e| log_failure("get_statement_count", e))
    }

    async fn try_count(&self, keyword: &str) -> Result<usize, ManagerError> {
        let mut uow = self.factory.begin().await?;
        let count = uow
            .list_statements()
            .await?
            .iter()
            .filter(|s| matches_keyword(&s.name, keyword))
            .count();

        tracing::debug!(keyword, count, "statements counted");
        Ok(count)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn require_id(id: StatementId) -> Result<(), ManagerError> {
    if id.is_nil() {
        return Err(ManagerError::InvalidArgument(
            "Statement id cannot be nil".into(),
        ));
    }
    Ok(())
}

/// Fails with `CurrencyNotFound` unless `currency_id` exists right now.
async fn require_currency<R: Repository>(
    uow: &mut R,
    currency_id: CurrencyId,
) -> Result<(), ManagerError> {
    match uow.find_currency(currency_id).await? {
        Some(_) => Ok(()),
        None => Err(ManagerError::CurrencyNotFound(currency_id.to_string())),
    }
}

fn not_found(err: RepoError, id: StatementId) -> ManagerError {
    match err {
        RepoError::NotFound => ManagerError::StatementNotFound(id.to_string()),
        other => other.into(),
    }
}

fn to_view(
    statement: &Statement,
    currencies: &HashMap<CurrencyId, Currency>,
    names: &HashMap<UserId, String>,
) -> StatementView {
    StatementView {
        id: statement.id,
        name: statement.name.clone(),
        currency_id: statement.currency_id,
        currency: currencies
            .get(&statement.currency_id)
            .map(CurrencySummary::from),
        created_by: names.get(&statement.audit.created_by).cloned(),
        created_on: statement.audit.created_on,
        updated_by: names.get(&statement.audit.updated_by).cloned(),
        updated_on: statement.audit.updated_on,
    }
}

fn comparator(key: StatementSortBy) -> fn(&StatementView, &StatementView) -> Ordering {
    match key {
        StatementSortBy::Name => |a, b| a.name.cmp(&b.name),
        StatementSortBy::CreatedOn => |a, b| a.created_on.cmp(&b.created_on),
        StatementSortBy::CreatedBy => |a, b| a.created_by.cmp(&b.created_by),
        StatementSortBy::UpdatedOn => |a, b| a.updated_on.cmp(&b.updated_on),
        StatementSortBy::UpdatedBy => |a, b| a.updated_by.cmp(&b.updated_by),
    }
}
