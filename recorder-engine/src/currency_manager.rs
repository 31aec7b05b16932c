//! Currency Manager
//!
//! Lifecycle and query operations for currencies. Every call opens its own
//! unit of work and releases it before returning, on success and failure
//! alike.

use std::cmp::Ordering;
use std::collections::HashMap;

use recorder_types::{
    CreateCurrencyRequest, Currency, CurrencyId, CurrencySortBy, CurrencySummary, CurrencyView,
    ManagerError, Paging, RepoError, Repository, RepositoryFactory, Sort, UniqueField,
    UpdateCurrencyRequest, User, UserId,
};

use crate::outcome::log_failure;

/// Application service for currencies.
///
/// Generic over `F: RepositoryFactory` - the backend is injected at compile time.
pub struct CurrencyManager<F: RepositoryFactory> {
    factory: F,
}

impl<F: RepositoryFactory> CurrencyManager<F> {
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

    /// Creates a currency and returns its new id.
    ///
    /// Name uniqueness is checked before symbol uniqueness, so a request
    /// colliding on both reports `DuplicateName`.
    pub async fn create_currency(
        &self,
        req: CreateCurrencyRequest,
    ) -> Result<CurrencyId, ManagerError> {
        self.try_create(req)
            .await
            .inspect_err(|e| log_failure("create_currency", e))
    }

    async fn try_create(&self, req: CreateCurrencyRequest) -> Result<CurrencyId, ManagerError> {
        let currency = Currency::new(req.name, req.symbol, req.created_by)?;

        let mut uow = self.factory.begin().await?;
        let existing = uow.list_currencies().await?;
        ensure_unique(&existing, &currency.name, &currency.symbol, None)?;

        uow.add_currency(&currency)
            .await
            .map_err(|e| duplicate_from(e, &currency))?;
        uow.commit()
            .await
            .map_err(|e| duplicate_from(e, &currency))?;

        tracing::info!(id = %currency.id, name = %currency.name, "currency created");
        Ok(currency.id)
    }

    /// Replaces the name and symbol of an existing currency.
    ///
    /// The currency being updated is left out of its own uniqueness scan, so
    /// re-submitting an unchanged name or symbol succeeds.
    pub async fn update_currency(&self, req: UpdateCurrencyRequest) -> Result<(), ManagerError> {
        self.try_update(req)
            .await
            .inspect_err(|e| log_failure("update_currency", e))
    }

    async fn try_update(&self, req: UpdateCurrencyRequest) -> Result<(), ManagerError> {
        require_id(req.id)?;
        Currency::validate(&req.name, &req.symbol)?;

        let mut uow = self.factory.begin().await?;
        let mut currency = uow
            .find_currency(req.id)
            .await?
            .ok_or_else(|| ManagerError::CurrencyNotFound(req.id.to_string()))?;

        let existing = uow.list_currencies().await?;
        ensure_unique(&existing, &req.name, &req.symbol, Some(req.id))?;

        currency.name = req.name;
        currency.symbol = req.symbol;
        currency.audit.touch(req.updated_by);

        uow.mark_currency_modified(&currency)
            .await
            .map_err(|e| duplicate_from(e, &currency))?;
        uow.commit()
            .await
            .map_err(|e| duplicate_from(e, &currency))?;

        tracing::info!(id = %currency.id, name = %currency.name, "currency updated");
        Ok(())
    }

    /// Deletes a currency. Statements denominated in it are left in place.
    pub async fn delete_currency(&self, id: CurrencyId) -> Result<(), ManagerError> {
        self.try_delete(id)
            .await
            .inspect_err(|e| log_failure("delete_currency", e))
    }

    async fn try_delete(&self, id: CurrencyId) -> Result<(), ManagerError> {
        require_id(id)?;

        let mut uow = self.factory.begin().await?;
        if uow.find_currency(id).await?.is_none() {
            return Err(ManagerError::CurrencyNotFound(id.to_string()));
        }
        uow.remove_currency(id).await.map_err(|e| match e {
            RepoError::NotFound => ManagerError::CurrencyNotFound(id.to_string()),
            other => other.into(),
        })?;
        uow.commit().await?;

        tracing::info!(%id, "currency deleted");
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────────

    /// Gets a currency by id.
    pub async fn get_currency(&self, id: CurrencyId) -> Result<CurrencySummary, ManagerError> {
        self.try_get(id)
            .await
            .inspect_err(|e| log_failure("get_currency", e))
    }

    async fn try_get(&self, id: CurrencyId) -> Result<CurrencySummary, ManagerError> {
        require_id(id)?;

        let mut uow = self.factory.begin().await?;
        let currency = uow
            .find_currency(id)
            .await?
            .ok_or_else(|| ManagerError::CurrencyNotFound(id.to_string()))?;
        Ok(CurrencySummary::from(&currency))
    }

    /// Lists currencies whose name contains `keyword`, with audit users
    /// resolved to display names.
    ///
    /// An empty or whitespace-only keyword matches every currency. Without
    /// `sort` the order is unspecified. `paging` is applied last.
    pub async fn get_currencies(
        &self,
        keyword: &str,
        sort: Option<Sort<CurrencySortBy>>,
        paging: Option<Paging>,
    ) -> Result<Vec<CurrencyView>, ManagerError> {
        self.try_list(keyword, sort, paging)
            .await
            .inspect_err(|e| log_failure("get_currencies", e))
    }

    async fn try_list(
        &self,
        keyword: &str,
        sort: Option<Sort<CurrencySortBy>>,
        paging: Option<Paging>,
    ) -> Result<Vec<CurrencyView>, ManagerError> {
        let mut uow = self.factory.begin().await?;
        let currencies = uow.list_currencies().await?;
        let names = user_names(uow.list_users().await?);

        let mut rows: Vec<CurrencyView> = currencies
            .iter()
            .filter(|c| matches_keyword(&c.name, keyword))
            .map(|c| to_view(c, &names))
            .collect();

        if let Some(sort) = sort {
            sort.apply(&mut rows, comparator(sort.by));
        }
        let rows = match paging {
            Some(paging) => paging.window(rows),
            None => rows,
        };

        tracing::debug!(keyword, ?sort, ?paging, rows = rows.len(), "currencies listed");
        Ok(rows)
    }

    /// Counts currencies matching the same keyword filter as `get_currencies`.
    pub async fn get_currency_count(&self, keyword: &str) -> Result<usize, ManagerError> {
        self.try_count(keyword)
            .await
            .inspect_err(|e| log_failure("get_currency_count", e))
    }

    async fn try_count(&self, keyword: &str) -> Result<usize, ManagerError> {
        let mut uow = self.factory.begin().await?;
        let count = uow
            .list_currencies()
            .await?
            .iter()
            .filter(|c| matches_keyword(&c.name, keyword))
            .count();

        tracing::debug!(keyword, count, "currencies counted");
        Ok(count)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn require_id(id: CurrencyId) -> Result<(), ManagerError> {
    if id.is_nil() {
        return Err(ManagerError::InvalidArgument(
            "Currency id cannot be nil".into(),
        ));
    }
    Ok(())
}

/// Scans `existing` for a name, then a symbol, colliding with the request.
fn ensure_unique(
    existing: &[Currency],
    name: &str,
    symbol: &str,
    exclude: Option<CurrencyId>,
) -> Result<(), ManagerError> {
    let others = || existing.iter().filter(move |c| Some(c.id) != exclude);

    if others().any(|c| c.name_matches(name)) {
        return Err(ManagerError::DuplicateName(name.to_string()));
    }
    if others().any(|c| c.symbol_matches(symbol)) {
        return Err(ManagerError::DuplicateSymbol(symbol.to_string()));
    }
    Ok(())
}

/// Maps a unique index violation raised by the store back to the duplicate
/// error a pre-check would have reported.
fn duplicate_from(err: RepoError, currency: &Currency) -> ManagerError {
    match err {
        RepoError::UniqueViolation(UniqueField::CurrencyName) => {
            ManagerError::DuplicateName(currency.name.clone())
        }
        RepoError::UniqueViolation(UniqueField::CurrencySymbol) => {
            ManagerError::DuplicateSymbol(currency.symbol.clone())
        }
        RepoError::NotFound => ManagerError::CurrencyNotFound(currency.id.to_string()),
        other => other.into(),
    }
}

/// Case-sensitive substring match; a blank keyword matches everything.
pub(crate) fn matches_keyword(name: &str, keyword: &str) -> bool {
    keyword.trim().is_empty() || name.contains(keyword)
}

pub(crate) fn user_names(users: Vec<User>) -> HashMap<UserId, String> {
    users.into_iter().map(|u| (u.id, u.name)).collect()
}

fn to_view(currency: &Currency, names: &HashMap<UserId, String>) -> CurrencyView {
    CurrencyView {
        id: currency.id,
        name: currency.name.clone(),
        symbol: currency.symbol.clone(),
        created_by: names.get(&currency.audit.created_by).cloned(),
        created_on: currency.audit.created_on,
        updated_by: names.get(&currency.audit.updated_by).cloned(),
        updated_on: currency.audit.updated_on,
    }
}

fn comparator(key: CurrencySortBy) -> fn(&CurrencyView, &CurrencyView) -> Ordering {
    match key {
        CurrencySortBy::Name => |a, b| a.name.cmp(&b.name),
        CurrencySortBy::Symbol => |a, b| a.symbol.cmp(&b.symbol),
        CurrencySortBy::CreatedOn => |a, b| a.created_on.cmp(&b.created_on),
        CurrencySortBy::CreatedBy => |a, b| a.created_by.cmp(&b.created_by),
        CurrencySortBy::UpdatedOn => |a, b| a.updated_on.cmp(&b.updated_on),
        CurrencySortBy::UpdatedBy => |a, b| a.updated_by.cmp(&b.updated_by),
    }
}
