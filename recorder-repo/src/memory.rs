//! In-memory repository adapter.
//!
//! Behaves like the SQL adapters for everything the managers rely on:
//! staged writes, read-your-own-writes, all-or-nothing commit, rollback on
//! drop, and the case-insensitive unique keys on currency name and symbol.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use recorder_types::domain::currency::uniqueness_key;
use recorder_types::{
    Currency, CurrencyId, RepoError, Repository, RepositoryFactory, Statement, StatementId,
    UniqueField, User, UserId,
};

// ─────────────────────────────────────────────────────────────────────────────
// Store
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Store {
    currencies: HashMap<CurrencyId, Currency>,
    statements: HashMap<StatementId, Statement>,
    users: HashMap<UserId, User>,
}

/// In-memory repository. Clones share the same store.
#[derive(Clone, Default)]
pub struct MemoryRepo {
    store: Arc<RwLock<Store>>,
}

impl MemoryRepo {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `users`.
    pub async fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let repo = Self::new();
        {
            let mut store = repo.store.write().await;
            for user in users {
                store.users.insert(user.id, user);
            }
        }
        repo
    }
}

#[async_trait]
impl RepositoryFactory for MemoryRepo {
    type UnitOfWork = MemoryUnitOfWork;

    async fn begin(&self) -> Result<MemoryUnitOfWork, RepoError> {
        Ok(MemoryUnitOfWork {
            store: Arc::clone(&self.store),
            currencies: HashMap::new(),
            statements: HashMap::new(),
            users: HashMap::new(),
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Unit of work
// ─────────────────────────────────────────────────────────────────────────────

/// Staged changes over a `MemoryRepo`.
///
/// `Some` stages an insert or update, `None` stages a removal. Nothing
/// reaches the shared store until `commit`.
pub struct MemoryUnitOfWork {
    store: Arc<RwLock<Store>>,
    currencies: HashMap<CurrencyId, Option<Currency>>,
    statements: HashMap<StatementId, Option<Statement>>,
    users: HashMap<UserId, User>,
}

impl MemoryUnitOfWork {
    async fn currency_exists(&self, id: CurrencyId) -> bool {
        match self.currencies.get(&id) {
            Some(staged) => staged.is_some(),
            None => self.store.read().await.currencies.contains_key(&id),
        }
    }

    async fn statement_exists(&self, id: StatementId) -> bool {
        match self.statements.get(&id) {
            Some(staged) => staged.is_some(),
            None => self.store.read().await.statements.contains_key(&id),
        }
    }
}

/// Applies staged entries on top of committed ones.
fn merge<K, V>(committed: &HashMap<K, V>, staged: &HashMap<K, Option<V>>) -> HashMap<K, V>
where
    K: Copy + Eq + std::hash::Hash,
    V: Clone,
{
    let mut merged = committed.clone();
    for (key, value) in staged {
        match value {
            Some(value) => {
                merged.insert(*key, value.clone());
            }
            None => {
                merged.remove(key);
            }
        }
    }
    merged
}

/// The unique keys a SQL backend enforces with `lower(trim(..))` indexes.
fn check_unique_currencies(currencies: &HashMap<CurrencyId, Currency>) -> Result<(), RepoError> {
    let mut names = HashMap::new();
    let mut symbols = HashMap::new();

    for currency in currencies.values() {
        let name = uniqueness_key(&currency.name);
        if names.insert(name, currency.id).is_some() {
            return Err(RepoError::UniqueViolation(UniqueField::CurrencyName));
        }
        let symbol = uniqueness_key(&currency.symbol);
        if symbols.insert(symbol, currency.id).is_some() {
            return Err(RepoError::UniqueViolation(UniqueField::CurrencySymbol));
        }
    }
    Ok(())
}

#[async_trait]
impl Repository for MemoryUnitOfWork {
    async fn find_currency(&mut self, id: CurrencyId) -> Result<Option<Currency>, RepoError> {
        if let Some(staged) = self.currencies.get(&id) {
            return Ok(staged.clone());
        }
        Ok(self.store.read().await.currencies.get(&id).cloned())
    }

    async fn list_currencies(&mut self) -> Result<Vec<Currency>, RepoError> {
        let store = self.store.read().await;
        Ok(merge(&store.currencies, &self.currencies)
            .into_values()
            .collect())
    }

    async fn add_currency(&mut self, currency: &Currency) -> Result<(), RepoError> {
        Currency::validate(&currency.name, &currency.symbol)?;
        if self.currency_exists(currency.id).await {
            return Err(RepoError::Database(format!(
                "currency {} already exists",
                currency.id
            )));
        }
        self.currencies.insert(currency.id, Some(currency.clone()));
        Ok(())
    }

    async fn mark_currency_modified(&mut self, currency: &Currency) -> Result<(), RepoError> {
        Currency::validate(&currency.name, &currency.symbol)?;
        if !self.currency_exists(currency.id).await {
            return Err(RepoError::NotFound);
        }
        self.currencies.insert(currency.id, Some(currency.clone()));
        Ok(())
    }

    async fn remove_currency(&mut self, id: CurrencyId) -> Result<(), RepoError> {
        if !self.currency_exists(id).await {
            return Err(RepoError::NotFound);
        }
        self.currencies.insert(id, None);
        Ok(())
    }

    async fn find_statement(&mut self, id: StatementId) -> Result<Option<Statement>, RepoError> {
        if let Some(staged) = self.statements.get(&id) {
            return Ok(staged.clone());
        }
        Ok(self.store.read().await.statements.get(&id).cloned())
    }

    async fn list_statements(&mut self) -> Result<Vec<Statement>, RepoError> {
        let store = self.store.read().await;
        Ok(merge(&store.statements, &self.statements)
            .into_values()
            .collect())
    }

    async fn add_statement(&mut self, statement: &Statement) -> Result<(), RepoError> {
        Statement::validate(&statement.name, statement.currency_id)?;
        if self.statement_exists(statement.id).await {
            return Err(RepoError::Database(format!(
                "statement {} already exists",
                statement.id
            )));
        }
        self.statements.insert(statement.id, Some(statement.clone()));
        Ok(())
    }

    async fn mark_statement_modified(&mut self, statement: &Statement) -> Result<(), RepoError> {
        Statement::validate(&statement.name, statement.currency_id)?;
        if !self.statement_exists(statement.id).await {
            return Err(RepoError::NotFound);
        }
        self.statements.insert(statement.id, Some(statement.clone()));
        Ok(())
    }

    async fn remove_statement(&mut self, id: StatementId) -> Result<(), RepoError> {
        if !self.statement_exists(id).await {
            return Err(RepoError::NotFound);
        }
        self.statements.insert(id, None);
        Ok(())
    }

    async fn find_user(&mut self, id: UserId) -> Result<Option<User>, RepoError> {
        if let Some(user) = self.users.get(&id) {
            return Ok(Some(user.clone()));
        }
        Ok(self.store.read().await.users.get(&id).cloned())
    }

    async fn list_users(&mut self) -> Result<Vec<User>, RepoError> {
        let store = self.store.read().await;
        let mut users = store.users.clone();
        users.extend(self.users.iter().map(|(id, user)| (*id, user.clone())));
        Ok(users.into_values().collect())
    }

    async fn add_user(&mut self, user: &User) -> Result<(), RepoError> {
        let exists = self.users.contains_key(&user.id)
            || self.store.read().await.users.contains_key(&user.id);
        if exists {
            return Err(RepoError::Database(format!("user {} already exists", user.id)));
        }
        self.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn commit(self) -> Result<(), RepoError> {
        let mut store = self.store.write().await;

        let currencies = merge(&store.currencies, &self.currencies);
        check_unique_currencies(&currencies)?;
        let statements = merge(&store.statements, &self.statements);

        store.currencies = currencies;
        store.statements = statements;
        store.users.extend(self.users);

        tracing::debug!(
            currencies = self.currencies.len(),
            statements = self.statements.len(),
            "in-memory unit of work committed"
        );
        Ok(())
    }
}
