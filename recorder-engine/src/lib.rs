//! # Recorder Engine
//!
//! Application service layer for the money recorder.
//!
//! ## Architecture
//!
//! - `currency_manager` - Currency lifecycle, uniqueness and list queries
//! - `statement_manager` - Statement lifecycle, currency checks and list queries
//!
//! Both managers are generic over `F: RepositoryFactory`, allowing
//! different repository implementations to be injected. Each operation runs
//! inside exactly one unit of work obtained from the factory.

pub mod currency_manager;
mod outcome;
pub mod statement_manager;


pub use currency_manager::CurrencyManager;
pub use recorder_repo::{Repo, build_repo};
pub use statement_manager::StatementManager;

use recorder_types::RepositoryFactory;

/// Both managers over one shared repository factory.
pub struct Managers<F: RepositoryFactory> {
    pub currencies: CurrencyManager<F>,
    pub statements: StatementManager<F>,
}

impl<F: RepositoryFactory> Managers<F> {
    pub fn new(factory: F) -> Self {
        Self {
            currencies: CurrencyManager::new(factory.clone()),
            statements: StatementManager::new(factory),
        }
    }
}

impl Managers<Repo> {
    /// Builds the backend named by `database_url` and wires both managers to it.
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let repo = build_repo(database_url).await?;
        tracing::info!(backend = repo.backend(), "managers connected");
        Ok(Self::new(repo))
    }
}
