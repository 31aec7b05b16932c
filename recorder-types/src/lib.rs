//! # Recorder Types
//!
//! Entity types and port traits for the money recorder bookkeeping core.
//! This crate has ZERO external IO dependencies - only data structures,
//! query primitives, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Persisted records (Currency, Statement, User) and their ids
//! - `query/` - Sorting and paging primitives shared by both managers
//! - `ports/` - Trait definitions that repository adapters must implement
//! - `dto/` - Manager requests and read projections
//! - `error/` - Domain, repository and manager error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;
pub mod query;

// Re-export commonly used types
pub use domain::{
    Audit, Currency, CurrencyId, MAX_NAME_LEN, Statement, StatementId, User, UserId,
};
pub use dto::*;
pub use error::{DomainError, ManagerError, RepoError, UniqueField};
pub use ports::{Repository, RepositoryFactory};
pub use query::{Paging, ParseSortError, Sort, SortDirection};
