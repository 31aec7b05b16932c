//! Port traits (interfaces for adapters).
//!
//! These are the contracts that repository adapters must implement.
//! The managers depend on these traits, not concrete implementations.

mod repository;

pub use repository::{Repository, RepositoryFactory};
