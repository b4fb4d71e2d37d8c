//! Persistence layer for persons and countries.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  HTTP surface + request pipeline                        │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Services (crate::services) - validation, search, sort  │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository traits (repository/) - abstract interface   │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴───────────────┐
//!     │  LocalRepository  (in-memory) │
//!     │  PostgresRepository (Diesel)  │
//!     └───────────────────────────────┘
//! ```
//!
//! - `repository`: trait definitions, [`PersonFilter`], errors
//! - `repositories::local`: in-memory implementation for tests and local runs
//! - `repositories::postgres`: Postgres implementation with Diesel ORM
//! - `factory`: backend selection
//! - `seed`: JSON seed loading

#[cfg(not(any(feature = "postgres-repo", feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod factory;
pub mod repositories;
pub mod repository;
pub mod seed;

// Postgres config is colocated with the repository implementation.
#[cfg(feature = "postgres-repo")]
pub use repositories::postgres::{PoolStats, PostgresConfig};
#[cfg(not(feature = "postgres-repo"))]
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    _private: (),
}

pub use factory::{RepositoryFactory, RepositoryType};
pub use repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use repositories::PostgresRepository;
pub use repository::{
    CountriesRepository, ErrorContext, FullRepository, PersonFilter, PersonsRepository,
    RepositoryError, RepositoryResult, RepositorySet,
};
pub use seed::{seed_from_files, SeedSummary};
