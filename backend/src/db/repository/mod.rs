//! Repository trait definitions for database operations.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for repository operations
//! - [`countries`]: Country storage
//! - [`persons`]: Person storage and the [`PersonFilter`] search predicate
//!
//! # Trait Composition
//!
//! A complete backend implements both traits and gets [`FullRepository`]
//! for free:
//!
//! ```ignore
//! impl CountriesRepository for MyRepo { ... }
//! impl PersonsRepository for MyRepo { ... }
//! ```

pub mod countries;
pub mod error;
pub mod persons;

use std::sync::Arc;

pub use countries::CountriesRepository;
pub use error::{ErrorContext, RepositoryError, RepositoryResult};
pub use persons::{PersonFilter, PersonsRepository, DATE_SEARCH_FORMAT};

/// Composite trait bound for a complete repository implementation.
pub trait FullRepository: CountriesRepository + PersonsRepository {}

// Blanket implementation: any type implementing both traits is a FullRepository
impl<T> FullRepository for T where T: CountriesRepository + PersonsRepository {}

/// The two trait objects the services depend on.
///
/// Built from one backend so persons and countries share a store, while
/// tests can still swap either half.
#[derive(Clone)]
pub struct RepositorySet {
    pub persons: Arc<dyn PersonsRepository>,
    pub countries: Arc<dyn CountriesRepository>,
}

impl RepositorySet {
    /// Split one shared backend into its persons and countries views.
    pub fn from_shared<R>(repo: Arc<R>) -> Self
    where
        R: FullRepository + 'static,
    {
        Self {
            persons: repo.clone(),
            countries: repo,
        }
    }
}
