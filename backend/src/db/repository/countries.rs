//! Country repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{Country, CountryId};

/// Storage operations for countries.
///
/// Implementations do not enforce name uniqueness; callers look a name up
/// before inserting it.
#[async_trait]
pub trait CountriesRepository: Send + Sync {
    /// Insert a country and return the stored row.
    async fn add_country(&self, country: Country) -> RepositoryResult<Country>;

    /// All countries in store order.
    async fn get_all_countries(&self) -> RepositoryResult<Vec<Country>>;

    async fn get_country_by_country_id(
        &self,
        country_id: CountryId,
    ) -> RepositoryResult<Option<Country>>;

    /// Exact, case-sensitive lookup by name.
    async fn get_country_by_country_name(
        &self,
        country_name: &str,
    ) -> RepositoryResult<Option<Country>>;
}
