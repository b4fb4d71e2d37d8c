//! In-memory local repository implementation.
//!
//! Stores countries and persons in insertion-ordered vectors behind a
//! `parking_lot::RwLock`. It mirrors the store-side behavior of the Postgres
//! schema (tax id default and length check, country join on reads) but does
//! not enforce the country foreign key.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::db::repository::{
    CountriesRepository, ErrorContext, PersonFilter, PersonsRepository, RepositoryError,
    RepositoryResult,
};
use crate::models::{Country, CountryId, Person, PersonId, DEFAULT_TIN};

/// In-memory local repository.
///
/// # Example
/// ```
/// use people_registry::db::repositories::LocalRepository;
///
/// let repo = LocalRepository::new();
/// assert_eq!(repo.person_count(), 0);
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    countries: Vec<Country>,
    persons: Vec<Person>,
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            countries: Vec::new(),
            persons: Vec::new(),
            is_healthy: true,
        }
    }
}

impl LocalData {
    fn country(&self, country_id: Option<CountryId>) -> Option<Country> {
        let id = country_id?;
        self.countries.iter().find(|c| c.country_id == id).cloned()
    }

    /// Clone a stored person with its country navigation property loaded.
    fn joined(&self, person: &Person) -> Person {
        let mut person = person.clone();
        person.country = self.country(person.country_id);
        person
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write();
        data.countries.clear();
        data.persons.clear();
    }

    pub fn person_count(&self) -> usize {
        self.data.read().persons.len()
    }

    pub fn country_count(&self) -> usize {
        self.data.read().countries.len()
    }

    fn ensure_healthy(&self, operation: &str) -> RepositoryResult<()> {
        if self.data.read().is_healthy {
            Ok(())
        } else {
            Err(RepositoryError::connection_with_context(
                "Local repository marked unhealthy",
                ErrorContext::new(operation),
            ))
        }
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CountriesRepository for LocalRepository {
    async fn add_country(&self, country: Country) -> RepositoryResult<Country> {
        self.ensure_healthy("add_country")?;
        let mut data = self.data.write();
        data.countries.push(country.clone());
        Ok(country)
    }

    async fn get_all_countries(&self) -> RepositoryResult<Vec<Country>> {
        self.ensure_healthy("get_all_countries")?;
        Ok(self.data.read().countries.clone())
    }

    async fn get_country_by_country_id(
        &self,
        country_id: CountryId,
    ) -> RepositoryResult<Option<Country>> {
        self.ensure_healthy("get_country_by_country_id")?;
        Ok(self.data.read().country(Some(country_id)))
    }

    async fn get_country_by_country_name(
        &self,
        country_name: &str,
    ) -> RepositoryResult<Option<Country>> {
        self.ensure_healthy("get_country_by_country_name")?;
        let data = self.data.read();
        Ok(data
            .countries
            .iter()
            .find(|c| c.country_name.as_deref() == Some(country_name))
            .cloned())
    }
}

#[async_trait]
impl PersonsRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn add_person(&self, mut person: Person) -> RepositoryResult<Person> {
        self.ensure_healthy("add_person")?;
        if person.tin.is_none() {
            person.tin = Some(DEFAULT_TIN.to_string());
        }
        if let Err(tin) = person.check_tin() {
            return Err(RepositoryError::constraint_with_context(
                "The INSERT statement conflicted with the CHECK constraint \"CHK_TIN\"",
                ErrorContext::new("add_person")
                    .with_entity("person")
                    .with_entity_id(person.person_id)
                    .with_details(format!("tin={}", tin)),
            ));
        }
        person.country = None;

        let mut data = self.data.write();
        data.persons.push(person.clone());
        Ok(data.joined(&person))
    }

    async fn get_all_persons(&self) -> RepositoryResult<Vec<Person>> {
        self.ensure_healthy("get_all_persons")?;
        let data = self.data.read();
        Ok(data.persons.iter().map(|p| data.joined(p)).collect())
    }

    async fn get_person_by_person_id(
        &self,
        person_id: PersonId,
    ) -> RepositoryResult<Option<Person>> {
        self.ensure_healthy("get_person_by_person_id")?;
        let data = self.data.read();
        Ok(data
            .persons
            .iter()
            .find(|p| p.person_id == person_id)
            .map(|p| data.joined(p)))
    }

    async fn get_filtered_persons(&self, filter: &PersonFilter) -> RepositoryResult<Vec<Person>> {
        self.ensure_healthy("get_filtered_persons")?;
        let data = self.data.read();
        Ok(data
            .persons
            .iter()
            .map(|p| data.joined(p))
            .filter(|p| filter.matches(p))
            .collect())
    }

    async fn update_person(&self, person: Person) -> RepositoryResult<Person> {
        self.ensure_healthy("update_person")?;
        let mut data = self.data.write();
        let stored = data
            .persons
            .iter_mut()
            .find(|p| p.person_id == person.person_id)
            .ok_or_else(|| {
                RepositoryError::not_found_with_context(
                    "Person not found",
                    ErrorContext::new("update_person")
                        .with_entity("person")
                        .with_entity_id(person.person_id),
                )
            })?;

        stored.person_name = person.person_name;
        stored.email = person.email;
        stored.date_of_birth = person.date_of_birth;
        stored.gender = person.gender;
        stored.country_id = person.country_id;
        stored.address = person.address;
        stored.receive_news_letters = person.receive_news_letters;

        let updated = stored.clone();
        Ok(data.joined(&updated))
    }

    async fn delete_person_by_person_id(&self, person_id: PersonId) -> RepositoryResult<bool> {
        self.ensure_healthy("delete_person_by_person_id")?;
        let mut data = self.data.write();
        let before = data.persons.len();
        data.persons.retain(|p| p.person_id != person_id);
        Ok(data.persons.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::PersonField;

    fn person(name: &str, country_id: Option<CountryId>) -> Person {
        Person {
            person_id: PersonId::generate(),
            person_name: Some(name.to_string()),
            email: Some(format!("{}@example.com", name.to_lowercase())),
            date_of_birth: None,
            gender: Some("Male".to_string()),
            country_id,
            address: None,
            receive_news_letters: false,
            tin: None,
            country: None,
        }
    }

    #[tokio::test]
    async fn add_person_applies_default_tin_and_joins_country() {
        let repo = LocalRepository::new();
        let country = repo
            .add_country(Country::new(CountryId::generate(), "India"))
            .await
            .unwrap();

        let stored = repo
            .add_person(person("Raj", Some(country.country_id)))
            .await
            .unwrap();

        assert_eq!(stored.tin.as_deref(), Some(DEFAULT_TIN));
        assert_eq!(stored.country_name(), Some("India"));
    }

    #[tokio::test]
    async fn add_person_rejects_bad_tin_length() {
        let repo = LocalRepository::new();
        let mut bad = person("Raj", None);
        bad.tin = Some("SHORT".to_string());

        let err = repo.add_person(bad).await.unwrap_err();
        assert!(matches!(err, RepositoryError::ConstraintViolation { .. }));
        assert_eq!(repo.person_count(), 0);
    }

    #[tokio::test]
    async fn unknown_country_reference_is_accepted() {
        let repo = LocalRepository::new();
        let stored = repo
            .add_person(person("Ghost", Some(CountryId::generate())))
            .await
            .unwrap();
        assert!(stored.country.is_none());
    }

    #[tokio::test]
    async fn update_keeps_identity_and_tin() {
        let repo = LocalRepository::new();
        let stored = repo.add_person(person("Raj", None)).await.unwrap();

        let mut changed = person("Rajesh", None);
        changed.person_id = stored.person_id;
        changed.tin = Some("ZZZ99999".to_string());
        changed.receive_news_letters = true;

        let updated = repo.update_person(changed).await.unwrap();
        assert_eq!(updated.person_name.as_deref(), Some("Rajesh"));
        assert_eq!(updated.tin.as_deref(), Some(DEFAULT_TIN));
        assert!(updated.receive_news_letters);
    }

    #[tokio::test]
    async fn update_unknown_person_is_not_found() {
        let repo = LocalRepository::new();
        let err = repo.update_person(person("Nobody", None)).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn delete_reports_whether_a_row_was_removed() {
        let repo = LocalRepository::new();
        let stored = repo.add_person(person("Raj", None)).await.unwrap();

        assert!(repo
            .delete_person_by_person_id(stored.person_id)
            .await
            .unwrap());
        assert!(!repo
            .delete_person_by_person_id(stored.person_id)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn filtered_persons_keep_store_order() {
        let repo = LocalRepository::new();
        for name in ["Anna", "Bob", "Hannah"] {
            repo.add_person(person(name, None)).await.unwrap();
        }

        let filter = PersonFilter::new(PersonField::PersonName, "ann").unwrap();
        let names: Vec<_> = repo
            .get_filtered_persons(&filter)
            .await
            .unwrap()
            .into_iter()
            .filter_map(|p| p.person_name)
            .collect();
        assert_eq!(names, vec!["Anna", "Hannah"]);
    }

    #[tokio::test]
    async fn country_lookup_by_name_is_case_sensitive() {
        let repo = LocalRepository::new();
        repo.add_country(Country::new(CountryId::generate(), "Japan"))
            .await
            .unwrap();

        assert!(repo
            .get_country_by_country_name("Japan")
            .await
            .unwrap()
            .is_some());
        assert!(repo
            .get_country_by_country_name("japan")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn unhealthy_repository_fails_reads() {
        let repo = LocalRepository::new();
        repo.set_healthy(false);
        assert!(!repo.health_check().await.unwrap());
        assert!(repo.get_all_persons().await.is_err());
    }
}
