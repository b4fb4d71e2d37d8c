//! Person repository trait and the search predicate it accepts.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::PersonField;
use crate::models::{Person, PersonId};

/// Display format used when searching by date of birth (`"01 January 1990"`).
pub const DATE_SEARCH_FORMAT: &str = "%d %B %Y";

/// Case-insensitive substring search on one person field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonFilter {
    field: PersonField,
    needle: String,
}

impl PersonFilter {
    /// Build a filter for `field`.
    ///
    /// Returns `None` for sort-only fields (`Age`, `ReceiveNewsLetters`).
    pub fn new(field: PersonField, needle: impl Into<String>) -> Option<Self> {
        if !field.is_searchable() {
            return None;
        }
        Some(Self {
            field,
            needle: needle.into(),
        })
    }

    pub fn field(&self) -> PersonField {
        self.field
    }

    pub fn needle(&self) -> &str {
        &self.needle
    }

    /// Evaluate the predicate against a person with its country loaded.
    pub fn matches(&self, person: &Person) -> bool {
        let haystack = match self.field {
            PersonField::PersonName => person.person_name.clone(),
            PersonField::Email => person.email.clone(),
            PersonField::DateOfBirth => person
                .date_of_birth
                .map(|dob| dob.format(DATE_SEARCH_FORMAT).to_string()),
            PersonField::Gender => person.gender.clone(),
            PersonField::Country => person.country_name().map(str::to_string),
            PersonField::Address => person.address.clone(),
            PersonField::Age | PersonField::ReceiveNewsLetters => None,
        };

        haystack
            .map(|text| text.to_lowercase().contains(&self.needle.to_lowercase()))
            .unwrap_or(false)
    }
}

/// Storage operations for persons.
///
/// Reads return rows with the `country` navigation property populated.
#[async_trait]
pub trait PersonsRepository: Send + Sync {
    /// Check if the store is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Insert a person and return the stored row (store defaults applied).
    async fn add_person(&self, person: Person) -> RepositoryResult<Person>;

    /// All persons in store order.
    async fn get_all_persons(&self) -> RepositoryResult<Vec<Person>>;

    async fn get_person_by_person_id(
        &self,
        person_id: PersonId,
    ) -> RepositoryResult<Option<Person>>;

    /// Persons matching `filter`, in store order.
    async fn get_filtered_persons(&self, filter: &PersonFilter) -> RepositoryResult<Vec<Person>>;

    /// Replace every column of an existing person except its identity and
    /// tax identification number.
    ///
    /// # Errors
    /// `RepositoryError::NotFound` when no row has `person.person_id`.
    async fn update_person(&self, person: Person) -> RepositoryResult<Person>;

    /// Delete by identity. Returns whether a row was removed.
    async fn delete_person_by_person_id(&self, person_id: PersonId) -> RepositoryResult<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Country, CountryId};
    use chrono::NaiveDate;

    fn person() -> Person {
        Person {
            person_id: PersonId::generate(),
            person_name: Some("Maria Lopez".to_string()),
            email: Some("maria@example.com".to_string()),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1),
            gender: Some("Female".to_string()),
            country_id: None,
            address: None,
            receive_news_letters: false,
            tin: None,
            country: Some(Country::new(CountryId::generate(), "Argentina")),
        }
    }

    #[test]
    fn text_search_is_case_insensitive_substring() {
        let filter = PersonFilter::new(PersonField::PersonName, "LOPEZ").unwrap();
        assert!(filter.matches(&person()));
        let filter = PersonFilter::new(PersonField::Email, "nobody").unwrap();
        assert!(!filter.matches(&person()));
    }

    #[test]
    fn date_search_uses_long_month_rendering() {
        let filter = PersonFilter::new(PersonField::DateOfBirth, "01 january").unwrap();
        assert!(filter.matches(&person()));
        let filter = PersonFilter::new(PersonField::DateOfBirth, "1990-01-01").unwrap();
        assert!(!filter.matches(&person()));
    }

    #[test]
    fn country_search_reads_joined_name() {
        let filter = PersonFilter::new(PersonField::Country, "gent").unwrap();
        assert!(filter.matches(&person()));
    }

    #[test]
    fn missing_values_never_match() {
        let filter = PersonFilter::new(PersonField::Address, "").unwrap();
        assert!(!filter.matches(&person()));
    }

    #[test]
    fn sort_only_fields_have_no_filter() {
        assert!(PersonFilter::new(PersonField::Age, "30").is_none());
        assert!(PersonFilter::new(PersonField::ReceiveNewsLetters, "true").is_none());
    }
}
