//! Person use cases: create, read, search, sort, update, delete, export.

use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use super::error::{ServiceError, ServiceResult};
use super::export::{persons_to_csv, persons_to_xlsx};
use super::pdf::{persons_pdf_html, PdfOptions, PdfRenderer};
use super::validation::{person_add_rules, person_update_rules, validate};
use crate::api::{PersonAddRequest, PersonField, PersonResponse, PersonUpdateRequest, SortOrder};
use crate::db::{PersonFilter, PersonsRepository};
use crate::models::PersonId;

/// Message reported when an update targets an identity that is not stored.
pub const UNKNOWN_PERSON_MESSAGE: &str = "Given person Id doesn't exist";

#[derive(Clone)]
pub struct PersonsService {
    repo: Arc<dyn PersonsRepository>,
}

impl PersonsService {
    pub fn new(repo: Arc<dyn PersonsRepository>) -> Self {
        Self { repo }
    }

    /// Validate and insert a new person under a fresh identity.
    ///
    /// # Errors
    /// `ServiceError::Validation` before any write when the request fails
    /// the create rules.
    pub async fn add_person(&self, request: PersonAddRequest) -> ServiceResult<PersonResponse> {
        validate(&person_add_rules(), &request)?;

        let person = request.to_person(PersonId::generate());
        let stored = self.repo.add_person(person).await?;
        info!(person_id = %stored.person_id, "Person added");
        Ok(PersonResponse::from(&stored))
    }

    pub async fn get_all_persons(&self) -> ServiceResult<Vec<PersonResponse>> {
        info!("get_all_persons");
        let persons = self.repo.get_all_persons().await?;
        Ok(persons.iter().map(PersonResponse::from).collect())
    }

    pub async fn get_person_by_person_id(
        &self,
        person_id: PersonId,
    ) -> ServiceResult<Option<PersonResponse>> {
        let person = self.repo.get_person_by_person_id(person_id).await?;
        Ok(person.as_ref().map(PersonResponse::from))
    }

    /// Search by one field.
    ///
    /// An unrecognized or sort-only `search_by`, or an empty search string,
    /// returns every person in store order.
    pub async fn get_filtered_persons(
        &self,
        search_by: &str,
        search_string: Option<&str>,
    ) -> ServiceResult<Vec<PersonResponse>> {
        info!(search_by, "get_filtered_persons");
        let started = Instant::now();

        let filter = match (PersonField::from_selector(search_by), search_string) {
            (Some(field), Some(needle)) if !needle.is_empty() => PersonFilter::new(field, needle),
            _ => None,
        };
        let persons = match filter {
            Some(filter) => self.repo.get_filtered_persons(&filter).await?,
            None => self.repo.get_all_persons().await?,
        };

        debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            matches = persons.len(),
            "Time for get_filtered_persons"
        );
        Ok(persons.iter().map(PersonResponse::from).collect())
    }

    /// Order persons by one field.
    ///
    /// Text compares case-insensitively, absent values sort first, and equal
    /// keys keep their input order in both directions. An empty or unknown
    /// `sort_by` returns the input unchanged.
    pub fn get_sorted_persons(
        &self,
        mut persons: Vec<PersonResponse>,
        sort_by: &str,
        sort_order: SortOrder,
    ) -> Vec<PersonResponse> {
        info!(sort_by, sort_order = %sort_order, "get_sorted_persons");
        let Some(field) = PersonField::from_selector(sort_by) else {
            return persons;
        };

        match sort_order {
            SortOrder::Asc => persons.sort_by(|a, b| compare_by(field, a, b)),
            SortOrder::Desc => persons.sort_by(|a, b| compare_by(field, b, a)),
        }
        persons
    }

    /// Replace a stored person's details (identity and tax id are kept).
    ///
    /// # Errors
    /// * `ServiceError::Validation` when the request fails the edit rules
    /// * `ServiceError::Conflict` when no person has the given identity
    pub async fn update_person(
        &self,
        request: PersonUpdateRequest,
    ) -> ServiceResult<PersonResponse> {
        validate(&person_update_rules(), &request)?;
        let person_id = request
            .person_id
            .ok_or_else(|| ServiceError::InvalidArgument("Person Id can't be blank".to_string()))?;

        if self.repo.get_person_by_person_id(person_id).await?.is_none() {
            return Err(ServiceError::Conflict(UNKNOWN_PERSON_MESSAGE.to_string()));
        }

        let updated = self.repo.update_person(request.to_person(person_id)).await?;
        info!(person_id = %person_id, "Person updated");
        Ok(PersonResponse::from(&updated))
    }

    /// Delete by identity. Returns `false` when nothing was stored under it.
    pub async fn delete_person(&self, person_id: PersonId) -> ServiceResult<bool> {
        if self.repo.get_person_by_person_id(person_id).await?.is_none() {
            return Ok(false);
        }
        let deleted = self.repo.delete_person_by_person_id(person_id).await?;
        info!(person_id = %person_id, deleted, "Person deleted");
        Ok(deleted)
    }

    pub async fn get_persons_csv(&self) -> ServiceResult<Vec<u8>> {
        let persons = self.get_all_persons().await?;
        persons_to_csv(&persons)
    }

    pub async fn get_persons_excel(&self) -> ServiceResult<Vec<u8>> {
        let persons = self.get_all_persons().await?;
        persons_to_xlsx(&persons)
    }

    /// Render the full list as a landscape PDF.
    pub async fn get_persons_pdf(&self, renderer: &dyn PdfRenderer) -> ServiceResult<Vec<u8>> {
        let persons = self.get_all_persons().await?;
        renderer
            .render(&persons_pdf_html(&persons), &PdfOptions::persons_list())
            .await
    }
}

fn compare_text(a: &Option<String>, b: &Option<String>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.to_uppercase().cmp(&b.to_uppercase()),
        (a, b) => a.is_some().cmp(&b.is_some()),
    }
}

fn compare_by(field: PersonField, a: &PersonResponse, b: &PersonResponse) -> Ordering {
    match field {
        PersonField::PersonName => compare_text(&a.person_name, &b.person_name),
        PersonField::Email => compare_text(&a.email, &b.email),
        PersonField::DateOfBirth => a.date_of_birth.cmp(&b.date_of_birth),
        PersonField::Age => a.age.cmp(&b.age),
        PersonField::Gender => compare_text(&a.gender, &b.gender),
        PersonField::Country => compare_text(&a.country, &b.country),
        PersonField::Address => compare_text(&a.address, &b.address),
        PersonField::ReceiveNewsLetters => a.receive_news_letters.cmp(&b.receive_news_letters),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::GenderOptions;
    use crate::db::LocalRepository;

    fn service() -> (PersonsService, LocalRepository) {
        let repo = LocalRepository::new();
        (PersonsService::new(Arc::new(repo.clone())), repo)
    }

    fn add_request(name: &str, email: &str) -> PersonAddRequest {
        PersonAddRequest {
            person_name: Some(name.to_string()),
            email: Some(email.to_string()),
            gender: Some(GenderOptions::Male),
            ..Default::default()
        }
    }

    fn response(name: Option<&str>, address: &str) -> PersonResponse {
        PersonResponse {
            person_id: PersonId::generate(),
            person_name: name.map(str::to_string),
            email: None,
            date_of_birth: None,
            gender: None,
            country_id: None,
            country: None,
            address: Some(address.to_string()),
            receive_news_letters: false,
            age: None,
        }
    }

    fn names(persons: &[PersonResponse]) -> Vec<Option<&str>> {
        persons.iter().map(|p| p.person_name.as_deref()).collect()
    }

    #[tokio::test]
    async fn invalid_add_writes_nothing() {
        let (service, repo) = service();
        let err = service
            .add_person(PersonAddRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(repo.person_count(), 0);
    }

    #[tokio::test]
    async fn empty_search_string_returns_everything() {
        let (service, _) = service();
        service.add_person(add_request("Ann", "a@x.com")).await.unwrap();
        service.add_person(add_request("Bob", "b@x.com")).await.unwrap();

        let all = service
            .get_filtered_persons("PersonName", Some(""))
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
        let all = service.get_filtered_persons("PersonName", None).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn search_by_email_matches_substring() {
        let (service, _) = service();
        service.add_person(add_request("Ann", "ann@corp.com")).await.unwrap();
        service.add_person(add_request("Bob", "bob@home.org")).await.unwrap();

        let found = service
            .get_filtered_persons("Email", Some("CORP"))
            .await
            .unwrap();
        assert_eq!(names(&found), vec![Some("Ann")]);
    }

    #[test]
    fn sort_is_case_insensitive_with_absent_values_first() {
        let (service, _) = service();
        let persons = vec![
            response(Some("bob"), "1"),
            response(None, "2"),
            response(Some("Alice"), "3"),
        ];
        let sorted = service.get_sorted_persons(persons, "PersonName", SortOrder::Asc);
        assert_eq!(names(&sorted), vec![None, Some("Alice"), Some("bob")]);
    }

    #[test]
    fn descending_sort_keeps_ties_in_input_order() {
        let (service, _) = service();
        let persons = vec![
            response(Some("Same"), "first"),
            response(Some("Other"), "second"),
            response(Some("same"), "third"),
        ];
        let sorted = service.get_sorted_persons(persons, "PersonName", SortOrder::Desc);
        let addresses: Vec<_> = sorted.iter().map(|p| p.address.as_deref()).collect();
        assert_eq!(addresses, vec![Some("first"), Some("third"), Some("second")]);
    }

    #[test]
    fn unknown_sort_field_preserves_order() {
        let (service, _) = service();
        let persons = vec![response(Some("b"), "1"), response(Some("a"), "2")];
        let sorted = service.get_sorted_persons(persons.clone(), "Shoe", SortOrder::Asc);
        assert_eq!(sorted, persons);
        let sorted = service.get_sorted_persons(persons.clone(), "", SortOrder::Desc);
        assert_eq!(sorted, persons);
    }

    #[tokio::test]
    async fn update_of_unknown_person_is_a_conflict() {
        let (service, _) = service();
        let request = PersonUpdateRequest {
            person_id: Some(PersonId::generate()),
            person_name: Some("Ghost".to_string()),
            email: Some("g@x.com".to_string()),
            gender: Some(GenderOptions::Other),
            ..Default::default()
        };
        let err = service.update_person(request).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(msg) if msg == UNKNOWN_PERSON_MESSAGE));
    }

    #[tokio::test]
    async fn update_replaces_details() {
        let (service, _) = service();
        let added = service.add_person(add_request("Ann", "a@x.com")).await.unwrap();

        let mut request = added.to_person_update_request();
        request.person_name = Some("Annie".to_string());
        request.receive_news_letters = true;
        let updated = service.update_person(request).await.unwrap();

        assert_eq!(updated.person_id, added.person_id);
        assert_eq!(updated.person_name.as_deref(), Some("Annie"));
        assert!(updated.receive_news_letters);
    }

    #[tokio::test]
    async fn delete_reports_unknown_identity() {
        let (service, _) = service();
        assert!(!service.delete_person(PersonId::generate()).await.unwrap());

        let added = service.add_person(add_request("Ann", "a@x.com")).await.unwrap();
        assert!(service.delete_person(added.person_id).await.unwrap());
        assert!(service
            .get_person_by_person_id(added.person_id)
            .await
            .unwrap()
            .is_none());
    }
}
