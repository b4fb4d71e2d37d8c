//! Person transfer objects and their mapping to and from [`Person`].

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::form::{checkbox, empty_as_none};
use super::options::GenderOptions;
use crate::models::{CountryId, Person, PersonId};

/// Mean length of a year used for age computation.
const DAYS_PER_YEAR: f64 = 365.25;

/// Age in whole years on `today`: elapsed days divided by 365.25, rounded
/// to the nearest integer.
pub fn age_on(date_of_birth: NaiveDate, today: NaiveDate) -> i64 {
    let days = (today - date_of_birth).num_days() as f64;
    (days / DAYS_PER_YEAR).round() as i64
}

/// Payload of the create form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonAddRequest {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub person_name: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub gender: Option<GenderOptions>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub country_id: Option<CountryId>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "checkbox")]
    pub receive_news_letters: bool,
}

impl PersonAddRequest {
    /// Build the entity to insert under the given identity.
    ///
    /// The tax identification number is left empty so the store applies its
    /// default.
    pub fn to_person(&self, person_id: PersonId) -> Person {
        Person {
            person_id,
            person_name: self.person_name.clone(),
            email: self.email.clone(),
            date_of_birth: self.date_of_birth,
            gender: self.gender.map(|g| g.to_string()),
            country_id: self.country_id,
            address: self.address.clone(),
            receive_news_letters: self.receive_news_letters,
            tin: None,
            country: None,
        }
    }
}

/// Payload of the edit form. Carries the identity of the edited person.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonUpdateRequest {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub person_id: Option<PersonId>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub person_name: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub gender: Option<GenderOptions>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub country_id: Option<CountryId>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "checkbox")]
    pub receive_news_letters: bool,
}

impl PersonUpdateRequest {
    /// Build the replacement entity for `person_id`.
    pub fn to_person(&self, person_id: PersonId) -> Person {
        Person {
            person_id,
            person_name: self.person_name.clone(),
            email: self.email.clone(),
            date_of_birth: self.date_of_birth,
            gender: self.gender.map(|g| g.to_string()),
            country_id: self.country_id,
            address: self.address.clone(),
            receive_news_letters: self.receive_news_letters,
            tin: None,
            country: None,
        }
    }
}

/// Read model of a person as shown in lists, forms, and exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonResponse {
    pub person_id: PersonId,
    pub person_name: Option<String>,
    pub email: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub country_id: Option<CountryId>,
    pub country: Option<String>,
    pub address: Option<String>,
    pub receive_news_letters: bool,
    pub age: Option<i64>,
}

impl PersonResponse {
    /// Map an entity, computing the age relative to `today`.
    pub fn from_person(person: &Person, today: NaiveDate) -> Self {
        Self {
            person_id: person.person_id,
            person_name: person.person_name.clone(),
            email: person.email.clone(),
            date_of_birth: person.date_of_birth,
            gender: person.gender.clone(),
            country_id: person.country_id,
            country: person.country_name().map(str::to_string),
            address: person.address.clone(),
            receive_news_letters: person.receive_news_letters,
            age: person.date_of_birth.map(|dob| age_on(dob, today)),
        }
    }

    /// Prefill an edit form from this response.
    ///
    /// A stored gender outside [`GenderOptions`] is dropped so the form asks
    /// for it again.
    pub fn to_person_update_request(&self) -> PersonUpdateRequest {
        PersonUpdateRequest {
            person_id: Some(self.person_id),
            person_name: self.person_name.clone(),
            email: self.email.clone(),
            date_of_birth: self.date_of_birth,
            gender: self.gender.as_deref().and_then(|g| g.parse().ok()),
            country_id: self.country_id,
            address: self.address.clone(),
            receive_news_letters: self.receive_news_letters,
        }
    }
}

impl From<&Person> for PersonResponse {
    fn from(person: &Person) -> Self {
        PersonResponse::from_person(person, Local::now().date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Country;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn age_rounds_to_nearest_year() {
        assert_eq!(age_on(date(1990, 1, 1), date(2020, 1, 1)), 30);
        // 29.6 years rounds up
        assert_eq!(age_on(date(1990, 1, 1), date(2019, 8, 10)), 30);
        assert_eq!(age_on(date(2000, 6, 1), date(2000, 6, 1)), 0);
    }

    #[test]
    fn add_request_maps_gender_to_text_and_leaves_tin_empty() {
        let request = PersonAddRequest {
            person_name: Some("Maria".to_string()),
            email: Some("m@x.com".to_string()),
            gender: Some(GenderOptions::Female),
            ..Default::default()
        };
        let id = PersonId::generate();
        let person = request.to_person(id);
        assert_eq!(person.person_id, id);
        assert_eq!(person.gender.as_deref(), Some("Female"));
        assert!(person.tin.is_none());
    }

    #[test]
    fn response_carries_country_name_and_age() {
        let country = Country::new(CountryId::generate(), "Chile");
        let person = Person {
            person_id: PersonId::generate(),
            person_name: Some("Ana".to_string()),
            email: None,
            date_of_birth: Some(date(1980, 3, 15)),
            gender: Some("Female".to_string()),
            country_id: Some(country.country_id),
            address: None,
            receive_news_letters: true,
            tin: None,
            country: Some(country),
        };
        let response = PersonResponse::from_person(&person, date(2020, 3, 15));
        assert_eq!(response.country.as_deref(), Some("Chile"));
        assert_eq!(response.age, Some(40));
    }

    #[test]
    fn update_request_round_trips_through_response() {
        let response = PersonResponse {
            person_id: PersonId::generate(),
            person_name: Some("Luis".to_string()),
            email: Some("l@x.com".to_string()),
            date_of_birth: None,
            gender: Some("Male".to_string()),
            country_id: None,
            country: None,
            address: Some("Street 1".to_string()),
            receive_news_letters: false,
            age: None,
        };
        let request = response.to_person_update_request();
        assert_eq!(request.person_id, Some(response.person_id));
        assert_eq!(request.gender, Some(GenderOptions::Male));
        assert_eq!(request.address, response.address);
    }

    #[test]
    fn form_payload_with_blank_optionals_decodes() {
        let json = r#"{
            "person_name": "Maria",
            "email": "m@x.com",
            "date_of_birth": "",
            "gender": "Female",
            "country_id": "",
            "receive_news_letters": "true"
        }"#;
        let request: PersonAddRequest = serde_json::from_str(json).unwrap();
        assert!(request.date_of_birth.is_none());
        assert!(request.country_id.is_none());
        assert_eq!(request.gender, Some(GenderOptions::Female));
        assert!(request.receive_news_letters);
    }
}
