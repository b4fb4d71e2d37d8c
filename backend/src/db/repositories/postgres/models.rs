use chrono::NaiveDate;
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{countries, persons};
use crate::models::{Country, CountryId, Person, PersonId};

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = countries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CountryRow {
    pub country_id: Uuid,
    pub country_name: Option<String>,
}

impl From<CountryRow> for Country {
    fn from(row: CountryRow) -> Self {
        Country {
            country_id: CountryId(row.country_id),
            country_name: row.country_name,
        }
    }
}

impl From<&Country> for CountryRow {
    fn from(country: &Country) -> Self {
        CountryRow {
            country_id: country.country_id.value(),
            country_name: country.country_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = persons)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PersonRow {
    pub person_id: Uuid,
    pub person_name: Option<String>,
    pub email: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub country_id: Option<Uuid>,
    pub address: Option<String>,
    pub receive_news_letters: bool,
    pub tax_identification_number: Option<String>,
}

impl PersonRow {
    /// Convert to the entity, attaching the left-joined country.
    pub fn into_person(self, country: Option<CountryRow>) -> Person {
        Person {
            person_id: PersonId(self.person_id),
            person_name: self.person_name,
            email: self.email,
            date_of_birth: self.date_of_birth,
            gender: self.gender,
            country_id: self.country_id.map(CountryId),
            address: self.address,
            receive_news_letters: self.receive_news_letters,
            tin: self.tax_identification_number,
            country: country.map(Country::from),
        }
    }
}

/// Insert form. A `None` tax id is sent as `DEFAULT` so the column default applies.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = persons)]
pub struct NewPersonRow {
    pub person_id: Uuid,
    pub person_name: Option<String>,
    pub email: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub country_id: Option<Uuid>,
    pub address: Option<String>,
    pub receive_news_letters: bool,
    pub tax_identification_number: Option<String>,
}

impl From<&Person> for NewPersonRow {
    fn from(person: &Person) -> Self {
        NewPersonRow {
            person_id: person.person_id.value(),
            person_name: person.person_name.clone(),
            email: person.email.clone(),
            date_of_birth: person.date_of_birth,
            gender: person.gender.clone(),
            country_id: person.country_id.map(|id| id.value()),
            address: person.address.clone(),
            receive_news_letters: person.receive_news_letters,
            tax_identification_number: person.tin.clone(),
        }
    }
}

/// Update form: every mutable column, identity and tax id excluded.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = persons)]
#[diesel(treat_none_as_null = true)]
pub struct PersonChangeset {
    pub person_name: Option<String>,
    pub email: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub country_id: Option<Uuid>,
    pub address: Option<String>,
    pub receive_news_letters: bool,
}

impl From<&Person> for PersonChangeset {
    fn from(person: &Person) -> Self {
        PersonChangeset {
            person_name: person.person_name.clone(),
            email: person.email.clone(),
            date_of_birth: person.date_of_birth,
            gender: person.gender.clone(),
            country_id: person.country_id.map(|id| id.value()),
            address: person.address.clone(),
            receive_news_letters: person.receive_news_letters,
        }
    }
}
