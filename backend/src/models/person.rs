//! Person persistence entity.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::country::Country;
use super::ids::{CountryId, PersonId};

/// Default tax identification number applied by the store when none is given.
pub const DEFAULT_TIN: &str = "ABC12345";

/// Exact length enforced by the `CHK_TIN` check constraint.
pub const TIN_LENGTH: usize = 8;

/// Column widths of the `persons` table.
pub const PERSON_NAME_MAX_LEN: usize = 40;
pub const EMAIL_MAX_LEN: usize = 40;
pub const GENDER_MAX_LEN: usize = 10;
pub const ADDRESS_MAX_LEN: usize = 200;

/// A row of the `persons` table.
///
/// `country` is a navigation property: repositories fill it on reads and
/// ignore it on writes, where only `country_id` matters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub person_id: PersonId,
    pub person_name: Option<String>,
    pub email: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub country_id: Option<CountryId>,
    pub address: Option<String>,
    pub receive_news_letters: bool,
    /// Tax identification number (`TaxIdentificationNumber` column).
    pub tin: Option<String>,
    #[serde(skip)]
    pub country: Option<Country>,
}

impl Person {
    /// Evaluate the `CHK_TIN` check constraint against this row.
    ///
    /// Returns the offending value when its length is not exactly
    /// [`TIN_LENGTH`] characters.
    pub fn check_tin(&self) -> Result<(), String> {
        match self.tin.as_deref() {
            Some(tin) if tin.chars().count() != TIN_LENGTH => Err(tin.to_string()),
            _ => Ok(()),
        }
    }

    /// Name of the referenced country, when the navigation property is loaded.
    pub fn country_name(&self) -> Option<&str> {
        self.country.as_ref().and_then(|c| c.country_name.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person_with_tin(tin: Option<&str>) -> Person {
        Person {
            person_id: PersonId::generate(),
            person_name: Some("Ada".to_string()),
            email: None,
            date_of_birth: None,
            gender: None,
            country_id: None,
            address: None,
            receive_news_letters: false,
            tin: tin.map(str::to_string),
            country: None,
        }
    }

    #[test]
    fn tin_check_accepts_exact_length_and_missing_value() {
        assert!(person_with_tin(Some(DEFAULT_TIN)).check_tin().is_ok());
        assert!(person_with_tin(None).check_tin().is_ok());
    }

    #[test]
    fn tin_check_rejects_other_lengths() {
        assert_eq!(
            person_with_tin(Some("ABC")).check_tin(),
            Err("ABC".to_string())
        );
        assert!(person_with_tin(Some("ABC123456")).check_tin().is_err());
    }

    #[test]
    fn country_name_reads_navigation_property() {
        let mut person = person_with_tin(None);
        assert_eq!(person.country_name(), None);
        person.country = Some(Country::new(CountryId::generate(), "Peru"));
        assert_eq!(person.country_name(), Some("Peru"));
    }
}
