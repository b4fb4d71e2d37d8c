//! Country transfer objects.

use serde::{Deserialize, Serialize};

use super::form::empty_as_none;
use crate::models::{Country, CountryId};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CountryAddRequest {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub country_name: Option<String>,
}

impl CountryAddRequest {
    pub fn new(country_name: impl Into<String>) -> Self {
        Self {
            country_name: Some(country_name.into()),
        }
    }

    pub fn to_country(&self, country_id: CountryId) -> Country {
        Country {
            country_id,
            country_name: self.country_name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryResponse {
    pub country_id: CountryId,
    pub country_name: Option<String>,
}

impl From<&Country> for CountryResponse {
    fn from(country: &Country) -> Self {
        Self {
            country_id: country.country_id,
            country_name: country.country_name.clone(),
        }
    }
}

impl From<Country> for CountryResponse {
    fn from(country: Country) -> Self {
        Self {
            country_id: country.country_id,
            country_name: country.country_name,
        }
    }
}

/// Drop-down entry for a country picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryOption {
    pub text: Option<String>,
    pub value: CountryId,
}

impl From<&CountryResponse> for CountryOption {
    fn from(country: &CountryResponse) -> Self {
        Self {
            text: country.country_name.clone(),
            value: country.country_id,
        }
    }
}
