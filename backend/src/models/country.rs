//! Country persistence entity.

use serde::{Deserialize, Serialize};

use super::ids::CountryId;

/// A row of the `countries` table.
///
/// Name uniqueness is a service-level rule; the store itself accepts
/// duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub country_id: CountryId,
    pub country_name: Option<String>,
}

impl Country {
    pub fn new(country_id: CountryId, country_name: impl Into<String>) -> Self {
        Self {
            country_id,
            country_name: Some(country_name.into()),
        }
    }
}
