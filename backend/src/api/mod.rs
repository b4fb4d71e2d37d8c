//! Data Transfer Objects exchanged between the HTTP surface and the services.
//!
//! Requests decode from both urlencoded form bodies and JSON; responses are
//! serialized as JSON view models.

pub mod country;
pub mod form;
pub mod options;
pub mod person;

pub use country::{CountryAddRequest, CountryOption, CountryResponse};
pub use options::{GenderOptions, PersonField, SortOrder};
pub use person::{age_on, PersonAddRequest, PersonResponse, PersonUpdateRequest};
