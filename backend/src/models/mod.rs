//! Persistence entities shared by the repository and service layers.

pub mod country;
pub mod ids;
pub mod macros;
pub mod person;

pub use country::Country;
pub use ids::{CountryId, PersonId};
pub use person::{Person, DEFAULT_TIN, TIN_LENGTH};
