//! Service layer for business logic and orchestration.
//!
//! Services sit between the request pipeline and the repositories: they
//! validate input, map entities to transfer objects, dispatch search and sort
//! by field, and produce exports.

pub mod countries;
pub mod error;
pub mod export;
pub mod pdf;
pub mod persons;
pub mod validation;

pub use countries::CountriesService;
pub use error::{ServiceError, ServiceResult};
pub use pdf::{PdfOptions, PdfRenderer, WkHtmlToPdfRenderer};
pub use persons::PersonsService;
pub use validation::{validate, FieldRule, Rule, Validatable, ValidationErrors};
