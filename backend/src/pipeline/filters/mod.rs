//! Filters registered on the person actions.

mod feature_disabled;
mod handle_exception;
mod person_form;
mod persons_list;
mod persons_list_result;
mod response_header;
mod token;

pub use feature_disabled::FeatureDisabledFilter;
pub use handle_exception::HandleExceptionFilter;
pub use person_form::{PersonFormFilter, PersonFormMode, PERSON_REQUEST_ARGUMENT};
pub use persons_list::{PersonsListActionFilter, DEFAULT_SEARCH_BY, SEARCH_BY_OPTIONS};
pub use persons_list_result::PersonsListResultFilter;
pub use response_header::ResponseHeaderFilter;
pub use token::{TokenAuthorizationFilter, TokenResultFilter, AUTH_COOKIE};
