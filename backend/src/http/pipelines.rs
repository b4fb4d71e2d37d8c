//! Filter registration for every routed action.
//!
//! Pipelines are assembled once, when the router is built. Filters shared by
//! a whole controller are registered as one instance per controller.

use std::sync::Arc;

use crate::config::FilterSettings;
use crate::pipeline::filters::{
    FeatureDisabledFilter, HandleExceptionFilter, PersonFormFilter, PersonFormMode,
    PersonsListActionFilter, PersonsListResultFilter, ResponseHeaderFilter,
    TokenAuthorizationFilter, TokenResultFilter,
};
use crate::pipeline::{ActionFilter, Pipeline};
use crate::services::CountriesService;

/// `(key, value, order)` of the header added to every action.
pub const GLOBAL_HEADER: (&str, &str, i32) = ("My-Key-From-Global", "My-Value-From-Global", 2);
/// `(key, value, order)` of the header added to every persons action.
pub const PERSONS_CONTROLLER_HEADER: (&str, &str, i32) =
    ("My-Key-From-Controller", "My-Value-From-Controller", 3);

const CUSTOM_HEADER_KEY: &str = "X-Custom-Key";
const CUSTOM_HEADER_VALUE: &str = "Custom-Value";
const PERSONS_LIST_FILTER_ORDER: i32 = 4;
const PERSON_FORM_FILTER_ORDER: i32 = 0;

fn header(entry: (&str, &str, i32)) -> Arc<dyn ActionFilter> {
    Arc::new(ResponseHeaderFilter::new(entry.0, entry.1, entry.2))
}

/// One pipeline per action.
pub struct Pipelines {
    pub persons_index: Pipeline,
    pub persons_create_form: Pipeline,
    pub persons_create: Pipeline,
    pub persons_edit_form: Pipeline,
    pub persons_edit: Pipeline,
    pub persons_delete_form: Pipeline,
    pub persons_delete: Pipeline,
    pub persons_pdf: Pipeline,
    pub persons_csv: Pipeline,
    pub persons_excel: Pipeline,
    pub countries_index: Pipeline,
    pub countries_upload_form: Pipeline,
    pub countries_upload: Pipeline,
}

impl Pipelines {
    pub fn new(settings: &FilterSettings, countries: &CountriesService) -> Self {
        let global = header(GLOBAL_HEADER);
        let exception: Arc<dyn ActionFilter> = Arc::new(HandleExceptionFilter);
        let controller = header(PERSONS_CONTROLLER_HEADER);

        let application = || {
            Pipeline::new()
                .with_shared(exception.clone())
                .with_shared(global.clone())
        };
        let persons = || application().with_shared(controller.clone());
        let form = |mode| {
            PersonFormFilter::new(mode, countries.clone(), PERSON_FORM_FILTER_ORDER)
        };

        Self {
            persons_index: persons()
                .with(PersonsListActionFilter::new(PERSONS_LIST_FILTER_ORDER))
                .with(ResponseHeaderFilter::new(CUSTOM_HEADER_KEY, CUSTOM_HEADER_VALUE, 1))
                .with(PersonsListResultFilter),
            persons_create_form: persons()
                .with(ResponseHeaderFilter::new(CUSTOM_HEADER_KEY, CUSTOM_HEADER_VALUE, 4)),
            persons_create: persons()
                .with(form(PersonFormMode::Create))
                .with(FeatureDisabledFilter::new(settings.create_disabled)),
            persons_edit_form: persons().with(TokenResultFilter::new(settings.auth_token.as_str())),
            persons_edit: persons()
                .with(form(PersonFormMode::Edit))
                .with(TokenAuthorizationFilter::new(settings.auth_token.as_str())),
            persons_delete_form: persons(),
            persons_delete: persons(),
            persons_pdf: persons(),
            persons_csv: persons(),
            persons_excel: persons(),
            countries_index: application(),
            countries_upload_form: application(),
            countries_upload: application(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::LocalRepository;

    fn pipelines(settings: &FilterSettings) -> Pipelines {
        let countries = CountriesService::new(Arc::new(LocalRepository::new()));
        Pipelines::new(settings, &countries)
    }

    #[test]
    fn test_index_filter_order() {
        let pipelines = pipelines(&FilterSettings::default());
        assert_eq!(
            pipelines.persons_index.filter_names(),
            vec![
                "HandleExceptionFilter",
                "ResponseHeaderFilter",
                "ResponseHeaderFilter",
                "ResponseHeaderFilter",
                "PersonsListActionFilter",
                "PersonsListResultFilter",
            ]
        );
    }

    #[test]
    fn test_edit_submit_checks_token_before_form() {
        let pipelines = pipelines(&FilterSettings::default());
        assert_eq!(
            pipelines.persons_edit.filter_names(),
            vec![
                "HandleExceptionFilter",
                "TokenAuthorizationFilter",
                "PersonFormFilter",
                "ResponseHeaderFilter",
                "ResponseHeaderFilter",
            ]
        );
    }

    #[test]
    fn test_create_submit_gated_before_validation() {
        let pipelines = pipelines(&FilterSettings::default());
        assert_eq!(
            pipelines.persons_create.filter_names(),
            vec![
                "HandleExceptionFilter",
                "FeatureDisabledFilter",
                "PersonFormFilter",
                "ResponseHeaderFilter",
                "ResponseHeaderFilter",
            ]
        );
    }

    #[test]
    fn test_countries_skip_controller_filters() {
        let pipelines = pipelines(&FilterSettings::default());
        assert_eq!(
            pipelines.countries_index.filter_names(),
            vec!["HandleExceptionFilter", "ResponseHeaderFilter"]
        );
    }
}
