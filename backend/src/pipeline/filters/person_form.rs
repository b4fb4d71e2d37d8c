//! Re-renders the person form when the posted request does not validate.

use async_trait::async_trait;
use http::StatusCode;
use serde_json::Value;
use tracing::{debug, info};

use crate::api::{PersonAddRequest, PersonUpdateRequest};
use crate::pipeline::{ActionContext, ActionFilter, ActionOutcome, ActionResult, Next};
use crate::services::validation::{person_add_rules, person_update_rules, FieldError};
use crate::services::{validate, CountriesService, ValidationErrors};

/// Argument holding the posted person form.
pub const PERSON_REQUEST_ARGUMENT: &str = "personRequest";

/// Which form the filter guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonFormMode {
    Create,
    Edit,
}

impl PersonFormMode {
    fn view_name(self) -> &'static str {
        match self {
            PersonFormMode::Create => "Create",
            PersonFormMode::Edit => "Edit",
        }
    }
}

/// Validates `personRequest` before the action runs.
///
/// An invalid request never reaches the handler. The filter answers `400`
/// with the form view and the submitted values; the view data carries the
/// country drop-down entries and the error messages.
#[derive(Clone)]
pub struct PersonFormFilter {
    mode: PersonFormMode,
    countries: CountriesService,
    order: i32,
}

impl PersonFormFilter {
    pub fn new(mode: PersonFormMode, countries: CountriesService, order: i32) -> Self {
        Self {
            mode,
            countries,
            order,
        }
    }

    /// The submitted model and its failures, if any. A form that does not
    /// decode at all is reported as a single failure against the argument.
    fn check(&self, ctx: &ActionContext) -> (Value, Option<ValidationErrors>) {
        let decoded = match self.mode {
            PersonFormMode::Create => ctx
                .arguments
                .decode::<PersonAddRequest>(PERSON_REQUEST_ARGUMENT)
                .map(|request| {
                    let errors = validate(&person_add_rules(), &request).err();
                    (serde_json::to_value(&request), errors)
                }),
            PersonFormMode::Edit => ctx
                .arguments
                .decode::<PersonUpdateRequest>(PERSON_REQUEST_ARGUMENT)
                .map(|request| {
                    let errors = validate(&person_update_rules(), &request).err();
                    (serde_json::to_value(&request), errors)
                }),
        };

        match decoded {
            Ok((model, errors)) => (model.unwrap_or(Value::Null), errors),
            Err(err) => {
                let raw = ctx
                    .arguments
                    .get(PERSON_REQUEST_ARGUMENT)
                    .cloned()
                    .unwrap_or(Value::Null);
                let errors = ValidationErrors {
                    errors: vec![FieldError {
                        field: PERSON_REQUEST_ARGUMENT.to_string(),
                        message: err.to_string(),
                    }],
                };
                (raw, Some(errors))
            }
        }
    }
}

#[async_trait]
impl ActionFilter for PersonFormFilter {
    fn name(&self) -> &'static str {
        "PersonFormFilter"
    }

    fn order(&self) -> i32 {
        self.order
    }

    async fn on_action(&self, ctx: &mut ActionContext, next: Next<'_>) -> ActionOutcome {
        let (model, errors) = self.check(ctx);
        let Some(errors) = errors else {
            debug!(filter = self.name(), action = ctx.action, "Person form is valid");
            return next.run(ctx).await;
        };

        info!(
            filter = self.name(),
            action = ctx.action,
            error_count = errors.errors.len(),
            "Person form rejected"
        );
        let countries = self.countries.get_country_options().await?;
        let messages: Vec<Value> = errors.messages().into_iter().map(Value::from).collect();
        Ok(ActionResult::view(self.mode.view_name(), &model)
            .with_status(StatusCode::BAD_REQUEST)
            .with_view_data("Countries", serde_json::to_value(&countries).unwrap_or(Value::Null))
            .with_view_data("Errors", Value::Array(messages)))
    }
}
