//! Argument normalization and view decoration for the persons list.

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::info;

use crate::api::PersonField;
use crate::pipeline::{
    ActionContext, ActionFilter, ActionOutcome, ArgumentBag, Next, ARGUMENTS_ITEM_KEY,
};

/// Selectors the list accepts for `searchBy`.
pub const SEARCH_BY_OPTIONS: [&str; 6] = [
    "PersonName",
    "Email",
    "DateOfBirth",
    "Gender",
    "CountryId",
    "Address",
];

/// Selector substituted for an unrecognized `searchBy`.
pub const DEFAULT_SEARCH_BY: &str = "PersonName";

/// `(argument, view data key)` pairs echoed back to the list view.
const ECHOED_ARGUMENTS: [(&str, &str); 4] = [
    ("searchBy", "CurrentSearchBy"),
    ("searchString", "CurrentSearchString"),
    ("sortBy", "CurrentSortBy"),
    ("sortOrder", "CurrentSortOrder"),
];

/// Before the handler: records the argument bag in the request items and
/// rewrites an unknown `searchBy` to [`DEFAULT_SEARCH_BY`].
///
/// After the handler: copies the current search and sort arguments into the
/// view data along with the searchable field titles.
#[derive(Debug, Clone)]
pub struct PersonsListActionFilter {
    order: i32,
}

impl PersonsListActionFilter {
    pub fn new(order: i32) -> Self {
        Self { order }
    }

    fn normalize(&self, arguments: &mut ArgumentBag) {
        let Some(search_by) = arguments.get_str("searchBy") else {
            return;
        };
        if search_by.is_empty() || SEARCH_BY_OPTIONS.contains(&search_by.as_str()) {
            return;
        }
        info!(search_by = %search_by, "searchBy actual value");
        arguments.insert("searchBy", DEFAULT_SEARCH_BY);
        info!(search_by = DEFAULT_SEARCH_BY, "searchBy updated value");
    }

    fn search_fields() -> Value {
        let fields: Map<String, Value> = PersonField::ALL
            .iter()
            .map(|f| (f.key().to_string(), Value::from(f.title())))
            .collect();
        Value::Object(fields)
    }
}

#[async_trait]
impl ActionFilter for PersonsListActionFilter {
    fn name(&self) -> &'static str {
        "PersonsListActionFilter"
    }

    fn order(&self) -> i32 {
        self.order
    }

    async fn on_action(&self, ctx: &mut ActionContext, next: Next<'_>) -> ActionOutcome {
        info!(filter = self.name(), "on_action_executing");
        self.normalize(&mut ctx.arguments);
        ctx.items
            .insert(ARGUMENTS_ITEM_KEY.to_string(), ctx.arguments.to_value());

        let mut result = next.run(ctx).await?;

        info!(filter = self.name(), "on_action_executed");
        let arguments = ctx
            .items
            .get(ARGUMENTS_ITEM_KEY)
            .and_then(ArgumentBag::from_value);
        if let Some(view_data) = result.view_data_mut() {
            if let Some(arguments) = arguments {
                for (argument, key) in ECHOED_ARGUMENTS {
                    if arguments.contains(argument) {
                        let value = arguments.get_str(argument).unwrap_or_default();
                        view_data.insert(key.to_string(), Value::from(value));
                    }
                }
            }
            view_data.insert("SearchFields".to_string(), Self::search_fields());
        }
        Ok(result)
    }
}
