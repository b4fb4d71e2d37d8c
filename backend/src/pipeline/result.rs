//! What an action (or a short-circuiting filter) produces.

use http::StatusCode;
use serde::Serialize;
use serde_json::{Map, Value};

/// Terminal outcome of a pipeline pass, before it becomes an HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionResult {
    /// A view model rendered as JSON.
    View {
        name: &'static str,
        model: Value,
        view_data: Map<String, Value>,
        status: StatusCode,
    },
    /// `303 See Other` to `location`.
    Redirect { location: String },
    /// A downloadable document.
    File {
        content_type: &'static str,
        file_name: String,
        bytes: Vec<u8>,
    },
    /// Plain text body with an explicit status.
    Content { status: StatusCode, body: String },
    /// Empty body with a status.
    Status(StatusCode),
}

impl ActionResult {
    /// A `200 OK` view of `model`.
    pub fn view<T: Serialize>(name: &'static str, model: &T) -> Self {
        ActionResult::View {
            name,
            model: serde_json::to_value(model).unwrap_or(Value::Null),
            view_data: Map::new(),
            status: StatusCode::OK,
        }
    }

    pub fn redirect(location: impl Into<String>) -> Self {
        ActionResult::Redirect {
            location: location.into(),
        }
    }

    pub fn with_status(mut self, new_status: StatusCode) -> Self {
        if let ActionResult::View { status, .. } = &mut self {
            *status = new_status;
        }
        self
    }

    pub fn with_view_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        if let Some(view_data) = self.view_data_mut() {
            view_data.insert(key.into(), value.into());
        }
        self
    }

    /// View data of a view result, `None` for every other kind.
    pub fn view_data_mut(&mut self) -> Option<&mut Map<String, Value>> {
        match self {
            ActionResult::View { view_data, .. } => Some(view_data),
            _ => None,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ActionResult::View { status, .. } => *status,
            ActionResult::Redirect { .. } => StatusCode::SEE_OTHER,
            ActionResult::File { .. } => StatusCode::OK,
            ActionResult::Content { status, .. } => *status,
            ActionResult::Status(status) => *status,
        }
    }
}
