//! Conversion of pipeline results into HTTP responses.

use axum::{
    body::Body,
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE, LOCATION},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::pipeline::ActionResult;

/// JSON body of a rendered view.
#[derive(Debug, Serialize)]
pub struct ViewBody {
    pub view: &'static str,
    pub model: Value,
    pub view_data: Map<String, Value>,
}

/// Build the response for `result`, then add the headers filters set on
/// the context.
pub fn into_response(result: ActionResult, headers: HeaderMap) -> Response {
    let mut response = match result {
        ActionResult::View {
            name,
            model,
            view_data,
            status,
        } => (
            status,
            Json(ViewBody {
                view: name,
                model,
                view_data,
            }),
        )
            .into_response(),
        ActionResult::Redirect { location } => {
            let mut response = StatusCode::SEE_OTHER.into_response();
            if let Ok(value) = HeaderValue::from_str(&location) {
                response.headers_mut().insert(LOCATION, value);
            }
            response
        }
        ActionResult::File {
            content_type,
            file_name,
            bytes,
        } => {
            let mut response = Response::new(Body::from(bytes));
            let headers = response.headers_mut();
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
            if let Ok(value) =
                HeaderValue::from_str(&format!("attachment; filename=\"{}\"", file_name))
            {
                headers.insert(CONTENT_DISPOSITION, value);
            }
            response
        }
        ActionResult::Content { status, body } => (status, body).into_response(),
        ActionResult::Status(status) => status.into_response(),
    };

    for (name, value) in headers.iter() {
        response.headers_mut().append(name.clone(), value.clone());
    }
    response
}
