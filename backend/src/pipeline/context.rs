//! Request-scoped state shared by filters and handlers.

use std::collections::{BTreeMap, HashMap};

use http::header::{HeaderMap, HeaderName, HeaderValue, COOKIE};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::ActionError;

/// Key under which the persons-list filter stores the argument bag in
/// [`ActionContext::items`].
pub const ARGUMENTS_ITEM_KEY: &str = "arguments";

/// Named action arguments, bound from the route, query string, and form body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgumentBag(BTreeMap<String, Value>);

impl ArgumentBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Textual form of an argument. Strings are returned as is, `null` as
    /// `None`, anything else through its JSON rendering.
    pub fn get_str(&self, name: &str) -> Option<String> {
        match self.0.get(name)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Decode an argument into a typed value, `null` when absent.
    pub fn decode<T: DeserializeOwned>(&self, name: &str) -> Result<T, ActionError> {
        let value = self.0.get(name).cloned().unwrap_or(Value::Null);
        serde_json::from_value(value)
            .map_err(|e| ActionError::Binding(format!("Invalid argument '{}': {}", name, e)))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// The whole bag as a JSON object.
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone().into_iter().collect())
    }

    /// Rebuild a bag from the JSON object produced by [`ArgumentBag::to_value`].
    pub fn from_value(value: &Value) -> Option<Self> {
        value.as_object().map(|map| {
            Self(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
            )
        })
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ArgumentBag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Everything one pass through a pipeline can read or change.
///
/// Created per request and passed by `&mut` down the filter chain into the
/// handler; nothing in it outlives the request.
#[derive(Debug, Clone)]
pub struct ActionContext {
    /// `"Controller.Action"` name of the routed action.
    pub action: &'static str,
    pub arguments: ArgumentBag,
    /// Free-form per-request storage for filters.
    pub items: HashMap<String, Value>,
    pub request_headers: HeaderMap,
    pub response_headers: HeaderMap,
}

impl ActionContext {
    pub fn new(action: &'static str, arguments: ArgumentBag) -> Self {
        Self {
            action,
            arguments,
            items: HashMap::new(),
            request_headers: HeaderMap::new(),
            response_headers: HeaderMap::new(),
        }
    }

    pub fn with_request_headers(mut self, headers: HeaderMap) -> Self {
        self.request_headers = headers;
        self
    }

    /// Value of a request cookie.
    pub fn cookie(&self, name: &str) -> Option<String> {
        self.request_headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|header| header.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.to_string())
    }

    /// Set a response header, replacing any earlier value for the same name.
    /// Names or values that are not valid header text are ignored.
    pub fn set_response_header(&mut self, name: &str, value: &str) {
        if let (Ok(name), Ok(value)) = (
            HeaderName::try_from(name),
            HeaderValue::from_str(value),
        ) {
            self.response_headers.insert(name, value);
        }
    }

    /// Append a response header, keeping earlier values (`Set-Cookie`).
    pub fn append_response_header(&mut self, name: HeaderName, value: &str) {
        if let Ok(value) = HeaderValue::from_str(value) {
            self.response_headers.append(name, value);
        }
    }
}
