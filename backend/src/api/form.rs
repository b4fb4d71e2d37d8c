//! Serde helpers for browser form payloads.
//!
//! HTML forms submit every field as text, including empty inputs for
//! optional values. These helpers fold blanks into `None` so the same DTOs
//! decode from urlencoded bodies and from JSON.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::Deserialize;

/// Deserialize an optional scalar, treating an empty or whitespace-only
/// string as absent.
pub fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref() {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Ok(None),
        Some(value) => value.parse::<T>().map(Some).map_err(de::Error::custom),
    }
}

/// Deserialize a checkbox-style boolean (`true`, `on`, `1`; anything else is false).
pub fn checkbox<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Bool(value)) => value,
        Some(Raw::Text(text)) => matches!(
            text.trim().to_ascii_lowercase().as_str(),
            "true" | "on" | "1"
        ),
        None => false,
    })
}
