//! Enumerations shared by forms, query strings, and the service layer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Gender choices offered on the person forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GenderOptions {
    Male,
    Female,
    Other,
}

impl GenderOptions {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenderOptions::Male => "Male",
            GenderOptions::Female => "Female",
            GenderOptions::Other => "Other",
        }
    }
}

impl fmt::Display for GenderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenderOptions {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(GenderOptions::Male),
            "female" => Ok(GenderOptions::Female),
            "other" => Ok(GenderOptions::Other),
            _ => Err(format!("Unknown gender option: {}", s)),
        }
    }
}

/// Sort direction for the persons list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    #[serde(rename = "ASC")]
    Asc,
    #[serde(rename = "DESC")]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASC" => Ok(SortOrder::Asc),
            "DESC" => Ok(SortOrder::Desc),
            _ => Err(format!("Unknown sort order: {}", s)),
        }
    }
}

/// Closed set of person fields a list can be searched or sorted by.
///
/// Selectors arrive as the field's display key (`"PersonName"`,
/// `"DateOfBirth"`, ...). Anything outside this set resolves to `None`, and
/// callers fall back to their no-op branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PersonField {
    PersonName,
    Email,
    DateOfBirth,
    Age,
    Gender,
    Country,
    Address,
    ReceiveNewsLetters,
}

impl PersonField {
    pub const ALL: [PersonField; 8] = [
        PersonField::PersonName,
        PersonField::Email,
        PersonField::DateOfBirth,
        PersonField::Age,
        PersonField::Gender,
        PersonField::Country,
        PersonField::Address,
        PersonField::ReceiveNewsLetters,
    ];

    /// Resolve a selector name. Matching is exact (ordinal); `CountryId` is
    /// accepted as the search key for the country name.
    pub fn from_selector(selector: &str) -> Option<Self> {
        match selector {
            "PersonName" => Some(PersonField::PersonName),
            "Email" => Some(PersonField::Email),
            "DateOfBirth" => Some(PersonField::DateOfBirth),
            "Age" => Some(PersonField::Age),
            "Gender" => Some(PersonField::Gender),
            "Country" | "CountryId" => Some(PersonField::Country),
            "Address" => Some(PersonField::Address),
            "ReceiveNewsLetters" => Some(PersonField::ReceiveNewsLetters),
            _ => None,
        }
    }

    /// Key used in query strings and CSV headers.
    pub fn key(&self) -> &'static str {
        match self {
            PersonField::PersonName => "PersonName",
            PersonField::Email => "Email",
            PersonField::DateOfBirth => "DateOfBirth",
            PersonField::Age => "Age",
            PersonField::Gender => "Gender",
            PersonField::Country => "Country",
            PersonField::Address => "Address",
            PersonField::ReceiveNewsLetters => "ReceiveNewsLetters",
        }
    }

    /// Human readable column title.
    pub fn title(&self) -> &'static str {
        match self {
            PersonField::PersonName => "Person Name",
            PersonField::Email => "Email",
            PersonField::DateOfBirth => "Date Of Birth",
            PersonField::Age => "Age",
            PersonField::Gender => "Gender",
            PersonField::Country => "Country",
            PersonField::Address => "Address",
            PersonField::ReceiveNewsLetters => "Receive News Letters",
        }
    }

    /// Whether the field can be used as a text search selector.
    ///
    /// Age is derived and the newsletter flag is boolean, so both are
    /// sort-only.
    pub fn is_searchable(&self) -> bool {
        !matches!(self, PersonField::Age | PersonField::ReceiveNewsLetters)
    }
}

impl fmt::Display for PersonField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
