//! Declarative field validation.
//!
//! A record exposes its fields by name through [`Validatable`]; a rule list
//! pairs each field with a [`Rule`] and the message reported when it fails.
//! [`validate`] evaluates the list and aggregates every failure.

use std::fmt;

use serde::Serialize;

use crate::api::{PersonAddRequest, PersonUpdateRequest};
use crate::models::person::{ADDRESS_MAX_LEN, EMAIL_MAX_LEN, PERSON_NAME_MAX_LEN};

/// A single constraint on a field's textual value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Present and not blank.
    Required,
    /// When present, shaped like `local@domain.tld`.
    Email,
    /// When present, at most this many characters.
    MaxLength(usize),
}

/// One `(field, rule, message)` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    pub field: &'static str,
    pub rule: Rule,
    pub message: String,
}

impl FieldRule {
    pub fn new(field: &'static str, rule: Rule, message: impl Into<String>) -> Self {
        Self {
            field,
            rule,
            message: message.into(),
        }
    }
}

/// A failed rule, reported against its field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// All failures found in one record, in rule order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn messages(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.message.as_str()).collect()
    }

    /// Messages reported against `field`.
    pub fn for_field(&self, field: &str) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message.as_str())
            .collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.messages().join("\n"))
    }
}

impl std::error::Error for ValidationErrors {}

/// Field access by name for rule evaluation.
pub trait Validatable {
    /// Textual value of `field`, or `None` when absent.
    fn field_value(&self, field: &str) -> Option<String>;
}

fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !local.is_empty()
        && !host.is_empty()
        && !tld.is_empty()
        && !domain.contains('@')
        && !value.chars().any(char::is_whitespace)
}

fn passes(rule: Rule, value: Option<&str>) -> bool {
    match (rule, value) {
        (Rule::Required, value) => value.map(|v| !v.trim().is_empty()).unwrap_or(false),
        (Rule::Email, Some(v)) if !v.trim().is_empty() => is_email(v.trim()),
        (Rule::MaxLength(max), Some(v)) => v.chars().count() <= max,
        (_, _) => true,
    }
}

/// Evaluate every rule against `record`.
///
/// # Returns
/// * `Ok(())` when all rules pass
/// * `Err(ValidationErrors)` listing each failed rule's message in rule order
pub fn validate<T: Validatable + ?Sized>(
    rules: &[FieldRule],
    record: &T,
) -> Result<(), ValidationErrors> {
    let errors: Vec<FieldError> = rules
        .iter()
        .filter(|r| !passes(r.rule, record.field_value(r.field).as_deref()))
        .map(|r| FieldError {
            field: r.field.to_string(),
            message: r.message.clone(),
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors { errors })
    }
}

fn person_field_rules() -> Vec<FieldRule> {
    vec![
        FieldRule::new("PersonName", Rule::Required, "Person name can't be blank"),
        FieldRule::new(
            "PersonName",
            Rule::MaxLength(PERSON_NAME_MAX_LEN),
            format!("Person name can't exceed {} characters", PERSON_NAME_MAX_LEN),
        ),
        FieldRule::new("Email", Rule::Required, "Email can't be blank"),
        FieldRule::new("Email", Rule::Email, "Email value should be a proper email"),
        FieldRule::new(
            "Email",
            Rule::MaxLength(EMAIL_MAX_LEN),
            format!("Email can't exceed {} characters", EMAIL_MAX_LEN),
        ),
        FieldRule::new("Gender", Rule::Required, "Please select a gender"),
        FieldRule::new(
            "Address",
            Rule::MaxLength(ADDRESS_MAX_LEN),
            format!("Address can't exceed {} characters", ADDRESS_MAX_LEN),
        ),
    ]
}

/// Rules for the create form.
pub fn person_add_rules() -> Vec<FieldRule> {
    person_field_rules()
}

/// Rules for the edit form: the create rules plus a required identity.
pub fn person_update_rules() -> Vec<FieldRule> {
    let mut rules = vec![FieldRule::new(
        "PersonId",
        Rule::Required,
        "Person Id can't be blank",
    )];
    rules.extend(person_field_rules());
    rules
}

impl Validatable for PersonAddRequest {
    fn field_value(&self, field: &str) -> Option<String> {
        match field {
            "PersonName" => self.person_name.clone(),
            "Email" => self.email.clone(),
            "Gender" => self.gender.map(|g| g.to_string()),
            "Address" => self.address.clone(),
            "DateOfBirth" => self.date_of_birth.map(|d| d.to_string()),
            "CountryId" => self.country_id.map(|c| c.to_string()),
            _ => None,
        }
    }
}

impl Validatable for PersonUpdateRequest {
    fn field_value(&self, field: &str) -> Option<String> {
        match field {
            "PersonId" => self.person_id.map(|p| p.to_string()),
            "PersonName" => self.person_name.clone(),
            "Email" => self.email.clone(),
            "Gender" => self.gender.map(|g| g.to_string()),
            "Address" => self.address.clone(),
            "DateOfBirth" => self.date_of_birth.map(|d| d.to_string()),
            "CountryId" => self.country_id.map(|c| c.to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::GenderOptions;

    fn valid_add() -> PersonAddRequest {
        PersonAddRequest {
            person_name: Some("Maria".to_string()),
            email: Some("m@x.com".to_string()),
            gender: Some(GenderOptions::Female),
            ..Default::default()
        }
    }

    #[test]
    fn valid_request_passes() {
        assert!(validate(&person_add_rules(), &valid_add()).is_ok());
    }

    #[test]
    fn missing_fields_are_all_reported() {
        let errors = validate(&person_add_rules(), &PersonAddRequest::default()).unwrap_err();
        assert_eq!(
            errors.messages(),
            vec![
                "Person name can't be blank",
                "Email can't be blank",
                "Please select a gender",
            ]
        );
    }

    #[test]
    fn malformed_email_is_rejected() {
        let request = PersonAddRequest {
            email: Some("not-an-email".to_string()),
            ..valid_add()
        };
        let errors = validate(&person_add_rules(), &request).unwrap_err();
        assert_eq!(
            errors.for_field("Email"),
            vec!["Email value should be a proper email"]
        );
    }

    #[test]
    fn overlong_name_is_rejected() {
        let request = PersonAddRequest {
            person_name: Some("x".repeat(PERSON_NAME_MAX_LEN + 1)),
            ..valid_add()
        };
        let errors = validate(&person_add_rules(), &request).unwrap_err();
        assert_eq!(errors.errors.len(), 1);
        assert_eq!(errors.errors[0].field, "PersonName");
    }

    #[test]
    fn update_requires_identity() {
        let request = PersonUpdateRequest {
            person_name: Some("Maria".to_string()),
            email: Some("m@x.com".to_string()),
            gender: Some(GenderOptions::Female),
            ..Default::default()
        };
        let errors = validate(&person_update_rules(), &request).unwrap_err();
        assert_eq!(errors.messages(), vec!["Person Id can't be blank"]);
    }

    #[test]
    fn email_shapes() {
        assert!(is_email("a@b.co"));
        assert!(!is_email("a@b"));
        assert!(!is_email("@b.co"));
        assert!(!is_email("a b@c.de"));
        assert!(!is_email("a@@b.co"));
    }
}
