//! Opaque entity identities.

use uuid::Uuid;

use crate::define_id_type;

define_id_type!(Uuid, PersonId);
define_id_type!(Uuid, CountryId);

impl PersonId {
    /// Fresh random identity for a newly created person.
    pub fn generate() -> Self {
        PersonId(Uuid::new_v4())
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl CountryId {
    /// Fresh random identity for a newly created country.
    pub fn generate() -> Self {
        CountryId(Uuid::new_v4())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique_and_not_nil() {
        let a = PersonId::generate();
        let b = PersonId::generate();
        assert_ne!(a, b);
        assert!(!a.is_nil());
    }

    #[test]
    fn parses_from_hyphenated_text() {
        let raw = "5b7b9a36-4f39-4e1e-9f52-34b1c7f1d0e1";
        let id: CountryId = raw.parse().unwrap();
        assert_eq!(id.to_string(), raw);
    }

    #[test]
    fn serializes_as_plain_uuid_string() {
        let id = PersonId::new(Uuid::nil());
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"00000000-0000-0000-0000-000000000000\"");
    }
}
