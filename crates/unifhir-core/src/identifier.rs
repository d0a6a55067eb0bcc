use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A `(value, system)` pair naming a resource within a logical namespace.
///
/// The `value` is required and must not be blank. The `system` is optional;
/// a blank or whitespace-only system is normalized to `None` at construction
/// time so that "no system" and "empty-string system" can never form two
/// accidentally distinct namespaces.
///
/// Immutable once constructed: two identifiers are equal iff both fields match,
/// and an absent system is its own valid namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier {
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    value: String,
}

impl Identifier {
    /// Builds an identifier, validating the value and normalizing the system.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidIdentifier` if `value` is blank.
    pub fn new(value: impl Into<String>, system: Option<&str>) -> Result<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(CoreError::invalid_identifier(
                "identifier value must not be blank",
            ));
        }
        let system = system
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned);
        Ok(Self { system, value })
    }

    /// The identifier value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The identifier system, if any.
    #[must_use]
    pub fn system(&self) -> Option<&str> {
        self.system.as_deref()
    }

    /// Renders this identifier as a FHIR token search fragment.
    ///
    /// Produces `system|value` when a system is present and `|value` when it
    /// is absent. The leading pipe matches only identifiers without a system,
    /// which keeps the absent-system namespace distinct from every real one.
    #[must_use]
    pub fn search_token(&self) -> String {
        match &self.system {
            Some(system) => format!("{system}|{}", self.value),
            None => format!("|{}", self.value),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.system {
            Some(system) => write!(f, "{system}|{}", self.value),
            None => write!(f, "{}", self.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identifier_new() {
        let id = Identifier::new("12345", Some("http://example.org/devices")).unwrap();
        assert_eq!(id.value(), "12345");
        assert_eq!(id.system(), Some("http://example.org/devices"));
    }

    #[test]
    fn test_identifier_blank_value_rejected() {
        assert!(Identifier::new("", None).is_err());
        assert!(Identifier::new("   ", None).is_err());
        assert!(Identifier::new("\t\n", Some("http://example.org")).is_err());
    }

    #[test]
    fn test_identifier_blank_system_normalized_to_none() {
        let none = Identifier::new("abc", None).unwrap();
        let empty = Identifier::new("abc", Some("")).unwrap();
        let whitespace = Identifier::new("abc", Some("   ")).unwrap();

        assert_eq!(none.system(), None);
        assert_eq!(empty.system(), None);
        assert_eq!(whitespace.system(), None);

        // All three resolve to the same identity namespace
        assert_eq!(none, empty);
        assert_eq!(none, whitespace);
        assert_eq!(none.search_token(), whitespace.search_token());
    }

    #[test]
    fn test_identifier_equality() {
        let a = Identifier::new("123", Some("http://a.example")).unwrap();
        let b = Identifier::new("123", Some("http://a.example")).unwrap();
        let c = Identifier::new("123", Some("http://b.example")).unwrap();
        let d = Identifier::new("123", None).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
        assert_ne!(c, d);
    }

    #[test]
    fn test_search_token() {
        let with_system = Identifier::new("123", Some("http://a.example")).unwrap();
        assert_eq!(with_system.search_token(), "http://a.example|123");

        let without_system = Identifier::new("123", None).unwrap();
        assert_eq!(without_system.search_token(), "|123");
    }

    #[test]
    fn test_identifier_display() {
        let with_system = Identifier::new("123", Some("http://a.example")).unwrap();
        assert_eq!(with_system.to_string(), "http://a.example|123");

        let without_system = Identifier::new("123", None).unwrap();
        assert_eq!(without_system.to_string(), "123");
    }

    #[test]
    fn test_identifier_serialization() {
        let id = Identifier::new("123", Some("http://a.example")).unwrap();
        let json = serde_json::to_value(&id).unwrap();
        assert_eq!(
            json,
            json!({"system": "http://a.example", "value": "123"})
        );

        let id = Identifier::new("123", None).unwrap();
        let json = serde_json::to_value(&id).unwrap();
        assert_eq!(json, json!({"value": "123"}));
    }

    #[test]
    fn test_identifier_deserialization() {
        let id: Identifier =
            serde_json::from_value(json!({"system": "http://a.example", "value": "123"})).unwrap();
        assert_eq!(id.system(), Some("http://a.example"));
        assert_eq!(id.value(), "123");

        let id: Identifier = serde_json::from_value(json!({"value": "123"})).unwrap();
        assert_eq!(id.system(), None);
    }
}
