use serde_json::Value;
use unifhir_gateway::GatewayError;

/// How an identifier query constrains the `system` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SystemMatch {
    /// Any system (bare `value` token).
    Any,
    /// Only identifiers without a system (`|value` token).
    Absent,
    /// An exact system (`system|value` token).
    Exact(String),
}

/// Parsed form of the `identifier={token}` query language.
///
/// Token semantics follow FHIR token search: `system|value` matches on both
/// fields, `|value` matches identifiers carrying no system at all, and a bare
/// `value` matches the value in any system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierQuery {
    pub system: SystemMatch,
    pub value: String,
}

impl IdentifierQuery {
    /// Parses a raw query string.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::InvalidResource` for anything other than a
    /// single `identifier={token}` pair with a non-empty value.
    pub fn parse(query: &str) -> Result<Self, GatewayError> {
        let token = query
            .strip_prefix("identifier=")
            .ok_or_else(|| {
                GatewayError::invalid_resource(format!("unsupported query: {query}"))
            })?;

        let (system, value) = match token.split_once('|') {
            Some(("", value)) => (SystemMatch::Absent, value),
            Some((system, value)) => (SystemMatch::Exact(system.to_string()), value),
            None => (SystemMatch::Any, token),
        };

        if value.is_empty() {
            return Err(GatewayError::invalid_resource(format!(
                "identifier token has no value: {query}"
            )));
        }

        Ok(Self {
            system,
            value: value.to_string(),
        })
    }

    /// Checks whether a stored resource carries a matching identifier.
    ///
    /// The `identifier` field may be a single object or an array of objects;
    /// anything else never matches.
    pub fn matches(&self, resource: &Value) -> bool {
        match resource.get("identifier") {
            Some(entry @ Value::Object(_)) => self.matches_entry(entry),
            Some(Value::Array(entries)) => entries.iter().any(|entry| self.matches_entry(entry)),
            _ => false,
        }
    }

    fn matches_entry(&self, entry: &Value) -> bool {
        let value = entry.get("value").and_then(Value::as_str);
        if value != Some(self.value.as_str()) {
            return false;
        }
        let system = entry.get("system").and_then(Value::as_str);
        match &self.system {
            SystemMatch::Any => true,
            SystemMatch::Absent => system.is_none(),
            SystemMatch::Exact(expected) => system == Some(expected.as_str()),
        }
    }
}
