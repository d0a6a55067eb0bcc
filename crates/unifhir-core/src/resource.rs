use crate::error::CoreError;
use crate::identifier::Identifier;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Common FHIR resource types, with an escape hatch for everything else
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    Patient,
    Practitioner,
    Organization,
    Device,
    Encounter,
    Observation,
    #[serde(untagged)]
    Custom(String),
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceType::Patient => write!(f, "Patient"),
            ResourceType::Practitioner => write!(f, "Practitioner"),
            ResourceType::Organization => write!(f, "Organization"),
            ResourceType::Device => write!(f, "Device"),
            ResourceType::Encounter => write!(f, "Encounter"),
            ResourceType::Observation => write!(f, "Observation"),
            ResourceType::Custom(name) => write!(f, "{}", name),
        }
    }
}

impl FromStr for ResourceType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Patient" => Ok(ResourceType::Patient),
            "Practitioner" => Ok(ResourceType::Practitioner),
            "Organization" => Ok(ResourceType::Organization),
            "Device" => Ok(ResourceType::Device),
            "Encounter" => Ok(ResourceType::Encounter),
            "Observation" => Ok(ResourceType::Observation),
            other if !other.trim().is_empty() => Ok(ResourceType::Custom(other.to_string())),
            other => Err(CoreError::invalid_resource_type(other)),
        }
    }
}

/// Capability interface for resource kinds the reconciliation engine can manage.
///
/// A resource kind must be default-constructible (the shape of a not-yet-stored
/// resource), carry zero or more identifiers, and round-trip through JSON so it
/// can cross the gateway boundary. Server-assigned fields (id, version) should
/// be optional on the type; the store owns them after creation.
pub trait IdentityResource:
    Default + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// The FHIR resource type this kind is stored under.
    fn resource_type() -> ResourceType;

    /// The identifiers carried by this resource.
    fn identifiers(&self) -> &[Identifier];

    /// Attaches an identifier to this resource.
    fn add_identifier(&mut self, identifier: Identifier);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_type_display() {
        assert_eq!(ResourceType::Patient.to_string(), "Patient");
        assert_eq!(ResourceType::Device.to_string(), "Device");
        assert_eq!(
            ResourceType::Custom("Widget".to_string()).to_string(),
            "Widget"
        );
    }

    #[test]
    fn test_resource_type_from_str() {
        assert_eq!(
            "Patient".parse::<ResourceType>().unwrap(),
            ResourceType::Patient
        );
        assert_eq!(
            "Widget".parse::<ResourceType>().unwrap(),
            ResourceType::Custom("Widget".to_string())
        );
        assert!("".parse::<ResourceType>().is_err());
        assert!("   ".parse::<ResourceType>().is_err());
    }

    #[test]
    fn test_resource_type_serde() {
        let json = serde_json::to_string(&ResourceType::Device).unwrap();
        assert_eq!(json, "\"Device\"");

        let custom: ResourceType = serde_json::from_str("\"Widget\"").unwrap();
        assert_eq!(custom, ResourceType::Custom("Widget".to_string()));
    }

    #[test]
    fn test_identity_resource_impl() {
        #[derive(Debug, Default, Serialize, Deserialize)]
        struct Device {
            #[serde(skip_serializing_if = "Option::is_none")]
            id: Option<String>,
            #[serde(default, skip_serializing_if = "Vec::is_empty")]
            identifier: Vec<Identifier>,
        }

        impl IdentityResource for Device {
            fn resource_type() -> ResourceType {
                ResourceType::Device
            }

            fn identifiers(&self) -> &[Identifier] {
                &self.identifier
            }

            fn add_identifier(&mut self, identifier: Identifier) {
                self.identifier.push(identifier);
            }
        }

        let mut device = Device::default();
        assert!(device.identifiers().is_empty());

        device.add_identifier(Identifier::new("123", Some("http://a.example")).unwrap());
        assert_eq!(device.identifiers().len(), 1);
        assert_eq!(device.identifiers()[0].value(), "123");
    }
}
