#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use unifhir_core::{Identifier, IdentityResource, ResourceType};

/// Minimal device resource kind used across the integration tests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Device {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifier: Vec<Identifier>,
    #[serde(rename = "displayName", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
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

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("debug")
        .try_init();
}
