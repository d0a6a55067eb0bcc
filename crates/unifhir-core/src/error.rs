use thiserror::Error;

/// Core error types for UniFHIR domain operations
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Invalid FHIR resource type: {0}")]
    InvalidResourceType(String),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl CoreError {
    /// Create a new InvalidIdentifier error
    pub fn invalid_identifier(message: impl Into<String>) -> Self {
        Self::InvalidIdentifier(message.into())
    }

    /// Create a new InvalidResourceType error
    pub fn invalid_resource_type(resource_type: impl Into<String>) -> Self {
        Self::InvalidResourceType(resource_type.into())
    }

    /// Check if this error is a validation error (caller mistake, no I/O performed)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidIdentifier(_) | Self::InvalidResourceType(_)
        )
    }
}

/// Convenience result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
