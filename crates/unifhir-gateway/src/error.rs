//! Error types for the resource store gateway contract.

use std::fmt;

/// Errors that can occur at the store gateway boundary.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The store rejected a create because an equivalent resource already exists.
    #[error("Create conflict for {resource_type}: {message}")]
    Conflict {
        /// The type of resource whose creation was rejected.
        resource_type: String,
        /// Store-provided description of the conflict.
        message: String,
    },

    /// A continuation token was unknown, already consumed, or expired.
    #[error("Continuation token not found or expired: {token}")]
    InvalidContinuation {
        /// The rejected token.
        token: String,
    },

    /// The submitted resource or query was malformed.
    #[error("Invalid resource or query: {message}")]
    InvalidResource {
        /// Description of the problem.
        message: String,
    },

    /// The store could not be reached.
    #[error("Store unavailable: {message}")]
    Unavailable {
        /// Description of the transport failure.
        message: String,
    },

    /// A store call exceeded its deadline.
    #[error("Store timeout: {message}")]
    Timeout {
        /// Description of the timed-out call.
        message: String,
    },

    /// An internal store error occurred.
    #[error("Internal store error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl GatewayError {
    /// Creates a new `Conflict` error.
    #[must_use]
    pub fn conflict(resource_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Conflict {
            resource_type: resource_type.into(),
            message: message.into(),
        }
    }

    /// Creates a new `InvalidContinuation` error.
    #[must_use]
    pub fn invalid_continuation(token: impl Into<String>) -> Self {
        Self::InvalidContinuation {
            token: token.into(),
        }
    }

    /// Creates a new `InvalidResource` error.
    #[must_use]
    pub fn invalid_resource(message: impl Into<String>) -> Self {
        Self::InvalidResource {
            message: message.into(),
        }
    }

    /// Creates a new `Unavailable` error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a new `Timeout` error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a create conflict.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Returns `true` if this is a continuation token error.
    #[must_use]
    pub fn is_invalid_continuation(&self) -> bool {
        matches!(self, Self::InvalidContinuation { .. })
    }

    /// Returns `true` if the call may succeed when replayed (transient failures).
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable { .. } | Self::Timeout { .. })
    }

    /// Returns the error category for logging/monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Conflict { .. } => ErrorCategory::Conflict,
            Self::InvalidContinuation { .. } => ErrorCategory::NotFound,
            Self::InvalidResource { .. } => ErrorCategory::Validation,
            Self::Unavailable { .. } | Self::Timeout { .. } => ErrorCategory::Infrastructure,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Categories of gateway errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Conflict on create.
    Conflict,
    /// Missing token or resource.
    NotFound,
    /// Validation error.
    Validation,
    /// Transport or availability error.
    Infrastructure,
    /// Internal store error.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conflict => write!(f, "conflict"),
            Self::NotFound => write!(f, "not_found"),
            Self::Validation => write!(f, "validation"),
            Self::Infrastructure => write!(f, "infrastructure"),
            Self::Internal => write!(f, "internal"),
        }
    }
}
