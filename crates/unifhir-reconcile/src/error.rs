use thiserror::Error;
use unifhir_core::{CoreError, Identifier, ResourceType};
use unifhir_gateway::GatewayError;

/// Errors surfaced by the reconciliation engine.
///
/// Gateway failures pass through unchanged so callers can distinguish a
/// conflict from a transport problem; nothing is logged-and-swallowed here.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The identifier arguments were invalid; no store call was made.
    #[error(transparent)]
    InvalidArgument(#[from] CoreError),

    /// More than one resource matched the identifier across the full
    /// paginated result set. A data-integrity fault in the store, never
    /// auto-resolved by picking one.
    #[error("Ambiguous identity: multiple {resource_type} resources match identifier {identifier}")]
    AmbiguousIdentity {
        resource_type: ResourceType,
        identifier: Identifier,
    },

    /// A store call failed; propagated unchanged.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// A stored resource could not be decoded into the requested kind.
    #[error("Failed to decode stored resource: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ReconcileError {
    pub(crate) fn ambiguous(resource_type: &ResourceType, identifier: &Identifier) -> Self {
        Self::AmbiguousIdentity {
            resource_type: resource_type.clone(),
            identifier: identifier.clone(),
        }
    }

    /// Returns `true` if more than one resource matched the identifier.
    #[must_use]
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Self::AmbiguousIdentity { .. })
    }

    /// Returns `true` if the store rejected a create as a duplicate.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Gateway(err) if err.is_conflict())
    }
}
