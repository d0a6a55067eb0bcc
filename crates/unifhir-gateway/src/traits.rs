//! The gateway trait every resource store backend must implement.

use async_trait::async_trait;
use serde_json::Value;
use unifhir_core::ResourceType;

use crate::error::GatewayError;
use crate::types::{ContinuationToken, ResultPage};

/// Narrow contract to a remote, paginated FHIR resource store.
///
/// The reconciliation engine depends on exactly three operations: a scoped
/// search returning the first page, a continuation fetch, and a create.
/// Implementations must be thread-safe (`Send + Sync`) and are responsible
/// for their own transport concerns - timeouts and retries happen below this
/// trait, never above it.
///
/// The `query` argument is an opaque, store-specific filter string. The
/// engine only ever builds it from an identifier namespace and passes it
/// through unparsed.
#[async_trait]
pub trait FhirGateway: Send + Sync {
    /// Executes a search scoped to `resource_type` and returns the first page.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::InvalidResource` if the store rejects the query.
    /// Infrastructure failures surface as `Unavailable` or `Timeout`.
    async fn search(
        &self,
        resource_type: &ResourceType,
        query: &str,
    ) -> Result<ResultPage, GatewayError>;

    /// Fetches the page following a previously returned continuation token.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::InvalidContinuation` if the token is unknown,
    /// already consumed, or expired. This is a hard error, never an
    /// end-of-results signal.
    async fn fetch_next(&self, token: &ContinuationToken) -> Result<ResultPage, GatewayError>;

    /// Submits a new resource and returns the stored copy.
    ///
    /// The returned value reflects server-assigned fields (id, version,
    /// last-updated). The resource must carry a `resourceType` field.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Conflict` if the store independently rejects a
    /// duplicate creation, e.g. a uniqueness constraint raced by a concurrent
    /// caller. Returns `GatewayError::InvalidResource` for malformed input.
    async fn create(&self, resource: &Value) -> Result<Value, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time test that FhirGateway is object-safe
    fn _assert_gateway_object_safe(_: &dyn FhirGateway) {}
}
