//! # unifhir-gateway
//!
//! Resource store gateway contract for UniFHIR.
//!
//! This crate defines the narrow contract through which the reconciliation
//! engine talks to a remote FHIR store: a paginated search, a continuation
//! fetch, and a create. It contains no implementations - those live in
//! separate crates (see `unifhir-gateway-memory` for the in-memory backend).
//!
//! ## Example
//!
//! ```ignore
//! use unifhir_gateway::{FhirGateway, GatewayError, ResultPage};
//! use unifhir_core::ResourceType;
//!
//! async fn first_page(
//!     gateway: &dyn FhirGateway,
//!     token: &str,
//! ) -> Result<ResultPage, GatewayError> {
//!     gateway
//!         .search(&ResourceType::Device, &format!("identifier={token}"))
//!         .await
//! }
//! ```

mod error;
mod traits;
mod types;

pub use error::{ErrorCategory, GatewayError};
pub use traits::FhirGateway;
pub use types::{ContinuationToken, ResultPage};

/// Type alias for a gateway result.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Type alias for a shared gateway trait object.
pub type DynGateway = std::sync::Arc<dyn FhirGateway>;
