//! # unifhir-reconcile
//!
//! Identity-keyed find-or-create reconciliation over a remote FHIR store.
//!
//! Given a `(value, system)` identifier, [`ReconciliationService`] guarantees
//! that exactly one matching resource exists in the store, creating it only if
//! the full paginated search result is empty. The service is stateless between
//! calls and suspends only at gateway call boundaries, so every operation is
//! cooperatively cancellable and safe to share across tasks.
//!
//! Two concurrent callers can still race on the create; the store's uniqueness
//! constraint decides the winner, and the loser's `Conflict` is reconciled by
//! re-resolving the identifier (see [`ReconciliationService::ensure_by_identity`]).
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use unifhir_reconcile::ReconciliationService;
//!
//! let service = ReconciliationService::new(Arc::new(gateway));
//! let device: Device = service
//!     .ensure_by_identity("12345", Some("http://example.org/devices"))
//!     .await?;
//! ```

mod error;
mod resolver;
mod service;

pub use error::ReconcileError;
pub use service::ReconciliationService;

/// Convenience result type for reconciliation operations.
pub type ReconcileResult<T> = Result<T, ReconcileError>;
