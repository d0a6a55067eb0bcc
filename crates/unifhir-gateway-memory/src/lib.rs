//! # unifhir-gateway-memory
//!
//! In-memory implementation of the UniFHIR gateway contract.
//!
//! This backend exists for tests and embedded use. It speaks the
//! `identifier={token}` query language with FHIR token semantics, pages
//! deterministically with server-side continuation sessions, and enforces
//! identifier uniqueness on create so the cross-process create race of the
//! reconciliation engine can be exercised without a real store.

mod gateway;
mod query;

pub use gateway::{GatewayOptions, InMemoryGateway};
pub use query::{IdentifierQuery, SystemMatch};
