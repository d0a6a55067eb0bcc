//! Paginated zero-or-one resolver.
//!
//! Walks a search result page by page and decides whether the match set has
//! zero, one, or more than one element, holding at most the single first-seen
//! match in memory. The walk never trusts an empty early page: absence is only
//! reported once the continuation chain is exhausted, because a store's
//! pagination ordering is not guaranteed to front-load matches.

use serde_json::Value;
use tracing::debug;
use unifhir_core::{Identifier, IdentityResource};
use unifhir_gateway::{FhirGateway, ResultPage};

use crate::error::ReconcileError;

/// Resolves the full paginated result set reachable from `page` to zero or
/// one resource of kind `R`.
///
/// Entries whose `resourceType` differs from `R`'s are ignored; a store may
/// interleave other kinds in a result bundle. The walk aborts with
/// `AmbiguousIdentity` the moment a second match is seen and fetches no
/// further pages past that point; any outstanding continuation token is
/// abandoned unconsumed.
pub(crate) async fn resolve_single<R, G>(
    gateway: &G,
    identifier: &Identifier,
    mut page: ResultPage,
) -> Result<Option<R>, ReconcileError>
where
    R: IdentityResource,
    G: FhirGateway + ?Sized,
{
    let resource_type = R::resource_type();
    let type_name = resource_type.to_string();
    let mut found: Option<Value> = None;

    loop {
        let ResultPage {
            entries,
            continuation,
        } = page;

        for entry in entries {
            if entry.get("resourceType").and_then(Value::as_str) != Some(type_name.as_str()) {
                continue;
            }
            if found.is_some() {
                debug!(
                    resource_type = %resource_type,
                    identifier = %identifier,
                    "Second match found, aborting pagination walk"
                );
                return Err(ReconcileError::ambiguous(&resource_type, identifier));
            }
            found = Some(entry);
        }

        match continuation {
            Some(token) => page = gateway.fetch_next(&token).await?,
            None => break,
        }
    }

    found
        .map(serde_json::from_value)
        .transpose()
        .map_err(ReconcileError::from)
}
