use std::sync::Arc;

use serde_json::Value;
use tracing::debug;
use unifhir_core::{Identifier, IdentityResource};
use unifhir_gateway::FhirGateway;

use crate::error::ReconcileError;
use crate::resolver;

/// Find-or-create reconciliation over a resource store gateway.
///
/// The service holds no state beyond the shared gateway handle: all state
/// lives in the remote store, every operation suspends only at store call
/// boundaries, and no retries happen at this layer. The one cross-process
/// race - two callers ensuring the same identity - is settled by the store's
/// uniqueness constraint and reconciled here by re-resolving on `Conflict`.
pub struct ReconciliationService<G> {
    gateway: Arc<G>,
}

impl<G> Clone for ReconciliationService<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
        }
    }
}

impl<G: FhirGateway> ReconciliationService<G> {
    /// Creates a service over the given gateway.
    #[must_use]
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Returns the underlying gateway handle.
    #[must_use]
    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    /// Gets or creates the resource carrying the given identifier.
    ///
    /// The found path performs zero writes and returns the resource
    /// unchanged. The create path submits a new `R` tagged with the
    /// identifier; if the store reports a `Conflict` (a concurrent caller
    /// won the create race), the identifier is re-resolved and the
    /// now-existing resource is returned instead.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidArgument` before any store call if `value` is
    /// blank, with `AmbiguousIdentity` if more than one resource already
    /// matches, and propagates gateway failures unchanged.
    pub async fn ensure_by_identity<R>(
        &self,
        value: &str,
        system: Option<&str>,
    ) -> Result<R, ReconcileError>
    where
        R: IdentityResource,
    {
        self.ensure_inner(value, system, None::<fn(&mut R, &Identifier)>)
            .await
    }

    /// Like [`ensure_by_identity`](Self::ensure_by_identity), with an
    /// initializer applied to the new resource before submission.
    ///
    /// The initializer runs exactly once, only on the create path, after the
    /// identifier has been attached. It must not perform I/O.
    pub async fn ensure_by_identity_with<R, F>(
        &self,
        value: &str,
        system: Option<&str>,
        init: F,
    ) -> Result<R, ReconcileError>
    where
        R: IdentityResource,
        F: FnOnce(&mut R, &Identifier) + Send,
    {
        self.ensure_inner(value, system, Some(init)).await
    }

    /// Resolves the identifier to at most one existing resource, walking the
    /// entire paginated result set before deciding.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidArgument` if `value` is blank and with
    /// `AmbiguousIdentity` if the fully resolved result set holds more than
    /// one match.
    pub async fn get_by_identity<R>(
        &self,
        value: &str,
        system: Option<&str>,
    ) -> Result<Option<R>, ReconcileError>
    where
        R: IdentityResource,
    {
        let identifier = Identifier::new(value, system)?;
        self.resolve(&identifier).await
    }

    /// Unconditionally creates a new resource tagged with the identifier.
    ///
    /// No existence check is performed; that is
    /// [`ensure_by_identity`](Self::ensure_by_identity)'s job. Keeping the
    /// create path separate lets callers compose their own existence
    /// policies without duplicating it.
    pub async fn create_by_identity<R>(&self, identifier: &Identifier) -> Result<R, ReconcileError>
    where
        R: IdentityResource,
    {
        self.submit(identifier, None::<fn(&mut R, &Identifier)>)
            .await
    }

    /// Like [`create_by_identity`](Self::create_by_identity), with an
    /// initializer applied before submission.
    pub async fn create_by_identity_with<R, F>(
        &self,
        identifier: &Identifier,
        init: F,
    ) -> Result<R, ReconcileError>
    where
        R: IdentityResource,
        F: FnOnce(&mut R, &Identifier) + Send,
    {
        self.submit(identifier, Some(init)).await
    }

    async fn ensure_inner<R, F>(
        &self,
        value: &str,
        system: Option<&str>,
        init: Option<F>,
    ) -> Result<R, ReconcileError>
    where
        R: IdentityResource,
        F: FnOnce(&mut R, &Identifier) + Send,
    {
        let identifier = Identifier::new(value, system)?;

        if let Some(existing) = self.resolve::<R>(&identifier).await? {
            debug!(
                resource_type = %R::resource_type(),
                identifier = %identifier,
                "Resource found by identity"
            );
            return Ok(existing);
        }

        debug!(
            resource_type = %R::resource_type(),
            identifier = %identifier,
            "No resource found by identity, creating"
        );
        match self.submit(&identifier, init).await {
            Ok(created) => Ok(created),
            Err(ReconcileError::Gateway(err)) if err.is_conflict() => {
                // A concurrent caller created it between our search and our
                // create. The store is authoritative; re-resolve and return
                // the winner's resource.
                debug!(
                    resource_type = %R::resource_type(),
                    identifier = %identifier,
                    "Create conflicted, re-resolving identity"
                );
                match self.resolve::<R>(&identifier).await? {
                    Some(existing) => Ok(existing),
                    None => Err(ReconcileError::Gateway(err)),
                }
            }
            Err(err) => Err(err),
        }
    }

    async fn resolve<R>(&self, identifier: &Identifier) -> Result<Option<R>, ReconcileError>
    where
        R: IdentityResource,
    {
        let query = format!("identifier={}", identifier.search_token());
        let first = self.gateway.search(&R::resource_type(), &query).await?;
        resolver::resolve_single(self.gateway.as_ref(), identifier, first).await
    }

    async fn submit<R, F>(
        &self,
        identifier: &Identifier,
        init: Option<F>,
    ) -> Result<R, ReconcileError>
    where
        R: IdentityResource,
        F: FnOnce(&mut R, &Identifier) + Send,
    {
        let mut resource = R::default();
        resource.add_identifier(identifier.clone());
        if let Some(init) = init {
            init(&mut resource, identifier);
        }

        let mut body = serde_json::to_value(&resource)?;
        if let Some(obj) = body.as_object_mut() {
            obj.entry("resourceType")
                .or_insert_with(|| Value::String(R::resource_type().to_string()));
        }

        let stored = self.gateway.create(&body).await?;
        Ok(serde_json::from_value(stored)?)
    }
}
