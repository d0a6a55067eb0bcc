use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use serde_json::{Value, json};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tokio::sync::RwLock;
use tracing::debug;
use unifhir_core::ResourceType;
use unifhir_gateway::{ContinuationToken, FhirGateway, GatewayError, ResultPage};

use crate::query::IdentifierQuery;

/// Configuration for the in-memory gateway.
#[derive(Debug, Clone)]
pub struct GatewayOptions {
    /// Number of entries per search result page.
    pub page_size: usize,
    /// Reject creates whose identifier already exists on a resource of the
    /// same type. Models the store-side uniqueness constraint that backs the
    /// reconciliation engine's conflict handling.
    pub enforce_unique_identifiers: bool,
}

impl Default for GatewayOptions {
    fn default() -> Self {
        Self {
            page_size: 50,
            enforce_unique_identifiers: true,
        }
    }
}

impl GatewayOptions {
    /// Sets the page size (minimum 1).
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Enables or disables identifier uniqueness enforcement.
    #[must_use]
    pub fn with_unique_identifiers(mut self, enforce: bool) -> Self {
        self.enforce_unique_identifiers = enforce;
        self
    }
}

/// Server-side state of an open pagination session.
#[derive(Debug, Clone)]
struct PageCursor {
    resource_type: ResourceType,
    query: IdentifierQuery,
    offset: usize,
}

/// In-memory resource store speaking the gateway contract.
///
/// Resources are keyed `"{ResourceType}/{id}"`. Search results are ordered by
/// key so pagination is deterministic; continuation tokens are single-use and
/// resolved against a server-side session map, so a consumed or expired token
/// fails with `InvalidContinuation` exactly like a remote store's would.
#[derive(Debug, Default)]
pub struct InMemoryGateway {
    data: RwLock<HashMap<String, Value>>,
    sessions: RwLock<HashMap<String, PageCursor>>,
    options: GatewayOptions,
}

impl InMemoryGateway {
    /// Creates a gateway with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(GatewayOptions::default())
    }

    /// Creates a gateway with the given options.
    #[must_use]
    pub fn with_options(options: GatewayOptions) -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
            sessions: RwLock::new(HashMap::new()),
            options,
        }
    }

    /// Number of stored resources.
    pub async fn count(&self) -> usize {
        self.data.read().await.len()
    }

    /// Number of open pagination sessions.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drops all open pagination sessions, invalidating outstanding tokens.
    pub async fn expire_sessions(&self) {
        self.sessions.write().await.clear();
    }

    /// Builds one page of matches starting at `offset`, opening a new session
    /// when more results remain.
    async fn page_for(
        &self,
        resource_type: &ResourceType,
        query: &IdentifierQuery,
        offset: usize,
    ) -> ResultPage {
        let page_size = self.options.page_size;
        let (entries, has_more) = {
            let data = self.data.read().await;
            let prefix = format!("{resource_type}/");
            let mut keys: Vec<&String> = data.keys().filter(|k| k.starts_with(&prefix)).collect();
            keys.sort();
            let matching: Vec<&Value> = keys
                .into_iter()
                .filter_map(|k| data.get(k))
                .filter(|resource| query.matches(resource))
                .collect();
            let total = matching.len();
            let entries: Vec<Value> = matching
                .into_iter()
                .skip(offset)
                .take(page_size)
                .cloned()
                .collect();
            let has_more = offset + entries.len() < total;
            (entries, has_more)
        };

        let mut page = ResultPage::with_entries(entries);
        if has_more {
            let token = uuid::Uuid::new_v4().to_string();
            let cursor = PageCursor {
                resource_type: resource_type.clone(),
                query: query.clone(),
                offset: offset + page_size,
            };
            self.sessions.write().await.insert(token.clone(), cursor);
            page = page.with_continuation(ContinuationToken::new(token));
        }
        page
    }
}

/// Extracts all `(system, value)` identifier pairs carried by a resource.
fn identifier_pairs(resource: &Value) -> Vec<(Option<String>, String)> {
    let entries: Vec<&Value> = match resource.get("identifier") {
        Some(entry @ Value::Object(_)) => vec![entry],
        Some(Value::Array(items)) => items.iter().collect(),
        _ => Vec::new(),
    };
    entries
        .into_iter()
        .filter_map(|entry| {
            entry.get("value").and_then(Value::as_str).map(|value| {
                (
                    entry
                        .get("system")
                        .and_then(Value::as_str)
                        .map(str::to_owned),
                    value.to_owned(),
                )
            })
        })
        .collect()
}

#[async_trait]
impl FhirGateway for InMemoryGateway {
    async fn search(
        &self,
        resource_type: &ResourceType,
        query: &str,
    ) -> Result<ResultPage, GatewayError> {
        let query = IdentifierQuery::parse(query)?;
        let page = self.page_for(resource_type, &query, 0).await;
        debug!(
            resource_type = %resource_type,
            entries = page.len(),
            has_more = page.has_more(),
            "Search executed"
        );
        Ok(page)
    }

    async fn fetch_next(&self, token: &ContinuationToken) -> Result<ResultPage, GatewayError> {
        let cursor = self
            .sessions
            .write()
            .await
            .remove(token.as_str())
            .ok_or_else(|| GatewayError::invalid_continuation(token.as_str()))?;
        let page = self
            .page_for(&cursor.resource_type, &cursor.query, cursor.offset)
            .await;
        debug!(
            resource_type = %cursor.resource_type,
            offset = cursor.offset,
            entries = page.len(),
            "Continuation fetched"
        );
        Ok(page)
    }

    async fn create(&self, resource: &Value) -> Result<Value, GatewayError> {
        let type_name = resource
            .get("resourceType")
            .and_then(Value::as_str)
            .ok_or_else(|| GatewayError::invalid_resource("missing resourceType field"))?
            .to_owned();
        let resource_type = ResourceType::from_str(&type_name)
            .map_err(|err| GatewayError::invalid_resource(err.to_string()))?;

        let mut stored = resource.clone();
        let obj = stored
            .as_object_mut()
            .ok_or_else(|| GatewayError::invalid_resource("resource must be a JSON object"))?;

        let id = obj
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        obj.insert("id".to_string(), json!(id));

        let now = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .map_err(|err| GatewayError::internal(err.to_string()))?;
        obj.insert(
            "meta".to_string(),
            json!({"versionId": "1", "lastUpdated": now}),
        );

        // Uniqueness check and insert happen under one write guard, so two
        // racing creates cannot both pass the check.
        let mut data = self.data.write().await;

        if self.options.enforce_unique_identifiers {
            let new_pairs = identifier_pairs(resource);
            if !new_pairs.is_empty() {
                let prefix = format!("{resource_type}/");
                for (key, existing) in data.iter() {
                    if !key.starts_with(&prefix) {
                        continue;
                    }
                    if identifier_pairs(existing)
                        .iter()
                        .any(|pair| new_pairs.contains(pair))
                    {
                        return Err(GatewayError::conflict(
                            &type_name,
                            format!("identifier already in use by {key}"),
                        ));
                    }
                }
            }
        }

        let key = format!("{resource_type}/{id}");
        if data.contains_key(&key) {
            return Err(GatewayError::conflict(
                &type_name,
                format!("{key} already exists"),
            ));
        }
        data.insert(key, stored.clone());
        debug!(resource_type = %resource_type, resource_id = %id, "Created resource");
        Ok(stored)
    }
}
