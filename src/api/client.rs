//! Generic REST client for one entity collection.

use super::store::{ResourceStore, Snapshot, Subscription};
use super::transport::{Method, RawResponse, Transport};
use super::{ApiError, ApiResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Debug;
use std::sync::Arc;

/// A record type served by one backend collection.
pub trait Entity: DeserializeOwned + Clone + Debug + Send + Sync + 'static {
    /// Path segment of the collection, e.g. `"doctors"`.
    const COLLECTION: &'static str;

    /// Backend-assigned identifier.
    fn id(&self) -> u64;
}

/// REST contract for one collection plus its shared cache.
///
/// Every successful mutation is followed by a full re-list; the backend is
/// the only source of truth for computed and nested fields, so the cache is
/// never patched locally. Failed calls leave the cache untouched.
pub struct ResourceClient<E: Entity> {
    transport: Arc<dyn Transport>,
    store: ResourceStore<E>,
}

impl<E: Entity> ResourceClient<E> {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            store: ResourceStore::new(),
        }
    }

    pub fn store(&self) -> &ResourceStore<E> {
        &self.store
    }

    pub fn subscribe(&self) -> Subscription<E> {
        self.store.subscribe()
    }

    fn collection_path() -> String {
        format!("/{}/", E::COLLECTION)
    }

    fn item_path(id: u64) -> String {
        format!("/{}/{}/", E::COLLECTION, id)
    }

    fn call(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> ApiResult<RawResponse> {
        tracing::debug!(method = method.as_str(), path, "request");
        let response = self.transport.execute(method, path, query, body)?;
        if response.is_success() {
            Ok(response)
        } else {
            Err(ApiError::from_status(response.status, path, response.body))
        }
    }

    fn decode<T: DeserializeOwned>(path: &str, response: &RawResponse) -> ApiResult<T> {
        serde_json::from_str(&response.body).map_err(|e| ApiError::Decode {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    fn encode<P: Serialize>(payload: &P) -> ApiResult<Value> {
        serde_json::to_value(payload).map_err(|e| ApiError::Encode(e.to_string()))
    }

    /// Fetches the whole collection and publishes it to the store.
    pub fn list_all(&self) -> ApiResult<Snapshot<E>> {
        let path = Self::collection_path();
        let result = self
            .call(Method::Get, &path, &[], None)
            .and_then(|response| Self::decode::<Vec<E>>(&path, &response));

        match result {
            Ok(items) => {
                tracing::debug!(collection = E::COLLECTION, count = items.len(), "listed");
                Ok(self.store.replace(items))
            }
            Err(e) => {
                tracing::error!(collection = E::COLLECTION, error = %e, "list failed");
                Err(e)
            }
        }
    }

    /// Fetches the records matching server-side query filters.
    ///
    /// The result is a subset, so it is returned without touching the store.
    pub fn list_where(&self, filters: &[(&str, String)]) -> ApiResult<Vec<E>> {
        let path = Self::collection_path();
        let query: Vec<(String, String)> = filters
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect();
        let response = self.call(Method::Get, &path, &query, None)?;
        Self::decode(&path, &response)
    }

    pub fn get_by_id(&self, id: u64) -> ApiResult<E> {
        let path = Self::item_path(id);
        let response = self.call(Method::Get, &path, &[], None).map_err(|e| {
            tracing::warn!(collection = E::COLLECTION, id, error = %e, "fetch failed");
            e
        })?;
        Self::decode(&path, &response)
    }

    /// Submits a new record (without id).
    pub fn create<P: Serialize>(&self, payload: &P) -> ApiResult<E> {
        let path = Self::collection_path();
        let body = Self::encode(payload)?;
        let created: E = self
            .call(Method::Post, &path, &[], Some(&body))
            .and_then(|response| Self::decode(&path, &response))
            .map_err(|e| self.log_mutation_error("create", None, e))?;

        tracing::info!(collection = E::COLLECTION, id = created.id(), "created");
        self.refresh();
        Ok(created)
    }

    /// Replaces the fields present in `partial` with PUT.
    pub fn update<P: Serialize>(&self, id: u64, partial: &P) -> ApiResult<E> {
        self.modify(Method::Put, id, partial)
    }

    /// Narrow partial update with PATCH.
    pub fn patch<P: Serialize>(&self, id: u64, partial: &P) -> ApiResult<E> {
        self.modify(Method::Patch, id, partial)
    }

    fn modify<P: Serialize>(&self, method: Method, id: u64, partial: &P) -> ApiResult<E> {
        let path = Self::item_path(id);
        let body = Self::encode(partial)?;
        let updated: E = self
            .call(method, &path, &[], Some(&body))
            .and_then(|response| Self::decode(&path, &response))
            .map_err(|e| self.log_mutation_error("update", Some(id), e))?;

        tracing::info!(collection = E::COLLECTION, id, method = method.as_str(), "updated");
        self.refresh();
        Ok(updated)
    }

    pub fn remove(&self, id: u64) -> ApiResult<()> {
        let path = Self::item_path(id);
        self.call(Method::Delete, &path, &[], None)
            .map_err(|e| self.log_mutation_error("delete", Some(id), e))?;

        tracing::info!(collection = E::COLLECTION, id, "deleted");
        self.refresh();
        Ok(())
    }

    /// Re-lists the collection after a mutation. A failure here does not undo
    /// the mutation that triggered it, so it is only logged.
    pub fn refresh(&self) {
        if let Err(e) = self.list_all() {
            tracing::warn!(collection = E::COLLECTION, error = %e, "refresh after mutation failed");
        }
    }

    fn log_mutation_error(&self, action: &str, id: Option<u64>, error: ApiError) -> ApiError {
        tracing::error!(collection = E::COLLECTION, action, ?id, error = %error, "mutation failed");
        error
    }
}
