//! Query response cache persisted to local storage.
//!
//! # Cache Strategy
//! - **Key**: operation name + blake3 hash of the variables
//! - **Value**: the `data` payload of a successful query
//! - **Persistence**: the whole cache is written under the versioned
//!   `apollo-cache-persist-lago-<version>` key after each write and read
//!   back at bootstrap
//! - **Invalidation**: wiped on logout, portal access and organization switch

use std::collections::BTreeMap;
use std::sync::Arc;

use lago_core::{LocalStorage, LocalStorageExt, ResponseCachePort};
use lago_domain::constants::response_cache_key;
use lago_domain::{GraphqlRequest, Result};
use moka::sync::Cache;
use serde_json::Value;
use tracing::{debug, warn};

pub const DEFAULT_CAPACITY: u64 = 1_000;

/// Cache key for `request`.
///
/// Variables are hashed in their canonical (sorted key) JSON form, so two
/// requests that differ only in key order share an entry.
pub fn cache_key(request: &GraphqlRequest) -> String {
    let operation = request.operation_name.as_deref().unwrap_or("anonymous");
    let variables = serde_json::to_vec(&request.variables).unwrap_or_default();
    format!("{operation}:{}", blake3::hash(&variables).to_hex())
}

pub struct ResponseCache {
    entries: Cache<String, Value>,
    storage: Arc<dyn LocalStorage>,
    persist_key: String,
}

impl ResponseCache {
    /// Build the cache and restore the snapshot persisted for `app_version`.
    ///
    /// A snapshot that no longer decodes is dropped rather than failing
    /// bootstrap.
    pub fn restore(storage: Arc<dyn LocalStorage>, app_version: &str, capacity: u64) -> Result<Self> {
        let cache = Self {
            entries: Cache::builder().max_capacity(capacity).build(),
            storage,
            persist_key: response_cache_key(app_version),
        };

        match cache.storage.get_json::<BTreeMap<String, Value>>(&cache.persist_key) {
            Ok(Some(snapshot)) => {
                debug!(entries = snapshot.len(), key = %cache.persist_key, "Response cache restored");
                for (key, value) in snapshot {
                    cache.entries.insert(key, value);
                }
            }
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, key = %cache.persist_key, "Discarding unreadable cache snapshot");
                cache.storage.remove(&cache.persist_key)?;
            }
        }

        Ok(cache)
    }

    pub fn persist_key(&self) -> &str {
        &self.persist_key
    }

    pub fn get(&self, request: &GraphqlRequest) -> Option<Value> {
        self.entries.get(&cache_key(request))
    }

    /// Store `data` for `request` and persist the snapshot.
    pub fn put(&self, request: &GraphqlRequest, data: Value) -> Result<()> {
        self.entries.insert(cache_key(request), data);
        self.persist()
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn snapshot(&self) -> BTreeMap<String, Value> {
        self.entries.iter().map(|(key, value)| (key.as_ref().clone(), value)).collect()
    }

    fn persist(&self) -> Result<()> {
        let snapshot = self.snapshot();
        self.storage.set_item(&self.persist_key, &snapshot)
    }
}

impl ResponseCachePort for ResponseCache {
    fn clear(&self) -> Result<()> {
        self.entries.invalidate_all();
        self.storage.remove(&self.persist_key)?;
        debug!(key = %self.persist_key, "Response cache cleared");
        Ok(())
    }
}
