//! Local persistent storage port.
//!
//! Models a string key/value store with the semantics of browser local
//! storage. Values written through [`LocalStorageExt`] are JSON-encoded.

use lago_domain::constants::UNDEFINED_LITERAL;
use lago_domain::{LagoError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Synchronous string key/value storage.
pub trait LocalStorage: Send + Sync {
    /// Raw value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// JSON codec helpers layered over any [`LocalStorage`].
pub trait LocalStorageExt: LocalStorage {
    /// Read a string item.
    ///
    /// Missing keys and the literal `undefined` read as `None`. JSON strings
    /// are unquoted, other JSON values are returned in their JSON form and
    /// values that are not JSON at all are returned raw.
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let Some(raw) = self.get(key)? else {
            return Ok(None);
        };

        if raw == UNDEFINED_LITERAL {
            return Ok(None);
        }

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::String(value)) => Ok(Some(value)),
            Ok(Value::Null) => Ok(None),
            Ok(other) => Ok(Some(other.to_string())),
            Err(_) => Ok(Some(raw)),
        }
    }

    /// Read and decode a JSON item. `undefined` and missing keys read as `None`.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key)? {
            None => Ok(None),
            Some(raw) if raw == UNDEFINED_LITERAL => Ok(None),
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| LagoError::Decode(format!("invalid JSON under '{key}': {e}"))),
        }
    }

    /// JSON-encode and store `value`.
    fn set_item<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let encoded = serde_json::to_string(value)
            .map_err(|e| LagoError::InvalidInput(format!("cannot encode '{key}': {e}")))?;
        self.set(key, &encoded)
    }
}

impl<S: LocalStorage + ?Sized> LocalStorageExt for S {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MemoryStorage;

    #[test]
    fn stored_json_string_is_unquoted() {
        let storage = MemoryStorage::default();
        storage.set_item("customerPortalToken", "portal-token-abc123").unwrap();

        assert_eq!(storage.get("customerPortalToken").unwrap().unwrap(), "\"portal-token-abc123\"");
        assert_eq!(
            storage.get_item("customerPortalToken").unwrap(),
            Some("portal-token-abc123".to_string())
        );
    }

    #[test]
    fn missing_key_reads_as_none() {
        let storage = MemoryStorage::default();
        assert_eq!(storage.get_item("customerPortalToken").unwrap(), None);
    }

    #[test]
    fn undefined_literal_reads_as_none() {
        let storage = MemoryStorage::default();
        storage.set("customerPortalToken", "undefined").unwrap();

        assert_eq!(storage.get_item("customerPortalToken").unwrap(), None);
        assert_eq!(storage.get_json::<Vec<String>>("customerPortalToken").unwrap(), None);
    }

    #[test]
    fn non_json_values_are_returned_raw() {
        let storage = MemoryStorage::default();
        storage.set("authToken", "raw-token").unwrap();

        assert_eq!(storage.get_item("authToken").unwrap(), Some("raw-token".to_string()));
    }

    #[test]
    fn get_json_rejects_malformed_payloads() {
        let storage = MemoryStorage::default();
        storage.set("featureFlags", "[not json").unwrap();

        let err = storage.get_json::<Vec<String>>("featureFlags").unwrap_err();
        assert!(matches!(err, LagoError::Decode(_)));
    }
}
