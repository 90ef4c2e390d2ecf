//! Feature flag service with in-memory caching.
//!
//! The enabled set is one JSON array stored under `featureFlags`.
//!
//! # Caching Strategy
//!
//! - **Validated read-through**: every check reads the raw stored value; the
//!   parsed set is reused only while that value is unchanged, so writes from
//!   another process or service instance are seen on the next check
//! - **Write-through invalidation**: write storage, then drop the cached set
//!   and read it back
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use lago_core::FeatureFlagsPort;
//! use lago_domain::{FeatureFlag, FeatureFlagSelection};
//! use lago_infra::services::FeatureFlagService;
//! use lago_infra::storage::SqliteLocalStorage;
//!
//! let storage = Arc::new(SqliteLocalStorage::open("lago-local-storage.db").unwrap());
//! let service = FeatureFlagService::new(storage);
//!
//! service.set(FeatureFlagSelection::One(FeatureFlag::FtrNewAnalyticsMrr)).unwrap();
//! if service.is_active(FeatureFlag::FtrNewAnalyticsMrr).unwrap_or(false) {
//!     // render the new MRR chart
//! }
//! ```

use std::sync::Arc;

use lago_core::{FeatureFlagsPort, LocalStorage, LocalStorageExt};
use lago_domain::constants::FEATURE_FLAGS_KEY;
use lago_domain::{FeatureFlag, FeatureFlagSelection, Result};
use parking_lot::Mutex;
use tracing::{debug, info};

/// Parsed enabled set together with the raw value it was parsed from.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CachedFlags {
    raw: Option<String>,
    flags: Vec<FeatureFlag>,
}

/// Feature flag service backed by local storage.
pub struct FeatureFlagService {
    storage: Arc<dyn LocalStorage>,
    cache: Mutex<Option<CachedFlags>>,
}

impl FeatureFlagService {
    pub fn new(storage: Arc<dyn LocalStorage>) -> Self {
        Self { storage, cache: Mutex::new(None) }
    }

    /// Drop the cached set; the next read goes to storage.
    pub fn clear_cache(&self) {
        *self.cache.lock() = None;
    }

    fn load(&self) -> Result<Vec<FeatureFlag>> {
        let stored: Vec<String> = self.storage.get_json(FEATURE_FLAGS_KEY)?.unwrap_or_default();

        let flags = stored
            .iter()
            .filter_map(|id| match id.parse::<FeatureFlag>() {
                Ok(flag) => Some(flag),
                Err(_) => {
                    debug!(flag = %id, "Ignoring unknown feature flag");
                    None
                }
            })
            .collect();
        Ok(flags)
    }
}

impl FeatureFlagsPort for FeatureFlagService {
    fn enabled(&self) -> Result<Vec<FeatureFlag>> {
        let raw = self.storage.get(FEATURE_FLAGS_KEY)?;

        if let Some(cached) = self.cache.lock().as_ref().filter(|cached| cached.raw == raw) {
            return Ok(cached.flags.clone());
        }

        let flags = self.load()?;
        *self.cache.lock() = Some(CachedFlags { raw, flags: flags.clone() });
        Ok(flags)
    }

    fn set(&self, selection: FeatureFlagSelection) -> Result<Vec<FeatureFlag>> {
        let ids: Vec<&str> = selection.into_flags().into_iter().map(FeatureFlag::as_str).collect();
        self.storage.set_item(FEATURE_FLAGS_KEY, &ids)?;
        self.clear_cache();

        let enabled = self.enabled()?;
        info!(enabled = ?enabled, "Feature flags updated");
        Ok(enabled)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use lago_domain::LagoError;

    use super::*;
    use crate::storage::MemoryLocalStorage;

    fn setup() -> (FeatureFlagService, Arc<MemoryLocalStorage>) {
        let storage = Arc::new(MemoryLocalStorage::new());
        (FeatureFlagService::new(storage.clone()), storage)
    }

    #[test]
    fn nothing_is_enabled_by_default() {
        let (service, _) = setup();

        assert!(service.enabled().unwrap().is_empty());
        assert!(!service.is_active(FeatureFlag::FtrEnabled).unwrap());
        assert_eq!(service.list(), FeatureFlag::ALL.to_vec());
    }

    #[test]
    fn set_all_enables_every_flag_and_persists_ids() {
        let (service, storage) = setup();

        let enabled = service.set(FeatureFlagSelection::All).unwrap();

        assert_eq!(enabled, FeatureFlag::ALL.to_vec());
        assert_eq!(
            storage.get(FEATURE_FLAGS_KEY).unwrap().as_deref(),
            Some(r#"["ftr_enabled","ftr_new_analytics_mrr"]"#)
        );
    }

    #[test]
    fn set_single_and_none() {
        let (service, _) = setup();

        assert_eq!(
            service.set(FeatureFlagSelection::One(FeatureFlag::FtrNewAnalyticsMrr)).unwrap(),
            vec![FeatureFlag::FtrNewAnalyticsMrr]
        );
        assert!(service.is_active(FeatureFlag::FtrNewAnalyticsMrr).unwrap());

        assert!(service.set(FeatureFlagSelection::None).unwrap().is_empty());
        assert!(!service.is_active(FeatureFlag::FtrNewAnalyticsMrr).unwrap());
    }

    #[test]
    fn cache_is_invalidated_on_write() {
        let (service, _) = setup();
        service.enabled().unwrap();
        assert_eq!(service.cache.lock().as_ref().map(|c| c.flags.clone()), Some(Vec::new()));

        service.set(FeatureFlagSelection::One(FeatureFlag::FtrEnabled)).unwrap();

        assert_eq!(
            service.cache.lock().as_ref().map(|c| c.flags.clone()),
            Some(vec![FeatureFlag::FtrEnabled])
        );
    }

    #[test]
    fn writes_by_another_instance_are_seen_on_the_next_check() {
        let (service, storage) = setup();
        let other = FeatureFlagService::new(storage.clone());
        assert!(!service.is_active(FeatureFlag::FtrEnabled).unwrap());

        other.set(FeatureFlagSelection::One(FeatureFlag::FtrEnabled)).unwrap();
        assert!(service.is_active(FeatureFlag::FtrEnabled).unwrap());

        storage.remove(FEATURE_FLAGS_KEY).unwrap();
        assert!(service.enabled().unwrap().is_empty());
    }

    #[test]
    fn unknown_stored_identifiers_are_ignored() {
        let (service, storage) = setup();
        storage.set(FEATURE_FLAGS_KEY, r#"["ftr_enabled","ftr_retired"]"#).unwrap();

        assert_eq!(service.enabled().unwrap(), vec![FeatureFlag::FtrEnabled]);
    }

    #[test]
    fn malformed_storage_is_a_decode_error() {
        let (service, storage) = setup();
        storage.set(FEATURE_FLAGS_KEY, "ftr_enabled").unwrap();

        assert!(matches!(service.enabled(), Err(LagoError::Decode(_))));
    }
}
