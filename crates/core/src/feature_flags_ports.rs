//! Feature flags port.
//!
//! Flags live in local persistent storage as one JSON array of enabled
//! identifiers and are checked synchronously by presentation code.
//!
//! # Example
//!
//! ```no_run
//! use lago_core::FeatureFlagsPort;
//! use lago_domain::FeatureFlag;
//!
//! fn show_new_mrr_chart(flags: &impl FeatureFlagsPort) -> bool {
//!     flags.is_active(FeatureFlag::FtrNewAnalyticsMrr).unwrap_or(false)
//! }
//! ```

use lago_domain::{FeatureFlag, FeatureFlagSelection, Result};

/// Port for querying and managing feature flags.
pub trait FeatureFlagsPort: Send + Sync {
    /// Flags currently enabled, in stored order.
    ///
    /// Identifiers that are not part of [`FeatureFlag`] are ignored.
    fn enabled(&self) -> Result<Vec<FeatureFlag>>;

    /// Every flag the client knows about.
    fn list(&self) -> Vec<FeatureFlag> {
        FeatureFlag::ALL.to_vec()
    }

    /// Whether `flag` is in the enabled set.
    fn is_active(&self, flag: FeatureFlag) -> Result<bool> {
        Ok(self.enabled()?.contains(&flag))
    }

    /// Replace the enabled set and return it as read back from storage.
    fn set(&self, selection: FeatureFlagSelection) -> Result<Vec<FeatureFlag>>;
}
