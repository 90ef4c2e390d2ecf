//! Feature flag commands

use std::time::Instant;

use lago_domain::{FeatureFlag, FeatureFlagSelection, Result};
use serde::Serialize;
use tracing::info;

use crate::utils::logging::{log_command_execution, log_feature_flag_check};
use crate::AppContext;

/// One row of `lago flags list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureFlagState {
    pub flag: FeatureFlag,
    pub enabled: bool,
}

pub fn list_feature_flags(ctx: &AppContext) -> Result<Vec<FeatureFlagState>> {
    let start = Instant::now();
    let result = ctx.feature_flags.enabled().map(|enabled| {
        ctx.feature_flags
            .list()
            .into_iter()
            .map(|flag| FeatureFlagState { flag, enabled: enabled.contains(&flag) })
            .collect()
    });
    log_command_execution("feature_flags::list", start.elapsed(), result.as_ref().err());
    result
}

pub fn is_feature_enabled(ctx: &AppContext, flag: FeatureFlag) -> Result<bool> {
    let start = Instant::now();
    let result = ctx.feature_flags.is_active(flag);
    log_command_execution("feature_flags::is_active", start.elapsed(), result.as_ref().err());

    if let Ok(is_enabled) = result {
        log_feature_flag_check(flag.as_str(), is_enabled);
    }
    result
}

/// Replace the enabled set, returning it as read back from storage.
pub fn set_feature_flags(
    ctx: &AppContext,
    selection: FeatureFlagSelection,
) -> Result<Vec<FeatureFlag>> {
    let start = Instant::now();
    info!(command = "feature_flags::set", ?selection, "Setting feature flags");

    let result = ctx.feature_flags.set(selection);
    log_command_execution("feature_flags::set", start.elapsed(), result.as_ref().err());
    result
}
