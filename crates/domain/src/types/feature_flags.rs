//! Feature flag identifiers

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::LagoError;

/// Closed set of feature flags known to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FeatureFlag {
    #[serde(rename = "ftr_enabled")]
    FtrEnabled,
    #[serde(rename = "ftr_new_analytics_mrr")]
    FtrNewAnalyticsMrr,
}

impl FeatureFlag {
    /// Every flag, in declaration order.
    pub const ALL: [Self; 2] = [Self::FtrEnabled, Self::FtrNewAnalyticsMrr];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FtrEnabled => "ftr_enabled",
            Self::FtrNewAnalyticsMrr => "ftr_new_analytics_mrr",
        }
    }
}

impl fmt::Display for FeatureFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureFlag {
    type Err = LagoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|flag| flag.as_str() == s)
            .ok_or_else(|| LagoError::InvalidInput(format!("unknown feature flag: {s}")))
    }
}

/// Argument accepted when replacing the enabled set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureFlagSelection {
    All,
    One(FeatureFlag),
    Many(Vec<FeatureFlag>),
    None,
}

impl FeatureFlagSelection {
    /// Expand the selection into the list that gets persisted.
    pub fn into_flags(self) -> Vec<FeatureFlag> {
        match self {
            Self::All => FeatureFlag::ALL.to_vec(),
            Self::One(flag) => vec![flag],
            Self::Many(flags) => flags,
            Self::None => Vec::new(),
        }
    }
}
