//! Configuration structures
//!
//! Loaded by the infrastructure layer from the environment or a config file.

use serde::{Deserialize, Serialize};

use crate::constants::{GRAPHQL_PATH, REQUEST_TIMEOUT_SECS};

/// Top-level runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub app: AppInfo,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Remote API settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the API, without the `/graphql` suffix.
    pub url: String,
    /// Wall-clock limit for a single request.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ApiConfig {
    /// Full GraphQL endpoint (`${url}/graphql`).
    pub fn graphql_endpoint(&self) -> String {
        format!("{}{}", self.url.trim_end_matches('/'), GRAPHQL_PATH)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { url: "http://localhost:3000".to_string(), timeout_secs: REQUEST_TIMEOUT_SECS }
    }
}

/// Client identity, also used to version the persisted response cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppInfo {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_app_version")]
    pub version: String,
}

impl Default for AppInfo {
    fn default() -> Self {
        Self { name: default_app_name(), version: default_app_version() }
    }
}

/// Local persistent storage settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path of the SQLite file backing local storage.
    #[serde(default = "default_storage_path")]
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { path: default_storage_path() }
    }
}

fn default_timeout_secs() -> u64 {
    REQUEST_TIMEOUT_SECS
}

fn default_app_name() -> String {
    "lago-app".to_string()
}

fn default_app_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_storage_path() -> String {
    "lago-local-storage.db".to_string()
}
