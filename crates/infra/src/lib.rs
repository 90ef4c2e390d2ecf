//! # Lago Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The reqwest HTTP client and the GraphQL transport pipeline
//! - SQLite-backed local storage (rusqlite + r2d2)
//! - The persisted response cache
//! - Telemetry, notification and navigation adapters
//! - The feature flag service and configuration loader
//!
//! ## Architecture
//! - Implements traits defined in `lago-core`
//! - Contains all "impure" code (I/O, network, files)

pub mod cache;
pub mod config;
pub mod errors;
pub mod events;
pub mod graphql;
pub mod http;
pub mod observability;
pub mod services;
pub mod storage;

// Re-export commonly used items
pub use cache::ResponseCache;
pub use errors::InfraError;
pub use events::{NotificationCenter, WatchRouter};
pub use graphql::{GraphqlClient, Upload};
pub use http::HttpClient;
pub use observability::TracingTelemetryReporter;
pub use services::FeatureFlagService;
pub use storage::{MemoryLocalStorage, SqliteLocalStorage};
