//! Service layer implementations.
//!
//! Services provide high-level logic and caching on top of local storage.

pub mod feature_flag_service;

pub use feature_flag_service::FeatureFlagService;
