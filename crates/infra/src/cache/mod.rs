//! Persisted response cache

pub mod response_cache;

pub use response_cache::{cache_key, ResponseCache, DEFAULT_CAPACITY};
