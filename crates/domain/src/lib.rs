//! # Lago Domain
//!
//! Business domain types and models for the Lago API client runtime.
//!
//! This crate contains:
//! - GraphQL wire types (formatted errors, extensions, error codes)
//! - Session and feature flag types
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants (storage keys, header names, timeouts)
//!
//! ## Architecture
//! - No dependencies on other Lago crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
