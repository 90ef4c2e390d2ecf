//! # Lago App
//!
//! Application layer: wiring and the `lago` command line front-end.
//!
//! This crate contains:
//! - Application context (dependency injection)
//! - Commands driving the session, feature flags and GraphQL operations
//! - Tracing initialisation
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture

pub mod commands;
pub mod context;
pub mod utils;

pub use context::*;
