//! Error telemetry
//!
//! Unclassified GraphQL errors are captured as structured `tracing` events
//! and kept in a bounded ring buffer (`VecDeque`, FIFO eviction) so that
//! presentation code and tests can inspect what was reported recently.

pub mod telemetry;

pub use telemetry::{TracingTelemetryReporter, DEFAULT_RECENT_REPORTS};
