//! Response error guard

pub mod auth_guard;
pub mod ports;

pub use auth_guard::{ErrorGuard, GuardOutcome, GuardReport};
pub use ports::{ErrorReport, Notifier, TelemetryReporter};
