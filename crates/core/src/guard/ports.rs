//! Outbound ports of the error guard.

use lago_domain::{ErrorExtensions, ErrorLocation, Notification, PathSegment};
use serde::Serialize;
use serde_json::Value;

/// Structured context captured for an unclassified error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorReport {
    pub message: String,
    pub operation_name: Option<String>,
    pub path: Option<Vec<PathSegment>>,
    pub locations: Option<Vec<ErrorLocation>>,
    pub extensions: Option<ErrorExtensions>,
    pub variables: Value,
}

/// Error tracking sink.
pub trait TelemetryReporter: Send + Sync {
    fn capture(&self, report: ErrorReport);
}

/// User-facing notification sink (toasts).
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}
