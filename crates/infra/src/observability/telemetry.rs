use std::collections::VecDeque;

use lago_core::{ErrorReport, TelemetryReporter};
use parking_lot::Mutex;
use tracing::error;

pub const DEFAULT_RECENT_REPORTS: usize = 50;

/// Telemetry sink emitting one `error!` event per captured report.
pub struct TracingTelemetryReporter {
    recent: Mutex<VecDeque<ErrorReport>>,
    capacity: usize,
}

impl TracingTelemetryReporter {
    pub fn new(capacity: usize) -> Self {
        Self { recent: Mutex::new(VecDeque::with_capacity(capacity)), capacity: capacity.max(1) }
    }

    /// Most recent reports, oldest first.
    pub fn recent(&self) -> Vec<ErrorReport> {
        self.recent.lock().iter().cloned().collect()
    }
}

impl Default for TracingTelemetryReporter {
    fn default() -> Self {
        Self::new(DEFAULT_RECENT_REPORTS)
    }
}

impl TelemetryReporter for TracingTelemetryReporter {
    fn capture(&self, report: ErrorReport) {
        error!(
            error_type = "GraphQLError",
            operation = report.operation_name.as_deref().unwrap_or_default(),
            path = ?report.path,
            locations = ?report.locations,
            extensions = %serde_json::to_string(&report.extensions).unwrap_or_default(),
            variables = %report.variables,
            "{}",
            report.message
        );

        let mut recent = self.recent.lock();
        if recent.len() == self.capacity {
            recent.pop_front();
        }
        recent.push_back(report);
    }
}
