use std::time::Duration;

use lago_domain::LagoError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` drives filtering (default `info`); `LOG_FORMAT=json` switches
/// to JSON lines. Panics are routed through tracing so they land in the same
/// stream as everything else. Calling this twice is a no-op.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    let installed = if json {
        builder.json().with_current_span(true).try_init()
    } else {
        builder.compact().try_init()
    };

    if installed.is_ok() {
        std::panic::set_hook(Box::new(|info| {
            let backtrace = std::backtrace::Backtrace::capture();
            tracing::error!(%info, ?backtrace, "panic");
        }));
    }
}

/// Log the outcome of a command execution with structured fields.
///
/// Callers must avoid forwarding tokens or other secrets in `command`.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, error: Option<&LagoError>) {
    let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

    match error {
        None => info!(command, duration_ms, "command_execution_success"),
        Some(e) => {
            warn!(command, duration_ms, error_type = error_label(e), "command_execution_failure");
        }
    }
}

/// Log the outcome of a feature flag evaluation.
#[inline]
pub fn log_feature_flag_check(flag_name: &str, is_enabled: bool) {
    info!(flag_name, is_enabled, "feature_flag_evaluated");
}

/// Stable label for `error`, suitable for logging fields.
#[inline]
pub fn error_label(error: &LagoError) -> &'static str {
    error.label()
}
