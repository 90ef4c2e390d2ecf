//! # Lago Core
//!
//! Pure client-runtime logic - no infrastructure dependencies.
//!
//! This crate contains:
//! - The GraphQL error classifier used at call sites
//! - The request context injector (headers, variable sanitizing)
//! - The session state machine and controller
//! - The error guard that observes every response
//! - Port/adapter interfaces (traits)
//!
//! ## Architecture Principles
//! - Only depends on `lago-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod errors;
pub mod guard;
pub mod request;
pub mod session;

// Infrastructure ports
pub mod feature_flags_ports;
pub mod storage_ports;

#[cfg(test)]
pub(crate) mod test_support;

pub use errors::{
    classify, extract_third_party_message, has_defined_error, ErrorClass, ErrorSource,
    SilentCodes, AUTH_ERRORS, PERMISSION_ERRORS,
};
pub use feature_flags_ports::FeatureFlagsPort;
pub use guard::{ErrorGuard, ErrorReport, GuardOutcome, GuardReport, Notifier, TelemetryReporter};
pub use request::{
    strip_typename, FetchPolicy, OperationContext, PreparedRequest, RequestContextInjector,
};
pub use session::{
    InvalidTransition, Navigator, ResponseCachePort, SessionController, SessionEvent,
    SessionMachine,
};
pub use storage_ports::{LocalStorage, LocalStorageExt};
