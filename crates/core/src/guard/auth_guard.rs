//! Error guard.
//!
//! Runs on every response that carries errors. Authentication errors end
//! the session, everything else is either silenced or reported once to
//! telemetry with a generic notification. The guard never fails and never
//! alters the errors handed back to the caller.

use std::sync::Arc;

use lago_domain::constants::GENERIC_ERROR_TRANSLATION_KEY;
use lago_domain::{GraphqlError, Notification, Severity};
use serde_json::Value;
use tracing::{error, warn};

use super::ports::{ErrorReport, Notifier, TelemetryReporter};
use crate::errors::{classify, ErrorClass};
use crate::request::OperationContext;
use crate::session::SessionController;

/// What the guard did with one error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Organization session torn down (or already being torn down).
    SessionInvalidated,
    /// Portal token rejected; routed to the expired view.
    PortalSessionExpired,
    Silenced,
    Sentinel,
    Reported,
}

/// Summary of one response batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuardReport {
    pub outcomes: Vec<GuardOutcome>,
    /// True when this batch performed the logout teardown.
    pub logged_out: bool,
    pub reported: usize,
}

pub struct ErrorGuard {
    session: Arc<SessionController>,
    telemetry: Arc<dyn TelemetryReporter>,
    notifier: Arc<dyn Notifier>,
}

impl ErrorGuard {
    pub fn new(
        session: Arc<SessionController>,
        telemetry: Arc<dyn TelemetryReporter>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self { session, telemetry, notifier }
    }

    /// Inspect the errors of one response.
    pub fn inspect(
        &self,
        operation_name: Option<&str>,
        variables: &Value,
        context: &OperationContext,
        errors: &[GraphqlError],
    ) -> GuardReport {
        let mut report = GuardReport::default();
        if errors.is_empty() {
            return report;
        }

        let in_portal = self.session.snapshot().is_customer_portal();
        let mut session_handled = false;

        for gql_error in errors {
            let outcome = match classify(gql_error, context) {
                ErrorClass::Authentication if in_portal => {
                    if !session_handled {
                        session_handled = true;
                        self.session.expire_portal_session();
                    }
                    GuardOutcome::PortalSessionExpired
                }
                ErrorClass::Authentication => {
                    if !session_handled {
                        session_handled = true;
                        report.logged_out = self.log_out();
                    }
                    GuardOutcome::SessionInvalidated
                }
                ErrorClass::Silent => GuardOutcome::Silenced,
                ErrorClass::TransportSentinel => GuardOutcome::Sentinel,
                ErrorClass::Reportable => {
                    self.report(gql_error, operation_name, variables);
                    report.reported += 1;
                    GuardOutcome::Reported
                }
            };

            warn!(
                message = %gql_error.message,
                path = %gql_error.path_display(),
                locations = ?gql_error.locations,
                operation = operation_name.unwrap_or_default(),
                "[GraphQL error]"
            );
            report.outcomes.push(outcome);
        }

        report
    }

    fn log_out(&self) -> bool {
        match self.session.log_out() {
            Ok(performed) => performed,
            Err(e) => {
                error!(error = %e, "Logout after authentication error did not finish cleanly");
                true
            }
        }
    }

    fn report(&self, gql_error: &GraphqlError, operation_name: Option<&str>, variables: &Value) {
        self.telemetry.capture(ErrorReport {
            message: gql_error.message.clone(),
            operation_name: operation_name.map(str::to_owned),
            path: gql_error.path.clone(),
            locations: gql_error.locations.clone(),
            extensions: gql_error.extensions.clone(),
            variables: variables.clone(),
        });
        self.notifier
            .notify(Notification::translated(Severity::Danger, GENERIC_ERROR_TRANSLATION_KEY));
    }
}
