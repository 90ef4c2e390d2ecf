//! Raw GraphQL operation command and the call-site reaction to its errors
//!
//! The error guard has already handled session teardown, telemetry and the
//! generic toast by the time a response reaches this module. What is left is
//! the local reaction a screen would have: show the provider message, react
//! to an expected validation code, or fall back to the first error code.

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use lago_core::{extract_third_party_message, has_defined_error, OperationContext};
use lago_domain::{ApiErrorCode, GraphqlRequest, GraphqlResponse, LagoError, Result};
use lago_infra::Upload;
use serde::Serialize;
use tracing::debug;

use crate::utils::logging::log_command_execution;
use crate::AppContext;

/// A code the caller knows how to handle, optionally scoped to one field.
///
/// Parsed from `code` or `code@field`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedError {
    pub code: ApiErrorCode,
    pub field: Option<String>,
}

impl FromStr for ExpectedError {
    type Err = LagoError;

    fn from_str(s: &str) -> Result<Self> {
        let (code, field) = match s.split_once('@') {
            Some((code, field)) => (code, Some(field.to_string())),
            None => (s, None),
        };

        if code.is_empty() || field.as_deref().is_some_and(str::is_empty) {
            return Err(LagoError::InvalidInput(format!("invalid expected error: {s:?}")));
        }

        Ok(Self { code: ApiErrorCode::from(code), field })
    }
}

/// Everything needed to run one operation.
#[derive(Debug, Clone)]
pub struct OperationInput {
    pub request: GraphqlRequest,
    pub context: OperationContext,
    pub uploads: Vec<Upload>,
    pub expected: Vec<ExpectedError>,
}

impl OperationInput {
    pub fn new(request: GraphqlRequest) -> Self {
        Self {
            request,
            context: OperationContext::default(),
            uploads: Vec::new(),
            expected: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CallSiteReaction {
    /// No errors came back.
    None,
    /// Verbatim message from a payment or tax provider.
    ProviderMessage(String),
    /// One of the caller's expected codes matched.
    Expected(String),
    /// Nothing specific matched; the first error's code (or message).
    Unhandled(String),
}

impl fmt::Display for CallSiteReaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("ok"),
            Self::ProviderMessage(message) => write!(f, "provider error: {message}"),
            Self::Expected(code) => write!(f, "expected error: {code}"),
            Self::Unhandled(code) => write!(f, "error: {code}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationOutcome {
    pub response: GraphqlResponse,
    pub reaction: CallSiteReaction,
}

/// Send one operation through the client pipeline.
///
/// Queries go through the response cache; mutations never do. Uploads turn
/// the request into a multipart mutation.
///
/// # Errors
///
/// Transport failures only. GraphQL errors are part of the outcome.
pub async fn run_operation(ctx: &AppContext, input: OperationInput) -> Result<OperationOutcome> {
    let start = Instant::now();
    let OperationInput { request, context, uploads, expected } = input;

    let result = if uploads.is_empty() {
        ctx.client.query(request, &context).await
    } else {
        ctx.client.upload(request, uploads, &context).await
    };
    log_command_execution("graphql::run_operation", start.elapsed(), result.as_ref().err());

    let response = result?;
    let reaction = react(&response, &expected);
    debug!(%reaction, "Call-site reaction");

    Ok(OperationOutcome { response, reaction })
}

/// Decide what a call site does with the errors of `response`.
pub fn react(response: &GraphqlResponse, expected: &[ExpectedError]) -> CallSiteReaction {
    let Some(first) = response.errors.first() else {
        return CallSiteReaction::None;
    };

    if let Some(message) = extract_third_party_message(response) {
        return CallSiteReaction::ProviderMessage(message);
    }

    if let Some(hit) =
        expected.iter().find(|e| has_defined_error(&e.code, response, e.field.as_deref()))
    {
        return CallSiteReaction::Expected(hit.code.to_string());
    }

    let label = first.code().map_or_else(|| first.message.clone(), ToString::to_string);
    CallSiteReaction::Unhandled(label)
}
