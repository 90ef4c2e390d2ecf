//! Silent-code policy used by the error guard.

use std::collections::HashSet;

use lago_domain::constants::PERSISTED_QUERY_NOT_FOUND;
use lago_domain::{ApiErrorCode, GraphqlError};

use crate::request::OperationContext;

/// Codes that invalidate the session.
pub const AUTH_ERRORS: [ApiErrorCode; 3] = [
    ApiErrorCode::ExpiredJwtToken,
    ApiErrorCode::TokenEncodingError,
    ApiErrorCode::Unauthorized,
];

/// Codes that are never reported but do not end the session.
pub const PERMISSION_ERRORS: [ApiErrorCode; 1] = [ApiErrorCode::Forbidden];

/// Effective silent set for one request.
///
/// Always contains [`AUTH_ERRORS`] and [`PERMISSION_ERRORS`] on top of the
/// caller's own codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SilentCodes(HashSet<ApiErrorCode>);

impl SilentCodes {
    /// Merge `caller_codes` with the always-silent codes.
    pub fn new<I>(caller_codes: I) -> Self
    where
        I: IntoIterator<Item = ApiErrorCode>,
    {
        let codes = caller_codes
            .into_iter()
            .chain(AUTH_ERRORS.iter().cloned())
            .chain(PERMISSION_ERRORS.iter().cloned())
            .collect();
        Self(codes)
    }

    /// Whether `code` is silenced for this request.
    pub fn contains(&self, code: &ApiErrorCode) -> bool {
        self.0.contains(code)
    }

    /// Number of distinct silenced codes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Never true in practice; the always-silent codes are present.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for SilentCodes {
    fn default() -> Self {
        Self::new([])
    }
}

/// How the guard treats a single error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Session must be torn down.
    Authentication,
    /// Caller opted out, or the code is in the effective silent set.
    Silent,
    /// Transport-level persisted-query miss; never reported.
    TransportSentinel,
    /// Goes to telemetry and produces one generic notification.
    Reportable,
}

/// Classify one error against the request's context.
pub fn classify(error: &GraphqlError, context: &OperationContext) -> ErrorClass {
    let code = error.code();

    if code.is_some_and(ApiErrorCode::is_auth_error) {
        return ErrorClass::Authentication;
    }

    if context.is_silent() {
        return ErrorClass::Silent;
    }

    if code.is_some_and(|code| context.silent_codes().contains(code)) {
        return ErrorClass::Silent;
    }

    if error.message == PERSISTED_QUERY_NOT_FOUND {
        return ErrorClass::TransportSentinel;
    }

    ErrorClass::Reportable
}
