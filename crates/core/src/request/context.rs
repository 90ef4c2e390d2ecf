//! Per-request context supplied by call sites.

use lago_domain::ApiErrorCode;

use crate::errors::SilentCodes;

/// How the response cache participates in a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPolicy {
    /// Serve from cache when present, otherwise hit the network.
    CacheFirst,
    /// Always hit the network and refresh the cache. A cached value is only
    /// used when the network call fails.
    #[default]
    CacheAndNetwork,
    /// Bypass the cache entirely.
    NetworkOnly,
}

/// Options attached to one GraphQL operation.
///
/// ```
/// use lago_core::{FetchPolicy, OperationContext};
/// use lago_domain::ApiErrorCode;
///
/// let context = OperationContext::new()
///     .silent_error_codes([ApiErrorCode::NotFound])
///     .fetch_policy(FetchPolicy::NetworkOnly);
/// assert!(context.silent_codes().contains(&ApiErrorCode::NotFound));
/// ```
#[derive(Debug, Clone, Default)]
pub struct OperationContext {
    silent_error: bool,
    silent_codes: SilentCodes,
    fetch_policy: FetchPolicy,
}

impl OperationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Silence every non-authentication error of this request.
    #[must_use]
    pub fn silent_error(mut self, silent: bool) -> Self {
        self.silent_error = silent;
        self
    }

    /// Caller codes merged into the always-silent set.
    #[must_use]
    pub fn silent_error_codes<I>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = ApiErrorCode>,
    {
        self.silent_codes = SilentCodes::new(codes);
        self
    }

    /// Override the default [`FetchPolicy::CacheAndNetwork`].
    #[must_use]
    pub fn fetch_policy(mut self, policy: FetchPolicy) -> Self {
        self.fetch_policy = policy;
        self
    }

    /// Whether the caller silenced every non-authentication error.
    pub fn is_silent(&self) -> bool {
        self.silent_error
    }

    /// Effective silent set, caller codes included.
    pub fn silent_codes(&self) -> &SilentCodes {
        &self.silent_codes
    }

    pub fn policy(&self) -> FetchPolicy {
        self.fetch_policy
    }
}
