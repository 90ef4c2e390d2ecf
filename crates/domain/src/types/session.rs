//! Session state types

use serde::{Deserialize, Serialize};

/// Lifecycle of the client session.
///
/// `LoggingOut` is transient: it exists so that a teardown already in
/// progress is never started twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Authenticated,
    LoggingOut,
    #[default]
    Unauthenticated,
}

/// Point-in-time view of the session published to subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub auth_token: Option<String>,
    pub customer_portal_token: Option<String>,
    pub organization_id: Option<String>,
}

impl SessionSnapshot {
    /// True when the current browsing context is the customer portal.
    pub fn is_customer_portal(&self) -> bool {
        self.customer_portal_token.as_deref().is_some_and(|token| !token.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.status == SessionStatus::Authenticated
    }
}
