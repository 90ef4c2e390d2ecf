//! Navigation targets and user-facing notifications
//!
//! The presentation layer renders these; the runtime only publishes them.

use serde::{Deserialize, Serialize};

/// Views the runtime can route to on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    #[default]
    Login,
    Home,
    CustomerPortal,
    CustomerPortalExpired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Success,
    Danger,
}

/// Toast pushed to the user. Either a translation key or a verbatim message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translate_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Notification {
    pub fn translated(severity: Severity, key: impl Into<String>) -> Self {
        Self { severity, translate_key: Some(key.into()), message: None }
    }

    pub fn verbatim(severity: Severity, message: impl Into<String>) -> Self {
        Self { severity, translate_key: None, message: Some(message.into()) }
    }
}
