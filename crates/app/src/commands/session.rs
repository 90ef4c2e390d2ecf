//! Session lifecycle commands

use std::time::Instant;

use lago_domain::{Result, SessionSnapshot};
use tracing::info;

use crate::utils::logging::log_command_execution;
use crate::AppContext;

pub fn log_in(ctx: &AppContext, token: &str) -> Result<SessionSnapshot> {
    let start = Instant::now();
    let result = ctx.session.log_in(token).map(|()| ctx.session.snapshot());
    log_command_execution("session::log_in", start.elapsed(), result.as_ref().err());
    result
}

pub fn access_customer_portal(ctx: &AppContext, token: &str) -> Result<SessionSnapshot> {
    let start = Instant::now();
    let result = ctx.session.access_customer_portal(token).map(|()| ctx.session.snapshot());
    log_command_execution(
        "session::access_customer_portal",
        start.elapsed(),
        result.as_ref().err(),
    );
    result
}

/// Tear the session down. `false` when another teardown was already running.
pub fn log_out(ctx: &AppContext) -> Result<bool> {
    let start = Instant::now();
    let result = ctx.session.log_out();
    log_command_execution("session::log_out", start.elapsed(), result.as_ref().err());

    if let Ok(performed) = result {
        info!(performed, "Logout finished");
    }
    result
}

pub fn switch_organization(ctx: &AppContext, organization_id: &str) -> Result<SessionSnapshot> {
    let start = Instant::now();
    let result = ctx.session.switch_organization(organization_id).map(|()| ctx.session.snapshot());
    log_command_execution("session::switch_organization", start.elapsed(), result.as_ref().err());
    result
}

/// Current session with the tokens masked, safe to print.
pub fn session_status(ctx: &AppContext) -> SessionSnapshot {
    let mut snapshot = ctx.session.snapshot();
    snapshot.auth_token = snapshot.auth_token.map(|token| mask(&token));
    snapshot.customer_portal_token = snapshot.customer_portal_token.map(|token| mask(&token));
    snapshot
}

fn mask(token: &str) -> String {
    let visible: String = token.chars().take(4).collect();
    format!("{visible}***")
}
