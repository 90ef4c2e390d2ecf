//! Session controller.
//!
//! Single owner of the session tokens. Persists them through
//! [`LocalStorage`], publishes every change on a `watch` channel and drives
//! navigation and cache invalidation on identity changes.

use std::sync::Arc;

use lago_domain::constants::{
    AUTH_TOKEN_KEY, CUSTOMER_PORTAL_TOKEN_KEY, ORGANIZATION_ID_KEY, TMP_AUTH_TOKEN_KEY,
};
use lago_domain::{Result, Route, SessionSnapshot, SessionStatus};
use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::ports::{Navigator, ResponseCachePort};
use super::state::{SessionEvent, SessionMachine};
use crate::storage_ports::{LocalStorage, LocalStorageExt};

pub struct SessionController {
    storage: Arc<dyn LocalStorage>,
    cache: Arc<dyn ResponseCachePort>,
    navigator: Arc<dyn Navigator>,
    machine: Mutex<SessionMachine>,
    state: watch::Sender<SessionSnapshot>,
}

impl SessionController {
    /// Build the controller from whatever the previous run persisted.
    ///
    /// # Errors
    ///
    /// Propagates storage read failures.
    pub fn restore(
        storage: Arc<dyn LocalStorage>,
        cache: Arc<dyn ResponseCachePort>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let auth_token = storage.get_item(AUTH_TOKEN_KEY)?;
        let customer_portal_token = storage.get_item(CUSTOMER_PORTAL_TOKEN_KEY)?;
        let organization_id = storage.get_item(ORGANIZATION_ID_KEY)?;

        let status = if auth_token.is_some() || customer_portal_token.is_some() {
            SessionStatus::Authenticated
        } else {
            SessionStatus::Unauthenticated
        };

        let snapshot =
            SessionSnapshot { status, auth_token, customer_portal_token, organization_id };
        debug!(?status, portal = snapshot.is_customer_portal(), "Session restored");

        let (state, _) = watch::channel(snapshot);
        Ok(Self { storage, cache, navigator, machine: Mutex::new(SessionMachine::new(status)), state })
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    pub fn status(&self) -> SessionStatus {
        self.machine.lock().status()
    }

    /// Observe session changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    /// Start an organization session.
    ///
    /// # Errors
    ///
    /// Fails when a logout is in progress or storage rejects the write.
    pub fn log_in(&self, token: &str) -> Result<()> {
        self.transition(SessionEvent::LoggedIn)?;

        self.storage.set_item(AUTH_TOKEN_KEY, token)?;
        self.storage.remove(TMP_AUTH_TOKEN_KEY)?;

        self.state.send_modify(|snapshot| {
            snapshot.status = SessionStatus::Authenticated;
            snapshot.auth_token = Some(token.to_owned());
        });
        info!("Logged in");
        self.navigator.navigate(Route::Home);
        Ok(())
    }

    /// Start a customer portal session.
    ///
    /// Clears the response cache first so that nothing fetched with a previous
    /// portal token leaks into the new one.
    ///
    /// # Errors
    ///
    /// Fails when a logout is in progress, or on cache/storage errors.
    pub fn access_customer_portal(&self, token: &str) -> Result<()> {
        self.transition(SessionEvent::PortalAccessed)?;

        self.cache.clear()?;
        self.storage.set_item(CUSTOMER_PORTAL_TOKEN_KEY, token)?;

        self.state.send_modify(|snapshot| {
            snapshot.status = SessionStatus::Authenticated;
            snapshot.customer_portal_token = Some(token.to_owned());
        });
        info!("Customer portal accessed");
        self.navigator.navigate(Route::CustomerPortal);
        Ok(())
    }

    /// Make `organization_id` the current organization.
    ///
    /// # Errors
    ///
    /// Propagates storage and cache errors.
    pub fn switch_organization(&self, organization_id: &str) -> Result<()> {
        self.storage.set_item(ORGANIZATION_ID_KEY, organization_id)?;
        self.cache.clear()?;

        self.state.send_modify(|snapshot| {
            snapshot.organization_id = Some(organization_id.to_owned());
        });
        info!(organization_id, "Switched organization");
        Ok(())
    }

    /// Tear the session down.
    ///
    /// Returns `Ok(false)` without side effects when another logout is
    /// already running. Once started, the teardown always reaches
    /// `Unauthenticated`; the first storage/cache error is returned after
    /// navigation.
    ///
    /// # Errors
    ///
    /// First storage or cache error hit during the teardown.
    pub fn log_out(&self) -> Result<bool> {
        if let Err(rejected) = self.machine.lock().apply(SessionEvent::LogoutRequested) {
            debug!(%rejected, "Logout already in progress");
            return Ok(false);
        }

        let mut first_error = None;
        for key in [AUTH_TOKEN_KEY, TMP_AUTH_TOKEN_KEY, CUSTOMER_PORTAL_TOKEN_KEY, ORGANIZATION_ID_KEY]
        {
            if let Err(e) = self.storage.remove(key) {
                warn!(key, error = %e, "Failed to remove session key");
                first_error.get_or_insert(e);
            }
        }
        if let Err(e) = self.cache.clear() {
            warn!(error = %e, "Failed to clear response cache");
            first_error.get_or_insert(e);
        }

        let status = {
            let mut machine = self.machine.lock();
            match machine.apply(SessionEvent::LogoutCompleted) {
                Ok(status) => status,
                Err(_) => machine.status(),
            }
        };
        self.state.send_replace(SessionSnapshot { status, ..SessionSnapshot::default() });
        info!("Logged out");
        self.navigator.navigate(Route::Login);

        first_error.map_or(Ok(true), Err)
    }

    /// Route a portal user whose token was rejected to the expired view.
    ///
    /// Tokens are left in place; a fresh portal link replaces them.
    pub fn expire_portal_session(&self) {
        warn!("Customer portal session expired");
        self.navigator.navigate(Route::CustomerPortalExpired);
    }

    fn transition(&self, event: SessionEvent) -> Result<SessionStatus> {
        self.machine.lock().apply(event).map_err(|e| lago_domain::LagoError::Auth(e.to_string()))
    }
}
