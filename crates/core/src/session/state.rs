//! Session state machine.
//!
//! ```text
//! Unauthenticated --LoggedIn/PortalAccessed--> Authenticated
//! Authenticated   --LogoutRequested----------> LoggingOut
//! Unauthenticated --LogoutRequested----------> LoggingOut
//! LoggingOut      --LogoutCompleted----------> Unauthenticated
//! ```
//!
//! A second `LogoutRequested` while `LoggingOut` is rejected, which is what
//! makes the logout side effect run once.

use lago_domain::SessionStatus;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn,
    PortalAccessed,
    LogoutRequested,
    LogoutCompleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot apply {event:?} while {from:?}")]
pub struct InvalidTransition {
    pub from: SessionStatus,
    pub event: SessionEvent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionMachine {
    status: SessionStatus,
}

impl SessionMachine {
    pub fn new(status: SessionStatus) -> Self {
        Self { status }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Apply `event`, returning the new status.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTransition`] and leaves the state untouched when the
    /// event is not allowed from the current status.
    pub fn apply(&mut self, event: SessionEvent) -> Result<SessionStatus, InvalidTransition> {
        use SessionEvent::{LoggedIn, LogoutCompleted, LogoutRequested, PortalAccessed};
        use SessionStatus::{Authenticated, LoggingOut, Unauthenticated};

        let next = match (self.status, event) {
            (Authenticated | Unauthenticated, LoggedIn | PortalAccessed) => Authenticated,
            (Authenticated | Unauthenticated, LogoutRequested) => LoggingOut,
            (LoggingOut, LogoutCompleted) => Unauthenticated,
            (from, event) => return Err(InvalidTransition { from, event }),
        };

        self.status = next;
        Ok(next)
    }
}
