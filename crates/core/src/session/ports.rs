//! Ports the session controller drives on transitions.

use lago_domain::{Result, Route};

/// Presentation-side router.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Persisted response cache, cleared whenever the identity changes.
pub trait ResponseCachePort: Send + Sync {
    fn clear(&self) -> Result<()>;
}
