//! Application context - dependency injection container

use std::sync::Arc;

use lago_core::{
    ErrorGuard, FeatureFlagsPort, LocalStorage, RequestContextInjector, SessionController,
};
use lago_domain::{Config, Result};
use lago_infra::cache::DEFAULT_CAPACITY;
use lago_infra::{
    FeatureFlagService, GraphqlClient, NotificationCenter, ResponseCache, SqliteLocalStorage,
    TracingTelemetryReporter, WatchRouter,
};
use tracing::info;

/// Type alias for feature flag port trait object
type DynFeatureFlagsPort = dyn FeatureFlagsPort + Send + Sync + 'static;

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub storage: Arc<dyn LocalStorage>,
    pub cache: Arc<ResponseCache>,
    pub session: Arc<SessionController>,
    pub feature_flags: Arc<DynFeatureFlagsPort>,
    pub client: Arc<GraphqlClient>,

    // Presentation-facing channels
    pub router: Arc<WatchRouter>,
    pub notifications: Arc<NotificationCenter>,
    pub telemetry: Arc<TracingTelemetryReporter>,
}

impl AppContext {
    /// Load configuration and open the configured storage file.
    pub fn new() -> Result<Self> {
        let config = lago_infra::config::load()?;
        Self::new_with_config(config)
    }

    pub fn new_with_config(config: Config) -> Result<Self> {
        let storage = Arc::new(SqliteLocalStorage::open(&config.storage.path)?);
        Self::with_storage(config, storage)
    }

    /// Wire every adapter over `storage`, restoring the previous session and
    /// the response cache persisted for the configured app version.
    pub fn with_storage(config: Config, storage: Arc<dyn LocalStorage>) -> Result<Self> {
        let cache = Arc::new(ResponseCache::restore(
            Arc::clone(&storage),
            &config.app.version,
            DEFAULT_CAPACITY,
        )?);
        let router = Arc::new(WatchRouter::default());
        let notifications = Arc::new(NotificationCenter::new());
        let telemetry = Arc::new(TracingTelemetryReporter::default());

        let session = Arc::new(SessionController::restore(
            Arc::clone(&storage),
            cache.clone(),
            router.clone(),
        )?);

        let guard = ErrorGuard::new(session.clone(), telemetry.clone(), notifications.clone());
        let client = Arc::new(GraphqlClient::from_config(
            &config,
            RequestContextInjector::new(session.clone()),
            guard,
            cache.clone(),
        )?);

        let feature_flags: Arc<DynFeatureFlagsPort> =
            Arc::new(FeatureFlagService::new(Arc::clone(&storage)));

        info!(
            endpoint = client.endpoint(),
            app_version = %config.app.version,
            status = ?session.status(),
            "Application context ready"
        );

        Ok(Self { config, storage, cache, session, feature_flags, client, router, notifications, telemetry })
    }
}
