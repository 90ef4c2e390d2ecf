#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use lago_core::{ErrorGuard, LocalStorage, RequestContextInjector, SessionController};
use lago_domain::constants::GRAPHQL_PATH;
use lago_infra::cache::DEFAULT_CAPACITY;
use lago_infra::{
    GraphqlClient, HttpClient, MemoryLocalStorage, NotificationCenter, ResponseCache,
    TracingTelemetryReporter, WatchRouter,
};
use wiremock::MockServer;

pub const APP_VERSION: &str = "test";

/// Fully wired client pointed at a wiremock server.
pub struct Harness {
    pub server: MockServer,
    pub storage: Arc<MemoryLocalStorage>,
    pub cache: Arc<ResponseCache>,
    pub router: Arc<WatchRouter>,
    pub notifications: Arc<NotificationCenter>,
    pub telemetry: Arc<TracingTelemetryReporter>,
    pub session: Arc<SessionController>,
    pub client: GraphqlClient,
}

impl Harness {
    /// `stored` holds raw local storage entries present before bootstrap.
    pub async fn start(stored: &[(&str, &str)]) -> Self {
        Self::with_timeout(stored, Duration::from_secs(5)).await
    }

    pub async fn with_timeout(stored: &[(&str, &str)], timeout: Duration) -> Self {
        let server = MockServer::start().await;

        let storage = Arc::new(MemoryLocalStorage::new());
        for (key, value) in stored {
            storage.set(key, value).expect("seed storage");
        }

        let cache = Arc::new(
            ResponseCache::restore(storage.clone(), APP_VERSION, DEFAULT_CAPACITY)
                .expect("cache restored"),
        );
        let router = Arc::new(WatchRouter::default());
        let notifications = Arc::new(NotificationCenter::new());
        let telemetry = Arc::new(TracingTelemetryReporter::default());

        let session = Arc::new(
            SessionController::restore(storage.clone(), cache.clone(), router.clone())
                .expect("session restored"),
        );
        let guard = ErrorGuard::new(session.clone(), telemetry.clone(), notifications.clone());
        let http = HttpClient::builder().timeout(timeout).build().expect("http client");
        let client = GraphqlClient::new(
            http,
            format!("{}{GRAPHQL_PATH}", server.uri()),
            RequestContextInjector::new(session.clone()),
            guard,
            cache.clone(),
        );

        Self { server, storage, cache, router, notifications, telemetry, session, client }
    }
}
