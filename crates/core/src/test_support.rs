//! In-memory fakes for the core ports.

use std::collections::HashMap;
use std::sync::Arc;

use lago_domain::{Notification, Result, Route};
use parking_lot::Mutex;

use crate::guard::{ErrorReport, Notifier, TelemetryReporter};
use crate::session::{Navigator, ResponseCachePort, SessionController};
use crate::storage_ports::LocalStorage;

#[derive(Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn with_items(items: &[(&str, &str)]) -> Self {
        let storage = Self::default();
        storage
            .items
            .lock()
            .extend(items.iter().map(|(key, value)| ((*key).to_owned(), (*value).to_owned())));
        storage
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.items.lock().get(key).cloned()
    }
}

impl LocalStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.items.lock().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.items.lock().remove(key);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingCache {
    clears: Mutex<usize>,
}

impl RecordingCache {
    pub fn clears(&self) -> usize {
        *self.clears.lock()
    }
}

impl ResponseCachePort for RecordingCache {
    fn clear(&self) -> Result<()> {
        *self.clears.lock() += 1;
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes.lock().push(route);
    }
}

#[derive(Default)]
pub struct RecordingTelemetry {
    reports: Mutex<Vec<ErrorReport>>,
}

impl RecordingTelemetry {
    pub fn reports(&self) -> Vec<ErrorReport> {
        self.reports.lock().clone()
    }
}

impl TelemetryReporter for RecordingTelemetry {
    fn capture(&self, report: ErrorReport) {
        self.reports.lock().push(report);
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications.lock().push(notification);
    }
}

pub struct Fakes {
    pub storage: Arc<MemoryStorage>,
    pub cache: Arc<RecordingCache>,
    pub navigator: Arc<RecordingNavigator>,
}

/// Controller restored from `stored` raw storage entries.
pub fn controller_with(stored: &[(&str, &str)]) -> (Arc<SessionController>, Fakes) {
    let fakes = Fakes {
        storage: Arc::new(MemoryStorage::with_items(stored)),
        cache: Arc::new(RecordingCache::default()),
        navigator: Arc::new(RecordingNavigator::default()),
    };
    let controller = SessionController::restore(
        fakes.storage.clone(),
        fakes.cache.clone(),
        fakes.navigator.clone(),
    )
    .unwrap();
    (Arc::new(controller), fakes)
}
