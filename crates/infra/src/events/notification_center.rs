use lago_core::Notifier;
use lago_domain::Notification;
use tokio::sync::broadcast;
use tracing::debug;

const CHANNEL_CAPACITY: usize = 64;

/// Toast queue. Notifications sent while nobody listens are dropped.
pub struct NotificationCenter {
    sender: broadcast::Sender<Notification>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for NotificationCenter {
    fn notify(&self, notification: Notification) {
        debug!(severity = ?notification.severity, key = ?notification.translate_key, "notification");
        // Err only means there is no subscriber.
        let _ = self.sender.send(notification);
    }
}
