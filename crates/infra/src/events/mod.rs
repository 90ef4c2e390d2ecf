//! Presentation-facing event channels
//!
//! Adapters for the `Navigator` and `Notifier` ports that publish on tokio
//! channels: the current route on a `watch`, toasts on a `broadcast`.

pub mod notification_center;
pub mod router;

pub use notification_center::NotificationCenter;
pub use router::WatchRouter;
