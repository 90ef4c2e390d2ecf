use lago_core::Navigator;
use lago_domain::Route;
use tokio::sync::watch;
use tracing::info;

/// Holds the current route and publishes every navigation.
pub struct WatchRouter {
    current: watch::Sender<Route>,
}

impl WatchRouter {
    pub fn new(initial: Route) -> Self {
        let (current, _) = watch::channel(initial);
        Self { current }
    }

    pub fn current(&self) -> Route {
        self.current.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.current.subscribe()
    }
}

impl Default for WatchRouter {
    fn default() -> Self {
        Self::new(Route::default())
    }
}

impl Navigator for WatchRouter {
    fn navigate(&self, route: Route) {
        info!(?route, "navigate");
        self.current.send_replace(route);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_see_route_changes() {
        let router = WatchRouter::new(Route::Home);
        let mut routes = router.subscribe();

        router.navigate(Route::Login);

        routes.changed().await.unwrap();
        assert_eq!(*routes.borrow(), Route::Login);
        assert_eq!(router.current(), Route::Login);
    }
}
