//! Dashboard wiring
//!
//! Owns the header-tab and connectivity observables and forwards their
//! changes into the panel, alongside the feed client the content views fetch
//! through. The panel itself runs on its own task; this type is the
//! host-facing owner.

use atrium_events::{Observable, Subscription};
use atrium_feed::FeedClient;
use atrium_panel::{
    ConnectivityState, DashboardPanel, PanelHandle, PanelStatus, PanelSurface, TabKind, ViewFactory,
};
use tokio::sync::watch;

use crate::config::Config;
use crate::Result;

pub struct Dashboard {
    /// Configuration
    config: Config,
    /// Client for the platform news resource
    news: FeedClient,
    /// Currently selected header tab
    header_tab: Observable<TabKind>,
    /// Platform reachability, as reported by the host
    connectivity: Observable<ConnectivityState>,
    /// Handle to the spawned panel task
    panel: PanelHandle,
    _tab_subscription: Subscription<TabKind>,
    _connectivity_subscription: Subscription<ConnectivityState>,
}

impl Dashboard {
    /// Wire a dashboard against a host-supplied surface and view factory.
    pub fn new<S, F>(config: Config, surface: S, factory: F) -> Result<Self>
    where
        S: PanelSurface,
        F: ViewFactory<View = S::View>,
    {
        let news = FeedClient::with_timeout(config.api_base.clone(), config.request_timeout)?;
        let panel = DashboardPanel::spawn(surface, factory);

        let header_tab = Observable::new(TabKind::default());
        let connectivity = Observable::new(ConnectivityState::Online);

        let events = panel.events();
        let tab_subscription = header_tab.subscribe(move |tab: &TabKind| {
            let _ = events.select_tab(*tab);
        });

        let events = panel.events();
        let connectivity_subscription =
            connectivity.subscribe(move |state: &ConnectivityState| {
                let _ = events.set_connectivity(*state);
            });

        tracing::info!(api_base = %config.api_base, "Dashboard initialized");

        Ok(Self {
            config,
            news,
            header_tab,
            connectivity,
            panel,
            _tab_subscription: tab_subscription,
            _connectivity_subscription: connectivity_subscription,
        })
    }

    // === Tab operations ===

    /// Select a tab. Re-selecting the current tab reloads it.
    pub fn select_tab(&self, tab: TabKind) {
        self.header_tab.set(tab);
    }

    /// Reload the current tab.
    pub fn refresh(&self) {
        self.header_tab.trigger();
    }

    pub fn current_tab(&self) -> TabKind {
        self.header_tab.get()
    }

    // === Lifecycle ===

    /// Notify the panel the overlay finished appearing.
    pub fn show(&self) -> Result<()> {
        Ok(self.panel.pop_in()?)
    }

    /// Notify the panel the overlay finished disappearing.
    pub fn hide(&self) -> Result<()> {
        Ok(self.panel.pop_out()?)
    }

    pub fn set_connectivity(&self, state: ConnectivityState) {
        self.connectivity.set(state);
    }

    /// Tear the panel down and wait for its task to finish.
    pub async fn close(self) {
        self.panel.close().await;
    }

    // === Accessors ===

    pub fn status(&self) -> PanelStatus {
        self.panel.status()
    }

    pub fn watch_status(&self) -> watch::Receiver<PanelStatus> {
        self.panel.watch_status()
    }

    pub fn news(&self) -> &FeedClient {
        &self.news
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
