//! Atrium Overlay Core
//!
//! Ties the member crates together: configuration, the feed client, the
//! header-tab and connectivity observables, and the dashboard panel they
//! drive.

mod config;
mod dashboard;
mod error;

pub use config::Config;
pub use dashboard::Dashboard;
pub use error::CoreError;

pub use atrium_events::{Observable, Subscription};
pub use atrium_feed::{Cursor, FeedClient, FeedError, GetNewsRequest};
pub use atrium_panel::{
    ConnectivityState, PanelError, PanelEvent, PanelEvents, PanelHandle, PanelPhase, PanelStatus,
    PanelSurface, TabKind, ViewFactory, ViewRegistry,
};

pub type Result<T> = std::result::Result<T, CoreError>;
