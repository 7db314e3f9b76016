//! Atrium Dashboard Panel
//!
//! A single visible child view, swapped asynchronously in response to tab
//! selection. The panel guarantees at most one in-flight content load and at
//! most one visible loading indicator: a new tab event cancels the previous
//! load, and a superseded load's result is discarded even if it completes.

mod error;
mod panel;
mod state;
mod surface;
mod tab;

pub use error::PanelError;
pub use panel::{DashboardPanel, PanelEvent, PanelEvents, PanelHandle};
pub use state::{ConnectivityState, PanelPhase, PanelStatus};
pub use surface::{PanelSurface, ViewFactory, ViewRegistry};
pub use tab::TabKind;

pub type Result<T> = std::result::Result<T, PanelError>;
