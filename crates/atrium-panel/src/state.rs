//! Panel state model
//!
//! The panel moves between three phases:
//! ```text
//! Idle(tab)
//!   ↓ tab selected / redisplay
//! Loading(tab)
//!   ↓ build completes with the current token
//! Idle(tab)
//!   ↓ teardown
//! Closed
//! ```
//! Visible content and indicator visibility always reflect the latest tab
//! event; results of superseded loads never reach the screen.

use serde::{Deserialize, Serialize};

use crate::tab::TabKind;

/// Reachability of the backing platform, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectivityState {
    Online,
    Offline,
}

impl ConnectivityState {
    pub fn is_online(&self) -> bool {
        matches!(self, ConnectivityState::Online)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "phase")]
pub enum PanelPhase {
    /// No load in flight; `tab` is the last settled tab.
    Idle { tab: TabKind },
    /// Indicator shown; content for `tab` is being built (or deferred while
    /// offline).
    Loading { tab: TabKind },
    /// Torn down; no further events are processed.
    Closed,
}

/// Snapshot published on every panel transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelStatus {
    pub phase: PanelPhase,
    pub visible: bool,
    pub online: bool,
    /// The next pop-in must force a fresh reload.
    pub redisplay_required: bool,
    pub has_content: bool,
}

impl PanelStatus {
    pub fn is_idle(&self) -> bool {
        matches!(self.phase, PanelPhase::Idle { .. })
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, PanelPhase::Loading { .. })
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.phase, PanelPhase::Closed)
    }
}
