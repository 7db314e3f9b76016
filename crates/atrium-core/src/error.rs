//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Panel error: {0}")]
    Panel(#[from] atrium_panel::PanelError),

    #[error("Feed error: {0}")]
    Feed(#[from] atrium_feed::FeedError),
}
