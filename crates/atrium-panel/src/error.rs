//! Panel error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PanelError {
    #[error("View build failed: {0}")]
    ViewBuild(String),

    #[error("Panel is closed")]
    Closed,
}
