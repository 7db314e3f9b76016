//! Overlay configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the platform API; the news resource lives under it.
    pub api_base: Url,
    /// Per-request timeout for feed fetches.
    #[serde(default = "default_request_timeout")]
    pub request_timeout: Duration,
}

impl Config {
    pub fn new(api_base: Url) -> Self {
        Self {
            api_base,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

fn default_request_timeout() -> Duration {
    DEFAULT_REQUEST_TIMEOUT
}
