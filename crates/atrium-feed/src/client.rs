//! Feed client
//!
//! Thin executor for news requests. The payload schema belongs to the
//! caller, so responses decode into any `DeserializeOwned` type.

use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use crate::request::GetNewsRequest;
use crate::{FeedError, Result};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    base: Url,
}

impl FeedClient {
    pub fn new(base: Url) -> Result<Self> {
        Self::with_timeout(base, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base: Url, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Execute a news request and decode the JSON response.
    pub async fn fetch<T: DeserializeOwned>(&self, request: &GetNewsRequest) -> Result<T> {
        let url = request.url(&self.base)?;

        tracing::debug!(url = %url, "Fetching news feed");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, "News feed request rejected");
            return Err(FeedError::Status(status));
        }

        Ok(response.json().await?)
    }
}
