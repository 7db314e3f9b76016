//! News feed request builder
//!
//! Pure construction: translates an immutable query into request parameters.
//! A year of 0 behaves exactly like an absent year, and absent fields are
//! omitted from the query string entirely.

use url::Url;

use crate::cursor::Cursor;
use crate::Result;

const NEWS_PATH: &str = "news";

/// Read-only query against the news resource.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetNewsRequest {
    year: Option<i32>,
    cursor: Option<Cursor>,
}

impl GetNewsRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter to a single year. A value of 0 leaves the feed unfiltered.
    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Resume from a cursor returned by a previous page.
    pub fn cursor(mut self, cursor: Cursor) -> Self {
        self.cursor = Some(cursor);
        self
    }

    /// Query parameters in serialization order: cursor fields first, then
    /// the year filter.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();

        if let Some(cursor) = &self.cursor {
            pairs.extend(cursor.query_pairs());
        }

        match self.year {
            Some(year) if year != 0 => pairs.push(("year".to_string(), year.to_string())),
            _ => {}
        }

        pairs
    }

    /// Full request URL against the given API base.
    pub fn url(&self, base: &Url) -> Result<Url> {
        let mut url = base.join(NEWS_PATH)?;

        let pairs = self.query_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }

        Ok(url)
    }
}
