//! Atrium News Feed
//!
//! Builds paginated, read-only queries against the platform news resource and
//! executes them against a caller-configured API base. The shape of the news
//! payload itself is owned by the caller; responses decode into any
//! `DeserializeOwned` type.

mod client;
mod cursor;
mod error;
mod request;

pub use client::FeedClient;
pub use cursor::Cursor;
pub use error::FeedError;
pub use request::GetNewsRequest;

pub type Result<T> = std::result::Result<T, FeedError>;
