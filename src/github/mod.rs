//! GitHub REST clients
//!
//! `api` serves the read-only queries of the aggregator, `contents` the
//! read/compare-and-swap file access of the editor.

pub mod api;
pub mod contents;
mod error;
pub mod link;

pub use api::{ApiClient, ApiResponse, SearchItem, SearchResults};
pub use contents::{ContentClient, RemoteFile, WriteOutcome};
pub use error::GitHubError;

/// Default API endpoint
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Pinned REST API version
pub const API_VERSION: &str = "2022-11-28";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
