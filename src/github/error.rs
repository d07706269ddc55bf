//! GitHub API errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("API rate limit exceeded. Please provide a GITHUB_TOKEN to increase limits.")]
    RateLimited,

    #[error("Authentication failed (401). Your GITHUB_TOKEN is invalid or expired.")]
    BadCredentials,

    #[error("GitHub token not provided")]
    MissingToken,

    #[error("Request failed with status code {status}: {path}")]
    Status { status: u16, path: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    Decode(String),
}

impl GitHubError {
    /// Errors that make every further request pointless
    pub fn is_fatal(&self) -> bool {
        matches!(self, GitHubError::RateLimited | GitHubError::BadCredentials)
    }
}
