//! Read-only GitHub REST client used by the aggregator

use reqwest::{header::HeaderMap, Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{GitHubError, API_VERSION, USER_AGENT};

/// A decoded response body plus the headers the aggregator cares about
#[derive(Debug)]
pub struct ApiResponse<T> {
    /// `None` when the resource does not exist (HTTP 404)
    pub data: Option<T>,
    /// Raw `Link` header
    pub link: Option<String>,
}

/// `GET /search/issues` response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchItem {
    pub title: String,
    pub number: u64,
    pub created_at: String,
    pub html_url: String,
}

/// Thin GET-only client over the GitHub REST API
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    /// GET `path` (which includes its query string) and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<ApiResponse<T>, GitHubError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("GET {}", url);

        let mut request = self
            .http
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION);
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = request.send().await?;
        let status = response.status();
        let link = response
            .headers()
            .get("link")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        if status == StatusCode::NOT_FOUND {
            return Ok(ApiResponse { data: None, link });
        }
        if !status.is_success() {
            return Err(classify(status, response.headers(), path));
        }

        let body = response.text().await?;
        let data = serde_json::from_str(&body)
            .map_err(|e| GitHubError::Decode(format!("{}: {}", path, e)))?;

        Ok(ApiResponse {
            data: Some(data),
            link,
        })
    }

    /// Run an issue search and return the decoded results (empty on 404)
    pub async fn search_issues(&self, query: &str) -> Result<SearchResults, GitHubError> {
        let path = format!("/search/issues?q={}", crate::helpers::encode_component(query));
        let response = self.get_json::<SearchResults>(&path).await?;
        Ok(response.data.unwrap_or_default())
    }
}

/// Map a non-success status to an error
pub(crate) fn classify(status: StatusCode, headers: &HeaderMap, path: &str) -> GitHubError {
    let quota_exhausted = headers
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim() == "0")
        .unwrap_or(false);

    match status {
        StatusCode::FORBIDDEN if quota_exhausted => GitHubError::RateLimited,
        StatusCode::UNAUTHORIZED => GitHubError::BadCredentials,
        _ => GitHubError::Status {
            status: status.as_u16(),
            path: path.to_string(),
        },
    }
}
