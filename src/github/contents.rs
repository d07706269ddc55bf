//! GitHub Contents API client
//!
//! Reads a file together with its revision id (the blob `sha`) and writes
//! new content conditioned on that revision. The write is a
//! compare-and-swap: if the file changed since it was read, GitHub answers
//! 409 and nothing is written.

use base64::{engine::general_purpose, Engine as _};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};

use super::{api::classify, GitHubError, API_VERSION, USER_AGENT};
use crate::config::EditorConfig;

/// File content and the revision it was read at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    pub content: String,
    pub revision: String,
}

/// Result of a conditional write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The write landed; `revision` is the new blob sha
    Applied { revision: String },
    /// The remote file no longer matches the expected revision
    Conflict,
    /// Anything else: missing token, rejected request, transport error
    Failed { reason: String },
}

impl WriteOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, WriteOutcome::Applied { .. })
    }
}

#[derive(Deserialize)]
struct ContentResponse {
    content: String,
    sha: String,
}

#[derive(Serialize)]
struct UpdateRequest<'a> {
    message: &'a str,
    committer: Committer<'a>,
    content: String,
    sha: &'a str,
    branch: &'a str,
}

#[derive(Serialize)]
struct Committer<'a> {
    name: &'a str,
    email: &'a str,
}

#[derive(Deserialize)]
struct UpdateResponse {
    content: UpdatedContent,
}

#[derive(Deserialize)]
struct UpdatedContent {
    sha: String,
}

/// Client bound to one repository and branch
#[derive(Debug, Clone)]
pub struct ContentClient {
    http: Client,
    base_url: String,
    editor: EditorConfig,
    token: Option<String>,
}

impl ContentClient {
    pub fn new(base_url: impl Into<String>, editor: EditorConfig, token: Option<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            editor,
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn contents_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.base_url,
            self.editor.owner,
            self.editor.repo,
            path.trim_start_matches('/')
        )
    }

    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder, GitHubError> {
        let token = self.token.as_ref().ok_or(GitHubError::MissingToken)?;
        Ok(request
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/vnd.github+json")
            .header("Authorization", format!("Bearer {}", token))
            .header("X-GitHub-Api-Version", API_VERSION))
    }

    /// Read a file and its current revision
    pub async fn fetch_file(&self, path: &str) -> Result<RemoteFile, GitHubError> {
        let url = self.contents_url(path);
        let request = self
            .http
            .get(&url)
            .query(&[("ref", self.editor.branch.as_str())]);
        let response = self.authorized(request)?.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(classify(status, response.headers(), path));
        }

        let body: ContentResponse = response
            .json()
            .await
            .map_err(|e| GitHubError::Decode(e.to_string()))?;
        let content = decode_content(&body.content)?;

        Ok(RemoteFile {
            content,
            revision: body.sha,
        })
    }

    /// Write `content` to `path` if the file is still at `revision`
    pub async fn write_file(&self, path: &str, content: &str, revision: &str) -> WriteOutcome {
        match self.try_write(path, content, revision).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!("Write to {} failed: {}", path, e);
                WriteOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn try_write(
        &self,
        path: &str,
        content: &str,
        revision: &str,
    ) -> Result<WriteOutcome, GitHubError> {
        let body = UpdateRequest {
            message: &self.editor.message,
            committer: Committer {
                name: &self.editor.committer_name,
                email: &self.editor.committer_email,
            },
            content: general_purpose::STANDARD.encode(content.as_bytes()),
            sha: revision,
            branch: &self.editor.branch,
        };

        let request = self.http.put(self.contents_url(path)).json(&body);
        let response = self.authorized(request)?.send().await?;

        let status = response.status();
        if status == StatusCode::CONFLICT {
            return Ok(WriteOutcome::Conflict);
        }
        if !status.is_success() {
            return Err(classify(status, response.headers(), path));
        }

        let updated: UpdateResponse = response
            .json()
            .await
            .map_err(|e| GitHubError::Decode(e.to_string()))?;

        Ok(WriteOutcome::Applied {
            revision: updated.content.sha,
        })
    }
}

/// Decode the base64 payload GitHub returns (wrapped at 60 columns)
fn decode_content(encoded: &str) -> Result<String, GitHubError> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = general_purpose::STANDARD
        .decode(compact)
        .map_err(|e| GitHubError::Decode(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| GitHubError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_wrapped_content() {
        let encoded = general_purpose::STANDARD.encode("{\n  \"title\": \"Résumé\"\n}");
        let (a, b) = encoded.split_at(10);
        let wrapped = format!("{}\n{}\n", a, b);
        assert_eq!(
            decode_content(&wrapped).unwrap(),
            "{\n  \"title\": \"Résumé\"\n}"
        );
    }

    #[test]
    fn test_decode_garbage() {
        assert!(matches!(
            decode_content("!!!"),
            Err(GitHubError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_token_never_sends() {
        let client = ContentClient::new("http://127.0.0.1:9", EditorConfig::default(), None);
        assert!(!client.has_token());
        assert!(matches!(
            client.fetch_file("data/project.json").await,
            Err(GitHubError::MissingToken)
        ));
        let outcome = client.write_file("data/project.json", "{}", "abc").await;
        assert!(matches!(outcome, WriteOutcome::Failed { .. }));
    }
}
