//! Dashboard configuration (config.json)

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main dashboard configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardConfig {
    pub student: StudentProfile,
    pub project: ProjectRepos,
    pub editor: EditorConfig,

    // Directory
    pub public_dir: String,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            student: StudentProfile::default(),
            project: ProjectRepos::default(),
            editor: EditorConfig::default(),
            public_dir: "public".to_string(),
            extra: IndexMap::new(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        Self::parse(&content).with_context(|| format!("Failed to parse {:?}", path))
    }

    /// Parse configuration from a JSON string
    pub fn parse(content: &str) -> Result<Self> {
        let config: DashboardConfig = serde_json::from_str(content)?;
        Ok(config)
    }

    /// GitHub username taken from the last path segment of the student's GitHub URL
    pub fn github_username(&self) -> Option<String> {
        let url = self.student.github.trim().trim_end_matches('/');
        url.rsplit('/')
            .next()
            .filter(|s| !s.is_empty() && !s.contains(':'))
            .map(|s| s.to_string())
    }
}

/// The student profile shown in the header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudentProfile {
    pub name: String,
    pub bio: String,
    pub avatar: String,
    pub github: String,
    pub email: String,
    pub blog: String,
    pub linkedin: String,
}

impl Default for StudentProfile {
    fn default() -> Self {
        Self {
            name: "GSoC Student".to_string(),
            bio: "Google Summer of Code Contributor".to_string(),
            avatar: "https://via.placeholder.com/120".to_string(),
            github: String::new(),
            email: String::new(),
            blog: String::new(),
            linkedin: String::new(),
        }
    }
}

/// Repositories the aggregator reports on
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectRepos {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub repositories: Vec<String>,
}

impl ProjectRepos {
    /// Repository URLs, preferring the list form over the legacy single entry
    pub fn urls(&self) -> Vec<String> {
        if !self.repositories.is_empty() {
            return self.repositories.clone();
        }
        self.repository
            .iter()
            .filter(|r| !r.trim().is_empty())
            .cloned()
            .collect()
    }
}

/// Where edits are committed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    pub editable: bool,
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub committer_name: String,
    pub committer_email: String,
    pub message: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            editable: false,
            owner: String::new(),
            repo: String::new(),
            branch: "main".to_string(),
            committer_name: "gsoc-dash bot".to_string(),
            committer_email: "gsoc-dash-bot@example.com".to_string(),
            message: "chore: update dashboard data".to_string(),
        }
    }
}
