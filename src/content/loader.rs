//! Data loader - loads the dashboard's JSON resources
//!
//! Every resource has a hard-coded fallback. A missing file, a failed
//! request or a parse error is logged and replaced by that fallback; the
//! loader never fails.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::PathBuf;

use super::models::{
    BlogPost, CommunityFile, GitHubStats, MentorFile, Milestone, ProjectFile, WeeklyUpdate,
};
use crate::config::DashboardConfig;

/// A static JSON resource of the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Config,
    Project,
    Community,
    Mentor,
    BlogPosts,
    WeeklyUpdates,
    Milestones,
    GitHubStats,
}

impl Resource {
    /// Path relative to the site root
    pub fn path(self) -> &'static str {
        match self {
            Resource::Config => "config.json",
            Resource::Project => "data/project.json",
            Resource::Community => "data/community.json",
            Resource::Mentor => "data/mentor.json",
            Resource::BlogPosts => "data/blog-posts.json",
            Resource::WeeklyUpdates => "data/weekly-updates.json",
            Resource::Milestones => "data/milestones.json",
            Resource::GitHubStats => "data/github-contributions.json",
        }
    }
}

/// Where resources are read from
#[derive(Debug, Clone)]
pub enum DataSource {
    /// A site directory on disk
    Dir(PathBuf),
    /// A deployed site, fetched over HTTP
    Http {
        client: reqwest::Client,
        base_url: String,
    },
}

impl DataSource {
    pub fn http(base_url: impl Into<String>) -> Self {
        DataSource::Http {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

/// Everything a dashboard render needs
#[derive(Debug, Clone, Default)]
pub struct DashboardData {
    pub config: DashboardConfig,
    pub project: ProjectFile,
    pub community: CommunityFile,
    pub mentor: MentorFile,
    pub blog_posts: Vec<BlogPost>,
    pub weekly_updates: Vec<WeeklyUpdate>,
    pub milestones: Vec<Milestone>,
    pub github: GitHubStats,
}

/// Loads resources from a [`DataSource`]
pub struct DataLoader {
    source: DataSource,
}

impl DataLoader {
    /// Create a new data loader
    pub fn new(source: DataSource) -> Self {
        Self { source }
    }

    /// Load every resource, one after another
    pub async fn load_all(&self) -> DashboardData {
        let config = self.load::<DashboardConfig>(Resource::Config).await;
        let github = self.load(Resource::GitHubStats).await;
        let blog_posts = self.load(Resource::BlogPosts).await;
        let mentor = self.load(Resource::Mentor).await;
        let weekly_updates = self.load(Resource::WeeklyUpdates).await;
        let milestones = self.load(Resource::Milestones).await;
        let project = self.load(Resource::Project).await;
        let community = self.load(Resource::Community).await;

        DashboardData {
            config,
            project,
            community,
            mentor,
            blog_posts,
            weekly_updates,
            milestones,
            github,
        }
    }

    /// Load a resource, substituting its default on any failure
    pub async fn load<T>(&self, resource: Resource) -> T
    where
        T: DeserializeOwned + Default,
    {
        match self.try_load(resource).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Using default for {}: {:#}", resource.path(), e);
                T::default()
            }
        }
    }

    async fn try_load<T: DeserializeOwned>(&self, resource: Resource) -> Result<T> {
        let raw = match &self.source {
            DataSource::Dir(dir) => {
                let path = dir.join(resource.path());
                tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("Failed to read {:?}", path))?
            }
            DataSource::Http { client, base_url } => {
                let url = format!("{}/{}", base_url.trim_end_matches('/'), resource.path());
                tracing::debug!("GET {}", url);
                let response = client.get(&url).send().await?;
                if !response.status().is_success() {
                    anyhow::bail!("{} returned {}", url, response.status());
                }
                response.text().await?
            }
        };

        Ok(serde_json::from_str(&raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[tokio::test]
    async fn test_missing_files_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let loader = DataLoader::new(DataSource::Dir(dir.path().to_path_buf()));
        let data = loader.load_all().await;

        assert_eq!(data.config.student.name, "GSoC Student");
        assert_eq!(data.config.student.avatar, "https://via.placeholder.com/120");
        assert!(data.mentor.mentors.is_empty());
        assert!(data.blog_posts.is_empty());
        assert_eq!(data.github.stats.commits, 0);
        assert!(data.github.contributions.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_json_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("data")).unwrap();
        fs::write(dir.path().join("data/milestones.json"), "{ not json").unwrap();
        fs::write(
            dir.path().join("data/weekly-updates.json"),
            r#"[{ "title": "Week 1", "summary": "Setup", "date": "2024-06-01" }]"#,
        )
        .unwrap();

        let loader = DataLoader::new(DataSource::Dir(dir.path().to_path_buf()));
        let milestones: Vec<Milestone> = loader.load(Resource::Milestones).await;
        let updates: Vec<WeeklyUpdate> = loader.load(Resource::WeeklyUpdates).await;

        assert!(milestones.is_empty());
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].title, "Week 1");
    }

    #[test]
    fn test_resource_paths() {
        assert_eq!(Resource::Config.path(), "config.json");
        assert_eq!(Resource::GitHubStats.path(), "data/github-contributions.json");
    }
}
