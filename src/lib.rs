//! gsoc-dash: a GSoC progress dashboard
//!
//! Renders a student's dashboard from a directory of JSON data files,
//! serves it with optional in-place editing that commits back through the
//! GitHub Contents API, and aggregates the student's GitHub activity into
//! the stats file.

pub mod aggregate;
pub mod commands;
pub mod config;
pub mod content;
pub mod editor;
pub mod generator;
pub mod github;
pub mod helpers;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::Path;

/// The main dashboard application
#[derive(Debug, Clone)]
pub struct Dashboard {
    /// Site configuration
    pub config: config::DashboardConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Public (output) directory
    pub public_dir: std::path::PathBuf,
}

impl Dashboard {
    /// Create a new dashboard instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(content::Resource::Config.path());

        // Rendering never fails on a bad config; `fetch` loads it strictly
        let config = if config_path.exists() {
            config::DashboardConfig::load(&config_path).unwrap_or_else(|e| {
                tracing::warn!("Using default config: {:#}", e);
                config::DashboardConfig::default()
            })
        } else {
            config::DashboardConfig::default()
        };

        let public_dir = base_dir.join(&config.public_dir);

        Ok(Self {
            config,
            base_dir,
            public_dir,
        })
    }

    /// Loader reading from the site directory
    pub fn loader(&self) -> content::DataLoader {
        content::DataLoader::new(content::DataSource::Dir(self.base_dir.clone()))
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broken_config_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.json"), "{ not json").unwrap();

        let dashboard = Dashboard::new(dir.path()).unwrap();
        assert_eq!(dashboard.config.student.name, "GSoC Student");
        assert_eq!(dashboard.public_dir, dir.path().join("public"));
    }
}
