//! Refresh the GitHub stats file

use anyhow::Result;
use chrono::Utc;

use crate::aggregate::{self, AggregateOptions};
use crate::config::DashboardConfig;
use crate::content::Resource;
use crate::Dashboard;

/// Aggregate the student's GitHub activity into `data/github-contributions.json`
///
/// Reads the token from `GITHUB_TOKEN`. Unlike rendering, a missing or
/// broken `config.json` fails the command. Individual repository failures
/// are logged; rate limiting and bad credentials fail the command.
pub async fn run(dashboard: &Dashboard, api_url: &str) -> Result<()> {
    let config = DashboardConfig::load(dashboard.base_dir.join(Resource::Config.path()))?;
    let token = aggregate::sanitize_token(std::env::var("GITHUB_TOKEN").ok());
    let options = AggregateOptions {
        api_url: api_url.to_string(),
        token,
        now: Utc::now(),
    };

    match aggregate::run(&config, options).await? {
        Some(stats) => {
            let path = aggregate::write_stats(&dashboard.base_dir, &stats)?;
            tracing::info!("Successfully updated {:?}", path);
        }
        None => tracing::warn!("Nothing to fetch; stats file left unchanged"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        let dashboard = Dashboard::new(dir.path()).unwrap();
        assert!(run(&dashboard, "http://127.0.0.1:9").await.is_err());
    }

    #[tokio::test]
    async fn test_broken_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.json"), "{ not json").unwrap();
        let dashboard = Dashboard::new(dir.path()).unwrap();
        assert!(run(&dashboard, "http://127.0.0.1:9").await.is_err());
    }
}
