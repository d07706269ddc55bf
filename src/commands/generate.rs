//! Generate static files

use anyhow::Result;

use crate::content::{DataLoader, DataSource};
use crate::generator::Generator;
use crate::Dashboard;

/// Render the dashboard into the public directory
///
/// Data is read from the site directory, or from a deployed site when
/// `from` is given.
pub async fn run(dashboard: &Dashboard, from: Option<&str>) -> Result<()> {
    let start = std::time::Instant::now();

    let loader = match from {
        Some(url) => {
            tracing::info!("Loading data from {}", url);
            DataLoader::new(DataSource::http(url))
        }
        None => dashboard.loader(),
    };
    let data = loader.load_all().await;

    tracing::info!(
        "Loaded {} mentors, {} weekly updates, {} milestones and {} blog posts",
        data.mentor.mentors.len(),
        data.weekly_updates.len(),
        data.milestones.len(),
        data.blog_posts.len()
    );

    let generator = Generator::new(dashboard)?;
    generator.generate(&data)?;

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[tokio::test]
    async fn test_generate_with_broken_config_renders_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.json"), "{ not json").unwrap();

        let dashboard = Dashboard::new(dir.path()).unwrap();
        run(&dashboard, None).await.unwrap();

        let html = fs::read_to_string(dir.path().join("public/index.html")).unwrap();
        assert!(html.contains("GSoC Student"));
        assert!(html.contains("No feedback yet."));
    }
}
