//! GitHub contribution aggregator
//!
//! For every configured repository, counts merged pull requests, issues,
//! reviews and commits by the student over the last six months and
//! collects their recent pull requests. Repositories are processed
//! concurrently; one failing repository is logged and skipped, while a
//! rate-limit or bad-credentials answer aborts the whole run.

mod stats;

pub use stats::{Accumulator, RepoReport};

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tokio::task::JoinSet;

use crate::config::DashboardConfig;
use crate::content::{Contribution, GitHubStats, Resource, StatCounters};
use crate::github::{link, ApiClient, GitHubError};
use crate::helpers::{encode_component, months_ago, parse_repo_url, RepoRef};

/// Maximum number of contributions kept in the output
pub const CONTRIBUTION_LIMIT: usize = 20;

/// Pull requests taken from each repository's search results
const PRS_PER_REPO: usize = 5;

/// How far back the queries look
const WINDOW_MONTHS: u32 = 6;

/// Token values that come from copying the sample `.env`
const PLACEHOLDER_TOKENS: &[&str] = &["your_github_token_here", "your_token"];

/// Aggregator options
#[derive(Debug, Clone)]
pub struct AggregateOptions {
    pub api_url: String,
    pub token: Option<String>,
    pub now: DateTime<Utc>,
}

/// Time window of the queries
#[derive(Debug, Clone)]
struct Window {
    /// `YYYY-MM-DD`, for search qualifiers
    date: String,
    /// RFC 3339, for the commits `since` parameter
    since: String,
}

impl Window {
    fn ending(now: DateTime<Utc>) -> Self {
        let start = months_ago(now, WINDOW_MONTHS);
        Self {
            date: start.format("%Y-%m-%d").to_string(),
            since: start.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Drop empty or placeholder tokens
pub fn sanitize_token(token: Option<String>) -> Option<String> {
    match token {
        Some(t) if t.trim().is_empty() || PLACEHOLDER_TOKENS.contains(&t.trim()) => {
            tracing::warn!("GITHUB_TOKEN appears to be a placeholder or empty. Ignoring it.");
            None
        }
        Some(t) => Some(t.trim().to_string()),
        None => None,
    }
}

/// Run the aggregator for the configured student and repositories
///
/// Returns `Ok(None)` when there is nothing to aggregate.
pub async fn run(
    config: &DashboardConfig,
    options: AggregateOptions,
) -> Result<Option<GitHubStats>> {
    let urls = config.project.urls();
    let username = config.github_username();

    let username = match username {
        Some(u) if !urls.is_empty() => u,
        _ => {
            tracing::warn!("Repositories list or student GitHub URL missing/invalid in config.");
            return Ok(None);
        }
    };

    let repos: Vec<RepoRef> = urls
        .iter()
        .filter_map(|url| {
            let repo = parse_repo_url(url);
            if repo.is_none() {
                tracing::warn!("Skipping invalid repository URL: {}", url);
            }
            repo
        })
        .collect();

    if options.token.is_none() {
        tracing::warn!("GITHUB_TOKEN is not set; running unauthenticated (60 requests/hour).");
    }

    tracing::info!("Fetching data for user: {}", username);
    tracing::info!("Processing {} repositories...", repos.len());

    let client = ApiClient::new(options.api_url, options.token);
    let stats = aggregate(client, &username, repos, options.now)
        .await
        .context("Error fetching GitHub data")?;

    Ok(Some(stats))
}

/// Query every repository concurrently and merge the results in input order
pub async fn aggregate(
    client: ApiClient,
    username: &str,
    repos: Vec<RepoRef>,
    now: DateTime<Utc>,
) -> Result<GitHubStats, GitHubError> {
    let window = Window::ending(now);
    let mut tasks = JoinSet::new();

    for (index, repo) in repos.into_iter().enumerate() {
        let client = client.clone();
        let username = username.to_string();
        let window = window.clone();
        tasks.spawn(async move {
            tracing::info!("Fetching data for {}...", repo);
            let result = fetch_repo(&client, &repo, &username, &window).await;
            (index, repo, result)
        });
    }

    let mut results = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(done) => results.push(done),
            Err(e) => tracing::error!("Repository task failed: {}", e),
        }
    }
    results.sort_by_key(|(index, _, _)| *index);

    let mut acc = Accumulator::default();
    let mut fatal = None;
    for (_, repo, result) in results {
        match result {
            Ok(report) => {
                tracing::debug!("{}: {:?}", repo, report.counters);
                acc.add(report);
            }
            Err(e) if e.is_fatal() => {
                fatal.get_or_insert(e);
            }
            Err(e) => tracing::error!("Error processing {}: {}", repo, e),
        }
    }

    if let Some(e) = fatal {
        return Err(e);
    }

    tracing::info!("Stats: {:?}", acc.totals());
    Ok(acc.finish(
        CONTRIBUTION_LIMIT,
        now.to_rfc3339_opts(SecondsFormat::Millis, true),
    ))
}

/// The four queries for one repository, issued together
async fn fetch_repo(
    client: &ApiClient,
    repo: &RepoRef,
    username: &str,
    window: &Window,
) -> Result<RepoReport, GitHubError> {
    let pr_query = format!(
        "repo:{} is:pr is:merged author:{} created:>{}",
        repo, username, window.date
    );
    let issue_query = format!(
        "repo:{} is:issue author:{} created:>{}",
        repo, username, window.date
    );
    let review_query = format!(
        "repo:{} is:pr reviewed-by:{} -author:{} created:>{}",
        repo, username, username, window.date
    );
    let commits_path = format!(
        "/repos/{}/{}/commits?author={}&since={}&per_page=1",
        repo.owner,
        repo.repo,
        encode_component(username),
        encode_component(&window.since)
    );

    let (prs, issues, reviews, commits) = tokio::join!(
        client.search_issues(&pr_query),
        client.search_issues(&issue_query),
        client.search_issues(&review_query),
        client.get_json::<serde_json::Value>(&commits_path),
    );

    let (prs, issues, reviews, commits) = match (prs, issues, reviews, commits) {
        (Ok(p), Ok(i), Ok(r), Ok(c)) => (p, i, r, c),
        (p, i, r, c) => {
            let mut errors: Vec<GitHubError> = [p.err(), i.err(), r.err(), c.err()]
                .into_iter()
                .flatten()
                .collect();
            let pick = errors.iter().position(GitHubError::is_fatal).unwrap_or(0);
            return Err(errors.swap_remove(pick));
        }
    };

    let commit_count = link::commit_count(commits.link.as_deref(), commits.data.as_ref());

    let contributions = prs
        .items
        .iter()
        .take(PRS_PER_REPO)
        .map(|item| Contribution {
            title: item.title.clone(),
            description: format!("Pull Request #{} in {}", item.number, repo),
            date: item.created_at.clone(),
            url: item.html_url.clone(),
        })
        .collect();

    Ok(RepoReport {
        counters: StatCounters {
            commits: commit_count,
            pull_requests: prs.total_count,
            issues: issues.total_count,
            reviews: reviews.total_count,
        },
        contributions,
    })
}

/// Write the stats document under `base_dir`, creating `data/` if needed
pub fn write_stats(base_dir: &Path, stats: &GitHubStats) -> Result<PathBuf> {
    let path = base_dir.join(Resource::GitHubStats.path());
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(stats)?;
    fs::write(&path, content).with_context(|| format!("Failed to write {:?}", path))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_sanitize_token() {
        assert_eq!(sanitize_token(None), None);
        assert_eq!(sanitize_token(Some("  ".to_string())), None);
        assert_eq!(sanitize_token(Some("your_token".to_string())), None);
        assert_eq!(
            sanitize_token(Some("ghp_abc\n".to_string())).as_deref(),
            Some("ghp_abc")
        );
    }

    #[test]
    fn test_window() {
        let now = Utc.with_ymd_and_hms(2024, 9, 15, 8, 0, 0).unwrap();
        let window = Window::ending(now);
        assert_eq!(window.date, "2024-03-15");
        assert_eq!(window.since, "2024-03-15T08:00:00.000Z");
    }

    #[tokio::test]
    async fn test_nothing_to_do_without_repositories() {
        let config = DashboardConfig::default();
        let options = AggregateOptions {
            api_url: "http://127.0.0.1:9".to_string(),
            token: None,
            now: Utc::now(),
        };
        assert!(run(&config, options).await.unwrap().is_none());
    }

    #[test]
    fn test_write_stats_creates_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_stats(dir.path(), &GitHubStats::default()).unwrap();
        assert!(path.ends_with("data/github-contributions.json"));
        let written = fs::read_to_string(path).unwrap();
        assert!(written.contains("\"pullRequests\": 0"));
    }
}
