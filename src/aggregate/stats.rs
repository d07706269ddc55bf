//! Accumulating per-repository results into the stats document

use crate::content::{Contribution, GitHubStats, StatCounters};
use crate::helpers::timestamp_millis;

/// What one repository contributed
#[derive(Debug, Clone, Default)]
pub struct RepoReport {
    pub counters: StatCounters,
    pub contributions: Vec<Contribution>,
}

/// Running totals over all repositories
#[derive(Debug, Default)]
pub struct Accumulator {
    totals: StatCounters,
    contributions: Vec<(i64, Contribution)>,
}

impl Accumulator {
    pub fn add(&mut self, report: RepoReport) {
        self.totals += report.counters;
        self.contributions.extend(report.contributions.into_iter().map(|c| {
            let ts = timestamp_millis(&c.date).unwrap_or(i64::MIN);
            (ts, c)
        }));
    }

    pub fn totals(&self) -> StatCounters {
        self.totals
    }

    /// Newest first, ties in insertion order, at most `limit` entries
    pub fn finish(mut self, limit: usize, last_updated: String) -> GitHubStats {
        self.contributions.sort_by(|a, b| b.0.cmp(&a.0));
        self.contributions.truncate(limit);

        GitHubStats {
            stats: self.totals,
            contributions: self.contributions.into_iter().map(|(_, c)| c).collect(),
            last_updated: Some(last_updated),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contribution(title: &str, date: &str) -> Contribution {
        Contribution {
            title: title.to_string(),
            description: String::new(),
            date: date.to_string(),
            url: String::new(),
        }
    }

    #[test]
    fn test_sorted_newest_first_with_stable_ties() {
        let mut acc = Accumulator::default();
        acc.add(RepoReport {
            counters: StatCounters::default(),
            contributions: vec![
                contribution("old", "2024-03-01T00:00:00Z"),
                contribution("tie-a", "2024-05-01T00:00:00Z"),
            ],
        });
        acc.add(RepoReport {
            counters: StatCounters::default(),
            contributions: vec![
                contribution("tie-b", "2024-05-01T00:00:00Z"),
                contribution("new", "2024-06-01T00:00:00Z"),
            ],
        });

        let stats = acc.finish(20, "now".to_string());
        let titles: Vec<_> = stats.contributions.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["new", "tie-a", "tie-b", "old"]);
    }

    #[test]
    fn test_capped_at_limit() {
        let mut acc = Accumulator::default();
        for repo in 0..5 {
            acc.add(RepoReport {
                counters: StatCounters {
                    commits: 1,
                    ..Default::default()
                },
                contributions: (0..5)
                    .map(|i| {
                        let date = format!("2024-06-{:02}", repo * 5 + i + 1);
                        contribution(&format!("{}-{}", repo, i), &date)
                    })
                    .collect(),
            });
        }

        assert_eq!(acc.totals().commits, 5);
        let stats = acc.finish(20, "now".to_string());
        assert_eq!(stats.contributions.len(), 20);
        assert_eq!(stats.contributions[0].title, "4-4");
        assert_eq!(stats.last_updated.as_deref(), Some("now"));
    }

    #[test]
    fn test_undated_entries_sink() {
        let mut acc = Accumulator::default();
        acc.add(RepoReport {
            counters: StatCounters::default(),
            contributions: vec![contribution("undated", ""), contribution("dated", "2024-01-01")],
        });
        let stats = acc.finish(20, String::new());
        assert_eq!(stats.contributions[0].title, "dated");
    }
}
