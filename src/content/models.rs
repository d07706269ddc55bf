//! Dashboard data documents
//!
//! Every document is plain JSON kept in the `data/` directory. Legacy
//! shapes (a single `mentor`, plain-string channels, a single
//! `repository`) are normalized while deserializing, and list items that
//! arrive without an `_id` get a fresh one.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

type Extra = IndexMap<String, serde_json::Value>;

/// Treat an explicit `null` the same as a missing field
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Identifier of an editable list item
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// A new random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ItemId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Older files carry numeric ids (`Date.now() + Math.random()`)
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) if !s.is_empty() => Self(s),
            Raw::Text(_) => Self::generate(),
            Raw::Number(n) => Self(n.to_string()),
        })
    }
}

// ============================================================================
// Project
// ============================================================================

/// `data/project.json`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectFile {
    #[serde(default, deserialize_with = "null_default")]
    pub project: Project,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawProject")]
pub struct Project {
    pub title: String,
    pub description: String,
    pub organization: String,
    pub timeline: String,
    pub repositories: Vec<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Deserialize)]
struct RawProject {
    #[serde(default, deserialize_with = "null_default")]
    title: String,
    #[serde(default, deserialize_with = "null_default")]
    description: String,
    #[serde(default, deserialize_with = "null_default")]
    organization: String,
    #[serde(default, deserialize_with = "null_default")]
    timeline: String,
    #[serde(default, deserialize_with = "null_default")]
    repository: String,
    #[serde(default, deserialize_with = "null_default")]
    repositories: Vec<String>,
    #[serde(flatten)]
    extra: Extra,
}

impl From<RawProject> for Project {
    fn from(raw: RawProject) -> Self {
        let mut repositories = raw.repositories;
        if repositories.is_empty() && !raw.repository.trim().is_empty() {
            repositories.push(raw.repository);
        }
        Self {
            title: raw.title,
            description: raw.description,
            organization: raw.organization,
            timeline: raw.timeline,
            repositories,
            extra: raw.extra,
        }
    }
}

// ============================================================================
// Mentors and feedback
// ============================================================================

/// `data/mentor.json`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawMentorFile")]
pub struct MentorFile {
    pub mentors: Vec<Mentor>,
    pub feedback: Vec<FeedbackItem>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Deserialize)]
struct RawMentorFile {
    #[serde(default)]
    mentors: Option<Vec<Mentor>>,
    #[serde(default)]
    mentor: Option<Mentor>,
    #[serde(default, deserialize_with = "null_default")]
    feedback: Vec<FeedbackItem>,
    #[serde(flatten)]
    extra: Extra,
}

impl From<RawMentorFile> for MentorFile {
    fn from(raw: RawMentorFile) -> Self {
        let mentors = match (raw.mentors, raw.mentor) {
            (Some(list), _) => list,
            (None, Some(single)) => vec![single],
            (None, None) => Vec::new(),
        };
        Self {
            mentors,
            feedback: raw.feedback,
            extra: raw.extra,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mentor {
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub role: String,
    #[serde(default, deserialize_with = "null_default")]
    pub avatar: String,
    #[serde(default, deserialize_with = "null_default")]
    pub email: String,
    #[serde(
        default,
        deserialize_with = "null_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub github: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackItem {
    #[serde(rename = "_id", default = "ItemId::generate")]
    pub id: ItemId,
    #[serde(default, deserialize_with = "null_default")]
    pub from: String,
    #[serde(default, deserialize_with = "null_default")]
    pub date: String,
    #[serde(default, deserialize_with = "null_default")]
    pub content: String,
}

impl FeedbackItem {
    pub fn new(from: impl Into<String>) -> Self {
        Self {
            id: ItemId::generate(),
            from: from.into(),
            date: String::new(),
            content: String::new(),
        }
    }
}

// ============================================================================
// Community
// ============================================================================

/// `data/community.json`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommunityFile {
    #[serde(default, deserialize_with = "null_default")]
    pub community: CommunityConfig,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityConfig {
    #[serde(default, deserialize_with = "null_default")]
    pub platform_url: String,
    #[serde(default, deserialize_with = "null_default")]
    pub channels: Vec<Channel>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawChannel")]
pub struct Channel {
    pub name: String,
    #[serde(rename = "_id")]
    pub id: ItemId,
}

impl Channel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: ItemId::generate(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawChannel {
    Name(String),
    Full {
        #[serde(default, deserialize_with = "null_default")]
        name: String,
        #[serde(rename = "_id", default = "ItemId::generate")]
        id: ItemId,
    },
}

impl From<RawChannel> for Channel {
    fn from(raw: RawChannel) -> Self {
        match raw {
            RawChannel::Name(name) => Channel::new(name),
            RawChannel::Full { name, id } => Channel { name, id },
        }
    }
}

// ============================================================================
// Read-mostly lists
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyUpdate {
    #[serde(rename = "_id", default = "ItemId::generate")]
    pub id: ItemId,
    #[serde(default, deserialize_with = "null_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_default")]
    pub summary: String,
    #[serde(default, deserialize_with = "null_default")]
    pub date: String,
}

impl WeeklyUpdate {
    pub fn empty() -> Self {
        Self {
            id: ItemId::generate(),
            title: String::new(),
            summary: String::new(),
            date: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    #[serde(default, deserialize_with = "null_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_default")]
    pub date: String,
    #[serde(default, deserialize_with = "null_default")]
    pub icon: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    #[serde(default, deserialize_with = "null_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_default")]
    pub date: String,
    #[serde(default, deserialize_with = "null_default")]
    pub read_time: String,
    #[serde(default, deserialize_with = "null_default")]
    pub excerpt: String,
}

// ============================================================================
// GitHub stats
// ============================================================================

/// `data/github-contributions.json`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitHubStats {
    #[serde(default, deserialize_with = "null_default")]
    pub stats: StatCounters,
    #[serde(default, deserialize_with = "null_default")]
    pub contributions: Vec<Contribution>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatCounters {
    #[serde(default, deserialize_with = "null_default")]
    pub commits: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub pull_requests: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub issues: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub reviews: u64,
}

impl std::ops::AddAssign for StatCounters {
    fn add_assign(&mut self, other: Self) {
        self.commits += other.commits;
        self.pull_requests += other.pull_requests;
        self.issues += other.issues;
        self.reviews += other.reviews;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    #[serde(default, deserialize_with = "null_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_default")]
    pub date: String,
    #[serde(default, deserialize_with = "null_default")]
    pub url: String,
}
