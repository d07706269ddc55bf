//! In-place editing of the dashboard data
//!
//! An [`EditSession`] owns the working copies of the editable sections and
//! the client that writes them back. Mutations are addressed by a
//! [`Target`] (a section or one item in it) and a field name; every
//! mutation is published as an [`EditEvent`].

mod session;

pub use session::EditSession;

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::content::{ItemId, Resource};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum EditError {
    #[error("Unknown field '{field}' on {target}")]
    UnknownField { target: String, field: String },

    #[error("No such item: {0}")]
    UnknownItem(String),

    #[error("Invalid edit target: {0}")]
    InvalidTarget(String),

    #[error("Unknown section: {0}")]
    UnknownSection(String),

    #[error("Unknown list: {0}")]
    UnknownList(String),
}

/// A file that can be saved back to the repository
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Project,
    Mentor,
    Community,
    WeeklyUpdates,
}

impl Section {
    pub fn resource(self) -> Resource {
        match self {
            Section::Project => Resource::Project,
            Section::Mentor => Resource::Mentor,
            Section::Community => Resource::Community,
            Section::WeeklyUpdates => Resource::WeeklyUpdates,
        }
    }

    /// Human-readable name used in alerts
    pub fn label(self) -> &'static str {
        match self {
            Section::Project => "Project details",
            Section::Mentor => "Mentor details",
            Section::Community => "Community details",
            Section::WeeklyUpdates => "Weekly updates",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Section::Project => "project",
            Section::Mentor => "mentor",
            Section::Community => "community",
            Section::WeeklyUpdates => "weekly-updates",
        }
    }
}

impl FromStr for Section {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "project" => Ok(Section::Project),
            "mentor" => Ok(Section::Mentor),
            "community" => Ok(Section::Community),
            "weekly-updates" => Ok(Section::WeeklyUpdates),
            other => Err(EditError::UnknownSection(other.to_string())),
        }
    }
}

/// A list that supports add/remove
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Feedback,
    Channels,
    WeeklyUpdates,
}

impl ListKind {
    pub fn section(self) -> Section {
        match self {
            ListKind::Feedback => Section::Mentor,
            ListKind::Channels => Section::Community,
            ListKind::WeeklyUpdates => Section::WeeklyUpdates,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ListKind::Feedback => "feedback",
            ListKind::Channels => "channels",
            ListKind::WeeklyUpdates => "weekly-updates",
        }
    }
}

impl FromStr for ListKind {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "feedback" => Ok(ListKind::Feedback),
            "channels" => Ok(ListKind::Channels),
            "weekly-updates" => Ok(ListKind::WeeklyUpdates),
            other => Err(EditError::UnknownList(other.to_string())),
        }
    }
}

/// What an edit applies to
///
/// Encoded in forms as `project`, `mentor:0`, `feedback:<id>`,
/// `community`, `channel:<id>` or `update:<id>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Project,
    Mentor(usize),
    Feedback(ItemId),
    Community,
    Channel(ItemId),
    Update(ItemId),
}

impl Target {
    pub fn section(&self) -> Section {
        match self {
            Target::Project => Section::Project,
            Target::Mentor(_) | Target::Feedback(_) => Section::Mentor,
            Target::Community | Target::Channel(_) => Section::Community,
            Target::Update(_) => Section::WeeklyUpdates,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Project => write!(f, "project"),
            Target::Mentor(i) => write!(f, "mentor:{}", i),
            Target::Feedback(id) => write!(f, "feedback:{}", id),
            Target::Community => write!(f, "community"),
            Target::Channel(id) => write!(f, "channel:{}", id),
            Target::Update(id) => write!(f, "update:{}", id),
        }
    }
}

impl FromStr for Target {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EditError::InvalidTarget(s.to_string());
        let (kind, item) = match s.split_once(':') {
            Some((kind, item)) if !item.is_empty() => (kind, Some(item)),
            Some(_) => return Err(invalid()),
            None => (s, None),
        };
        let id = || item.map(|i| ItemId::from_str(i).unwrap_or_else(|e| match e {}));

        match (kind, item) {
            ("project", None) => Ok(Target::Project),
            ("community", None) => Ok(Target::Community),
            ("mentor", Some(i)) => i.parse().map(Target::Mentor).map_err(|_| invalid()),
            ("feedback", Some(_)) => id().map(Target::Feedback).ok_or_else(invalid),
            ("channel", Some(_)) => id().map(Target::Channel).ok_or_else(invalid),
            ("update", Some(_)) => id().map(Target::Update).ok_or_else(invalid),
            _ => Err(invalid()),
        }
    }
}

/// One field assignment taken from an edit form
///
/// Form inputs are named `<target>.<field>`, e.g. `mentor:0.name` or
/// `feedback:<id>.content`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEdit {
    pub target: Target,
    pub field: String,
    pub value: String,
}

impl FieldEdit {
    pub fn parse(key: &str, value: &str) -> Result<Self, EditError> {
        let (target, field) = key
            .rsplit_once('.')
            .filter(|(_, field)| !field.is_empty())
            .ok_or_else(|| EditError::InvalidTarget(key.to_string()))?;

        Ok(Self {
            target: target.parse()?,
            field: field.to_string(),
            value: value.to_string(),
        })
    }
}

/// Published on every change to a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditEvent {
    FieldChanged { target: Target, field: String },
    ItemAdded { list: ListKind, id: ItemId },
    ItemRemoved { list: ListKind, id: ItemId },
    Saved { section: Section, applied: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Success,
    Error,
}

/// A message shown to the editor once
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
}

impl Alert {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Error,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == AlertKind::Success
    }
}
