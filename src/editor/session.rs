//! Edit session - working copies plus write-back

use tokio::sync::broadcast;

use super::{Alert, EditError, EditEvent, FieldEdit, ListKind, Section, Target};
use crate::content::{
    Channel, CommunityFile, DashboardData, FeedbackItem, ItemId, MentorFile, ProjectFile,
    WeeklyUpdate,
};
use crate::github::{ContentClient, GitHubError, WriteOutcome};

const EVENT_CAPACITY: usize = 64;

enum Slot<'a> {
    Text(&'a mut String),
    Lines(&'a mut Vec<String>),
}

/// One editor's view of the editable sections
///
/// Holds its own token (inside the [`ContentClient`]); nothing here is
/// shared between sessions.
pub struct EditSession {
    client: ContentClient,
    project: ProjectFile,
    mentor: MentorFile,
    community: CommunityFile,
    weekly_updates: Vec<WeeklyUpdate>,
    events: broadcast::Sender<EditEvent>,
}

impl EditSession {
    /// Start a session from freshly loaded data
    pub fn new(client: ContentClient, data: &DashboardData) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            client,
            project: data.project.clone(),
            mentor: data.mentor.clone(),
            community: data.community.clone(),
            weekly_updates: data.weekly_updates.clone(),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EditEvent> {
        self.events.subscribe()
    }

    pub fn has_token(&self) -> bool {
        self.client.has_token()
    }

    /// Replace the editable sections of `data` with the working copies
    pub fn apply_to(&self, data: &mut DashboardData) {
        data.project = self.project.clone();
        data.mentor = self.mentor.clone();
        data.community = self.community.clone();
        data.weekly_updates = self.weekly_updates.clone();
    }

    pub fn project(&self) -> &ProjectFile {
        &self.project
    }

    pub fn mentor(&self) -> &MentorFile {
        &self.mentor
    }

    pub fn community(&self) -> &CommunityFile {
        &self.community
    }

    pub fn weekly_updates(&self) -> &[WeeklyUpdate] {
        &self.weekly_updates
    }

    fn emit(&self, event: EditEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    /// Set one text field of a section or list item
    pub fn set_field(&mut self, target: &Target, field: &str, value: &str) -> Result<(), EditError> {
        match self.slot(target, field)? {
            Slot::Text(slot) => *slot = value.to_string(),
            // One URL per line
            Slot::Lines(slot) => {
                *slot = value
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(String::from)
                    .collect()
            }
        }

        self.emit(EditEvent::FieldChanged {
            target: target.clone(),
            field: field.to_string(),
        });
        Ok(())
    }

    /// Apply a whole form's worth of edits, or none of them
    ///
    /// Every target and field is checked before anything changes.
    pub fn apply_edits(&mut self, edits: &[FieldEdit]) -> Result<(), EditError> {
        for edit in edits {
            self.slot(&edit.target, &edit.field)?;
        }
        for edit in edits {
            self.set_field(&edit.target, &edit.field, &edit.value)?;
        }
        Ok(())
    }

    fn slot(&mut self, target: &Target, field: &str) -> Result<Slot<'_>, EditError> {
        let unknown_field = || EditError::UnknownField {
            target: target.to_string(),
            field: field.to_string(),
        };
        let unknown_item = || EditError::UnknownItem(target.to_string());

        let slot = match target {
            Target::Project => {
                let project = &mut self.project.project;
                match field {
                    "title" => &mut project.title,
                    "description" => &mut project.description,
                    "organization" => &mut project.organization,
                    "timeline" => &mut project.timeline,
                    "repositories" => return Ok(Slot::Lines(&mut project.repositories)),
                    _ => return Err(unknown_field()),
                }
            }
            Target::Mentor(index) => {
                let mentor = self.mentor.mentors.get_mut(*index).ok_or_else(unknown_item)?;
                match field {
                    "name" => &mut mentor.name,
                    "role" => &mut mentor.role,
                    "avatar" => &mut mentor.avatar,
                    "email" => &mut mentor.email,
                    "github" => &mut mentor.github,
                    _ => return Err(unknown_field()),
                }
            }
            Target::Feedback(id) => {
                let item = find(&mut self.mentor.feedback, |f| &f.id, id).ok_or_else(unknown_item)?;
                match field {
                    "from" => &mut item.from,
                    "date" => &mut item.date,
                    "content" => &mut item.content,
                    _ => return Err(unknown_field()),
                }
            }
            Target::Community => match field {
                "platformUrl" => &mut self.community.community.platform_url,
                _ => return Err(unknown_field()),
            },
            Target::Channel(id) => {
                let channel = find(&mut self.community.community.channels, |c| &c.id, id)
                    .ok_or_else(unknown_item)?;
                match field {
                    "name" => &mut channel.name,
                    _ => return Err(unknown_field()),
                }
            }
            Target::Update(id) => {
                let update =
                    find(&mut self.weekly_updates, |u| &u.id, id).ok_or_else(unknown_item)?;
                match field {
                    "title" => &mut update.title,
                    "summary" => &mut update.summary,
                    "date" => &mut update.date,
                    _ => return Err(unknown_field()),
                }
            }
        };
        Ok(Slot::Text(slot))
    }

    /// Append an empty item to a list and return its id
    ///
    /// New feedback is attributed to the first mentor.
    pub fn add_item(&mut self, list: ListKind) -> ItemId {
        let id = match list {
            ListKind::Feedback => {
                let from = self
                    .mentor
                    .mentors
                    .first()
                    .map(|m| m.name.clone())
                    .unwrap_or_default();
                let item = FeedbackItem::new(from);
                let id = item.id.clone();
                self.mentor.feedback.push(item);
                id
            }
            ListKind::Channels => {
                let channel = Channel::new("");
                let id = channel.id.clone();
                self.community.community.channels.push(channel);
                id
            }
            ListKind::WeeklyUpdates => {
                let update = WeeklyUpdate::empty();
                let id = update.id.clone();
                self.weekly_updates.push(update);
                id
            }
        };

        tracing::debug!("Added {} item {}", list.as_str(), id);
        self.emit(EditEvent::ItemAdded {
            list,
            id: id.clone(),
        });
        id
    }

    /// Remove the item with `id`; returns whether it existed
    pub fn remove_item(&mut self, list: ListKind, id: &ItemId) -> bool {
        let removed = match list {
            ListKind::Feedback => remove(&mut self.mentor.feedback, |f| &f.id, id),
            ListKind::Channels => remove(&mut self.community.community.channels, |c| &c.id, id),
            ListKind::WeeklyUpdates => remove(&mut self.weekly_updates, |u| &u.id, id),
        };

        if removed {
            self.emit(EditEvent::ItemRemoved {
                list,
                id: id.clone(),
            });
        }
        removed
    }

    /// The JSON document a save would write for `section`
    pub fn serialize(&self, section: Section) -> serde_json::Result<String> {
        match section {
            Section::Project => serde_json::to_string_pretty(&self.project),
            Section::Mentor => serde_json::to_string_pretty(&self.mentor),
            Section::Community => serde_json::to_string_pretty(&self.community),
            Section::WeeklyUpdates => serde_json::to_string_pretty(&self.weekly_updates),
        }
    }

    /// Write a section back to the repository
    ///
    /// Reads the current revision first and writes conditioned on it, so
    /// a concurrent change surfaces as a conflict instead of being lost.
    pub async fn save(&mut self, section: Section) -> Alert {
        let path = section.resource().path();
        let alert = match self.try_save(section, path).await {
            Ok(WriteOutcome::Applied { revision }) => {
                tracing::info!("Saved {} at {}", path, revision);
                Alert::success(format!("{} updated successfully!", section.label()))
            }
            Ok(WriteOutcome::Conflict) => {
                tracing::warn!("Conflict saving {}", path);
                Alert::error(format!(
                    "The file {} changed on GitHub since it was loaded. Reload and try again.",
                    path
                ))
            }
            Ok(WriteOutcome::Failed { reason }) => {
                Alert::error(format!("Something went wrong, please try again! ({})", reason))
            }
            Err(GitHubError::MissingToken) => Alert::error("GitHub token not provided."),
            Err(e) => {
                tracing::error!("Failed to save {}: {}", path, e);
                Alert::error(format!("Something went wrong, please try again! ({})", e))
            }
        };

        self.emit(EditEvent::Saved {
            section,
            applied: alert.is_success(),
        });
        alert
    }

    async fn try_save(&self, section: Section, path: &str) -> Result<WriteOutcome, GitHubError> {
        if !self.client.has_token() {
            return Err(GitHubError::MissingToken);
        }
        let content = self
            .serialize(section)
            .map_err(|e| GitHubError::Decode(e.to_string()))?;
        let current = self.client.fetch_file(path).await?;
        Ok(self.client.write_file(path, &content, &current.revision).await)
    }
}

fn find<'a, T>(items: &'a mut [T], key: impl Fn(&T) -> &ItemId, id: &ItemId) -> Option<&'a mut T> {
    items.iter_mut().find(|item| key(item) == id)
}

fn remove<T>(items: &mut Vec<T>, key: impl Fn(&T) -> &ItemId, id: &ItemId) -> bool {
    let before = items.len();
    items.retain(|item| key(item) != id);
    items.len() != before
}
