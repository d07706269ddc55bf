//! Content module - dashboard data documents and their loader

pub mod loader;
mod models;

pub use loader::{DashboardData, DataLoader, DataSource, Resource};
pub use models::{
    BlogPost, Channel, CommunityConfig, CommunityFile, Contribution, FeedbackItem, GitHubStats,
    ItemId, Mentor, MentorFile, Milestone, Project, ProjectFile, StatCounters, WeeklyUpdate,
};
