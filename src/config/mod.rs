//! Configuration module

mod site;

pub use site::DashboardConfig;
pub use site::EditorConfig;
pub use site::ProjectRepos;
pub use site::StudentProfile;
