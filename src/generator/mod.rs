//! Generator module - renders the dashboard using built-in Tera templates
//!
//! Views are built from [`DashboardData`] by pure functions, one per
//! section. The same views serve the static `generate` output and the
//! pages served by the edit server.

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::config::StudentProfile;
use crate::content::{
    BlogPost, CommunityFile, DashboardData, GitHubStats, MentorFile, Milestone, ProjectFile,
    WeeklyUpdate,
};
use crate::editor::Alert;
use crate::templates::{
    BlogView, ChannelView, CommunityView, FeedbackView, MentorView, MentorsView, MilestoneView,
    PageView, ProjectView, SocialLink, StatsView, StudentView, TemplateRenderer, UpdateView,
};
use crate::Dashboard;

const DEFAULT_MENTOR_AVATAR: &str = "assets/images/sample-mentor.svg";
const DEFAULT_MENTOR_ROLE: &str = "Mentor";
const PLACEHOLDER_MENTOR_NAME: &str = "Mentor Name";
const DEFAULT_MILESTONE_ICON: &str = "trophy";

/// Directories copied next to the generated page
const STATIC_DIRS: &[&str] = &["data", "assets"];

/// Dashboard page generator using Tera templates
pub struct Generator {
    dashboard: Dashboard,
    renderer: TemplateRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(dashboard: &Dashboard) -> Result<Self> {
        let renderer = TemplateRenderer::new()?;

        Ok(Self {
            dashboard: dashboard.clone(),
            renderer,
        })
    }

    /// Generate the static site
    pub fn generate(&self, data: &DashboardData) -> Result<()> {
        let public_dir = &self.dashboard.public_dir;
        fs::create_dir_all(public_dir)?;

        let html = self.render_page(data, false, None)?;
        let index = public_dir.join("index.html");
        fs::write(&index, html)?;
        tracing::debug!("Wrote {:?}", index);

        for name in STATIC_DIRS {
            let source = self.dashboard.base_dir.join(name);
            if source.is_dir() {
                copy_dir(&source, &public_dir.join(name))?;
            }
        }

        Ok(())
    }

    /// Render the dashboard page
    pub fn render_page(
        &self,
        data: &DashboardData,
        editable: bool,
        alert: Option<Alert>,
    ) -> Result<String> {
        let page = build_page(data, editable, alert, Utc::now());
        self.renderer.render_page(&page)
    }
}

/// Build the view of the whole page
pub fn build_page(
    data: &DashboardData,
    editable: bool,
    alert: Option<Alert>,
    now: DateTime<Utc>,
) -> PageView {
    PageView {
        student: build_student(&data.config.student),
        project: build_project(&data.project),
        stats: build_stats(&data.github),
        community: build_community(&data.community),
        blog: build_blog(&data.blog_posts, &data.config.student),
        mentors: build_mentors(&data.mentor),
        weekly_updates: build_updates(&data.weekly_updates),
        milestones: build_milestones(&data.milestones),
        last_updated: last_updated(&data.github, now),
        current_year: now.format("%Y").to_string(),
        editable,
        alert,
    }
}

fn build_student(student: &StudentProfile) -> StudentView {
    let candidates = [
        ("GitHub", "fab fa-github", student.github.clone()),
        ("LinkedIn", "fab fa-linkedin", student.linkedin.clone()),
        (
            "Email",
            "fas fa-envelope",
            if student.email.is_empty() {
                String::new()
            } else {
                format!("mailto:{}", student.email)
            },
        ),
        ("Blog", "fas fa-blog", student.blog.clone()),
    ];

    let links = candidates
        .into_iter()
        .filter(|(_, _, url)| !url.trim().is_empty())
        .map(|(label, icon, url)| SocialLink {
            label: label.to_string(),
            icon: icon.to_string(),
            url,
        })
        .collect();

    StudentView {
        name: student.name.clone(),
        bio: student.bio.clone(),
        avatar: student.avatar.clone(),
        links,
    }
}

fn build_project(file: &ProjectFile) -> ProjectView {
    let project = &file.project;
    ProjectView {
        title: project.title.clone(),
        description: project.description.clone(),
        organization: project.organization.clone(),
        timeline: project.timeline.clone(),
        repositories: project.repositories.clone(),
    }
}

fn build_stats(github: &GitHubStats) -> StatsView {
    StatsView {
        commits: github.stats.commits,
        pull_requests: github.stats.pull_requests,
        issues: github.stats.issues,
        reviews: github.stats.reviews,
        contributions: github.contributions.clone(),
    }
}

fn build_community(file: &CommunityFile) -> CommunityView {
    CommunityView {
        platform_url: file.community.platform_url.trim().to_string(),
        channels: file
            .community
            .channels
            .iter()
            .map(|c| ChannelView {
                id: c.id.to_string(),
                name: c.name.clone(),
            })
            .collect(),
    }
}

fn build_blog(posts: &[BlogPost], student: &StudentProfile) -> BlogView {
    BlogView {
        posts: posts.to_vec(),
        blog_url: student.blog.trim().to_string(),
    }
}

fn build_mentors(file: &MentorFile) -> MentorsView {
    let first_mentor = file
        .mentors
        .first()
        .map(|m| m.name.clone())
        .unwrap_or_default();

    let mentors = file
        .mentors
        .iter()
        .enumerate()
        .map(|(index, m)| MentorView {
            index,
            name: m.name.clone(),
            role: m.role.clone(),
            role_label: or_default(&m.role, DEFAULT_MENTOR_ROLE),
            avatar: m.avatar.clone(),
            avatar_src: or_default(&m.avatar, DEFAULT_MENTOR_AVATAR),
            email: m.email.clone(),
            github: m.github.clone(),
        })
        .collect();

    let feedback = file
        .feedback
        .iter()
        .map(|f| {
            let author = if f.from.trim().is_empty() || f.from == PLACEHOLDER_MENTOR_NAME {
                first_mentor.clone()
            } else {
                f.from.clone()
            };
            FeedbackView {
                id: f.id.to_string(),
                from: f.from.clone(),
                author,
                date: f.date.clone(),
                content: f.content.clone(),
            }
        })
        .collect();

    MentorsView { mentors, feedback }
}

fn build_updates(updates: &[WeeklyUpdate]) -> Vec<UpdateView> {
    updates
        .iter()
        .map(|u| UpdateView {
            id: u.id.to_string(),
            title: u.title.clone(),
            summary: u.summary.clone(),
            date: u.date.clone(),
        })
        .collect()
}

fn build_milestones(milestones: &[Milestone]) -> Vec<MilestoneView> {
    milestones
        .iter()
        .map(|m| MilestoneView {
            title: m.title.clone(),
            description: m.description.clone(),
            date: m.date.clone(),
            icon: or_default(&m.icon, DEFAULT_MILESTONE_ICON),
        })
        .collect()
}

/// The stats file's own timestamp, otherwise render time
fn last_updated(github: &GitHubStats, now: DateTime<Utc>) -> String {
    match github.last_updated.as_deref().map(str::trim) {
        Some(ts) if !ts.is_empty() => match DateTime::parse_from_rfc3339(ts) {
            Ok(dt) => format_datetime(&dt.with_timezone(&Utc)),
            Err(_) => ts.to_string(),
        },
        _ => format_datetime(&now),
    }
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%B %-d, %Y %H:%M UTC").to_string()
}

fn or_default(value: &str, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

/// Copy a directory tree, creating parents as needed
fn copy_dir(source: &Path, dest: &Path) -> Result<()> {
    for entry in WalkDir::new(source)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let relative = path.strip_prefix(source)?;
        let target = dest.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(path, &target)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Channel, Contribution, FeedbackItem, Mentor};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 1, 9, 5, 0).unwrap()
    }

    fn render(data: &DashboardData, editable: bool) -> String {
        let renderer = TemplateRenderer::new().unwrap();
        renderer
            .render_page(&build_page(data, editable, None, now()))
            .unwrap()
    }

    #[test]
    fn test_empty_data_renders_fallbacks() {
        let html = render(&DashboardData::default(), false);
        assert!(html.contains("No feedback yet."));
        assert!(html.contains("Mentor information not configured."));
        assert!(html.contains("No weekly updates yet."));
        assert!(html.contains(
            "No milestones yet. Add your achievements to data/milestones.json"
        ));
        assert!(html.contains("No blog posts yet. Add your posts to data/blog-posts.json"));
        assert!(html.contains("Configure your community channels in the data files"));
        assert!(html.contains("No contributions data available yet."));
        assert!(!html.contains("Join Community Platform"));
        assert!(!html.contains("Visit blog"));
        assert!(html.contains("July 1, 2024 09:05 UTC"));
    }

    #[test]
    fn test_mentor_defaults() {
        let mut file = MentorFile::default();
        file.mentors.push(Mentor {
            name: "Grace".to_string(),
            ..Default::default()
        });
        file.feedback.push(FeedbackItem::new("Mentor Name"));
        file.feedback.push(FeedbackItem::new(""));
        file.feedback.push(FeedbackItem::new("Alan"));

        let view = build_mentors(&file);
        assert_eq!(view.mentors[0].avatar_src, DEFAULT_MENTOR_AVATAR);
        assert_eq!(view.mentors[0].role_label, "Mentor");
        assert_eq!(view.mentors[0].avatar, "");
        let authors: Vec<_> = view.feedback.iter().map(|f| f.author.as_str()).collect();
        assert_eq!(authors, vec!["Grace", "Grace", "Alan"]);
    }

    #[test]
    fn test_social_links_only_when_present() {
        let student = StudentProfile {
            github: "https://github.com/ada".to_string(),
            email: "ada@example.org".to_string(),
            ..Default::default()
        };
        let view = build_student(&student);
        let urls: Vec<_> = view.links.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(urls, vec!["https://github.com/ada", "mailto:ada@example.org"]);
    }

    #[test]
    fn test_populated_sections() {
        let mut data = DashboardData::default();
        data.community.community.platform_url = "https://chat.example.org".to_string();
        data.community.community.channels.push(Channel::new("#gsoc"));
        data.config.student.blog = "https://blog.example.org".to_string();
        data.github.stats.commits = 42;
        data.github.contributions.push(Contribution {
            title: "Fix parser".to_string(),
            description: "Pull Request #7 in o/r".to_string(),
            date: "2024-01-15T10:00:00Z".to_string(),
            url: "https://github.com/o/r/pull/7".to_string(),
        });
        data.milestones.push(Milestone {
            title: "First PR".to_string(),
            ..Default::default()
        });
        data.github.last_updated = Some("2024-06-30T12:00:00.000Z".to_string());

        let html = render(&data, false);
        assert!(html.contains("Join Community Platform"));
        assert!(html.contains("Visit blog"));
        assert!(html.contains("#gsoc"));
        assert!(html.contains(">42<"));
        assert!(html.contains("January 15, 2024"));
        assert!(html.contains("fa-trophy"));
        assert!(html.contains("June 30, 2024 12:00 UTC"));
    }

    #[test]
    fn test_output_is_escaped() {
        let mut data = DashboardData::default();
        data.config.student.name = "<script>alert(1)</script>".to_string();
        let html = render(&data, false);
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_editable_page_has_forms() {
        let mut data = DashboardData::default();
        let item = FeedbackItem::new("Grace");
        let id = item.id.clone();
        data.mentor.feedback.push(item);

        let html = render(&data, true);
        assert!(html.contains(&format!("name=\"feedback:{}.content\"", id)));
        assert!(html.contains(&format!("name=\"_item\" value=\"{}\"", id)));
        assert!(html.contains("formaction=\"/save\""));
        assert!(html.contains("name=\"_list\" value=\"weekly-updates\""));
        assert!(!html.contains("No feedback yet."));
    }

    #[test]
    fn test_generate_writes_page_and_copies_data() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("data")).unwrap();
        fs::write(dir.path().join("data/milestones.json"), "[]").unwrap();

        let dashboard = Dashboard::new(dir.path()).unwrap();
        let generator = Generator::new(&dashboard).unwrap();
        generator.generate(&DashboardData::default()).unwrap();

        assert!(dir.path().join("public/index.html").exists());
        assert!(dir.path().join("public/data/milestones.json").exists());
    }
}
