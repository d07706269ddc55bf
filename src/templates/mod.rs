//! Built-in dashboard templates using Tera template engine
//!
//! The page layout and one partial per section are embedded in the
//! binary. Templates receive a [`PageView`], which already has every
//! fallback resolved; dates stay raw and go through the `long_date` filter.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::content::{BlogPost, Contribution};
use crate::editor::Alert;
use crate::helpers::long_date;

/// Template renderer with the embedded dashboard templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all dashboard templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Escape everything; data files are untrusted input
        tera.autoescape_on(vec![".html"]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("dashboard/layout.html")),
            (
                "partials/header.html",
                include_str!("dashboard/partials/header.html"),
            ),
            (
                "partials/project.html",
                include_str!("dashboard/partials/project.html"),
            ),
            (
                "partials/stats.html",
                include_str!("dashboard/partials/stats.html"),
            ),
            (
                "partials/community.html",
                include_str!("dashboard/partials/community.html"),
            ),
            (
                "partials/blog.html",
                include_str!("dashboard/partials/blog.html"),
            ),
            (
                "partials/mentors.html",
                include_str!("dashboard/partials/mentors.html"),
            ),
            (
                "partials/updates.html",
                include_str!("dashboard/partials/updates.html"),
            ),
            (
                "partials/milestones.html",
                include_str!("dashboard/partials/milestones.html"),
            ),
            (
                "partials/footer.html",
                include_str!("dashboard/partials/footer.html"),
            ),
        ])?;

        tera.register_filter("long_date", long_date_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }

    /// Render the whole dashboard page
    pub fn render_page(&self, page: &PageView) -> Result<String> {
        let context = Context::from_serialize(page)?;
        self.render("layout.html", &context)
    }
}

/// Tera filter: long US date ("January 15, 2024")
fn long_date_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = match value {
        tera::Value::Null => String::new(),
        _ => tera::try_get_value!("long_date", "value", String, value),
    };
    Ok(tera::Value::String(long_date(&s)))
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct PageView {
    pub student: StudentView,
    pub project: ProjectView,
    pub stats: StatsView,
    pub community: CommunityView,
    pub blog: BlogView,
    pub mentors: MentorsView,
    pub weekly_updates: Vec<UpdateView>,
    pub milestones: Vec<MilestoneView>,
    pub last_updated: String,
    pub current_year: String,
    pub editable: bool,
    pub alert: Option<Alert>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentView {
    pub name: String,
    pub bio: String,
    pub avatar: String,
    pub links: Vec<SocialLink>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SocialLink {
    pub label: String,
    pub icon: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectView {
    pub title: String,
    pub description: String,
    pub organization: String,
    pub timeline: String,
    pub repositories: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsView {
    pub commits: u64,
    pub pull_requests: u64,
    pub issues: u64,
    pub reviews: u64,
    pub contributions: Vec<Contribution>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommunityView {
    pub platform_url: String,
    pub channels: Vec<ChannelView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChannelView {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BlogView {
    pub posts: Vec<BlogPost>,
    /// The student's blog, empty when not configured
    pub blog_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MentorsView {
    pub mentors: Vec<MentorView>,
    pub feedback: Vec<FeedbackView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MentorView {
    pub index: usize,
    pub name: String,
    /// Raw role, as edited
    pub role: String,
    /// Role as displayed
    pub role_label: String,
    /// Raw avatar, as edited
    pub avatar: String,
    /// Avatar as displayed
    pub avatar_src: String,
    pub email: String,
    pub github: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedbackView {
    pub id: String,
    /// Raw author, as edited
    pub from: String,
    /// Author as displayed
    pub author: String,
    pub date: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateView {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub date: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MilestoneView {
    pub title: String,
    pub description: String,
    pub date: String,
    pub icon: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_load() {
        assert!(TemplateRenderer::new().is_ok());
    }

    #[test]
    fn test_long_date_filter() {
        let args = HashMap::new();
        let value = tera::Value::String("2024-01-15".to_string());
        assert_eq!(
            long_date_filter(&value, &args).unwrap(),
            tera::Value::String("January 15, 2024".to_string())
        );
        assert_eq!(
            long_date_filter(&tera::Value::Null, &args).unwrap(),
            tera::Value::String(String::new())
        );
    }
}
