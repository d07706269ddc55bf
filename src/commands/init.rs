//! Initialize a new dashboard site

use anyhow::Result;
use std::fs;
use std::path::Path;

const CONFIG: &str = r#"{
  "student": {
    "name": "Your Name",
    "bio": "Google Summer of Code Contributor",
    "avatar": "https://via.placeholder.com/120",
    "github": "https://github.com/your-username",
    "email": "",
    "blog": "",
    "linkedin": ""
  },
  "project": {
    "repositories": ["https://github.com/your-org/your-repo"]
  },
  "editor": {
    "editable": false,
    "owner": "your-username",
    "repo": "your-dashboard",
    "branch": "main"
  },
  "publicDir": "public"
}
"#;

const PROJECT: &str = r#"{
  "project": {
    "title": "Your Project Title",
    "description": "A short description of what you are building this summer.",
    "organization": "Your Organization",
    "timeline": "May - August",
    "repositories": ["https://github.com/your-org/your-repo"]
  }
}
"#;

const MENTOR: &str = r#"{
  "mentors": [
    {
      "name": "Mentor Name",
      "role": "Mentor",
      "avatar": "assets/images/sample-mentor.svg",
      "email": ""
    }
  ],
  "feedback": []
}
"#;

const COMMUNITY: &str = r##"{
  "community": {
    "platformUrl": "",
    "channels": [
      { "name": "#general", "_id": "general" }
    ]
  }
}
"##;

const WEEKLY_UPDATES: &str = r#"[
  {
    "_id": "week-1",
    "title": "Week 1: Community Bonding",
    "summary": "Set up the development environment and met the mentors.",
    "date": "2024-05-27"
  }
]
"#;

const MILESTONES: &str = r#"[
  {
    "title": "Proposal accepted",
    "description": "Selected for Google Summer of Code.",
    "date": "2024-05-01",
    "icon": "trophy"
  }
]
"#;

const BLOG_POSTS: &str = "[]\n";

const GITHUB_STATS: &str = r#"{
  "stats": { "commits": 0, "pullRequests": 0, "issues": 0, "reviews": 0 },
  "contributions": []
}
"#;

const SAMPLE_MENTOR_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="120" height="120" viewBox="0 0 120 120">
  <circle cx="60" cy="60" r="60" fill="#e2e8f0"/>
  <circle cx="60" cy="46" r="22" fill="#94a3b8"/>
  <path d="M20 104c6-22 22-32 40-32s34 10 40 32" fill="#94a3b8"/>
</svg>
"##;

const STYLE: &str = r#":root { --text-secondary: #64748b; --accent: #4285f4; }
body { font-family: system-ui, sans-serif; margin: 0; background: #f8fafc; color: #0f172a; }
.container { max-width: 1100px; margin: 0 auto; padding: 1rem; }
.card { background: #fff; border-radius: 12px; padding: 1.5rem; margin-bottom: 1.5rem; box-shadow: 0 1px 3px rgba(0,0,0,.08); }
.grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(320px, 1fr)); gap: 1.5rem; }
.avatar, .mentor-avatar { border-radius: 50%; width: 120px; height: 120px; object-fit: cover; }
.stat-grid { display: grid; grid-template-columns: repeat(4, 1fr); gap: 1rem; text-align: center; }
.stat-value { display: block; font-size: 2rem; font-weight: 700; color: var(--accent); }
.muted { color: var(--text-secondary); }
.alert { padding: 1rem; text-align: center; }
.alert-success { background: #dcfce7; }
.alert-error { background: #fee2e2; }
.edit-form label { display: block; margin-bottom: .5rem; }
.edit-form fieldset { border: 1px solid #e5e7eb; border-radius: .5rem; margin-bottom: 1rem; }
.edit-actions { display: flex; gap: .5rem; margin-bottom: 1rem; }
"#;

const ENV_EXAMPLE: &str = "GITHUB_TOKEN=your_github_token_here\n";

/// Initialize a new site in the given directory
///
/// Existing files are left untouched.
pub fn init_site(target_dir: &Path) -> Result<()> {
    // Create directory structure
    fs::create_dir_all(target_dir.join("data"))?;
    fs::create_dir_all(target_dir.join("assets/images"))?;
    fs::create_dir_all(target_dir.join("assets/css"))?;

    let files = [
        ("config.json", CONFIG),
        ("data/project.json", PROJECT),
        ("data/mentor.json", MENTOR),
        ("data/community.json", COMMUNITY),
        ("data/weekly-updates.json", WEEKLY_UPDATES),
        ("data/milestones.json", MILESTONES),
        ("data/blog-posts.json", BLOG_POSTS),
        ("data/github-contributions.json", GITHUB_STATS),
        ("assets/images/sample-mentor.svg", SAMPLE_MENTOR_SVG),
        ("assets/css/style.css", STYLE),
        (".env.example", ENV_EXAMPLE),
    ];

    for (name, content) in files {
        let path = target_dir.join(name);
        if path.exists() {
            tracing::debug!("Keeping existing {:?}", path);
            continue;
        }
        fs::write(&path, content)?;
        tracing::debug!("Created {:?}", path);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Dashboard;

    #[tokio::test]
    async fn test_scaffold_loads_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        init_site(dir.path()).unwrap();

        let dashboard = Dashboard::new(dir.path()).unwrap();
        assert_eq!(dashboard.config.student.name, "Your Name");
        assert_eq!(dashboard.config.github_username().as_deref(), Some("your-username"));

        let data = dashboard.loader().load_all().await;
        assert_eq!(data.project.project.title, "Your Project Title");
        assert_eq!(data.mentor.mentors.len(), 1);
        assert_eq!(data.community.community.channels[0].name, "#general");
        assert_eq!(data.weekly_updates.len(), 1);
        assert_eq!(data.milestones[0].icon, "trophy");
    }

    #[test]
    fn test_existing_files_kept() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.json"), "{}").unwrap();
        init_site(dir.path()).unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("config.json")).unwrap(),
            "{}"
        );
    }
}
