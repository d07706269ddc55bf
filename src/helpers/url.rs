//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left alone by `encodeURIComponent`
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// A repository on GitHub
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Extract owner and repository from a repository URL
///
/// # Examples
/// ```ignore
/// parse_repo_url("https://github.com/rust-lang/rust/") // -> rust-lang/rust
/// ```
pub fn parse_repo_url(url: &str) -> Option<RepoRef> {
    let url = url.trim();
    let (_, rest) = url.split_once("://")?;
    let path = rest.split_once('/').map(|(_, p)| p).unwrap_or("");
    let path = path.split(['?', '#']).next().unwrap_or("");

    let mut parts = path.split('/').filter(|p| !p.is_empty());
    let owner = parts.next()?;
    let repo = parts.next()?.trim_end_matches(".git");
    if repo.is_empty() {
        return None;
    }

    Some(RepoRef {
        owner: owner.to_string(),
        repo: repo.to_string(),
    })
}

/// Encode a query component
pub fn encode_component(s: &str) -> String {
    utf8_percent_encode(s, COMPONENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_repo_url() {
        let r = parse_repo_url("https://github.com/rust-lang/rust/").unwrap();
        assert_eq!(r.owner, "rust-lang");
        assert_eq!(r.repo, "rust");
        assert_eq!(r.to_string(), "rust-lang/rust");

        let r = parse_repo_url("https://github.com/o/r/tree/main?tab=readme").unwrap();
        assert_eq!(r.to_string(), "o/r");

        let r = parse_repo_url("https://github.com/o/r.git").unwrap();
        assert_eq!(r.repo, "r");
    }

    #[test]
    fn test_invalid_repo_urls() {
        assert_eq!(parse_repo_url(""), None);
        assert_eq!(parse_repo_url("not a url"), None);
        assert_eq!(parse_repo_url("https://github.com/only-owner"), None);
    }

    #[test]
    fn test_encode_component() {
        assert_eq!(
            encode_component("repo:o/r is:pr created:>2024-01-01"),
            "repo%3Ao%2Fr%20is%3Apr%20created%3A%3E2024-01-01"
        );
    }
}
