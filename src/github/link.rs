//! `Link` header handling for the commit-count probe

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref LAST_PAGE: Regex =
        Regex::new(r#"<[^>]*[?&]page=(\d+)[^>]*>\s*;\s*rel="last""#).unwrap();
}

/// Page number advertised by the `rel="last"` link, if any
pub fn last_page(link: &str) -> Option<u64> {
    LAST_PAGE
        .captures(link)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Commit count from a `per_page=1` commit listing
///
/// With one item per page the last page number equals the item count.
/// A `Link` header without `rel="last"` counts as a single commit; no
/// header at all means the returned page is everything.
pub fn commit_count(link: Option<&str>, body: Option<&serde_json::Value>) -> u64 {
    let page_len = body.and_then(|b| b.as_array()).map(|a| a.len() as u64);

    match link {
        Some(link) => match last_page(link) {
            Some(n) => n,
            None if page_len.is_some() => 1,
            None => 0,
        },
        None => page_len.unwrap_or(0),
    }
}
