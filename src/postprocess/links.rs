//! Point links at source files to their generated `.html` pages.

use regex::{Captures, Regex};
use std::path::Path;
use std::sync::LazyLock;

static RE_ANCHOR_HREF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)(<a\b[^>]*?\bhref=")([^"]*)(")"#).unwrap());

static RE_SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*:").unwrap());

/// Append `.html` to every local href whose path ends in one of
/// `extensions`, so `[x](src-local/a.c)` reaches `src-local/a.c.html`.
pub fn suffix_doc_links(html: &str, extensions: &[String]) -> String {
    RE_ANCHOR_HREF
        .replace_all(html, |caps: &Captures| {
            format!("{}{}{}", &caps[1], rewrite_href(&caps[2], extensions), &caps[3])
        })
        .into_owned()
}

fn rewrite_href(href: &str, extensions: &[String]) -> String {
    if href.is_empty() || href.starts_with('#') || href.starts_with("//") || RE_SCHEME.is_match(href) {
        return href.to_string();
    }
    let split = href.find(['?', '#']).unwrap_or(href.len());
    let (path, rest) = href.split_at(split);
    if path.to_ascii_lowercase().ends_with(".html") {
        return href.to_string();
    }
    let recognized = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)));
    if recognized {
        format!("{path}.html{rest}")
    } else {
        href.to_string()
    }
}
