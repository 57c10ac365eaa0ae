//! Per-page metadata passed to the converter: URL, title, and SEO hints.

use crate::config::SiteConfig;
use crate::extract::{native, python};
use crate::source::{SourceFile, SourceKind};
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

/// Longest description kept before the ellipsis is appended.
pub const MAX_DESCRIPTION: usize = 160;
pub const MAX_KEYWORDS: usize = 10;

static RE_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#{1,6}[[:blank:]]+(.*?)[[:blank:]#]*$").unwrap());

static RE_MD_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!?\[([^\]]*)\]\([^)]*\)").unwrap());

static RE_EMPHASIS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*|__|`|\*").unwrap());

static RE_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Values handed to the converter template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMetadata {
    pub base_url: String,
    pub wiki_title: String,
    /// Base-relative URL of the page, e.g. `/src-local/drop.c.html`.
    pub page_url: String,
    pub page_title: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub image: String,
}

impl PageMetadata {
    pub fn for_source(config: &SiteConfig, source: &SourceFile, output: &Path) -> Self {
        let title = source
            .path
            .strip_prefix(&config.root)
            .unwrap_or(&source.path)
            .to_string_lossy()
            .replace('\\', "/");
        let description = documentation_block(source)
            .and_then(|block| describe(&block))
            .unwrap_or_else(|| format!("Documentation for {title}"));
        let keywords = keywords(&config.seo.terms, &source.content, &source.path);

        PageMetadata {
            base_url: config.base_url.clone(),
            wiki_title: config.wiki_title.clone(),
            page_url: page_url(config, output),
            page_title: title,
            description,
            keywords,
            image: config.seo.image.clone(),
        }
    }

    /// Metadata for the README-derived index page.
    pub fn for_index(config: &SiteConfig, readme: &str) -> Self {
        PageMetadata {
            base_url: config.base_url.clone(),
            wiki_title: config.wiki_title.clone(),
            page_url: page_url(config, &config.index_path()),
            page_title: config.wiki_title.clone(),
            description: describe(readme).unwrap_or_else(|| config.wiki_title.clone()),
            keywords: keywords(&config.seo.terms, readme, &config.readme),
            image: config.seo.image.clone(),
        }
    }

    pub fn keywords_joined(&self) -> String {
        self.keywords.join(", ")
    }
}

/// Base-relative URL for an output file.
pub fn page_url(config: &SiteConfig, output: &Path) -> String {
    let relative = output
        .strip_prefix(&config.output_dir)
        .unwrap_or(output)
        .to_string_lossy()
        .replace('\\', "/");
    format!("{}/{}", config.base_url.trim_end_matches('/'), relative.trim_start_matches('/'))
}

/// The first block of documentation prose in a source file, if any.
pub fn documentation_block(source: &SourceFile) -> Option<String> {
    match source.kind {
        SourceKind::Markdown => Some(source.content.clone()),
        SourceKind::Python => python::first_docstring(&source.content),
        SourceKind::Native => native::first_doc_comment(&source.content),
        SourceKind::Shell => first_comment_block(&source.content),
    }
}

/// Leading `#` comment run of a shell script, shebang excluded.
fn first_comment_block(content: &str) -> Option<String> {
    let mut lines = Vec::new();
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("#!") && lines.is_empty() {
            continue;
        }
        match trimmed.strip_prefix('#') {
            Some(text) => lines.push(text.strip_prefix(' ').unwrap_or(text).to_string()),
            None if trimmed.is_empty() && lines.is_empty() => continue,
            None => break,
        }
    }
    let text = lines.join("\n").trim().to_string();
    (!text.is_empty()).then_some(text)
}

/// Description text for a documentation block.
///
/// The first heading is skipped in favour of the paragraph that follows it;
/// when the heading is followed directly by another heading (or nothing),
/// the heading text itself is used.
pub fn describe(block: &str) -> Option<String> {
    let lines: Vec<&str> = block.lines().map(str::trim).collect();
    let heading_at = lines.iter().position(|l| RE_HEADING.is_match(l));

    let raw = match heading_at {
        Some(i) => {
            let heading = RE_HEADING.captures(lines[i]).map(|c| c[1].to_string()).unwrap_or_default();
            let next = lines[i + 1..].iter().position(|l| !l.is_empty()).map(|p| i + 1 + p);
            match next {
                Some(j) if !RE_HEADING.is_match(lines[j]) => paragraph(&lines[j..]),
                _ => heading,
            }
        }
        None => {
            let start = lines.iter().position(|l| !l.is_empty())?;
            paragraph(&lines[start..])
        }
    };

    let text = clean_inline(&raw);
    (!text.is_empty()).then(|| truncate(&text))
}

/// Lines up to the first blank line or heading, joined with spaces.
fn paragraph(lines: &[&str]) -> String {
    lines
        .iter()
        .take_while(|l| !l.is_empty() && !RE_HEADING.is_match(l))
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

fn clean_inline(text: &str) -> String {
    let text = RE_MD_LINK.replace_all(text, "$1");
    let text = RE_EMPHASIS.replace_all(&text, "");
    RE_SPACE.replace_all(text.trim(), " ").into_owned()
}

/// Cut at a word boundary so the kept text is at most [`MAX_DESCRIPTION`]
/// characters, then append `...`.
fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_DESCRIPTION {
        return text.to_string();
    }
    let cut: String = text.chars().take(MAX_DESCRIPTION).collect();
    let kept = match cut.rfind(' ') {
        Some(i) if i > MAX_DESCRIPTION / 2 => &cut[..i],
        _ => cut.as_str(),
    };
    format!("{}...", kept.trim_end())
}

/// Technical terms present in `content`, then tokens of the file name;
/// deduplicated case-insensitively and capped at [`MAX_KEYWORDS`].
pub fn keywords(terms: &[String], content: &str, path: &Path) -> Vec<String> {
    let haystack = content.to_lowercase();
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    let matched = terms
        .iter()
        .filter(|t| !t.is_empty() && haystack.contains(&t.to_lowercase()))
        .cloned();
    let stem = path.file_stem().map(|s| s.to_string_lossy().to_lowercase()).unwrap_or_default();
    let tokens = stem
        .split(|c: char| c == '-' || c == '_' || c == '.' || c.is_whitespace())
        .filter(|t| t.chars().count() >= 2)
        .map(str::to_string)
        .collect::<Vec<_>>();

    for word in matched.chain(tokens) {
        if out.len() == MAX_KEYWORDS {
            break;
        }
        if seen.insert(word.to_lowercase()) {
            out.push(word);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FileConfig, Overrides};
    use std::path::PathBuf;

    #[test]
    fn paragraph_after_heading_is_used() {
        let block = "# Dye Injection\n\nIntroduces a *circular* tracer into\nthe flow.\n\n## Parameters";
        assert_eq!(
            describe(block).as_deref(),
            Some("Introduces a circular tracer into the flow.")
        );
    }

    #[test]
    fn heading_followed_by_heading_uses_heading_text() {
        let block = "# Lid-driven cavity\n\n## Setup\n\nSome text.";
        assert_eq!(describe(block).as_deref(), Some("Lid-driven cavity"));
    }

    #[test]
    fn heading_alone_uses_heading_text() {
        assert_eq!(describe("# Only a title").as_deref(), Some("Only a title"));
    }

    #[test]
    fn text_without_heading_uses_first_paragraph() {
        assert_eq!(
            describe("\nSee [the docs](http://x) for `run`.\n\nMore.").as_deref(),
            Some("See the docs for run.")
        );
    }

    #[test]
    fn long_description_is_truncated_with_ellipsis() {
        let long = "word ".repeat(60);
        let out = describe(&long).unwrap();
        assert!(out.ends_with("..."));
        assert!(out.trim_end_matches("...").chars().count() <= MAX_DESCRIPTION);
    }

    #[test]
    fn shell_comment_block_skips_shebang() {
        let src = "#!/bin/bash\n# Runs every test case.\n# Needs qcc.\n\nset -e\n# later\n";
        assert_eq!(
            first_comment_block(src).as_deref(),
            Some("Runs every test case.\nNeeds qcc.")
        );
    }

    #[test]
    fn keywords_merge_terms_and_filename_tokens() {
        let terms = vec!["VOF".to_string(), "surface tension".to_string(), "octree".to_string()];
        let kw = keywords(&terms, "A vof method with Surface Tension.", Path::new("two-phase_vof.c"));
        assert_eq!(kw, vec!["VOF", "surface tension", "two", "phase"]);
    }

    #[test]
    fn keywords_are_capped() {
        let terms: Vec<String> = (0..20).map(|i| format!("t{i}")).collect();
        let content = terms.join(" ");
        assert_eq!(keywords(&terms, &content, Path::new("a.c")).len(), MAX_KEYWORDS);
    }

    #[test]
    fn page_url_is_base_relative() {
        let cfg = SiteConfig::resolve(Path::new("/repo"), FileConfig::default(), Overrides::default());
        assert_eq!(
            page_url(&cfg, &PathBuf::from("/repo/docs/src-local/drop.c.html")),
            "/src-local/drop.c.html"
        );
    }

    #[test]
    fn source_metadata_defaults_when_undocumented() {
        let cfg = SiteConfig::resolve(Path::new("/repo"), FileConfig::default(), Overrides::default());
        let source = SourceFile {
            path: PathBuf::from("/repo/src-local/bare.c"),
            kind: SourceKind::Native,
            content: "int main() { return 0; }\n".into(),
        };
        let out = cfg.output_path_for(&source.path);
        let meta = PageMetadata::for_source(&cfg, &source, &out);
        assert_eq!(meta.page_title, "src-local/bare.c");
        assert_eq!(meta.description, "Documentation for src-local/bare.c");
        assert_eq!(meta.keywords, vec!["bare"]);
    }
}
