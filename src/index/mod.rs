//! Index page assembled from the README and the list of generated pages.

pub mod tree;

use crate::config::SiteConfig;
use crate::convert::Converter;
use crate::inject;
use crate::metadata::PageMetadata;
use crate::pipeline::GeneratedFiles;
use crate::postprocess;
use anyhow::{Context, Result};
use regex::Regex;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

pub const DEFAULT_WIKI_TITLE: &str = "Documentation";
const MISSING_README: &str = "# Project Documentation\n";
const ROOT_GROUP: &str = "root";

static RE_H1: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^# (.+)$").unwrap());

/// Site title: the README's first level-one heading.
pub fn wiki_title(readme: &str) -> String {
    RE_H1
        .captures(readme)
        .map(|c| c[1].trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_WIKI_TITLE.to_string())
}

fn forward_slashes(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// `## Generated Documentation` with one group per top-level directory.
/// Root-level files come first, then directories by name.
pub fn links_section(config: &SiteConfig, generated: &GeneratedFiles) -> String {
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (source, html) in generated {
        let rel_source = source.strip_prefix(&config.root).unwrap_or(source);
        let rel_html = html.strip_prefix(&config.output_dir).unwrap_or(html);
        let mut parts = rel_source.components();
        let first = parts.next();
        let group = match (first, parts.next()) {
            (Some(top), Some(_)) => top.as_os_str().to_string_lossy().into_owned(),
            _ => ROOT_GROUP.to_string(),
        };
        groups.entry(group).or_default().push(format!(
            "- [{}]({})",
            forward_slashes(rel_source),
            forward_slashes(rel_html)
        ));
    }

    let mut out = String::from("\n\n## Generated Documentation\n\n");
    let mut push_group = |title: &str, links: &mut Vec<String>| {
        links.sort();
        out.push_str(&format!("### {title}\n\n"));
        out.push_str(&links.join("\n"));
        out.push_str("\n\n");
    };
    if let Some(mut links) = groups.remove(ROOT_GROUP) {
        push_group("Root Directory", &mut links);
    }
    for (dir, mut links) in groups {
        push_group(&dir, &mut links);
    }
    out
}

/// The Markdown fed to the converter for `index.html`.
pub fn index_markdown(config: &SiteConfig, readme: &str, generated: &GeneratedFiles) -> String {
    let mut content = tree::convert(readme);
    content.push_str(&links_section(config, generated));
    content
}

/// Write `index.html`: convert, post-process, inject assets.
pub fn generate(
    config: &SiteConfig,
    converter: &Converter,
    generated: &GeneratedFiles,
) -> Result<PathBuf> {
    let readme = match fs::read_to_string(&config.readme) {
        Ok(text) => text,
        Err(_) => {
            tracing::warn!("README not found at {}", config.readme.display());
            MISSING_README.to_string()
        }
    };
    let markdown = index_markdown(config, &readme, generated);
    let index_path = config.index_path();
    let meta = PageMetadata::for_index(config, &readme);

    let html = converter
        .convert(&markdown, &index_path, &meta)
        .context("failed to generate index.html")?;
    let html = postprocess::document(config, &html);
    let html = inject::inject(&html, config.css_name().as_deref(), "");
    fs::write(&index_path, html)
        .with_context(|| format!("failed to write {}", index_path.display()))?;
    Ok(index_path)
}
