//! Markdown → HTML conversion through pandoc, plus repair of its output.

use crate::error::ToolError;
use crate::metadata::PageMetadata;
use crate::tool;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::LazyLock;

static RE_EMPTY_ANCHOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<a\b[^>]*>\s*</a>").unwrap());

static RE_DOCTYPE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<!doctype\b").unwrap());

static RE_HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<html[\s>]").unwrap());

/// Pandoc invocation bound to one template.
pub struct Converter {
    program: String,
    template: PathBuf,
}

impl Converter {
    pub fn new(program: impl Into<String>, template: impl Into<PathBuf>) -> Self {
        Converter {
            program: program.into(),
            template: template.into(),
        }
    }

    /// Convert `markdown` into the HTML page at `output` and return the
    /// repaired HTML that now sits there.
    pub fn convert(
        &self,
        markdown: &str,
        output: &Path,
        meta: &PageMetadata,
    ) -> Result<String, ToolError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(["-f", "markdown+smart+raw_html", "-t", "html5"])
            .args(["--standalone", "--toc", "--katex", "--preserve-tabs"])
            .arg("--template")
            .arg(&self.template);
        for (name, value) in template_variables(meta) {
            cmd.arg("-V").arg(format!("{name}={value}"));
        }
        cmd.arg("-o").arg(output);

        tool::run(&self.program, &mut cmd, Some(markdown))?;

        let written = fs::read_to_string(output).map_err(|source| ToolError::Io {
            tool: self.program.clone(),
            source,
        })?;
        let repaired = repair(&written, meta);
        if repaired != written {
            fs::write(output, &repaired).map_err(|source| ToolError::Io {
                tool: self.program.clone(),
                source,
            })?;
        }
        Ok(repaired)
    }
}

fn template_variables(meta: &PageMetadata) -> Vec<(&'static str, String)> {
    vec![
        ("base", meta.base_url.clone()),
        ("wikititle", meta.wiki_title.clone()),
        ("pageUrl", meta.page_url.clone()),
        ("pagetitle", meta.page_title.clone()),
        ("description", meta.description.clone()),
        ("keywords", meta.keywords_joined()),
        ("image", meta.image.clone()),
        ("sitenav", "true".to_string()),
        ("pagetools", "true".to_string()),
    ]
}

/// Strip empty anchors; if what remains is not an HTML document, wrap it in
/// a synthesized one.
pub fn repair(html: &str, meta: &PageMetadata) -> String {
    let cleaned = strip_empty_anchors(html);
    if RE_DOCTYPE.is_match(&cleaned) || RE_HTML_TAG.is_match(&cleaned) {
        cleaned
    } else {
        tracing::debug!("converter output for {} is not a document; synthesizing", meta.page_url);
        synthesize_document(&cleaned, meta)
    }
}

pub fn strip_empty_anchors(html: &str) -> String {
    RE_EMPTY_ANCHOR.replace_all(html, "").into_owned()
}

/// Minimal HTML5 page carrying the metadata as meta tags.
pub fn synthesize_document(fragment: &str, meta: &PageMetadata) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    out.push_str("<meta charset=\"utf-8\" />\n");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />\n");
    out.push_str(&format!(
        "<title>{} - {}</title>\n",
        html_escape(&meta.page_title),
        html_escape(&meta.wiki_title)
    ));
    out.push_str(&format!(
        "<meta name=\"description\" content=\"{}\" />\n",
        html_escape(&meta.description)
    ));
    out.push_str(&format!(
        "<meta name=\"keywords\" content=\"{}\" />\n",
        html_escape(&meta.keywords_joined())
    ));
    if !meta.image.is_empty() {
        out.push_str(&format!(
            "<meta property=\"og:image\" content=\"{}\" />\n",
            html_escape(&meta.image)
        ));
    }
    out.push_str(&format!("<base href=\"{}\" />\n", html_escape(&meta.base_url)));
    out.push_str("</head>\n<body>\n");
    out.push_str(fragment.trim());
    out.push_str("\n</body>\n</html>\n");
    out
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
