//! HTML post-processing of converter output, per source kind.
//!
//! Native pages go through
//! `strip_line_numbers → wrap → link includes → tag anchors`; every other
//! kind gets `wrap → suffix_doc_links`.

pub mod anchors;
pub mod code_blocks;
pub mod includes;
pub mod links;

use crate::config::SiteConfig;
use crate::error::ToolError;
use crate::source::SourceKind;
use anchors::Tagger;
use includes::IncludeLinker;
use std::path::Path;

/// Post-process the HTML of one page.
///
/// `source` is the original file and `output` the page being written; both
/// are needed to resolve include links and the tags file.
pub fn apply(
    config: &SiteConfig,
    kind: SourceKind,
    source: &Path,
    output: &Path,
    html: &str,
    tagger: &dyn Tagger,
) -> Result<String, ToolError> {
    if kind.links_docs() {
        Ok(document(config, html))
    } else {
        native(config, source, output, html, tagger)
    }
}

/// Markdown, Python, shell, and the index page.
pub fn document(config: &SiteConfig, html: &str) -> String {
    let html = code_blocks::wrap(html);
    links::suffix_doc_links(&html, &config.extensions)
}

fn native(
    config: &SiteConfig,
    source: &Path,
    output: &Path,
    html: &str,
    tagger: &dyn Tagger,
) -> Result<String, ToolError> {
    let html = code_blocks::strip_line_numbers(html);
    let html = code_blocks::wrap(&html);

    let page_dir = output.parent().unwrap_or(&config.output_dir);
    let local_relative = config
        .local_sources_dir
        .strip_prefix(&config.root)
        .unwrap_or(&config.local_sources_dir);
    let linker = IncludeLinker {
        local_sources_dir: &config.local_sources_dir,
        local_output_dir: config.output_dir.join(local_relative),
        page_dir,
        fallback_url: &config.include_fallback_url,
    };
    let html = linker.link(&html);

    tagger.tag(&html, &anchors::tags_file_for(&config.root, source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FileConfig, Overrides};
    use std::cell::RefCell;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Records the tags file it was given and returns the HTML unchanged.
    #[derive(Default)]
    struct Recorder(RefCell<Option<PathBuf>>);

    impl Tagger for Recorder {
        fn tag(&self, html: &str, tags_file: &Path) -> Result<String, ToolError> {
            *self.0.borrow_mut() = Some(tags_file.to_path_buf());
            Ok(html.to_string())
        }
    }

    fn config(root: &Path) -> SiteConfig {
        SiteConfig::resolve(root, FileConfig::default(), Overrides::default())
    }

    #[test]
    fn native_pipeline_runs_every_stage() {
        let dir = TempDir::new().unwrap();
        let cfg = config(dir.path());
        fs::create_dir_all(dir.path().join("src-local")).unwrap();
        fs::write(dir.path().join("src-local/math.h"), "").unwrap();

        let source = dir.path().join("testCases/drop.c");
        let output = cfg.output_path_for(&source);
        let html = concat!(
            "<div class=\"sourceCode\" id=\"cb1\"><pre class=\"sourceCode c\"><code>",
            "<span class=\"pp\">#include </span><span class=\"im\">&quot;math.h&quot;</span>",
            "<span class=\"co\">// x <span class=\"dv\">3</span></span>",
            "</code></pre></div>"
        );
        let recorder = Recorder::default();
        let out = apply(&cfg, SourceKind::Native, &source, &output, html, &recorder).unwrap();

        assert!(out.contains("class=\"code-block-container\""));
        assert!(out.contains("<a href=\"../src-local/math.h.html\""), "{out}");
        assert!(out.contains("<span class=\"co\">// x</span>"), "{out}");
        assert_eq!(
            recorder.0.borrow().as_deref(),
            Some(Path::new("testCases/drop.c.tags"))
        );
    }

    #[test]
    fn document_pipeline_wraps_and_suffixes() {
        let cfg = config(Path::new("/repo"));
        let html = "<p><a href=\"src-local/a.c\">a</a></p><pre><code>x</code></pre>";
        let out = document(&cfg, html);
        assert!(out.contains("href=\"src-local/a.c.html\""));
        assert!(out.contains("<div class=\"code-block-container\"><pre>"));
    }

    #[test]
    fn non_native_kinds_skip_the_tagger() {
        let cfg = config(Path::new("/repo"));
        let recorder = Recorder::default();
        let out = apply(
            &cfg,
            SourceKind::Python,
            Path::new("/repo/a.py"),
            Path::new("/repo/docs/a.py.html"),
            "<p>x</p>",
            &recorder,
        )
        .unwrap();
        assert_eq!(out, "<p>x</p>");
        assert!(recorder.0.borrow().is_none());
    }
}
