//! Per-file generation: read, extract, convert, post-process, inject, write.

use crate::config::SiteConfig;
use crate::convert::Converter;
use crate::extract::{self, native::Preprocessor};
use crate::inject;
use crate::metadata::PageMetadata;
use crate::paths;
use crate::postprocess::{self, anchors::Tagger};
use crate::source::SourceFile;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Source path → generated page, for every file that made it through.
pub type GeneratedFiles = BTreeMap<PathBuf, PathBuf>;

/// External collaborators shared by every file of a run.
pub struct Tools<'a> {
    pub converter: &'a Converter,
    pub preprocessor: &'a dyn Preprocessor,
    pub tagger: &'a dyn Tagger,
}

/// Outcome of a whole batch.
#[derive(Debug, Default)]
pub struct Summary {
    pub generated: GeneratedFiles,
    pub failed: Vec<PathBuf>,
}

/// Generate the page for one source file and return the path written.
pub fn process_file(config: &SiteConfig, tools: &Tools, path: &Path) -> Result<PathBuf> {
    let source = SourceFile::read(path)?;
    let markdown = extract::extract(&source, tools.preprocessor);
    let output = config.output_path_for(&source.path);
    let meta = PageMetadata::for_source(config, &source, &output);

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    let html = tools
        .converter
        .convert(&markdown, &output, &meta)
        .with_context(|| format!("failed to convert {}", path.display()))?;

    let html = match postprocess::apply(config, source.kind, &source.path, &output, &html, tools.tagger) {
        Ok(html) => html,
        Err(err) => {
            // A half-processed page must not be left behind.
            if let Err(rm) = fs::remove_file(&output) {
                tracing::debug!("could not remove {}: {}", output.display(), rm);
            }
            return Err(err).with_context(|| format!("failed to post-process {}", path.display()));
        }
    };

    let prefix = paths::up_prefix(&config.output_dir, &output);
    let html = inject::inject(&html, config.css_name().as_deref(), &prefix);
    fs::write(&output, html).with_context(|| format!("failed to write {}", output.display()))?;
    Ok(output)
}

/// Process `sources` in order. Failures are logged and counted, never fatal.
pub fn run(config: &SiteConfig, tools: &Tools, sources: &[PathBuf]) -> Summary {
    let mut summary = Summary::default();
    for path in sources {
        let shown = path.strip_prefix(&config.root).unwrap_or(path);
        match process_file(config, tools, path) {
            Ok(output) => {
                tracing::info!("generated {}", output.strip_prefix(&config.root).unwrap_or(&output).display());
                summary.generated.insert(path.clone(), output);
            }
            Err(err) => {
                tracing::error!("skipping {}: {:#}", shown.display(), err);
                summary.failed.push(path.clone());
            }
        }
    }
    summary
}
