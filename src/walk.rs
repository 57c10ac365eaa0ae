//! Source discovery.

use crate::config::SiteConfig;
use anyhow::{Context, Result};
use std::path::PathBuf;
use walkdir::WalkDir;

/// Every recognized file under the configured source directories, plus the
/// shell scripts sitting directly in the repository root. Sorted, no
/// duplicates.
pub fn find_sources(config: &SiteConfig) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();

    for dir in &config.source_dirs {
        let base = config.root.join(dir);
        if !base.is_dir() {
            tracing::warn!("source directory {} does not exist, skipping", base.display());
            continue;
        }
        for entry in WalkDir::new(&base).follow_links(true) {
            let entry = entry.with_context(|| format!("failed to walk {}", base.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let recognized = entry
                .path()
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| config.is_recognized(e));
            if recognized {
                found.push(entry.into_path());
            }
        }
    }

    // The root itself may contain glob metacharacters.
    let pattern = format!("{}/*.sh", glob::Pattern::escape(&config.root.to_string_lossy()));
    for entry in glob::glob(&pattern).with_context(|| format!("invalid glob pattern: {pattern}"))? {
        let path = entry.with_context(|| format!("failed to read glob entry for {pattern}"))?;
        if path.is_file() {
            found.push(path);
        }
    }

    found.sort();
    found.dedup();
    tracing::debug!("found {} source files", found.len());
    Ok(found)
}
