//! Source files and their classification by extension.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Content-extraction strategy for a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Markdown,
    Python,
    Shell,
    /// C and C++ sources and headers. Also the default for unknown suffixes.
    Native,
}

impl SourceKind {
    /// Classify by suffix only (case-insensitive).
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("md" | "markdown") => SourceKind::Markdown,
            Some("py") => SourceKind::Python,
            Some("sh" | "bash") => SourceKind::Shell,
            _ => SourceKind::Native,
        }
    }

    /// Whether the doc-link suffixing pass applies to this kind's HTML.
    pub fn links_docs(self) -> bool {
        !matches!(self, SourceKind::Native)
    }
}

/// A source file read into memory.
#[derive(Debug)]
pub struct SourceFile {
    pub path: PathBuf,
    pub kind: SourceKind,
    pub content: String,
}

impl SourceFile {
    pub fn read(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        Ok(SourceFile {
            path: path.to_path_buf(),
            kind: SourceKind::from_path(path),
            content: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }

    /// File name as displayed in headings.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}
