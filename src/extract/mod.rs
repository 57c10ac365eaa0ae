//! Content extractors: turn a source file into Markdown-ready text.

pub mod native;
pub mod python;

use crate::source::{SourceFile, SourceKind};
use native::Preprocessor;

/// Produce converter input for `source` based on its kind.
pub fn extract(source: &SourceFile, preprocessor: &dyn Preprocessor) -> String {
    match source.kind {
        SourceKind::Markdown => source.content.clone(),
        SourceKind::Shell => wrap_shell(&source.content),
        SourceKind::Python => python::split(&source.content),
        SourceKind::Native => native::extract(source, preprocessor).into_markdown(),
    }
}

/// Wrap a whole shell script in a bash code fence.
pub fn wrap_shell(content: &str) -> String {
    let fence = fence_for(content, '`');
    format!("{fence}bash\n{}\n{fence}", content.trim_end_matches('\n'))
}

/// A code fence of `marker` characters that is longer than any run of that
/// character inside `content`, so the content can never close it early.
pub(crate) fn fence_for(content: &str, marker: char) -> String {
    let mut longest = 0;
    let mut run = 0;
    for c in content.chars() {
        if c == marker {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    marker.to_string().repeat((longest + 1).max(3))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ToolError;
    use std::path::{Path, PathBuf};

    struct Unavailable;

    impl Preprocessor for Unavailable {
        fn preprocess(&self, _path: &Path) -> Result<String, ToolError> {
            Err(ToolError::EmptyOutput {
                tool: "literate-c".into(),
            })
        }
    }

    fn source(name: &str, content: &str) -> SourceFile {
        let path = PathBuf::from(name);
        SourceFile {
            kind: SourceKind::from_path(&path),
            path,
            content: content.to_string(),
        }
    }

    #[test]
    fn markdown_is_unchanged() {
        let md = "# Title\n\nSome *text*.\n";
        assert_eq!(extract(&source("notes.md", md), &Unavailable), md);
    }

    #[test]
    fn shell_is_fenced() {
        let out = extract(&source("run.sh", "#!/bin/bash\necho hi\n"), &Unavailable);
        assert_eq!(out, "```bash\n#!/bin/bash\necho hi\n```");
    }

    #[test]
    fn fence_outgrows_embedded_backticks() {
        assert_eq!(fence_for("no ticks", '`'), "```");
        assert_eq!(fence_for("a ```` b", '`'), "`````");
    }

    #[test]
    fn native_dispatches_to_fallback_when_preprocessor_fails() {
        let out = extract(&source("drop.c", "int x;\n"), &Unavailable);
        assert!(out.starts_with("# drop.c\n"));
        assert!(out.contains("int x;"));
    }
}
