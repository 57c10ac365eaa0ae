//! C/C++ extraction through the `literate-c` preprocessor, with a plain
//! fenced-code fallback.

use super::fence_for;
use crate::error::ToolError;
use crate::source::SourceFile;
use crate::tool;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Fence marker `literate-c` emits for code; rewritten to a plain C fence.
const LITERATE_FENCE: &str = "~~~literatec";
const STANDARD_FENCE: &str = "~~~c";

/// Something that turns a C source file into annotated Markdown.
pub trait Preprocessor {
    fn preprocess(&self, path: &Path) -> Result<String, ToolError>;
}

/// Basilisk's `literate-c` script, run in standard (non-magic) mode.
pub struct LiterateC {
    script: PathBuf,
}

impl LiterateC {
    pub fn new(script: impl Into<PathBuf>) -> Self {
        LiterateC {
            script: script.into(),
        }
    }
}

impl Preprocessor for LiterateC {
    fn preprocess(&self, path: &Path) -> Result<String, ToolError> {
        let mut cmd = Command::new(&self.script);
        cmd.arg(path).arg("0");
        let output = tool::run("literate-c", &mut cmd, None)?;
        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        if text.trim().is_empty() {
            return Err(ToolError::EmptyOutput {
                tool: "literate-c".to_string(),
            });
        }
        Ok(text)
    }
}

/// Result of native extraction. Both branches are valid converter input.
#[derive(Debug, PartialEq, Eq)]
pub enum NativeExtraction {
    /// Preprocessor output with fences normalized.
    Literate(String),
    /// Heading plus the raw file in one fenced block.
    Fallback(String),
}

impl NativeExtraction {
    pub fn into_markdown(self) -> String {
        match self {
            NativeExtraction::Literate(text) | NativeExtraction::Fallback(text) => text,
        }
    }
}

/// Extract a native source. Never fails: any preprocessor problem yields
/// [`NativeExtraction::Fallback`].
pub fn extract(source: &SourceFile, preprocessor: &dyn Preprocessor) -> NativeExtraction {
    let fallback = fallback_markdown(&source.file_name(), &source.content);
    match preprocessor.preprocess(&source.path) {
        Ok(text) if !text.trim().is_empty() => {
            NativeExtraction::Literate(text.replace(LITERATE_FENCE, STANDARD_FENCE))
        }
        Ok(_) => {
            tracing::debug!("literate-c produced no output for {}, using fallback", source.path.display());
            NativeExtraction::Fallback(fallback)
        }
        Err(e) => {
            tracing::debug!("literate-c failed for {}: {}; using fallback", source.path.display(), e);
            NativeExtraction::Fallback(fallback)
        }
    }
}

/// `# name` followed by the complete file inside a single C fence.
pub fn fallback_markdown(file_name: &str, content: &str) -> String {
    let fence = fence_for(content, '`');
    let body = content.strip_suffix('\n').unwrap_or(content);
    format!("# {file_name}\n\n{fence}c\n{body}\n{fence}\n")
}

/// First `/** ... */` (or `/* ... */`) comment body, with leading `*`
/// gutters removed. Used for page metadata.
pub fn first_doc_comment(content: &str) -> Option<String> {
    let start = content.find("/*")?;
    let rest = &content[start + 2..];
    let end = rest.find("*/")?;
    let body = rest[..end].trim_start_matches('*');
    let lines: Vec<&str> = body
        .lines()
        .map(|l| {
            let t = l.trim();
            t.strip_prefix("* ").or_else(|| t.strip_prefix('*')).unwrap_or(t)
        })
        .collect();
    let text = lines.join("\n").trim().to_string();
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceKind;

    struct Fixed(Result<&'static str, ()>);

    impl Preprocessor for Fixed {
        fn preprocess(&self, _path: &Path) -> Result<String, ToolError> {
            match self.0 {
                Ok(s) => Ok(s.to_string()),
                Err(()) => Err(ToolError::EmptyOutput {
                    tool: "literate-c".into(),
                }),
            }
        }
    }

    fn header(content: &str) -> SourceFile {
        SourceFile {
            path: PathBuf::from("src-local/dye-injection.h"),
            kind: SourceKind::Native,
            content: content.to_string(),
        }
    }

    const SOURCE: &str = "/**\n# Dye\n*/\n#include \"tracer.h\"\nscalar T[];\n";

    #[test]
    fn literate_output_is_used_with_standard_fence() {
        let pre = Fixed(Ok("# Dye\n\n~~~literatec\nscalar T[];\n~~~\n"));
        assert_eq!(
            extract(&header(SOURCE), &pre),
            NativeExtraction::Literate("# Dye\n\n~~~c\nscalar T[];\n~~~\n".into())
        );
    }

    #[test]
    fn failure_falls_back_to_whole_file() {
        let NativeExtraction::Fallback(md) = extract(&header(SOURCE), &Fixed(Err(()))) else {
            panic!("expected fallback");
        };
        assert!(md.starts_with("# dye-injection.h\n\n```c\n"));
        assert!(md.contains(SOURCE));
        assert_eq!(md.matches("```").count(), 2, "exactly one fenced block");
    }

    #[test]
    fn blank_output_falls_back() {
        let result = extract(&header(SOURCE), &Fixed(Ok("  \n\n")));
        assert!(matches!(result, NativeExtraction::Fallback(_)));
    }

    #[test]
    fn fallback_survives_backticks_in_source() {
        let content = "// ```weird```\nint x;\n";
        let md = fallback_markdown("x.c", content);
        assert!(md.contains("````c\n// ```weird```\nint x;\n````\n"), "{md}");
    }

    #[test]
    fn doc_comment_is_extracted() {
        let src = "/**\n * # Dye Injection\n *\n * Adds a tracer.\n */\nint x;";
        assert_eq!(
            first_doc_comment(src).as_deref(),
            Some("# Dye Injection\n\nAdds a tracer.")
        );
        assert_eq!(first_doc_comment("int x;"), None);
    }
}
