//! Declaration anchors through darcsit's `decl_anchors.awk`.

use crate::error::ToolError;
use crate::tool;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Inserts ids for source-level declarations so they can be deep-linked.
pub trait Tagger {
    fn tag(&self, html: &str, tags_file: &Path) -> Result<String, ToolError>;
}

/// `awk -v tags=<file> -f decl_anchors.awk`, HTML on stdin.
pub struct DeclAnchors {
    awk: String,
    script: PathBuf,
    workdir: Option<PathBuf>,
}

impl DeclAnchors {
    pub fn new(awk: impl Into<String>, script: impl Into<PathBuf>) -> Self {
        DeclAnchors {
            awk: awk.into(),
            script: script.into(),
            workdir: None,
        }
    }

    /// Directory the tags file path is relative to.
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(dir.into());
        self
    }
}

impl Tagger for DeclAnchors {
    fn tag(&self, html: &str, tags_file: &Path) -> Result<String, ToolError> {
        if !self.script.is_file() {
            return Err(ToolError::MissingScript {
                what: "decl_anchors.awk",
                path: self.script.clone(),
            });
        }
        let io_err = |source| ToolError::Io {
            tool: self.awk.clone(),
            source,
        };

        // Output goes to a scratch file that is removed when `scratch` drops,
        // on success and on every error path alike.
        let scratch = tempfile::NamedTempFile::new().map_err(io_err)?;
        let stdout = scratch.reopen().map_err(io_err)?;

        let mut cmd = Command::new(&self.awk);
        cmd.arg("-v")
            .arg(format!("tags={}", tags_file.display()))
            .arg("-f")
            .arg(&self.script)
            .stdout(Stdio::from(stdout));
        if let Some(dir) = &self.workdir {
            cmd.current_dir(dir);
        }
        tool::run(&self.awk, &mut cmd, Some(html))?;

        fs::read_to_string(scratch.path()).map_err(io_err)
    }
}

/// Tags file the awk script reads: the root-relative source path with
/// `.tags` appended.
pub fn tags_file_for(root: &Path, source: &Path) -> PathBuf {
    let relative = source.strip_prefix(root).unwrap_or(source);
    let mut name = relative.as_os_str().to_owned();
    name.push(".tags");
    PathBuf::from(name)
}
