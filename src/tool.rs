//! Blocking invocation of external tools.

use crate::error::ToolError;
use std::io::{Seek, SeekFrom, Write};
use std::process::{Command, Output, Stdio};

/// Run `command` to completion, feeding `input` on stdin when given.
///
/// Stdin is staged through an anonymous temporary file so a tool that writes
/// before it finishes reading can never dead-lock against us. A non-zero exit
/// is reported as [`ToolError::Failed`] with the captured stderr.
pub fn run(tool: &str, command: &mut Command, input: Option<&str>) -> Result<Output, ToolError> {
    let io_err = |source| ToolError::Io {
        tool: tool.to_string(),
        source,
    };

    match input {
        Some(text) => {
            let mut staged = tempfile::tempfile().map_err(io_err)?;
            staged.write_all(text.as_bytes()).map_err(io_err)?;
            staged.seek(SeekFrom::Start(0)).map_err(io_err)?;
            command.stdin(Stdio::from(staged));
        }
        None => {
            command.stdin(Stdio::null());
        }
    }

    tracing::debug!(?command, "running {}", tool);
    let output = command.output().map_err(|source| ToolError::Spawn {
        tool: tool.to_string(),
        source,
    })?;

    if !output.status.success() {
        return Err(ToolError::Failed {
            tool: tool.to_string(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(output)
}
