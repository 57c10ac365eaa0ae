//! Error types for the pieces of the pipeline that callers need to tell apart.

use std::path::PathBuf;
use thiserror::Error;

/// Problems detected before any file is processed. Always fatal.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{what} not found at {}", path.display())]
    MissingPath { what: &'static str, path: PathBuf },

    #[error("{what} `{command}` not found on PATH")]
    MissingCommand { what: &'static str, command: String },

    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Failures of an external tool invocation.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("failed to run {tool}: {source}")]
    Spawn {
        tool: String,
        source: std::io::Error,
    },

    #[error("{tool} exited with {status}: {stderr}")]
    Failed {
        tool: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("{tool} produced empty output")]
    EmptyOutput { tool: String },

    #[error("{what} not found at {}", path.display())]
    MissingScript { what: &'static str, path: PathBuf },

    #[error("I/O error while running {tool}: {source}")]
    Io {
        tool: String,
        source: std::io::Error,
    },
}
