//! Error handling module for robofetch
//!
//! Provides centralized error handling with proper error types using thiserror.
//! Library code returns these; the binary wraps them with anyhow context.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for dataset fetching
#[derive(Error, Debug)]
pub enum FetchError {
    /// IO errors (directory creation, renames, stdin)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The shell itself could not be started
    #[error("Failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// A command exited unsuccessfully under the abort policy
    #[error("Command `{command}` failed (exit code {})", exit_code_label(.code))]
    CommandFailed { command: String, code: Option<i32> },

    /// Post-extraction filesystem reorganization failed
    #[error("Reorganize error at {}: {message}", .path.display())]
    Reorganize { path: PathBuf, message: String },

    /// Configuration errors (loading, parsing, validation)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Prompt input errors
    #[error("Input error: {0}")]
    Input(String),
}

/// Exit code for messages; `None` means the process died from a signal
pub(crate) fn exit_code_label(code: &Option<i32>) -> String {
    code.map_or_else(|| "signal".to_string(), |c| c.to_string())
}

/// Result type alias for fetch operations
pub type Result<T> = std::result::Result<T, FetchError>;

impl FetchError {
    /// Create a spawn error for `command`
    pub fn spawn(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::Spawn {
            command: command.into(),
            source,
        }
    }

    /// Create a command failure error
    pub fn command_failed(command: impl Into<String>, code: Option<i32>) -> Self {
        Self::CommandFailed {
            command: command.into(),
            code,
        }
    }

    /// Create a reorganize error anchored at `path`
    pub fn reorganize(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Reorganize {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an input error
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }
}
