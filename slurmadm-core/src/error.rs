//! Structured error types for slurmadm-core.
//!
//! Uses `thiserror` for better API surface and error composition.
//! The binary crate (slurmadm-cli) can still use `anyhow` for convenience,
//! but library consumers get structured, composable errors.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for slurmadm-core operations
#[derive(Error, Debug)]
pub enum SlurmadmError {
    /// Command keyword rejected by the whitelist (pre-execution)
    #[error("invalid {tool} command '{keyword}': valid commands are {valid}")]
    InvalidCommand {
        tool: &'static str,
        keyword: String,
        valid: String,
    },

    /// Entity keyword rejected by the whitelist (pre-execution)
    #[error("invalid {tool} entity '{keyword}': valid entities are {valid}")]
    InvalidEntity {
        tool: &'static str,
        keyword: String,
        valid: String,
    },

    /// Option string could not be tokenized (unbalanced quote, trailing
    /// escape, or an unquoted `#` word the lexer would drop as a comment)
    #[error("malformed option string {raw:?}: unbalanced quote, trailing escape, or unquoted '#'")]
    InvalidOptions { raw: String },

    /// Executable missing from PATH or the configured location
    #[error("executable not found: {}", .program.display())]
    ExecutableNotFound { program: PathBuf },

    /// Bounded wait expired; the child was killed and reaped.
    /// Carries whatever output was captured before the deadline.
    #[error("command timed out after {seconds} seconds: {command_line}")]
    Timeout {
        seconds: u64,
        command_line: String,
        stdout: String,
        stderr: String,
    },

    /// Spawn-level failure other than a missing executable
    #[error("failed to execute {command_line}: {source}")]
    Execution {
        command_line: String,
        source: io::Error,
    },

    /// JSON output requested and the command succeeded, but stdout did not decode
    #[error("malformed JSON output: {source}")]
    MalformedOutput {
        raw: String,
        source: serde_json::Error,
    },

    /// Non-zero exit escalated to an error; `message` is derived from stderr
    /// or falls back to a generic description
    #[error("{message}")]
    CommandFailed { exit_code: i32, message: String },

    /// Configuration error
    #[error("configuration error: {reason}")]
    Config { reason: String },
}

/// Result type alias for slurmadm-core operations
pub type Result<T> = std::result::Result<T, SlurmadmError>;

impl SlurmadmError {
    /// Create an invalid command error, joining the whitelist for the message
    pub fn invalid_command(tool: &'static str, keyword: impl Into<String>, valid: &[&str]) -> Self {
        Self::InvalidCommand {
            tool,
            keyword: keyword.into(),
            valid: valid.join(", "),
        }
    }

    /// Create an invalid entity error, joining the whitelist for the message
    pub fn invalid_entity(tool: &'static str, keyword: impl Into<String>, valid: &[&str]) -> Self {
        Self::InvalidEntity {
            tool,
            keyword: keyword.into(),
            valid: valid.join(", "),
        }
    }

    /// Create an execution error with the attempted command line
    pub fn execution(command_line: impl Into<String>, source: io::Error) -> Self {
        Self::Execution {
            command_line: command_line.into(),
            source,
        }
    }

    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }
}
