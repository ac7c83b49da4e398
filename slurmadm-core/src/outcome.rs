//! Structured result of one tool run.

use serde::Serialize;
use serde_json::Value;

use crate::error::{Result, SlurmadmError};
use crate::invocation::Invocation;
use crate::runner::RawOutput;

/// Everything a caller needs to know about one completed run.
///
/// A non-zero exit is not an error at this level: the run completed and the
/// outcome records what happened. Use [`RunOutcome::require_success`] when a
/// failure should abort the caller instead.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    /// Exit code was zero.
    pub success: bool,
    /// A mutating command succeeded, so cluster state may differ now.
    /// Always false for read-only commands and for failed runs.
    pub changed: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    /// Decoded stdout, present only when JSON output was requested, the run
    /// succeeded and stdout was non-empty.
    pub data: Option<Value>,
    /// Human-readable failure summary, `None` on success.
    pub message: Option<String>,
    /// The exact command line that ran, for logs and error reports.
    pub command_line: String,
}

impl RunOutcome {
    /// Classify a raw run.
    ///
    /// `keyword` is the tool subcommand (for failure messages), `mutating`
    /// whether it can change cluster state, `json_expected` whether stdout
    /// should decode as JSON. A decode failure on expected JSON is a hard
    /// error; empty stdout is not (the tool prints nothing for some queries).
    pub fn from_raw(
        keyword: &str,
        mutating: bool,
        json_expected: bool,
        invocation: &Invocation,
        raw: RawOutput,
    ) -> Result<Self> {
        let success = raw.exit_code == 0;

        let data = if json_expected && success && !raw.stdout.trim().is_empty() {
            let value = serde_json::from_str(&raw.stdout).map_err(|err| {
                SlurmadmError::MalformedOutput {
                    raw: raw.stdout.clone(),
                    source: err,
                }
            })?;
            Some(value)
        } else {
            None
        };

        let message = if success {
            None
        } else {
            let stderr = raw.stderr.trim();
            if stderr.is_empty() {
                Some(format!("{keyword} failed with exit code {}", raw.exit_code))
            } else {
                Some(stderr.to_string())
            }
        };

        Ok(Self {
            success,
            changed: success && mutating,
            exit_code: raw.exit_code,
            stdout: raw.stdout,
            stderr: raw.stderr,
            data,
            message,
            command_line: invocation.command_line(),
        })
    }

    /// Escalate a failed run into an error, passing a successful one through.
    pub fn require_success(self) -> Result<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(SlurmadmError::CommandFailed {
                exit_code: self.exit_code,
                message: self
                    .message
                    .clone()
                    .unwrap_or_else(|| format!("command failed with exit code {}", self.exit_code)),
            })
        }
    }
}
