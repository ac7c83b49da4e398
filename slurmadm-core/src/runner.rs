//! Process execution boundary.
//!
//! Provides a trait for running a built [`Invocation`], with:
//! - Real implementation using tokio::process
//! - Scripted implementation for testing
//! - Timeout enforcement with guaranteed kill-and-reap
//!
//! The runner reports the raw (exit code, stdout, stderr) triple and never
//! interprets it; outcome classification lives in [`crate::outcome`].

use std::io;
use std::process::Stdio;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::debug;

use crate::error::{Result, SlurmadmError};
use crate::invocation::Invocation;

/// Raw output from one subprocess run.
///
/// A child killed by a signal has no exit code; it is reported as `-1`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl RawOutput {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failure(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

/// Trait for executing a built invocation (testable boundary).
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(&self, invocation: &Invocation, timeout: Duration) -> Result<RawOutput>;
}

/// Production runner: direct argv spawn via tokio::process, no shell.
///
/// On timeout the child is killed and reaped before the error is returned,
/// so no process outlives the bounded wait. Whatever stdout/stderr was read
/// before the deadline rides along on the error.
pub struct SpawnRunner;

#[async_trait]
impl ProcessRunner for SpawnRunner {
    async fn run(&self, invocation: &Invocation, timeout: Duration) -> Result<RawOutput> {
        let mut child = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| match err.kind() {
                io::ErrorKind::NotFound => SlurmadmError::ExecutableNotFound {
                    program: invocation.program.clone(),
                },
                _ => SlurmadmError::execution(invocation.command_line(), err),
            })?;

        let mut stdout_pipe = child
            .stdout
            .take()
            .ok_or_else(|| missing_pipe(invocation, "stdout"))?;
        let mut stderr_pipe = child
            .stderr
            .take()
            .ok_or_else(|| missing_pipe(invocation, "stderr"))?;

        let mut stdout_buf: Vec<u8> = Vec::new();
        let mut stderr_buf: Vec<u8> = Vec::new();

        // Drain both pipes while waiting; a child that fills a pipe we are
        // not reading would otherwise block forever regardless of timeout.
        let wait_and_drain = async {
            let (out_read, err_read, status) = tokio::join!(
                stdout_pipe.read_to_end(&mut stdout_buf),
                stderr_pipe.read_to_end(&mut stderr_buf),
                child.wait(),
            );
            out_read?;
            err_read?;
            status
        };

        match tokio::time::timeout(timeout, wait_and_drain).await {
            Ok(Ok(status)) => Ok(RawOutput {
                exit_code: status.code().unwrap_or(-1),
                stdout: String::from_utf8_lossy(&stdout_buf).into_owned(),
                stderr: String::from_utf8_lossy(&stderr_buf).into_owned(),
            }),
            Ok(Err(err)) => Err(SlurmadmError::execution(invocation.command_line(), err)),
            Err(_elapsed) => {
                // Kill and reap so the child cannot linger past the bound.
                let _ = child.start_kill();
                let _ = child.wait().await;
                debug!(command = %invocation, "killed timed-out child");
                Err(SlurmadmError::Timeout {
                    seconds: timeout.as_secs(),
                    command_line: invocation.command_line(),
                    stdout: String::from_utf8_lossy(&stdout_buf).into_owned(),
                    stderr: String::from_utf8_lossy(&stderr_buf).into_owned(),
                })
            }
        }
    }
}

fn missing_pipe(invocation: &Invocation, stream: &str) -> SlurmadmError {
    SlurmadmError::execution(
        invocation.command_line(),
        io::Error::other(format!("{stream} pipe was not captured")),
    )
}

/// Scripted runner for testing: returns queued outputs and records every
/// invocation it receives, so tests can assert argument vectors and verify
/// that rejected requests never reached the execution boundary.
#[derive(Default)]
pub struct ScriptedRunner {
    responses: Mutex<Vec<RawOutput>>,
    calls: Mutex<Vec<Invocation>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an output to return on the next run (FIFO). With an empty queue
    /// the runner answers with a default success and no output.
    pub fn push_output(&self, output: RawOutput) {
        self.responses.lock().unwrap().push(output);
    }

    /// Every invocation seen so far, in order.
    pub fn invocations(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    /// How many times the execution boundary was crossed.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ProcessRunner for ScriptedRunner {
    async fn run(&self, invocation: &Invocation, _timeout: Duration) -> Result<RawOutput> {
        self.calls.lock().unwrap().push(invocation.clone());
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(RawOutput::default())
        } else {
            Ok(responses.remove(0))
        }
    }
}
