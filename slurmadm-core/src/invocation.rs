//! The built argument vector, ready to spawn.

use std::fmt;
use std::path::PathBuf;

/// A fully-built CLI invocation: program path plus ordered arguments.
///
/// Building one is pure and deterministic; nothing is executed until a
/// runner receives it. The argument list is always passed to the OS as a
/// vector, never interpolated into a shell string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(program: PathBuf, args: Vec<String>) -> Self {
        Self { program, args }
    }

    /// The complete vector, program first, in the exact order handed to exec.
    pub fn argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.args.len() + 1);
        argv.push(self.program.display().to_string());
        argv.extend(self.args.iter().cloned());
        argv
    }

    /// Space-joined form for logs and diagnostics. Tokens are not re-quoted,
    /// so this is for humans, not for re-parsing.
    pub fn command_line(&self) -> String {
        self.argv().join(" ")
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}
