//! Validated wrappers around Slurm's administrative command line tools.
//!
//! `sacctmgr` and `scontrol` are powerful and unforgiving: a mistyped
//! subcommand can hang on a confirmation prompt or mutate accounting state
//! by accident. This crate front-loads the checking. Every request is
//! matched against a closed grammar of known commands and entities before
//! anything executes. The argument vector is built deterministically with
//! no shell in between, and the child process runs under a timeout that
//! kills and reaps it on expiry. Output comes back as a [`RunOutcome`] with
//! success and changed flags and, where JSON was requested, decoded data.
//!
//! ```no_run
//! use slurmadm_core::{AcctConfig, AcctEntity, Sacctmgr};
//!
//! # async fn demo() -> slurmadm_core::Result<()> {
//! let client = Sacctmgr::new(AcctConfig::discover()?)?;
//! let accounts = client.show(AcctEntity::Account, "").await?;
//! println!("{}", accounts.stdout);
//! # Ok(())
//! # }
//! ```

pub mod acct;
pub mod config;
pub mod ctl;
pub mod error;
pub mod grammar;
pub mod invocation;
pub mod options;
pub mod outcome;
pub mod runner;

pub use acct::Sacctmgr;
pub use config::{AcctConfig, CtlConfig, DEFAULT_TIMEOUT_SECS};
pub use ctl::{CtlCommand, Scontrol};
pub use error::{Result, SlurmadmError};
pub use grammar::{AcctCommand, AcctEntity, CommandKind};
pub use invocation::Invocation;
pub use outcome::RunOutcome;
pub use runner::{ProcessRunner, RawOutput, ScriptedRunner, SpawnRunner};
