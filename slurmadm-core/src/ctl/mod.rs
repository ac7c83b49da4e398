//! Client for Slurm's control tool `scontrol`.

mod grammar;

pub use grammar::{
    CtlCommand, CREATE_ENTITIES, DELETE_ENTITIES, JSON_SHOW_ENTITIES, SHOW_ENTITIES,
    UPDATE_ENTITIES,
};

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::CtlConfig;
use crate::error::{Result, SlurmadmError};
use crate::invocation::Invocation;
use crate::options;
use crate::outcome::RunOutcome;
use crate::runner::{ProcessRunner, SpawnRunner};

pub struct Scontrol {
    config: CtlConfig,
    runner: Arc<dyn ProcessRunner>,
}

impl Scontrol {
    /// Build a client that spawns the real tool.
    pub fn new(config: CtlConfig) -> Result<Self> {
        Self::with_runner(config, Arc::new(SpawnRunner))
    }

    /// Build a client with a custom execution boundary.
    pub fn with_runner(config: CtlConfig, runner: Arc<dyn ProcessRunner>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, runner })
    }

    pub fn config(&self) -> &CtlConfig {
        &self.config
    }

    /// Check a raw command keyword against the permitted set. Matching is
    /// exact, so `"SHOW"` is rejected like any other unknown word.
    pub fn validate(&self, command: &str) -> Result<CtlCommand> {
        command
            .parse::<CtlCommand>()
            .ok()
            .filter(|c| self.config.allows_command(*c))
            .ok_or_else(|| SlurmadmError::InvalidCommand {
                tool: "scontrol",
                keyword: command.to_string(),
                valid: self.config.command_list(),
            })
    }

    /// Build the argument vector for a validated request.
    ///
    /// `--json` goes before the command keyword. It is applied only when
    /// requested on a JSON-capable command whose first option token names a
    /// JSON-capable entity; the returned flag says whether it was. For
    /// commands with an entity whitelist the first option token is checked
    /// here, before anything runs.
    pub fn build(
        &self,
        command: CtlCommand,
        options: &str,
        use_json: bool,
    ) -> Result<(Invocation, bool)> {
        let tokens = options::tokenize(options)?;

        if let (Some(whitelist), Some(entity)) = (command.entity_whitelist(), tokens.first()) {
            if !whitelist.contains(&entity.as_str()) {
                return Err(SlurmadmError::InvalidEntity {
                    tool: "scontrol",
                    keyword: entity.clone(),
                    valid: whitelist.join(", "),
                });
            }
        }

        let json_applied = use_json
            && command.supports_json()
            && tokens
                .first()
                .is_some_and(|entity| JSON_SHOW_ENTITIES.contains(&entity.as_str()));

        let mut args: Vec<String> = Vec::with_capacity(2 + tokens.len());
        if json_applied {
            args.push("--json".into());
        }
        args.push(command.keyword().into());
        args.extend(tokens);
        Ok((Invocation::new(self.config.scontrol_path.clone(), args), json_applied))
    }

    /// Validate, build and run one request from a raw keyword.
    pub async fn run(&self, command: &str, options: &str, use_json: bool) -> Result<RunOutcome> {
        let command = self.validate(command)?;
        self.execute(command, options, use_json).await
    }

    /// Run one request with an already-typed command.
    pub async fn execute(
        &self,
        command: CtlCommand,
        options: &str,
        use_json: bool,
    ) -> Result<RunOutcome> {
        if !self.config.allows_command(command) {
            return Err(SlurmadmError::InvalidCommand {
                tool: "scontrol",
                keyword: command.keyword().to_string(),
                valid: self.config.command_list(),
            });
        }

        let (invocation, json_applied) = self.build(command, options, use_json)?;
        if use_json && !json_applied {
            debug!(command = %invocation, "request does not support JSON output, flag skipped");
        }
        debug!(
            command = %invocation,
            timeout_secs = self.config.timeout.as_secs(),
            "running scontrol"
        );
        let raw = self.runner.run(&invocation, self.config.timeout).await?;
        let outcome = RunOutcome::from_raw(
            command.keyword(),
            command.kind().is_mutating(),
            json_applied,
            &invocation,
            raw,
        )?;
        if outcome.success {
            debug!(command = %invocation, changed = outcome.changed, "scontrol succeeded");
        } else {
            warn!(
                command = %invocation,
                exit_code = outcome.exit_code,
                "scontrol reported failure"
            );
        }
        Ok(outcome)
    }

    // === Convenience wrappers ===

    /// `show <entity> [identifier]` with JSON output where the entity
    /// supports it.
    pub async fn show(&self, entity: &str, identifier: Option<&str>) -> Result<RunOutcome> {
        let options = match identifier {
            Some(id) => format!("{entity} {id}"),
            None => entity.to_string(),
        };
        self.execute(CtlCommand::Show, &options, true).await
    }

    /// `update <entity> <specification>`.
    pub async fn update(&self, entity: &str, specification: &str) -> Result<RunOutcome> {
        let options = format!("{entity} {specification}");
        self.execute(CtlCommand::Update, &options, false).await
    }

    /// `hold <job list>`.
    pub async fn hold(&self, job_list: &str) -> Result<RunOutcome> {
        self.execute(CtlCommand::Hold, job_list, false).await
    }

    /// `release <job list>`.
    pub async fn release(&self, job_list: &str) -> Result<RunOutcome> {
        self.execute(CtlCommand::Release, job_list, false).await
    }

    /// `suspend <job list>`.
    pub async fn suspend(&self, job_list: &str) -> Result<RunOutcome> {
        self.execute(CtlCommand::Suspend, job_list, false).await
    }

    /// `resume <job list>`.
    pub async fn resume(&self, job_list: &str) -> Result<RunOutcome> {
        self.execute(CtlCommand::Resume, job_list, false).await
    }

    /// `create <entity> <specification>`.
    pub async fn create(&self, entity: &str, specification: &str) -> Result<RunOutcome> {
        let options = format!("{entity} {specification}");
        self.execute(CtlCommand::Create, &options, false).await
    }

    /// `delete <entity> <specification>`.
    pub async fn delete(&self, entity: &str, specification: &str) -> Result<RunOutcome> {
        let options = format!("{entity} {specification}");
        self.execute(CtlCommand::Delete, &options, false).await
    }
}
