//! Client for Slurm's accounting tool `sacctmgr`.
//!
//! Every request is validated against the permitted command and entity sets
//! before anything is spawned. The argument vector is built deterministically
//! and the tool runs under the configured timeout. `sacctmgr` is always given
//! `-i` so it never stops to ask for confirmation.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::AcctConfig;
use crate::error::{Result, SlurmadmError};
use crate::grammar::{AcctCommand, AcctEntity};
use crate::invocation::Invocation;
use crate::options;
use crate::outcome::RunOutcome;
use crate::runner::{ProcessRunner, SpawnRunner};

pub struct Sacctmgr {
    config: AcctConfig,
    runner: Arc<dyn ProcessRunner>,
}

impl Sacctmgr {
    /// Build a client that spawns the real tool.
    pub fn new(config: AcctConfig) -> Result<Self> {
        Self::with_runner(config, Arc::new(SpawnRunner))
    }

    /// Build a client with a custom execution boundary.
    pub fn with_runner(config: AcctConfig, runner: Arc<dyn ProcessRunner>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, runner })
    }

    pub fn config(&self) -> &AcctConfig {
        &self.config
    }

    /// Check a raw command/entity pair against the permitted sets.
    ///
    /// Matching is exact: keywords are lowercase and nothing is trimmed or
    /// case-folded, so `"SHOW"` is rejected like any other unknown word.
    pub fn validate(&self, command: &str, entity: &str) -> Result<(AcctCommand, AcctEntity)> {
        let parsed_command = command
            .parse::<AcctCommand>()
            .ok()
            .filter(|c| self.config.allows_command(*c))
            .ok_or_else(|| SlurmadmError::InvalidCommand {
                tool: "sacctmgr",
                keyword: command.to_string(),
                valid: self.config.command_list(),
            })?;
        let parsed_entity = entity
            .parse::<AcctEntity>()
            .ok()
            .filter(|e| self.config.allows_entity(*e))
            .ok_or_else(|| SlurmadmError::InvalidEntity {
                tool: "sacctmgr",
                keyword: entity.to_string(),
                valid: self.config.entity_list(),
            })?;
        Ok((parsed_command, parsed_entity))
    }

    /// Build the argument vector for a validated request.
    ///
    /// The order is fixed: `-i`, then `--json` when requested, then the
    /// command and entity keywords, then the tokenized options.
    pub fn build(
        &self,
        command: AcctCommand,
        entity: AcctEntity,
        options: &str,
        use_json: bool,
    ) -> Result<Invocation> {
        let tokens = options::tokenize(options)?;
        let mut args: Vec<String> = Vec::with_capacity(4 + tokens.len());
        args.push("-i".into());
        if use_json {
            args.push("--json".into());
        }
        args.push(command.keyword().into());
        args.push(entity.keyword().into());
        args.extend(tokens);
        Ok(Invocation::new(self.config.sacctmgr_path.clone(), args))
    }

    /// Validate, build and run one request from raw keywords.
    pub async fn run(
        &self,
        command: &str,
        entity: &str,
        options: &str,
        use_json: bool,
    ) -> Result<RunOutcome> {
        let (command, entity) = self.validate(command, entity)?;
        self.execute(command, entity, options, use_json).await
    }

    /// Run one request with already-typed keywords.
    pub async fn execute(
        &self,
        command: AcctCommand,
        entity: AcctEntity,
        options: &str,
        use_json: bool,
    ) -> Result<RunOutcome> {
        if !self.config.allows_command(command) {
            return Err(SlurmadmError::InvalidCommand {
                tool: "sacctmgr",
                keyword: command.keyword().to_string(),
                valid: self.config.command_list(),
            });
        }
        if !self.config.allows_entity(entity) {
            return Err(SlurmadmError::InvalidEntity {
                tool: "sacctmgr",
                keyword: entity.keyword().to_string(),
                valid: self.config.entity_list(),
            });
        }

        let invocation = self.build(command, entity, options, use_json)?;
        debug!(
            command = %invocation,
            timeout_secs = self.config.timeout.as_secs(),
            "running sacctmgr"
        );
        let raw = self.runner.run(&invocation, self.config.timeout).await?;
        let outcome = RunOutcome::from_raw(
            command.keyword(),
            command.kind().is_mutating(),
            use_json,
            &invocation,
            raw,
        )?;
        if outcome.success {
            debug!(command = %invocation, changed = outcome.changed, "sacctmgr succeeded");
        } else {
            warn!(
                command = %invocation,
                exit_code = outcome.exit_code,
                "sacctmgr reported failure"
            );
        }
        Ok(outcome)
    }

    // === Convenience wrappers ===

    /// `show` with JSON output.
    pub async fn show(&self, entity: AcctEntity, options: &str) -> Result<RunOutcome> {
        self.execute(AcctCommand::Show, entity, options, true).await
    }

    /// `list` with JSON output.
    pub async fn list(&self, entity: AcctEntity, options: &str) -> Result<RunOutcome> {
        self.execute(AcctCommand::List, entity, options, true).await
    }

    pub async fn add(&self, entity: AcctEntity, options: &str) -> Result<RunOutcome> {
        self.execute(AcctCommand::Add, entity, options, false).await
    }

    pub async fn modify(&self, entity: AcctEntity, options: &str) -> Result<RunOutcome> {
        self.execute(AcctCommand::Modify, entity, options, false)
            .await
    }

    pub async fn delete(&self, entity: AcctEntity, options: &str) -> Result<RunOutcome> {
        self.execute(AcctCommand::Delete, entity, options, false)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::{RawOutput, ScriptedRunner};

    fn client(runner: Arc<ScriptedRunner>) -> Sacctmgr {
        Sacctmgr::with_runner(AcctConfig::new("/usr/bin/sacctmgr"), runner).unwrap()
    }

    #[tokio::test]
    async fn argv_order_is_fixed() {
        let runner = Arc::new(ScriptedRunner::new());
        let client = client(runner.clone());

        client
            .run("show", "account", "name=physics format=Account,Descr", true)
            .await
            .unwrap();

        let calls = runner.invocations();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].argv(),
            vec![
                "/usr/bin/sacctmgr",
                "-i",
                "--json",
                "show",
                "account",
                "name=physics",
                "format=Account,Descr",
            ]
        );
    }

    #[tokio::test]
    async fn json_flag_is_omitted_without_json() {
        let runner = Arc::new(ScriptedRunner::new());
        let client = client(runner.clone());

        client
            .run("add", "user", "name=alice account=physics", false)
            .await
            .unwrap();

        assert_eq!(
            runner.invocations()[0].argv(),
            vec![
                "/usr/bin/sacctmgr",
                "-i",
                "add",
                "user",
                "name=alice",
                "account=physics",
            ]
        );
    }

    #[tokio::test]
    async fn building_is_deterministic_and_pure() {
        let runner = Arc::new(ScriptedRunner::new());
        let client = client(runner.clone());

        let first = client
            .build(AcctCommand::Show, AcctEntity::Account, "name=a 'b=c d'", true)
            .unwrap();
        let second = client
            .build(AcctCommand::Show, AcctEntity::Account, "name=a 'b=c d'", true)
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(runner.call_count(), 0);
    }

    #[tokio::test]
    async fn empty_options_add_no_tokens() {
        let runner = Arc::new(ScriptedRunner::new());
        let client = client(runner.clone());

        client.run("list", "cluster", "   ", false).await.unwrap();

        assert_eq!(
            runner.invocations()[0].argv(),
            vec!["/usr/bin/sacctmgr", "-i", "list", "cluster"]
        );
    }

    #[tokio::test]
    async fn unknown_command_never_reaches_the_runner() {
        let runner = Arc::new(ScriptedRunner::new());
        let client = client(runner.clone());

        let err = client.run("destroy", "account", "", false).await.unwrap_err();
        match err {
            SlurmadmError::InvalidCommand { keyword, valid, .. } => {
                assert_eq!(keyword, "destroy");
                assert!(valid.contains("show"));
                assert!(valid.contains("archive"));
            }
            other => panic!("expected InvalidCommand, got {other:?}"),
        }
        assert_eq!(runner.call_count(), 0);
    }

    #[tokio::test]
    async fn unknown_entity_never_reaches_the_runner() {
        let runner = Arc::new(ScriptedRunner::new());
        let client = client(runner.clone());

        let err = client.run("show", "node", "", false).await.unwrap_err();
        match err {
            SlurmadmError::InvalidEntity { keyword, valid, .. } => {
                assert_eq!(keyword, "node");
                assert!(valid.contains("account"));
                assert!(valid.contains("wckey"));
            }
            other => panic!("expected InvalidEntity, got {other:?}"),
        }
        assert_eq!(runner.call_count(), 0);
    }

    #[tokio::test]
    async fn uppercase_keywords_are_rejected() {
        let runner = Arc::new(ScriptedRunner::new());
        let client = client(runner.clone());

        assert!(client.run("SHOW", "account", "", false).await.is_err());
        assert!(client.run("show", "Account", "", false).await.is_err());
        assert_eq!(runner.call_count(), 0);
    }

    #[tokio::test]
    async fn unbalanced_quotes_never_reach_the_runner() {
        let runner = Arc::new(ScriptedRunner::new());
        let client = client(runner.clone());

        let err = client
            .run("modify", "user", "set comment=\"oops", false)
            .await
            .unwrap_err();
        assert!(matches!(err, SlurmadmError::InvalidOptions { .. }));
        assert_eq!(runner.call_count(), 0);
    }

    #[tokio::test]
    async fn hash_word_in_options_is_rejected_not_truncated() {
        let runner = Arc::new(ScriptedRunner::new());
        let client = client(runner.clone());

        // A run with `#tag` simply dropped would mutate with a shorter
        // filter than the caller wrote. It must fail before spawning.
        let err = client
            .run("modify", "account", "name=x #tag", false)
            .await
            .unwrap_err();
        assert!(matches!(err, SlurmadmError::InvalidOptions { .. }));
        assert_eq!(runner.call_count(), 0);
    }

    #[tokio::test]
    async fn narrowed_whitelist_rejects_with_narrowed_list() {
        let runner = Arc::new(ScriptedRunner::new());
        let config = AcctConfig::new("/usr/bin/sacctmgr")
            .with_commands([AcctCommand::Show, AcctCommand::List])
            .with_entities([AcctEntity::Account, AcctEntity::User]);
        let client = Sacctmgr::with_runner(config, runner.clone()).unwrap();

        let err = client.run("delete", "account", "", false).await.unwrap_err();
        match err {
            SlurmadmError::InvalidCommand { keyword, valid, .. } => {
                assert_eq!(keyword, "delete");
                assert_eq!(valid, "show, list");
            }
            other => panic!("expected InvalidCommand, got {other:?}"),
        }

        let err = client.run("show", "qos", "", false).await.unwrap_err();
        match err {
            SlurmadmError::InvalidEntity { keyword, valid, .. } => {
                assert_eq!(keyword, "qos");
                assert_eq!(valid, "account, user");
            }
            other => panic!("expected InvalidEntity, got {other:?}"),
        }
        assert_eq!(runner.call_count(), 0);
    }

    #[tokio::test]
    async fn typed_execute_honors_the_whitelist() {
        let runner = Arc::new(ScriptedRunner::new());
        let config = AcctConfig::new("/usr/bin/sacctmgr").with_commands([AcctCommand::Show]);
        let client = Sacctmgr::with_runner(config, runner.clone()).unwrap();

        let err = client
            .execute(AcctCommand::Delete, AcctEntity::Account, "", false)
            .await
            .unwrap_err();
        assert!(matches!(err, SlurmadmError::InvalidCommand { .. }));
        assert_eq!(runner.call_count(), 0);
    }

    #[tokio::test]
    async fn mutating_success_is_changed() {
        let runner = Arc::new(ScriptedRunner::new());
        let client = client(runner.clone());

        let outcome = client
            .run("add", "account", "name=physics", false)
            .await
            .unwrap();
        assert!(outcome.success);
        assert!(outcome.changed);
    }

    #[tokio::test]
    async fn read_only_success_is_unchanged() {
        let runner = Arc::new(ScriptedRunner::new());
        runner.push_output(RawOutput::success("Account|Descr\nphysics|Physics\n"));
        let client = client(runner.clone());

        let outcome = client.run("show", "account", "", false).await.unwrap();
        assert!(outcome.success);
        assert!(!outcome.changed);
        assert!(outcome.stdout.contains("physics"));
    }

    #[tokio::test]
    async fn failure_is_an_outcome_not_an_error() {
        let runner = Arc::new(ScriptedRunner::new());
        runner.push_output(RawOutput::failure(1, "sacctmgr: error: Invalid user\n"));
        let client = client(runner.clone());

        let outcome = client
            .run("modify", "user", "user=ghost set fairshare=1", false)
            .await
            .unwrap();
        assert!(!outcome.success);
        assert!(!outcome.changed);
        assert_eq!(outcome.exit_code, 1);
        assert_eq!(outcome.message.as_deref(), Some("sacctmgr: error: Invalid user"));
    }

    #[tokio::test]
    async fn show_convenience_requests_json() {
        let runner = Arc::new(ScriptedRunner::new());
        runner.push_output(RawOutput::success(r#"{"accounts":[]}"#));
        let client = client(runner.clone());

        let outcome = client.show(AcctEntity::Account, "").await.unwrap();
        assert!(outcome.data.is_some());
        assert_eq!(
            runner.invocations()[0].argv(),
            vec!["/usr/bin/sacctmgr", "-i", "--json", "show", "account"]
        );
    }

    #[tokio::test]
    async fn delete_convenience_skips_json() {
        let runner = Arc::new(ScriptedRunner::new());
        let client = client(runner.clone());

        let outcome = client.delete(AcctEntity::Qos, "name=scavenger").await.unwrap();
        assert!(outcome.changed);
        assert_eq!(
            runner.invocations()[0].argv(),
            vec!["/usr/bin/sacctmgr", "-i", "delete", "qos", "name=scavenger"]
        );
    }
}
