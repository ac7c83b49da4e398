//! Client configuration: tool path, timeout and permitted grammar.

use std::path::PathBuf;
use std::time::Duration;

use crate::ctl::CtlCommand;
use crate::error::{Result, SlurmadmError};
use crate::grammar::{AcctCommand, AcctEntity};

/// Default bound on any single tool run.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for a [`Sacctmgr`](crate::acct::Sacctmgr) client.
///
/// `commands` and `entities` default to everything the tool's grammar knows;
/// narrow them to restrict what a client may do. They can only shrink the
/// known sets since validation also goes through the grammar parsers.
#[derive(Debug, Clone)]
pub struct AcctConfig {
    pub sacctmgr_path: PathBuf,
    pub timeout: Duration,
    pub commands: Vec<AcctCommand>,
    pub entities: Vec<AcctEntity>,
}

impl AcctConfig {
    pub fn new(sacctmgr_path: impl Into<PathBuf>) -> Self {
        Self {
            sacctmgr_path: sacctmgr_path.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            commands: AcctCommand::ALL.to_vec(),
            entities: AcctEntity::ALL.to_vec(),
        }
    }

    /// Locate `sacctmgr` on PATH.
    pub fn discover() -> Result<Self> {
        let path = which::which("sacctmgr").map_err(|_| SlurmadmError::ExecutableNotFound {
            program: PathBuf::from("sacctmgr"),
        })?;
        Ok(Self::new(path))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_commands(mut self, commands: impl IntoIterator<Item = AcctCommand>) -> Self {
        self.commands = commands.into_iter().collect();
        self
    }

    pub fn with_entities(mut self, entities: impl IntoIterator<Item = AcctEntity>) -> Self {
        self.entities = entities.into_iter().collect();
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.timeout.is_zero() {
            return Err(SlurmadmError::config("timeout must be greater than zero"));
        }
        if self.commands.is_empty() {
            return Err(SlurmadmError::config("command whitelist is empty"));
        }
        if self.entities.is_empty() {
            return Err(SlurmadmError::config("entity whitelist is empty"));
        }
        Ok(())
    }

    pub fn allows_command(&self, command: AcctCommand) -> bool {
        self.commands.contains(&command)
    }

    pub fn allows_entity(&self, entity: AcctEntity) -> bool {
        self.entities.contains(&entity)
    }

    /// Permitted command keywords, for error messages.
    pub(crate) fn command_list(&self) -> String {
        let keywords: Vec<&str> = self.commands.iter().map(|c| c.keyword()).collect();
        keywords.join(", ")
    }

    /// Permitted entity keywords, for error messages.
    pub(crate) fn entity_list(&self) -> String {
        let keywords: Vec<&str> = self.entities.iter().map(|e| e.keyword()).collect();
        keywords.join(", ")
    }
}

/// Configuration for a [`Scontrol`](crate::ctl::Scontrol) client.
#[derive(Debug, Clone)]
pub struct CtlConfig {
    pub scontrol_path: PathBuf,
    pub timeout: Duration,
    pub commands: Vec<CtlCommand>,
}

impl CtlConfig {
    pub fn new(scontrol_path: impl Into<PathBuf>) -> Self {
        Self {
            scontrol_path: scontrol_path.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            commands: CtlCommand::ALL.to_vec(),
        }
    }

    /// Locate `scontrol` on PATH.
    pub fn discover() -> Result<Self> {
        let path = which::which("scontrol").map_err(|_| SlurmadmError::ExecutableNotFound {
            program: PathBuf::from("scontrol"),
        })?;
        Ok(Self::new(path))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_commands(mut self, commands: impl IntoIterator<Item = CtlCommand>) -> Self {
        self.commands = commands.into_iter().collect();
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.timeout.is_zero() {
            return Err(SlurmadmError::config("timeout must be greater than zero"));
        }
        if self.commands.is_empty() {
            return Err(SlurmadmError::config("command whitelist is empty"));
        }
        Ok(())
    }

    pub fn allows_command(&self, command: CtlCommand) -> bool {
        self.commands.contains(&command)
    }

    pub(crate) fn command_list(&self) -> String {
        let keywords: Vec<&str> = self.commands.iter().map(|c| c.keyword()).collect();
        keywords.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acct_defaults_cover_full_grammar() {
        let config = AcctConfig::new("/usr/bin/sacctmgr");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.commands.len(), AcctCommand::ALL.len());
        assert_eq!(config.entities.len(), AcctEntity::ALL.len());
        assert!(config.allows_command(AcctCommand::Show));
        assert!(config.allows_entity(AcctEntity::Account));
    }

    #[test]
    fn narrowed_whitelist_excludes_the_rest() {
        let config = AcctConfig::new("/usr/bin/sacctmgr")
            .with_commands([AcctCommand::Show, AcctCommand::List])
            .with_entities([AcctEntity::Account]);
        assert!(config.allows_command(AcctCommand::Show));
        assert!(!config.allows_command(AcctCommand::Delete));
        assert!(config.allows_entity(AcctEntity::Account));
        assert!(!config.allows_entity(AcctEntity::User));
        assert_eq!(config.command_list(), "show, list");
        assert_eq!(config.entity_list(), "account");
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let config = AcctConfig::new("/usr/bin/sacctmgr").with_timeout(Duration::ZERO);
        assert!(matches!(
            config.validate(),
            Err(SlurmadmError::Config { .. })
        ));
    }

    #[test]
    fn empty_whitelist_is_rejected() {
        let config = AcctConfig::new("/usr/bin/sacctmgr").with_commands([]);
        assert!(matches!(
            config.validate(),
            Err(SlurmadmError::Config { .. })
        ));

        let config = CtlConfig::new("/usr/bin/scontrol").with_commands([]);
        assert!(matches!(
            config.validate(),
            Err(SlurmadmError::Config { .. })
        ));
    }
}
