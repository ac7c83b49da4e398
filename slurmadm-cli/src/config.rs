//! Optional config file plus environment overrides.
//!
//! Precedence, highest first: command line flags, `SLURMADM_*` environment
//! variables, `~/.slurmadm/config.toml`, then PATH discovery and built-in
//! defaults. The core library never reads any of this; it receives the
//! finished config.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use slurmadm_core::{AcctConfig, CtlConfig, DEFAULT_TIMEOUT_SECS};

/// On-disk shape of `~/.slurmadm/config.toml`. Every key is optional and a
/// missing file is fine.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    /// Path to the `sacctmgr` executable.
    pub sacctmgr: Option<PathBuf>,
    /// Path to the `scontrol` executable.
    pub scontrol: Option<PathBuf>,
    /// Timeout for any single tool run, in seconds.
    pub timeout_secs: Option<u64>,
    /// Request JSON output even without `--json`.
    pub json: Option<bool>,
}

impl FileConfig {
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".slurmadm").join("config.toml"))
    }

    /// Load the config file if present, then fold in environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => {
                let raw = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                toml::from_str(&raw)
                    .with_context(|| format!("failed to parse {}", path.display()))?
            }
            _ => Self::default(),
        };
        config.apply_env()?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(path) = env::var("SLURMADM_SACCTMGR") {
            self.sacctmgr = Some(PathBuf::from(path));
        }
        if let Ok(path) = env::var("SLURMADM_SCONTROL") {
            self.scontrol = Some(PathBuf::from(path));
        }
        if let Ok(secs) = env::var("SLURMADM_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .context("SLURMADM_TIMEOUT_SECS must be a whole number of seconds")?;
            self.timeout_secs = Some(secs);
        }
        Ok(())
    }

    pub fn default_json(&self) -> bool {
        self.json.unwrap_or(false)
    }

    /// Resolve an accounting-client config from flags and this file.
    pub fn resolve_acct(
        &self,
        bin: Option<PathBuf>,
        timeout_secs: Option<u64>,
    ) -> Result<AcctConfig> {
        let config = match bin.or_else(|| self.sacctmgr.clone()) {
            Some(path) => AcctConfig::new(path),
            None => AcctConfig::discover().context("sacctmgr not found in PATH")?,
        };
        let secs = timeout_secs
            .or(self.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Ok(config.with_timeout(Duration::from_secs(secs)))
    }

    /// Resolve a control-client config from flags and this file.
    pub fn resolve_ctl(
        &self,
        bin: Option<PathBuf>,
        timeout_secs: Option<u64>,
    ) -> Result<CtlConfig> {
        let config = match bin.or_else(|| self.scontrol.clone()) {
            Some(path) => CtlConfig::new(path),
            None => CtlConfig::discover().context("scontrol not found in PATH")?,
        };
        let secs = timeout_secs
            .or(self.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Ok(config.with_timeout(Duration::from_secs(secs)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_key_is_optional() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert!(config.sacctmgr.is_none());
        assert!(config.scontrol.is_none());
        assert!(config.timeout_secs.is_none());
        assert!(!config.default_json());
    }

    #[test]
    fn full_file_parses() {
        let config: FileConfig = toml::from_str(
            r#"
            sacctmgr = "/opt/slurm/bin/sacctmgr"
            scontrol = "/opt/slurm/bin/scontrol"
            timeout_secs = 120
            json = true
            "#,
        )
        .unwrap();
        assert_eq!(
            config.sacctmgr.as_deref(),
            Some(std::path::Path::new("/opt/slurm/bin/sacctmgr"))
        );
        assert_eq!(config.timeout_secs, Some(120));
        assert!(config.default_json());
    }

    #[test]
    fn flag_beats_file() {
        let file = FileConfig {
            sacctmgr: Some(PathBuf::from("/from/file/sacctmgr")),
            timeout_secs: Some(120),
            ..FileConfig::default()
        };

        let resolved = file
            .resolve_acct(Some(PathBuf::from("/from/flag/sacctmgr")), Some(5))
            .unwrap();
        assert_eq!(resolved.sacctmgr_path, PathBuf::from("/from/flag/sacctmgr"));
        assert_eq!(resolved.timeout, Duration::from_secs(5));
    }

    #[test]
    fn file_applies_without_flags() {
        let file = FileConfig {
            scontrol: Some(PathBuf::from("/from/file/scontrol")),
            timeout_secs: Some(45),
            ..FileConfig::default()
        };

        let resolved = file.resolve_ctl(None, None).unwrap();
        assert_eq!(resolved.scontrol_path, PathBuf::from("/from/file/scontrol"));
        assert_eq!(resolved.timeout, Duration::from_secs(45));
    }

    #[test]
    fn defaults_fill_the_gaps() {
        let file = FileConfig {
            sacctmgr: Some(PathBuf::from("/usr/bin/sacctmgr")),
            ..FileConfig::default()
        };

        let resolved = file.resolve_acct(None, None).unwrap();
        assert_eq!(resolved.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }
}
