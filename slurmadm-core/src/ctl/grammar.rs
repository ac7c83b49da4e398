//! Closed grammar for `scontrol`.
//!
//! Unlike `sacctmgr`, `scontrol` has no uniform command/entity shape: only
//! `show`, `update`, `create` and `delete` take an entity, each with its own
//! whitelist, and the entity arrives as the first option token rather than as
//! a dedicated argument. JSON output exists only for `show`, and only for
//! some entities.

use std::fmt;
use std::str::FromStr;

use crate::error::SlurmadmError;
use crate::grammar::CommandKind;

/// Entities accepted by `scontrol show`.
pub const SHOW_ENTITIES: &[&str] = &[
    "aliases",
    "assoc_mgr",
    "bbstat",
    "burstbuffer",
    "config",
    "daemons",
    "dwstat",
    "federation",
    "frontend",
    "hostlist",
    "hostlistsorted",
    "hostnames",
    "job",
    "licenses",
    "node",
    "partition",
    "reservation",
    "slurmd",
    "step",
    "topology",
];

/// Entities accepted by `scontrol update`.
pub const UPDATE_ENTITIES: &[&str] =
    &["job", "step", "node", "partition", "reservation", "frontend"];

/// Entities accepted by `scontrol create`.
pub const CREATE_ENTITIES: &[&str] = &["node", "partition", "reservation"];

/// Entities accepted by `scontrol delete`.
pub const DELETE_ENTITIES: &[&str] = &["node", "partition", "reservation"];

/// `show` entities whose output `--json` can render.
pub const JSON_SHOW_ENTITIES: &[&str] = &[
    "job",
    "node",
    "partition",
    "reservation",
    "config",
    "licenses",
    "step",
    "topology",
    "assoc_mgr",
    "burstbuffer",
    "federation",
    "frontend",
    "slurmd",
];

/// A `scontrol` subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CtlCommand {
    CancelReboot,
    Create,
    Completing,
    Delete,
    Errnumstr,
    Fsdampeningfactor,
    Getaddrs,
    Help,
    Hold,
    Notify,
    Pidinfo,
    Listjobs,
    Listpids,
    Liststeps,
    Ping,
    Power,
    Reboot,
    Reconfigure,
    Release,
    Requeue,
    Requeuehold,
    Resume,
    Schedloglevel,
    Setdebug,
    Setdebugflags,
    Show,
    Shutdown,
    Suspend,
    Takeover,
    Top,
    Token,
    Uhold,
    Update,
    Version,
    WaitJob,
    Write,
}

impl CtlCommand {
    pub const ALL: [CtlCommand; 36] = [
        CtlCommand::CancelReboot,
        CtlCommand::Create,
        CtlCommand::Completing,
        CtlCommand::Delete,
        CtlCommand::Errnumstr,
        CtlCommand::Fsdampeningfactor,
        CtlCommand::Getaddrs,
        CtlCommand::Help,
        CtlCommand::Hold,
        CtlCommand::Notify,
        CtlCommand::Pidinfo,
        CtlCommand::Listjobs,
        CtlCommand::Listpids,
        CtlCommand::Liststeps,
        CtlCommand::Ping,
        CtlCommand::Power,
        CtlCommand::Reboot,
        CtlCommand::Reconfigure,
        CtlCommand::Release,
        CtlCommand::Requeue,
        CtlCommand::Requeuehold,
        CtlCommand::Resume,
        CtlCommand::Schedloglevel,
        CtlCommand::Setdebug,
        CtlCommand::Setdebugflags,
        CtlCommand::Show,
        CtlCommand::Shutdown,
        CtlCommand::Suspend,
        CtlCommand::Takeover,
        CtlCommand::Top,
        CtlCommand::Token,
        CtlCommand::Uhold,
        CtlCommand::Update,
        CtlCommand::Version,
        CtlCommand::WaitJob,
        CtlCommand::Write,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            CtlCommand::CancelReboot => "cancel_reboot",
            CtlCommand::Create => "create",
            CtlCommand::Completing => "completing",
            CtlCommand::Delete => "delete",
            CtlCommand::Errnumstr => "errnumstr",
            CtlCommand::Fsdampeningfactor => "fsdampeningfactor",
            CtlCommand::Getaddrs => "getaddrs",
            CtlCommand::Help => "help",
            CtlCommand::Hold => "hold",
            CtlCommand::Notify => "notify",
            CtlCommand::Pidinfo => "pidinfo",
            CtlCommand::Listjobs => "listjobs",
            CtlCommand::Listpids => "listpids",
            CtlCommand::Liststeps => "liststeps",
            CtlCommand::Ping => "ping",
            CtlCommand::Power => "power",
            CtlCommand::Reboot => "reboot",
            CtlCommand::Reconfigure => "reconfigure",
            CtlCommand::Release => "release",
            CtlCommand::Requeue => "requeue",
            CtlCommand::Requeuehold => "requeuehold",
            CtlCommand::Resume => "resume",
            CtlCommand::Schedloglevel => "schedloglevel",
            CtlCommand::Setdebug => "setdebug",
            CtlCommand::Setdebugflags => "setdebugflags",
            CtlCommand::Show => "show",
            CtlCommand::Shutdown => "shutdown",
            CtlCommand::Suspend => "suspend",
            CtlCommand::Takeover => "takeover",
            CtlCommand::Top => "top",
            CtlCommand::Token => "token",
            CtlCommand::Uhold => "uhold",
            CtlCommand::Update => "update",
            CtlCommand::Version => "version",
            CtlCommand::WaitJob => "wait_job",
            CtlCommand::Write => "write",
        }
    }

    pub fn kind(self) -> CommandKind {
        match self {
            CtlCommand::Show
            | CtlCommand::Ping
            | CtlCommand::Version
            | CtlCommand::Help
            | CtlCommand::Completing
            | CtlCommand::Listjobs
            | CtlCommand::Listpids
            | CtlCommand::Liststeps
            | CtlCommand::Pidinfo
            | CtlCommand::Getaddrs
            | CtlCommand::Errnumstr => CommandKind::ReadOnly,
            _ => CommandKind::Mutating,
        }
    }

    /// Entity whitelist for commands whose first option token is an entity.
    pub fn entity_whitelist(self) -> Option<&'static [&'static str]> {
        match self {
            CtlCommand::Show => Some(SHOW_ENTITIES),
            CtlCommand::Update => Some(UPDATE_ENTITIES),
            CtlCommand::Create => Some(CREATE_ENTITIES),
            CtlCommand::Delete => Some(DELETE_ENTITIES),
            _ => None,
        }
    }

    /// Whether `--json` means anything to this command.
    pub fn supports_json(self) -> bool {
        matches!(self, CtlCommand::Show)
    }
}

impl fmt::Display for CtlCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for CtlCommand {
    type Err = SlurmadmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CtlCommand::ALL
            .iter()
            .copied()
            .find(|command| command.keyword() == s)
            .ok_or_else(|| {
                SlurmadmError::invalid_command(
                    "scontrol",
                    s,
                    &CtlCommand::ALL.map(CtlCommand::keyword),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_keyword_round_trips() {
        for command in CtlCommand::ALL {
            let parsed: CtlCommand = command.keyword().parse().unwrap();
            assert_eq!(parsed, command);
        }
    }

    #[test]
    fn unknown_and_uppercase_keywords_are_rejected() {
        assert!("restart".parse::<CtlCommand>().is_err());
        assert!("SHOW".parse::<CtlCommand>().is_err());
        assert!("Cancel_Reboot".parse::<CtlCommand>().is_err());
    }

    #[test]
    fn underscored_keywords_parse() {
        assert_eq!(
            "cancel_reboot".parse::<CtlCommand>().unwrap(),
            CtlCommand::CancelReboot
        );
        assert_eq!("wait_job".parse::<CtlCommand>().unwrap(), CtlCommand::WaitJob);
    }

    #[test]
    fn read_only_commands_are_tagged() {
        assert_eq!(CtlCommand::Show.kind(), CommandKind::ReadOnly);
        assert_eq!(CtlCommand::Ping.kind(), CommandKind::ReadOnly);
        assert_eq!(CtlCommand::Listpids.kind(), CommandKind::ReadOnly);
        assert_eq!(CtlCommand::Update.kind(), CommandKind::Mutating);
        assert_eq!(CtlCommand::Shutdown.kind(), CommandKind::Mutating);
        assert_eq!(CtlCommand::Reboot.kind(), CommandKind::Mutating);

        let read_only = CtlCommand::ALL
            .iter()
            .filter(|c| !c.kind().is_mutating())
            .count();
        assert_eq!(read_only, 11);
    }

    #[test]
    fn entity_whitelists_cover_the_entity_commands() {
        assert_eq!(CtlCommand::Show.entity_whitelist(), Some(SHOW_ENTITIES));
        assert_eq!(CtlCommand::Update.entity_whitelist(), Some(UPDATE_ENTITIES));
        assert_eq!(CtlCommand::Create.entity_whitelist(), Some(CREATE_ENTITIES));
        assert_eq!(CtlCommand::Delete.entity_whitelist(), Some(DELETE_ENTITIES));
        assert_eq!(CtlCommand::Hold.entity_whitelist(), None);
        assert_eq!(CtlCommand::Reconfigure.entity_whitelist(), None);
    }

    #[test]
    fn only_show_supports_json() {
        for command in CtlCommand::ALL {
            assert_eq!(command.supports_json(), command == CtlCommand::Show);
        }
    }

    #[test]
    fn json_entities_are_a_subset_of_show_entities() {
        for entity in JSON_SHOW_ENTITIES {
            assert!(SHOW_ENTITIES.contains(entity), "{entity} missing from show");
        }
    }
}
