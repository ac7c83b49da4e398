//! The fixed sacctmgr grammar: command and entity whitelists.
//!
//! Both sets are closed enums so an accepted keyword is proven valid at the
//! type level. Parsing is exact-match and case-sensitive: `sacctmgr` itself
//! tolerates mixed case, but unknown or oddly-cased keywords here are rejected
//! instead of being passed through to the external tool (fail closed).

use std::fmt;
use std::str::FromStr;

use crate::error::SlurmadmError;

/// Whether a command can mutate accounting state.
///
/// `changed` reporting keys off this tag rather than sniffing output text,
/// which varies across Slurm releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    ReadOnly,
    Mutating,
}

impl CommandKind {
    pub fn is_mutating(self) -> bool {
        matches!(self, CommandKind::Mutating)
    }
}

/// A sacctmgr command verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AcctCommand {
    Add,
    Create,
    Delete,
    Remove,
    Modify,
    Update,
    Show,
    List,
    Dump,
    Load,
    Archive,
    Clear,
}

impl AcctCommand {
    /// Every command sacctmgr accepts, in keyword order.
    pub const ALL: [AcctCommand; 12] = [
        AcctCommand::Add,
        AcctCommand::Create,
        AcctCommand::Delete,
        AcctCommand::Remove,
        AcctCommand::Modify,
        AcctCommand::Update,
        AcctCommand::Show,
        AcctCommand::List,
        AcctCommand::Dump,
        AcctCommand::Load,
        AcctCommand::Archive,
        AcctCommand::Clear,
    ];

    /// Keyword list as shown in validation errors.
    pub const KEYWORDS: [&'static str; 12] = [
        "add", "create", "delete", "remove", "modify", "update", "show", "list", "dump", "load",
        "archive", "clear",
    ];

    /// The literal keyword placed on the command line.
    pub fn keyword(self) -> &'static str {
        match self {
            AcctCommand::Add => "add",
            AcctCommand::Create => "create",
            AcctCommand::Delete => "delete",
            AcctCommand::Remove => "remove",
            AcctCommand::Modify => "modify",
            AcctCommand::Update => "update",
            AcctCommand::Show => "show",
            AcctCommand::List => "list",
            AcctCommand::Dump => "dump",
            AcctCommand::Load => "load",
            AcctCommand::Archive => "archive",
            AcctCommand::Clear => "clear",
        }
    }

    /// `show`, `list` and `dump` cannot mutate accounting state; everything
    /// else is assumed to.
    pub fn kind(self) -> CommandKind {
        match self {
            AcctCommand::Show | AcctCommand::List | AcctCommand::Dump => CommandKind::ReadOnly,
            _ => CommandKind::Mutating,
        }
    }
}

impl fmt::Display for AcctCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for AcctCommand {
    type Err = SlurmadmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(AcctCommand::Add),
            "create" => Ok(AcctCommand::Create),
            "delete" => Ok(AcctCommand::Delete),
            "remove" => Ok(AcctCommand::Remove),
            "modify" => Ok(AcctCommand::Modify),
            "update" => Ok(AcctCommand::Update),
            "show" => Ok(AcctCommand::Show),
            "list" => Ok(AcctCommand::List),
            "dump" => Ok(AcctCommand::Dump),
            "load" => Ok(AcctCommand::Load),
            "archive" => Ok(AcctCommand::Archive),
            "clear" => Ok(AcctCommand::Clear),
            _ => Err(SlurmadmError::invalid_command(
                "sacctmgr",
                s,
                &AcctCommand::KEYWORDS,
            )),
        }
    }
}

/// An entity sacctmgr commands operate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AcctEntity {
    Account,
    Association,
    Cluster,
    Coordinator,
    Event,
    Federation,
    Job,
    Problem,
    Qos,
    Reservation,
    Resource,
    Runaway,
    Stats,
    Transaction,
    Tres,
    User,
    Wckey,
}

impl AcctEntity {
    /// Every entity sacctmgr recognizes, in keyword order.
    pub const ALL: [AcctEntity; 17] = [
        AcctEntity::Account,
        AcctEntity::Association,
        AcctEntity::Cluster,
        AcctEntity::Coordinator,
        AcctEntity::Event,
        AcctEntity::Federation,
        AcctEntity::Job,
        AcctEntity::Problem,
        AcctEntity::Qos,
        AcctEntity::Reservation,
        AcctEntity::Resource,
        AcctEntity::Runaway,
        AcctEntity::Stats,
        AcctEntity::Transaction,
        AcctEntity::Tres,
        AcctEntity::User,
        AcctEntity::Wckey,
    ];

    /// Keyword list as shown in validation errors.
    pub const KEYWORDS: [&'static str; 17] = [
        "account",
        "association",
        "cluster",
        "coordinator",
        "event",
        "federation",
        "job",
        "problem",
        "qos",
        "reservation",
        "resource",
        "runaway",
        "stats",
        "transaction",
        "tres",
        "user",
        "wckey",
    ];

    /// The literal keyword placed on the command line.
    pub fn keyword(self) -> &'static str {
        match self {
            AcctEntity::Account => "account",
            AcctEntity::Association => "association",
            AcctEntity::Cluster => "cluster",
            AcctEntity::Coordinator => "coordinator",
            AcctEntity::Event => "event",
            AcctEntity::Federation => "federation",
            AcctEntity::Job => "job",
            AcctEntity::Problem => "problem",
            AcctEntity::Qos => "qos",
            AcctEntity::Reservation => "reservation",
            AcctEntity::Resource => "resource",
            AcctEntity::Runaway => "runaway",
            AcctEntity::Stats => "stats",
            AcctEntity::Transaction => "transaction",
            AcctEntity::Tres => "tres",
            AcctEntity::User => "user",
            AcctEntity::Wckey => "wckey",
        }
    }
}

impl fmt::Display for AcctEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for AcctEntity {
    type Err = SlurmadmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AcctEntity::ALL
            .iter()
            .copied()
            .find(|entity| entity.keyword() == s)
            .ok_or_else(|| SlurmadmError::invalid_entity("sacctmgr", s, &AcctEntity::KEYWORDS))
    }
}
