//! Command name resolution
//!
//! Known commands live in a fixed table. Resolving a name never fails: names
//! missing from the table become [`Command::Unknown`].

use std::fmt;

/// Commands this server implements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownCommand {
    GetPlayerInfo,
}

impl KnownCommand {
    pub const ALL: &'static [KnownCommand] = &[KnownCommand::GetPlayerInfo];

    /// Wire name, matched case-sensitively
    pub fn name(self) -> &'static str {
        match self {
            KnownCommand::GetPlayerInfo => "GetPlayerInfo",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|command| command.name() == name)
    }
}

impl fmt::Display for KnownCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Known(KnownCommand),
    Unknown(String),
}

impl Command {
    pub fn resolve(name: &str) -> Self {
        KnownCommand::from_name(name)
            .map(Command::Known)
            .unwrap_or_else(|| Command::Unknown(name.to_string()))
    }
}
