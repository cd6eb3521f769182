//! Command definitions
//!
//! Represents requests from clients.

/// Command types, one per JSON endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    Search,
    Save,
    Reload,
}

impl CommandType {
    /// Route for this command
    pub const fn path(self) -> &'static str {
        match self {
            CommandType::Search => "/buscar",
            CommandType::Save => "/salvar",
            CommandType::Reload => "/recarregar",
        }
    }

    /// Command served at a route, if any
    pub fn from_path(path: &str) -> Option<Self> {
        [CommandType::Search, CommandType::Save, CommandType::Reload]
            .into_iter()
            .find(|kind| kind.path() == path)
    }
}

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Look up the CEP of a city/state
    Search { city: String, state: String },

    /// Submit a new city/state/CEP record
    Save {
        city: String,
        state: String,
        postal_code: String,
    },

    /// Re-read both workbooks, discarding unpersisted rows
    Reload,
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Search { .. } => CommandType::Search,
            Command::Save { .. } => CommandType::Save,
            Command::Reload => CommandType::Reload,
        }
    }
}
