mod config_cmd;
mod dedup;
mod delete;
mod push;
mod status;

pub use config_cmd::ConfigCommand;
pub use dedup::DedupCommand;
pub use delete::DeleteCommand;
pub use push::PushCommand;
pub use status::StatusCommand;

use sheetsync_core::SheetError;

use crate::config::ConfigError;
use crate::records::RecordsError;

/// Errors from sheet commands
#[derive(Debug)]
pub enum CommandError {
    Config(ConfigError),
    Records(RecordsError),
    Sheet(SheetError),
    /// Some records could not be synced; details were already printed
    Failed(usize),
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::Config(e) => write!(f, "{}", e),
            CommandError::Records(e) => write!(f, "{}", e),
            CommandError::Sheet(e) => write!(f, "{}", e),
            CommandError::Failed(n) => write!(f, "{} record(s) failed to sync", n),
        }
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CommandError::Config(e) => Some(e),
            CommandError::Records(e) => Some(e),
            CommandError::Sheet(e) => Some(e),
            CommandError::Failed(_) => None,
        }
    }
}

impl From<ConfigError> for CommandError {
    fn from(e: ConfigError) -> Self {
        CommandError::Config(e)
    }
}

impl From<RecordsError> for CommandError {
    fn from(e: RecordsError) -> Self {
        CommandError::Records(e)
    }
}

impl From<SheetError> for CommandError {
    fn from(e: SheetError) -> Self {
        CommandError::Sheet(e)
    }
}
