//! Command execution errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecuteError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Invalid arguments for {command}: {source}")]
    InvalidArguments {
        command: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The document no longer matches the offsets recorded in the command
    #[error("Document changed since the command was created: {0}")]
    StaleDocument(String),
}

impl ExecuteError {
    pub(crate) fn stale(message: impl Into<String>) -> Self {
        ExecuteError::StaleDocument(message.into())
    }
}
