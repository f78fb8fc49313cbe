use thiserror::Error;

use retrobox_db::DbError;
use retrobox_engine::EngineError;
use retrobox_frontend::FrontendError;
use retrobox_lib::LibError;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Refresh or execute failed
    #[error("{0}")]
    Engine(#[from] EngineError),

    #[error("{0}")]
    Frontend(#[from] FrontendError),

    /// PinUP database could not be opened
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("{0}")]
    Lib(#[from] LibError),

    /// Inconsistent command-line selection
    #[error("Invalid selection: {0}")]
    Selection(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Catch-all for other errors
    #[error("{0}")]
    Other(String),
}

impl CliError {
    pub(crate) fn selection(msg: impl Into<String>) -> Self {
        Self::Selection(msg.into())
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
