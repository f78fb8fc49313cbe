use retrobox_core::{Action, Category};
use retrobox_db::DbError;
use retrobox_frontend::FrontendError;
use retrobox_lib::LibError;
use thiserror::Error;

/// Errors raised by refresh and execute.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Lib(#[from] LibError),

    #[error("Database error: {0}")]
    Db(#[from] DbError),

    #[error(transparent)]
    Frontend(#[from] FrontendError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A remote version page could not be fetched or read
    #[error("Version lookup failed: {0}")]
    Lookup(String),

    /// An item has no version folder to work with in the archive
    #[error("No archived version known for '{0}'")]
    UnknownVersion(String),

    /// A location the current selection needs is not set
    #[error("{0} is not configured")]
    NotConfigured(String),

    /// The selection lacks a parameter its category needs
    #[error("No {0} selected")]
    MissingSelection(&'static str),

    #[error("Cannot {action} {category}")]
    Unsupported { category: Category, action: Action },
}

impl EngineError {
    pub fn lookup(msg: impl Into<String>) -> Self {
        Self::Lookup(msg.into())
    }

    pub fn not_configured(what: impl Into<String>) -> Self {
        Self::NotConfigured(what.into())
    }
}
