use std::path::PathBuf;

use retrobox_core::{Platform, Software};
use retrobox_lib::LibError;

/// Errors raised while reading or writing a front-end's on-disk state.
#[derive(Debug, thiserror::Error)]
pub enum FrontendError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Lib(#[from] LibError),

    /// Parallel tag lists of a game list have different lengths
    #[error("{} is inconsistent: {message}", path.display())]
    Inconsistent { path: PathBuf, message: String },

    #[error("No {software} folder is mapped to {platform}")]
    UnknownPlatform { software: Software, platform: Platform },

    /// Two native keys map to the same canonical platform
    #[error("Platform {platform} is mapped twice: '{first}' and '{second}'")]
    DuplicateMapping {
        platform: Platform,
        first: String,
        second: String,
    },

    #[error("The {0} path is not configured")]
    NotConfigured(Software),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

impl FrontendError {
    pub fn inconsistent(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Inconsistent {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }
}
