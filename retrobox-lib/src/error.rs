use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the filesystem, document, registry and settings services.
#[derive(Debug, Error)]
pub enum LibError {
    /// I/O error while reading or writing a file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A listing that was required to find something came back empty
    #[error("Missing file '{pattern}' in folder {}", folder.display())]
    MissingFile { pattern: String, folder: PathBuf },

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),

    /// Structurally invalid document (unbalanced tags, bad escapes...)
    #[error("Invalid document {}: {message}", path.display())]
    InvalidDocument { path: PathBuf, message: String },

    #[error("Registry error: {0}")]
    Registry(String),

    /// A `.reg` export could not be parsed
    #[error("Invalid registry file {}: {message}", path.display())]
    InvalidRegFile { path: PathBuf, message: String },

    #[error("Settings error: {0}")]
    Settings(String),

    /// External transform did not produce its output in time
    #[error("Transform timed out after {seconds}s: {}", output.display())]
    TransformTimeout { output: PathBuf, seconds: u64 },

    #[error("Operation cancelled")]
    Cancelled,
}

impl LibError {
    pub fn missing_file(pattern: impl Into<String>, folder: impl Into<PathBuf>) -> Self {
        Self::MissingFile {
            pattern: pattern.into(),
            folder: folder.into(),
        }
    }

    pub fn invalid_document(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::InvalidDocument {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn registry(msg: impl Into<String>) -> Self {
        Self::Registry(msg.into())
    }

    pub fn invalid_reg_file(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::InvalidRegFile {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn settings(msg: impl Into<String>) -> Self {
        Self::Settings(msg.into())
    }
}
