use serde::{Deserialize, Serialize};

pub mod media;
pub mod platform;
pub mod selection;
pub mod software;
pub mod status;
pub mod util;

pub use media::Media;
pub use platform::Platform;
pub use selection::{Action, Category, Column, Component};
pub use software::{Emulator, Software};
pub use status::{RowColor, Status};
pub use util::{is_none_like, sanitize};

/// Error returned when a string cannot be parsed into one of the closed
/// enums of this crate.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown {kind}: '{value}'")]
pub struct ParseError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseError {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// One row of the user's catalog: a table, playlist, config bundle or game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Stable identifier, derived from the name with [`sanitize`]
    pub id: String,

    /// Display name
    pub name: String,

    /// Version folder name in the archive; `None` means unknown or any
    pub version: Option<String>,

    /// ROM name (VPinMAME ROM for tables, payload file for games)
    pub rom: Option<String>,

    /// Sub-folder of `PUPVideos` holding the table's video pack
    pub videos_path: Option<String>,

    /// Page where new releases of the item are published
    pub weblink_url: Option<String>,
}

impl CatalogEntry {
    /// Create an entry whose id is derived from the name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: sanitize(&name),
            name,
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_rom(mut self, rom: impl Into<String>) -> Self {
        self.rom = Some(rom.into());
        self
    }

    pub fn with_videos_path(mut self, videos_path: impl Into<String>) -> Self {
        self.videos_path = Some(videos_path.into());
        self
    }

    pub fn with_weblink_url(mut self, url: impl Into<String>) -> Self {
        self.weblink_url = Some(url.into());
        self
    }
}

#[cfg(test)]
#[path = "tests/platform_tests.rs"]
mod platform_tests;

#[cfg(test)]
#[path = "tests/status_tests.rs"]
mod status_tests;
