//! Builds the adapter for a software from the settings and the platform
//! mapping records.

use std::ops::Deref;
use std::path::PathBuf;

use retrobox_core::Software;
use retrobox_lib::Settings;

use crate::batocera::BatoceraManager;
use crate::emu_movies::EmuMoviesManager;
use crate::launchbox::LaunchBoxManager;
use crate::manager::Manager;
use crate::records::PlatformMappings;
use crate::skraper::SkraperManager;
use crate::FrontendError;

#[derive(Debug, Clone)]
pub enum ManagerKind {
    Batocera(BatoceraManager),
    LaunchBox(LaunchBoxManager),
    EmuMovies(EmuMoviesManager),
    Skraper(SkraperManager),
}

impl ManagerKind {
    /// Adapter for `software` rooted at `root`, with the recorded platform
    /// keys overriding the built-in ones.
    pub fn create(
        software: Software,
        root: impl Into<PathBuf>,
        mappings: &PlatformMappings,
    ) -> Result<Self, FrontendError> {
        let overrides = mappings.overrides(software);
        let root = root.into();
        log::debug!(
            "Creating {} manager at {} ({} platform overrides)",
            software,
            root.display(),
            overrides.len()
        );
        Ok(match software {
            Software::Batocera => Self::Batocera(BatoceraManager::new(root, &overrides)?),
            Software::LaunchBox => Self::LaunchBox(LaunchBoxManager::new(root, &overrides)?),
            Software::EmuMovies => Self::EmuMovies(EmuMoviesManager::new(root, &overrides)?),
            Software::Skraper => Self::Skraper(SkraperManager::new(root, &overrides)?),
        })
    }

    pub fn from_settings(
        software: Software,
        settings: &Settings,
        mappings: &PlatformMappings,
    ) -> Result<Self, FrontendError> {
        let root = settings
            .software_path(software)
            .ok_or(FrontendError::NotConfigured(software))?;
        Self::create(software, root, mappings)
    }

    pub fn as_manager(&self) -> &(dyn Manager + 'static) {
        match self {
            Self::Batocera(m) => m,
            Self::LaunchBox(m) => m,
            Self::EmuMovies(m) => m,
            Self::Skraper(m) => m,
        }
    }
}

impl Deref for ManagerKind {
    type Target = dyn Manager;

    fn deref(&self) -> &Self::Target {
        self.as_manager()
    }
}

#[cfg(test)]
#[path = "tests/factory_tests.rs"]
mod tests;
