//! Shared application settings (software locations, working path).
//!
//! The settings file is `~/.config/retrobox/settings.toml`; the CLI may
//! point at another file with `--settings`.

use std::io;
use std::path::{Path, PathBuf};

use retrobox_core::{Emulator, Software};
use serde::{Deserialize, Serialize};

/// Environment variable overriding the working path.
pub const WORKING_PATH_ENV: &str = "RETROBOX_MANAGER_PATH";

/// Install locations of the managed front-ends and scrapers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoftwarePaths {
    pub batocera: Option<PathBuf>,
    pub launchbox: Option<PathBuf>,
    pub emu_movies: Option<PathBuf>,
    pub skraper: Option<PathBuf>,
}

/// PinUP Popper install folder (holds `POPMedia`, `PUPVideos`, `PUPDatabase.db`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinupSettings {
    pub path: Option<PathBuf>,
}

/// Install folders of the pinball emulators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmulatorPaths {
    pub visual_pinball_x: Option<PathBuf>,
    pub future_pinball: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Log mutations instead of performing them
    pub simulated: bool,
    /// Root of the archive (`tables/`, `playlists/`, `games/`, `csv/`...)
    pub working_path: Option<PathBuf>,
    pub software: SoftwarePaths,
    pub pinup: PinupSettings,
    pub emulators: EmulatorPaths,
}

impl Settings {
    pub fn software_path(&self, software: Software) -> Option<&Path> {
        match software {
            Software::Batocera => self.software.batocera.as_deref(),
            Software::LaunchBox => self.software.launchbox.as_deref(),
            Software::EmuMovies => self.software.emu_movies.as_deref(),
            Software::Skraper => self.software.skraper.as_deref(),
        }
    }

    pub fn set_software_path(&mut self, software: Software, path: Option<PathBuf>) {
        let slot = match software {
            Software::Batocera => &mut self.software.batocera,
            Software::LaunchBox => &mut self.software.launchbox,
            Software::EmuMovies => &mut self.software.emu_movies,
            Software::Skraper => &mut self.software.skraper,
        };
        *slot = path;
    }

    pub fn emulator_path(&self, emulator: Emulator) -> Option<&Path> {
        match emulator {
            Emulator::VisualPinballX => self.emulators.visual_pinball_x.as_deref(),
            Emulator::FuturePinball => self.emulators.future_pinball.as_deref(),
        }
    }

    pub fn set_emulator_path(&mut self, emulator: Emulator, path: Option<PathBuf>) {
        let slot = match emulator {
            Emulator::VisualPinballX => &mut self.emulators.visual_pinball_x,
            Emulator::FuturePinball => &mut self.emulators.future_pinball,
        };
        *slot = path;
    }

    pub fn pinup_path(&self) -> Option<&Path> {
        self.pinup.path.as_deref()
    }

    /// Load settings from `path`.
    ///
    /// A missing file yields defaults. An unreadable or invalid file is
    /// logged and also yields defaults, so a broken settings file never
    /// blocks a run.
    pub fn load_from(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                log::warn!("Could not read settings {}: {}", path.display(), e);
                return Self::default();
            }
        };
        match toml::from_str(&contents) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Invalid settings {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load settings from the default location.
    pub fn load() -> Self {
        Self::load_from(&settings_path())
    }

    /// Write settings atomically (temporary file, then rename).
    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let serialized = toml::to_string_pretty(self).map_err(io::Error::other)?;
        let tmp = path.with_extension("toml.tmp");
        std::fs::write(&tmp, &serialized)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }

    pub fn save(&self) -> io::Result<()> {
        self.save_to(&settings_path())
    }
}

/// Canonical path to the settings file: `~/.config/retrobox/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("retrobox").join("settings.toml")
}

/// Resolve the working path using a priority chain:
///
/// 1. CLI override (if `Some`)
/// 2. `RETROBOX_MANAGER_PATH` environment variable
/// 3. `working_path` in the settings
/// 4. Current working directory
pub fn resolve_working_path(cli_override: Option<PathBuf>, settings: &Settings) -> PathBuf {
    resolve_working_path_with(
        cli_override,
        std::env::var_os(WORKING_PATH_ENV).map(PathBuf::from),
        settings,
    )
}

fn resolve_working_path_with(
    cli_override: Option<PathBuf>,
    env: Option<PathBuf>,
    settings: &Settings,
) -> PathBuf {
    if let Some(p) = cli_override {
        return p;
    }
    if let Some(p) = env.filter(|p| !p.as_os_str().is_empty()) {
        return p;
    }
    if let Some(p) = settings.working_path.clone() {
        return p;
    }
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Load the settings file as a pretty-printed TOML string for display.
pub fn load_settings_string(path: &Path) -> Option<String> {
    let contents = std::fs::read_to_string(path).ok()?;
    let doc: toml::Value = contents.parse().ok()?;
    toml::to_string_pretty(&doc).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("retrobox").join("settings.toml");

        let mut settings = Settings {
            simulated: true,
            working_path: Some(PathBuf::from("/data/retrobox")),
            ..Settings::default()
        };
        settings.set_software_path(Software::Batocera, Some(PathBuf::from("/batocera")));
        settings.set_emulator_path(Emulator::VisualPinballX, Some(PathBuf::from("/vpx")));
        settings.pinup.path = Some(PathBuf::from("/pinup"));
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path);
        assert_eq!(loaded, settings);
        assert_eq!(loaded.software_path(Software::Batocera), Some(Path::new("/batocera")));
        assert_eq!(loaded.software_path(Software::Skraper), None);
        assert!(!path.with_extension("toml.tmp").exists());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "[pinup]\npath = \"C:/PinUPSystem\"\n").unwrap();
        let loaded = Settings::load_from(&path);
        assert!(!loaded.simulated);
        assert_eq!(loaded.pinup_path(), Some(Path::new("C:/PinUPSystem")));
    }

    #[test]
    fn test_invalid_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "simulated = \"maybe\"").unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());
        assert_eq!(Settings::load_from(&dir.path().join("none.toml")), Settings::default());
    }

    #[test]
    fn test_working_path_priority() {
        let settings = Settings {
            working_path: Some(PathBuf::from("/settings")),
            ..Settings::default()
        };
        assert_eq!(
            resolve_working_path_with(
                Some(PathBuf::from("/cli")),
                Some(PathBuf::from("/env")),
                &settings
            ),
            PathBuf::from("/cli")
        );
        assert_eq!(
            resolve_working_path_with(None, Some(PathBuf::from("/env")), &settings),
            PathBuf::from("/env")
        );
        assert_eq!(
            resolve_working_path_with(None, Some(PathBuf::new()), &settings),
            PathBuf::from("/settings")
        );
        assert_eq!(
            resolve_working_path_with(None, None, &Settings::default()),
            std::env::current_dir().unwrap()
        );
    }
}
