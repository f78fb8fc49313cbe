//! The contract every front-end or scraper adapter implements.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use retrobox_core::{Media, Platform, Software};
use retrobox_lib::{FileOps, list_sub_directories};

use crate::mapping::{MediaTable, PlatformTable};
use crate::FrontendError;

/// A game as seen on the live side: its display name and, when known, the
/// payload file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRef {
    pub name: String,
    pub rom: Option<String>,
}

impl GameRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rom: None,
        }
    }

    pub fn with_rom(mut self, rom: impl Into<String>) -> Self {
        self.rom = Some(rom.into());
        self
    }

    /// Payload file name without extension.
    pub fn rom_stem(&self) -> Option<String> {
        self.rom
            .as_deref()
            .and_then(|r| Path::new(r).file_stem())
            .map(|s| s.to_string_lossy().into_owned())
    }
}

/// Archived files handed to [`Manager::install_game`].
#[derive(Debug, Clone, Default)]
pub struct InstallPayload {
    pub media_files: BTreeMap<Media, PathBuf>,
    /// Game-info blocks exported from each software
    pub game_info_files: BTreeMap<Software, PathBuf>,
    pub rom_file: Option<PathBuf>,
}

/// Per-target adapter over a front-end's folders and game lists.
pub trait Manager {
    fn software(&self) -> Software;

    /// Install folder of the software.
    fn root(&self) -> &Path;

    fn platforms(&self) -> &PlatformTable;

    fn media(&self) -> &MediaTable;

    /// Software whose archived game info is preferred when installing, best
    /// first. Empty for targets without game info.
    fn game_info_priority(&self) -> &'static [Software];

    /// False for media-only targets, which never hold a payload.
    fn handles_roms(&self) -> bool {
        true
    }

    fn native_key(&self, platform: Platform) -> Result<&str, FrontendError> {
        self.platforms()
            .key(platform)
            .ok_or(FrontendError::UnknownPlatform {
                software: self.software(),
                platform,
            })
    }

    /// Platforms with a folder on disk that the platform table knows.
    fn list_platforms(&self) -> Result<Vec<Platform>, FrontendError>;

    /// Payload file name to display name, for every game whose payload
    /// exists.
    fn list_games_with_rom(
        &self,
        platform: Platform,
    ) -> Result<BTreeMap<String, String>, FrontendError>;

    fn retrieve_media_files(
        &self,
        platform: Platform,
        game: &GameRef,
    ) -> Result<BTreeMap<Media, PathBuf>, FrontendError>;

    /// Live payload file; `None` when it does not exist.
    fn retrieve_rom_file(
        &self,
        platform: Platform,
        game: &GameRef,
    ) -> Result<Option<PathBuf>, FrontendError>;

    /// The game's metadata block, with lines referencing files removed.
    fn retrieve_game_info(
        &self,
        platform: Platform,
        game: &GameRef,
    ) -> Result<Option<String>, FrontendError>;

    fn install_game(
        &self,
        platform: Platform,
        game: &GameRef,
        payload: &InstallPayload,
        files: &FileOps,
    ) -> Result<bool, FrontendError>;

    fn uninstall_game(
        &self,
        platform: Platform,
        game: &GameRef,
        files: &FileOps,
    ) -> Result<bool, FrontendError>;
}

/// Fields shared by every adapter.
#[derive(Debug, Clone)]
pub(crate) struct ManagerBase {
    pub software: Software,
    pub root: PathBuf,
    pub platforms: PlatformTable,
    pub media: MediaTable,
}

impl ManagerBase {
    pub fn new(
        software: Software,
        root: PathBuf,
        platforms: &[(&str, Platform)],
        media: &'static [(&'static str, Media)],
        overrides: &[(Platform, String)],
    ) -> Result<Self, FrontendError> {
        let platforms = PlatformTable::new(platforms.iter().copied())?.with_overrides(overrides)?;
        Ok(Self {
            software,
            root,
            platforms,
            media: MediaTable::new(media),
        })
    }

    pub fn key(&self, platform: Platform) -> Result<&str, FrontendError> {
        self.platforms.key(platform).ok_or(FrontendError::UnknownPlatform {
            software: self.software,
            platform,
        })
    }

    /// Known platforms among the sub-directories of `parent`.
    pub fn platforms_in(&self, parent: &Path) -> Result<Vec<Platform>, FrontendError> {
        Ok(list_sub_directories(parent)?
            .iter()
            .filter_map(|folder| self.platforms.platform(folder))
            .collect())
    }
}

/// Remove lines containing `marker` and blank lines, then indent the first
/// remaining line with one tab.
pub fn filter_game_info(raw: &str, marker: &str) -> String {
    let mut lines: Vec<String> = raw
        .lines()
        .filter(|line| !line.contains(marker) && !line.trim().is_empty())
        .map(str::to_string)
        .collect();
    if let Some(first) = lines.first_mut() {
        first.insert(0, '\t');
    }
    lines.join("\n")
}

/// Insert `extra` lines before the closing line of a game-info block,
/// dropping the lines that reference files.
pub(crate) fn compose_game_block(info: &str, marker: &str, extra: &[String]) -> String {
    let mut lines: Vec<&str> = info
        .lines()
        .filter(|line| !line.contains(marker) && !line.trim().is_empty())
        .collect();
    let at = lines.len().saturating_sub(1);
    for (offset, line) in extra.iter().enumerate() {
        lines.insert(at + offset, line.as_str());
    }
    lines.join("\n")
}

/// Read the first archived game-info block in priority order.
pub(crate) fn preferred_game_info(
    priority: &[Software],
    payload: &InstallPayload,
    files: &FileOps,
) -> Result<Option<String>, FrontendError> {
    for software in priority {
        let Some(path) = payload.game_info_files.get(software) else {
            continue;
        };
        let content = files.read_file(path)?;
        if !content.trim().is_empty() {
            log::debug!("Using {} game info from {}", software, path.display());
            return Ok(Some(content));
        }
    }
    Ok(None)
}

/// First file under `folder` whose stem is `stem`.
pub(crate) fn first_match(folder: &Path, stem: &str) -> Result<Option<PathBuf>, FrontendError> {
    let found = FileOps::default().list_relative_paths(folder, stem, false)?;
    Ok(found.into_iter().next().map(|relative| folder.join(relative)))
}

/// `.ext` of `path`, or an empty string.
pub(crate) fn dotted_extension(path: &Path) -> String {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default()
}

pub(crate) fn file_name(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}

/// Resolve a path stored in a game list (`./images/a.png`,
/// `Games\Sega\a.md`) against `base`.
pub(crate) fn resolve_listed_path(base: &Path, listed: &str) -> PathBuf {
    let trimmed = listed.strip_prefix("./").unwrap_or(listed);
    let mut path = base.to_path_buf();
    for part in trimmed.split(['/', '\\']).filter(|p| !p.is_empty() && *p != ".") {
        path.push(part);
    }
    path
}

pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
