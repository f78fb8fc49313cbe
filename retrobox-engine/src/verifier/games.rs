//! Game checks against a front-end or scraper through its manager.
//!
//! The archive of a game holds `rom/<payload>`, `media/<media folder>/<file>`
//! and one `<software>.xml` game-info block per software it was exported
//! from.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use retrobox_core::{Action, Component, Media, Platform, Status};
use retrobox_frontend::{GameRef, Manager};
use retrobox_lib::compare_files;
use retrobox_lib::context::{MEDIA_FOLDER, ROM_FOLDER};

use super::Verifier;
use crate::rows::Row;
use crate::source::{Item, game_info_file_name, require_platform};
use crate::EngineError;

/// Live-side reference of an item.
pub(crate) fn game_ref(item: &Item) -> GameRef {
    let game = GameRef::new(item.name());
    match item.entry.rom.as_deref() {
        Some(rom) => game.with_rom(rom),
        None => game,
    }
}

/// First archived file of each media kind.
pub(crate) fn archived_media(archive: &Path) -> Result<BTreeMap<Media, PathBuf>, EngineError> {
    let mut media = BTreeMap::new();
    for kind in Media::all() {
        let folder = archive.join(MEDIA_FOLDER).join(kind.folder_name());
        if !folder.is_dir() {
            continue;
        }
        let mut entries: Vec<PathBuf> = std::fs::read_dir(&folder)?
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .collect();
        entries.sort();
        if let Some(first) = entries.into_iter().next() {
            media.insert(*kind, first);
        }
    }
    Ok(media)
}

/// Archived location of a live media file.
pub(crate) fn media_archive_path(archive: &Path, media: Media, live: &Path) -> Option<PathBuf> {
    let name = live.file_name()?;
    Some(archive.join(MEDIA_FOLDER).join(media.folder_name()).join(name))
}

impl Verifier<'_> {
    pub(super) fn verify_game(&self, item: &Item, row: &mut Row) -> Result<(), EngineError> {
        let platform = require_platform(self.ctx)?;
        let manager = self.services.manager()?;
        let archive = self.ctx.game_archive(platform, item.id());
        let game = game_ref(item);

        let (rom, media, info) = match self.ctx.selection.action {
            Action::Export => (
                self.game_rom_exported(manager, platform, &game, &archive)?,
                self.game_media_exported(manager, platform, &game, &archive)?,
                self.game_info_exported(manager, platform, &game, &archive)?,
            ),
            Action::Install => (
                self.game_rom_installed(manager, platform, &game, &archive)?,
                self.game_media_installed(manager, platform, &game, &archive)?,
                self.game_info_installed(manager, platform, &game, &archive)?,
            ),
            Action::Uninstall => (
                if manager.handles_roms() {
                    Status::from(manager.retrieve_rom_file(platform, &game)?.is_none())
                } else {
                    Status::NotApplicable
                },
                Status::from(manager.retrieve_media_files(platform, &game)?.is_empty()),
                if manager.game_info_priority().is_empty() {
                    Status::NotApplicable
                } else {
                    Status::from(manager.retrieve_game_info(platform, &game)?.is_none())
                },
            ),
            Action::Edit => (
                self.unique_per_folder(&archive.join(ROM_FOLDER))?,
                self.unique_per_folder(&archive.join(MEDIA_FOLDER))?,
                Status::from(
                    manager
                        .game_info_priority()
                        .iter()
                        .any(|s| archive.join(game_info_file_name(*s)).is_file()),
                ),
            ),
            Action::Copy => Default::default(),
        };
        row.set(Component::Rom, rom);
        row.set(Component::Media, media);
        row.set(Component::GameInfo, info);
        Ok(())
    }

    fn game_rom_exported(
        &self,
        manager: &dyn Manager,
        platform: Platform,
        game: &GameRef,
        archive: &Path,
    ) -> Result<Status, EngineError> {
        if !manager.handles_roms() {
            return Ok(Status::NotApplicable);
        }
        let Some(live) = manager.retrieve_rom_file(platform, game)? else {
            return Ok(Status::NotApplicable);
        };
        let Some(name) = live.file_name() else {
            return Ok(Status::NotApplicable);
        };
        Ok(self.same_file(&live, &archive.join(ROM_FOLDER).join(name)))
    }

    fn game_media_exported(
        &self,
        manager: &dyn Manager,
        platform: Platform,
        game: &GameRef,
        archive: &Path,
    ) -> Result<Status, EngineError> {
        let live = manager.retrieve_media_files(platform, game)?;
        if live.is_empty() {
            return Ok(Status::NotApplicable);
        }
        for (media, path) in &live {
            let Some(archived) = media_archive_path(archive, *media, path) else {
                continue;
            };
            if self.same_file(path, &archived).is_absent() {
                return Ok(Status::Absent);
            }
        }
        Ok(Status::Present)
    }

    fn game_info_exported(
        &self,
        manager: &dyn Manager,
        platform: Platform,
        game: &GameRef,
        archive: &Path,
    ) -> Result<Status, EngineError> {
        if manager.game_info_priority().is_empty() {
            return Ok(Status::NotApplicable);
        }
        let Some(live) = manager.retrieve_game_info(platform, game)? else {
            return Ok(Status::NotApplicable);
        };
        let path = archive.join(game_info_file_name(manager.software()));
        let archived = self.files.read_file(&path)?;
        if archived.trim() != live.trim() {
            log::warn!("Game info of {} differs from {}", game.name, path.display());
            return Ok(Status::Absent);
        }
        Ok(Status::Present)
    }

    fn game_rom_installed(
        &self,
        manager: &dyn Manager,
        platform: Platform,
        game: &GameRef,
        archive: &Path,
    ) -> Result<Status, EngineError> {
        if !manager.handles_roms() {
            return Ok(Status::NotApplicable);
        }
        let Some(name) = game.rom.as_deref() else {
            return Ok(Status::NotApplicable);
        };
        let archived = archive.join(ROM_FOLDER).join(name);
        match manager.retrieve_rom_file(platform, game)? {
            Some(live) => Ok(self.same_file(&archived, &live)),
            None => {
                log::warn!("Missing payload {} of {}", name, game.name);
                Ok(Status::Absent)
            }
        }
    }

    /// Every archived media kind the target supports is installed.
    fn game_media_installed(
        &self,
        manager: &dyn Manager,
        platform: Platform,
        game: &GameRef,
        archive: &Path,
    ) -> Result<Status, EngineError> {
        let expected: Vec<Media> = archived_media(archive)?
            .into_keys()
            .filter(|m| manager.media().supports(*m))
            .collect();
        if expected.is_empty() {
            return Ok(Status::NotApplicable);
        }
        let live = manager.retrieve_media_files(platform, game)?;
        for media in expected {
            if !live.contains_key(&media) {
                log::warn!("Missing {:?} media of {}", media, game.name);
                return Ok(Status::Absent);
            }
        }
        Ok(Status::Present)
    }

    fn game_info_installed(
        &self,
        manager: &dyn Manager,
        platform: Platform,
        game: &GameRef,
        archive: &Path,
    ) -> Result<Status, EngineError> {
        let priority = manager.game_info_priority();
        if !priority
            .iter()
            .any(|s| archive.join(game_info_file_name(*s)).is_file())
        {
            return Ok(Status::NotApplicable);
        }
        let installed = manager.retrieve_game_info(platform, game)?.is_some();
        if !installed {
            log::warn!("Missing game info of {}", game.name);
        }
        Ok(Status::from(installed))
    }

    fn same_file(&self, expected: &Path, actual: &Path) -> Status {
        if !actual.exists() {
            log::warn!("Missing file {}", actual.display());
            return Status::Absent;
        }
        if !compare_files(expected, actual) {
            log::warn!("Files differ: {} and {}", expected.display(), actual.display());
            return Status::Absent;
        }
        Status::Present
    }
}
