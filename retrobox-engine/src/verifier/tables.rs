//! Table checks: emulator files, PinUP media and videos, backglass
//! settings and VPinMAME registry settings.

use std::path::{Path, PathBuf};

use retrobox_core::{Action, CatalogEntry, Column, Component, Emulator, Status};
use retrobox_lib::context::{CONFIG_FOLDER, EMULATOR_FOLDER, MEDIA_FOLDER, PUP_VIDEOS_FOLDER};
use retrobox_lib::document::contains_tag_literal;
use retrobox_lib::files::ANY;

use super::Verifier;
use crate::layout::{
    B2S_SETTINGS, TABLES_FOLDER, USER_VALUES_REG, VPINMAME_FOLDER, known_key, live_b2s_settings,
    rom_registry_key, table_archive,
};
use crate::rows::Row;
use crate::source::{Item, require_emulator};
use crate::EngineError;

impl Verifier<'_> {
    pub(super) fn verify_table(&self, item: &Item, row: &mut Row) -> Result<(), EngineError> {
        let emulator = require_emulator(self.ctx)?;
        let entry = &item.entry;
        let root = self.ctx.table_root(emulator, &entry.id);
        let action = self.ctx.selection.action;
        let vpx = emulator == Emulator::VisualPinballX;

        match action {
            Action::Install | Action::Export => {
                let version = self.version_agreement(item);
                row.set(Column::LatestVersion, version);
                row.set(
                    Component::EmulatorTable,
                    self.table_emulator(emulator, entry, version)?,
                );
                row.set(Component::PinupMedia, self.table_media(emulator, entry)?);
                row.set(Component::PinupVideos, self.table_videos(entry)?);
                if vpx {
                    row.set(Component::ConfigXml, self.table_config_xml(emulator, entry)?);
                    row.set(Component::ConfigReg, self.table_config_reg(emulator, entry)?);
                }
            }
            Action::Uninstall => {
                row.set(
                    Component::EmulatorTable,
                    self.table_emulator(emulator, entry, Status::NotApplicable)?,
                );
                row.set(Component::PinupMedia, self.table_media(emulator, entry)?);
                row.set(Component::PinupVideos, self.table_videos(entry)?);
                if vpx {
                    row.set(Component::ConfigXml, self.table_config_xml(emulator, entry)?);
                    row.set(Component::ConfigReg, self.table_config_reg(emulator, entry)?);
                }
            }
            Action::Edit => {
                row.set(Column::LatestVersion, self.latest_version(entry, &root)?);
                row.set(Column::UniqueVersion, self.unique_version(&root)?);
                row.set(Component::PinupMedia, self.table_media(emulator, entry)?);
                row.set(Component::PinupVideos, self.table_videos(entry)?);
            }
            Action::Copy => {}
        }
        Ok(())
    }

    fn live_emulator(&self, emulator: Emulator) -> Result<&Path, EngineError> {
        self.ctx
            .emulator_path(emulator)
            .ok_or_else(|| EngineError::not_configured(format!("{emulator} path")))
    }

    fn live_pinup_media(&self, emulator: Emulator) -> Result<PathBuf, EngineError> {
        self.ctx
            .pinup_media_path(emulator)
            .ok_or_else(|| EngineError::not_configured("PinUP path"))
    }

    fn live_pinup_videos(&self) -> Result<PathBuf, EngineError> {
        self.ctx
            .pinup_videos_path()
            .ok_or_else(|| EngineError::not_configured("PinUP path"))
    }

    /// Table, script and ROM files in the emulator folder.
    ///
    /// Only Visual Pinball X tables are archived file by file; for the other
    /// emulators install and export follow the catalog/PinUP version check.
    fn table_emulator(
        &self,
        emulator: Emulator,
        entry: &CatalogEntry,
        version: Status,
    ) -> Result<Status, EngineError> {
        let action = self.ctx.selection.action;
        if emulator != Emulator::VisualPinballX {
            return Ok(match action {
                Action::Install | Action::Export => version,
                _ => Status::Present,
            });
        }
        let Some(archive) = table_archive(self.ctx, emulator, entry) else {
            return Ok(Status::NotApplicable);
        };

        let live = self.live_emulator(emulator)?;
        let archived = archive.join(EMULATOR_FOLDER);
        match action {
            Action::Install => self.mirror(&archived, ANY, live, true),
            Action::Uninstall => self.removed(&archived, ANY, live),
            Action::Export => {
                let tables = self.mirror(
                    &live.join(TABLES_FOLDER),
                    &format!("{}*", entry.id),
                    &archived.join(TABLES_FOLDER),
                    false,
                )?;
                if tables.is_absent() {
                    return Ok(tables);
                }
                match known_key(entry.rom.as_deref()) {
                    Some(rom) => self.mirror(
                        &live.join(VPINMAME_FOLDER),
                        rom,
                        &archived.join(VPINMAME_FOLDER),
                        false,
                    ),
                    None => Ok(Status::Present),
                }
            }
            _ => Ok(Status::NotApplicable),
        }
    }

    fn table_media(&self, emulator: Emulator, entry: &CatalogEntry) -> Result<Status, EngineError> {
        let Some(archive) = table_archive(self.ctx, emulator, entry) else {
            return Ok(Status::NotApplicable);
        };
        let archived = archive.join(MEDIA_FOLDER);
        match self.ctx.selection.action {
            Action::Install => self.mirror(&archived, ANY, &self.live_pinup_media(emulator)?, true),
            Action::Export => {
                self.mirror(&self.live_pinup_media(emulator)?, &entry.id, &archived, false)
            }
            Action::Uninstall => self.removed(&archived, ANY, &self.live_pinup_media(emulator)?),
            Action::Edit => self.unique_per_folder(&archived),
            Action::Copy => Ok(Status::NotApplicable),
        }
    }

    /// PinUP video pack, stored under `PUPVideos/<videos_path>`.
    fn table_videos(&self, entry: &CatalogEntry) -> Result<Status, EngineError> {
        let Some(videos) = known_key(entry.videos_path.as_deref()) else {
            return Ok(Status::NotApplicable);
        };
        let emulator = require_emulator(self.ctx)?;
        let Some(archive) = table_archive(self.ctx, emulator, entry) else {
            return Ok(Status::NotApplicable);
        };
        let archived = archive.join(PUP_VIDEOS_FOLDER);
        match self.ctx.selection.action {
            Action::Install => self.mirror(&archived, ANY, &self.live_pinup_videos()?, true),
            Action::Export => self.mirror(
                &self.live_pinup_videos()?.join(videos),
                ANY,
                &archived.join(videos),
                false,
            ),
            Action::Uninstall => self.removed(&archived, ANY, &self.live_pinup_videos()?),
            Action::Edit => Ok(Status::from(self.any_match(&archived, ANY)?)),
            Action::Copy => Ok(Status::NotApplicable),
        }
    }

    /// The ROM's element in the backglass settings file.
    fn table_config_xml(
        &self,
        emulator: Emulator,
        entry: &CatalogEntry,
    ) -> Result<Status, EngineError> {
        let (Some(archive), Some(rom)) = (
            table_archive(self.ctx, emulator, entry),
            known_key(entry.rom.as_deref()),
        ) else {
            return Ok(Status::NotApplicable);
        };
        let archived = archive.join(CONFIG_FOLDER).join(B2S_SETTINGS);
        let live = live_b2s_settings(self.live_emulator(emulator)?);
        let status = match self.ctx.selection.action {
            Action::Install => {
                !archived.is_file() || contains_tag_literal(&live, rom)?
            }
            Action::Export => {
                !contains_tag_literal(&live, rom)? || contains_tag_literal(&archived, rom)?
            }
            Action::Uninstall => {
                !archived.is_file() || !contains_tag_literal(&live, rom)?
            }
            _ => return Ok(Status::NotApplicable),
        };
        if !status {
            log::warn!("Backglass settings of {} do not match {}", rom, live.display());
        }
        Ok(Status::from(status))
    }

    /// The ROM's VPinMAME registry key against the archived export.
    fn table_config_reg(
        &self,
        emulator: Emulator,
        entry: &CatalogEntry,
    ) -> Result<Status, EngineError> {
        let (Some(archive), Some(rom)) = (
            table_archive(self.ctx, emulator, entry),
            known_key(entry.rom.as_deref()),
        ) else {
            return Ok(Status::NotApplicable);
        };
        let archived = archive.join(CONFIG_FOLDER).join(USER_VALUES_REG);
        let key = rom_registry_key(rom);
        let registry = self.services.registry;
        let status = match self.ctx.selection.action {
            Action::Install => {
                if !archived.is_file() {
                    return Ok(Status::NotApplicable);
                }
                registry.key_exists(&key)? && registry.matches_exported_file(&archived)?
            }
            Action::Export => {
                if !registry.key_exists(&key)? {
                    return Ok(Status::NotApplicable);
                }
                archived.is_file() && registry.matches_exported_file(&archived)?
            }
            Action::Uninstall => {
                if !archived.is_file() {
                    return Ok(Status::NotApplicable);
                }
                !registry.key_exists(&key)?
            }
            _ => return Ok(Status::NotApplicable),
        };
        if !status {
            log::warn!("Registry settings of {} do not match {}", rom, archived.display());
        }
        Ok(Status::from(status))
    }
}
