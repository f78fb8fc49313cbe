use std::path::{Path, PathBuf};

use retrobox_core::{Action, CatalogEntry, Component, Emulator};
use retrobox_lib::context::{CONFIG_FOLDER, EMULATOR_FOLDER, MEDIA_FOLDER, PUP_VIDEOS_FOLDER};
use retrobox_lib::document::{find_tag_block, insert_before_root_close, remove_tag_block};
use retrobox_lib::files::ANY;
use retrobox_lib::LibError;

use super::Executor;
use crate::layout::{
    B2S_ROOT_TAG, B2S_SETTINGS, TABLES_FOLDER, USER_VALUES_REG, VPINMAME_FOLDER, known_key,
    live_b2s_settings, rom_registry_key, table_archive,
};
use crate::source::{Item, require_emulator};
use crate::EngineError;

impl Executor<'_> {
    pub(super) fn execute_table(&self, item: &Item) -> Result<(), EngineError> {
        let emulator = require_emulator(self.ctx)?;
        let entry = &item.entry;
        match self.ctx.selection.action {
            Action::Install => self.install_table(emulator, entry),
            Action::Uninstall => self.uninstall_table(emulator, entry),
            Action::Export => self.export_table(emulator, entry),
            Action::Copy | Action::Edit => Err(self.unsupported()),
        }
    }

    fn archive(&self, emulator: Emulator, entry: &CatalogEntry) -> Result<PathBuf, EngineError> {
        table_archive(self.ctx, emulator, entry)
            .ok_or_else(|| EngineError::UnknownVersion(entry.name.clone()))
    }

    fn emulator_root(&self, emulator: Emulator) -> Result<&Path, EngineError> {
        self.ctx
            .emulator_path(emulator)
            .ok_or_else(|| EngineError::not_configured(format!("{emulator} path")))
    }

    fn pinup_media(&self, emulator: Emulator) -> Result<PathBuf, EngineError> {
        self.ctx
            .pinup_media_path(emulator)
            .ok_or_else(|| EngineError::not_configured("PinUP path"))
    }

    fn pinup_videos(&self) -> Result<PathBuf, EngineError> {
        self.ctx
            .pinup_videos_path()
            .ok_or_else(|| EngineError::not_configured("PinUP path"))
    }

    fn install_table(&self, emulator: Emulator, entry: &CatalogEntry) -> Result<(), EngineError> {
        let archive = self.archive(emulator, entry)?;
        if !archive.is_dir() {
            return Err(LibError::missing_file(&entry.id, &archive).into());
        }

        let emulator_files = archive.join(EMULATOR_FOLDER);
        if self.wants(Component::EmulatorTable) && emulator_files.is_dir() {
            self.files
                .copy_folder(&emulator_files, self.emulator_root(emulator)?)?;
        }
        let media = archive.join(MEDIA_FOLDER);
        if self.wants(Component::PinupMedia) && media.is_dir() {
            self.files.copy_folder(&media, &self.pinup_media(emulator)?)?;
        }
        let videos = archive.join(PUP_VIDEOS_FOLDER);
        if self.wants(Component::PinupVideos) && videos.is_dir() {
            self.files.copy_folder(&videos, &self.pinup_videos()?)?;
        }

        if emulator != Emulator::VisualPinballX {
            return Ok(());
        }
        let Some(rom) = known_key(entry.rom.as_deref()) else {
            return Ok(());
        };
        let config = archive.join(CONFIG_FOLDER);
        if self.wants(Component::ConfigXml) && config.join(B2S_SETTINGS).is_file() {
            self.merge_b2s_block(
                &config.join(B2S_SETTINGS),
                &live_b2s_settings(self.emulator_root(emulator)?),
                rom,
            )?;
        }
        let reg = config.join(USER_VALUES_REG);
        if self.wants(Component::ConfigReg) && reg.is_file() {
            if self.files.is_simulated() {
                log::info!("[SIMULATION] Import {}", reg.display());
            } else {
                let written = self.services.registry.import_file(&reg)?;
                log::info!("Imported {} registry values for {}", written, rom);
            }
        }
        Ok(())
    }

    fn uninstall_table(&self, emulator: Emulator, entry: &CatalogEntry) -> Result<(), EngineError> {
        let archive = table_archive(self.ctx, emulator, entry);

        if self.wants(Component::EmulatorTable) {
            let live = self.emulator_root(emulator)?;
            match archive.as_ref().map(|a| a.join(EMULATOR_FOLDER)).filter(|a| a.is_dir()) {
                Some(archived) => {
                    for relative in self.files.list_relative_paths(&archived, ANY, false)? {
                        self.files.delete_file(&live.join(relative), false)?;
                    }
                }
                None => {
                    let tables = live.join(TABLES_FOLDER);
                    for relative in self.files.list_relative_paths(&tables, &entry.id, false)? {
                        self.files.delete_file(&tables.join(relative), false)?;
                    }
                }
            }
        }
        if self.wants(Component::PinupMedia) {
            let media = self.pinup_media(emulator)?;
            for relative in self.files.list_relative_paths(&media, &entry.id, false)? {
                self.files.delete_file(&media.join(relative), false)?;
            }
        }
        let videos = known_key(entry.videos_path.as_deref())
            .filter(|_| self.wants(Component::PinupVideos));
        if let Some(videos) = videos {
            self.files.delete_folder(&self.pinup_videos()?.join(videos))?;
        }

        if emulator != Emulator::VisualPinballX {
            return Ok(());
        }
        let Some(rom) = known_key(entry.rom.as_deref()) else {
            return Ok(());
        };
        if self.wants(Component::ConfigXml) {
            let live = live_b2s_settings(self.emulator_root(emulator)?);
            let text = self.files.read_file(&live)?;
            if let Some(updated) = remove_tag_block(&text, rom) {
                self.files.write_file(&live, &updated)?;
            }
        }
        if self.wants(Component::ConfigReg) {
            let key = rom_registry_key(rom);
            if self.files.is_simulated() {
                log::info!("[SIMULATION] Delete registry key {}", key);
            } else if self.services.registry.delete_key(&key)? {
                log::info!("Deleted registry key {}", key);
            }
        }
        Ok(())
    }

    fn export_table(&self, emulator: Emulator, entry: &CatalogEntry) -> Result<(), EngineError> {
        let archive = self.archive(emulator, entry)?;

        if self.wants(Component::EmulatorTable) {
            let live = self.emulator_root(emulator)?;
            let archived = archive.join(EMULATOR_FOLDER);
            self.copy_matching(
                &live.join(TABLES_FOLDER),
                &format!("{}*", entry.id),
                &archived.join(TABLES_FOLDER),
            )?;
            if let Some(rom) = known_key(entry.rom.as_deref()) {
                self.copy_matching(
                    &live.join(VPINMAME_FOLDER),
                    rom,
                    &archived.join(VPINMAME_FOLDER),
                )?;
            }
        }
        if self.wants(Component::PinupMedia) {
            self.copy_matching(
                &self.pinup_media(emulator)?,
                &entry.id,
                &archive.join(MEDIA_FOLDER),
            )?;
        }
        let videos = known_key(entry.videos_path.as_deref())
            .filter(|_| self.wants(Component::PinupVideos));
        if let Some(videos) = videos {
            let live = self.pinup_videos()?.join(videos);
            if live.is_dir() {
                self.files
                    .copy_folder(&live, &archive.join(PUP_VIDEOS_FOLDER).join(videos))?;
            }
        }

        if emulator != Emulator::VisualPinballX {
            return Ok(());
        }
        let Some(rom) = known_key(entry.rom.as_deref()) else {
            return Ok(());
        };
        let config = archive.join(CONFIG_FOLDER);
        if self.wants(Component::ConfigXml) {
            let text = self
                .files
                .read_file(&live_b2s_settings(self.emulator_root(emulator)?))?;
            if let Some(span) = find_tag_block(&text, rom) {
                let content = format!(
                    "<{B2S_ROOT_TAG}>\n  {}\n</{B2S_ROOT_TAG}>\n",
                    &text[span]
                );
                self.files.write_file(&config.join(B2S_SETTINGS), &content)?;
            }
        }
        if self.wants(Component::ConfigReg) {
            let key = rom_registry_key(rom);
            if self.services.registry.key_exists(&key)? {
                let export = self.services.registry.export_key(&key)?;
                self.files
                    .write_bytes(&config.join(USER_VALUES_REG), &export.to_utf16_bytes())?;
            }
        }
        Ok(())
    }

    /// Copy every file under `source` matching `pattern` to the same
    /// relative path under `target`.
    pub(super) fn copy_matching(
        &self,
        source: &Path,
        pattern: &str,
        target: &Path,
    ) -> Result<usize, EngineError> {
        let mut copied = 0;
        for relative in self.files.list_relative_paths(source, pattern, false)? {
            if self.files.copy_file(&source.join(&relative), &target.join(&relative))? {
                copied += 1;
            }
        }
        Ok(copied)
    }

    /// Replace the ROM's element of the live backglass settings with the
    /// archived one, creating the settings file when needed.
    fn merge_b2s_block(&self, archived: &Path, live: &Path, rom: &str) -> Result<(), EngineError> {
        let archived_text = self.files.read_file(archived)?;
        let Some(span) = find_tag_block(&archived_text, rom) else {
            log::warn!("No {} element in {}", rom, archived.display());
            return Ok(());
        };
        let live_text = self.files.read_file(live)?;
        let base = if live_text.trim().is_empty() {
            format!("<{B2S_ROOT_TAG}>\n</{B2S_ROOT_TAG}>\n")
        } else {
            remove_tag_block(&live_text, rom).unwrap_or(live_text)
        };
        let merged = insert_before_root_close(&base, &archived_text[span])
            .ok_or_else(|| LibError::invalid_document(live, "no closing root tag"))?;
        self.files.write_file(live, &merged)?;
        Ok(())
    }
}
