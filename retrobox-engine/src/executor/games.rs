use std::collections::BTreeMap;

use retrobox_core::{Action, Component, Software};
use retrobox_frontend::InstallPayload;
use retrobox_lib::context::{MEDIA_FOLDER, ROM_FOLDER};

use super::Executor;
use crate::source::{Item, game_info_file_name, require_platform};
use crate::verifier::{archived_media, game_ref, media_archive_path};
use crate::EngineError;

impl Executor<'_> {
    pub(super) fn execute_game(&self, item: &Item) -> Result<(), EngineError> {
        let platform = require_platform(self.ctx)?;
        let archive = self.ctx.game_archive(platform, item.id());
        let game = game_ref(item);

        match self.ctx.selection.action {
            Action::Export => {
                let manager = self.services.manager()?;
                if self.wants(Component::Media) {
                    let media = manager.retrieve_media_files(platform, &game)?;
                    if !media.is_empty() {
                        self.files.delete_folder(&archive.join(MEDIA_FOLDER))?;
                    }
                    for (kind, path) in &media {
                        if let Some(target) = media_archive_path(&archive, *kind, path) {
                            self.files.copy_file(path, &target)?;
                        }
                    }
                }
                if self.wants(Component::Rom) && manager.handles_roms() {
                    if let Some(rom) = manager.retrieve_rom_file(platform, &game)? {
                        if let Some(name) = rom.file_name() {
                            let folder = archive.join(ROM_FOLDER);
                            self.files.delete_folder(&folder)?;
                            self.files.copy_file(&rom, &folder.join(name))?;
                        }
                    }
                }
                if self.wants(Component::GameInfo) {
                    if let Some(info) = manager.retrieve_game_info(platform, &game)? {
                        let path = archive.join(game_info_file_name(manager.software()));
                        self.files.write_file(&path, &info)?;
                    }
                }
            }
            Action::Install => {
                let manager = self.services.manager()?;
                let mut payload = InstallPayload::default();
                if self.wants(Component::Media) {
                    payload.media_files = archived_media(&archive)?;
                }
                if self.wants(Component::GameInfo) {
                    payload.game_info_files = Software::all()
                        .iter()
                        .map(|s| (*s, archive.join(game_info_file_name(*s))))
                        .filter(|(_, path)| path.is_file())
                        .collect::<BTreeMap<_, _>>();
                }
                if self.wants(Component::Rom) {
                    payload.rom_file = game
                        .rom
                        .as_deref()
                        .map(|rom| archive.join(ROM_FOLDER).join(rom))
                        .filter(|path| path.is_file());
                }
                if !manager.install_game(platform, &game, &payload, &self.files)? {
                    log::warn!("{} did not install {}", manager.software(), game.name);
                }
            }
            Action::Uninstall => {
                let manager = self.services.manager()?;
                if !manager.uninstall_game(platform, &game, &self.files)? {
                    log::warn!("Nothing to uninstall for {}", game.name);
                }
            }
            Action::Edit => {
                if self.wants(Component::Rom) {
                    self.files.delete_folder(&archive)?;
                } else if self.wants(Component::Media) {
                    self.files.delete_folder(&archive.join(MEDIA_FOLDER))?;
                }
            }
            Action::Copy => return Err(self.unsupported()),
        }
        Ok(())
    }
}
