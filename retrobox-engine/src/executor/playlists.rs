use std::path::PathBuf;

use retrobox_core::{Action, Component};
use retrobox_lib::context::MEDIA_FOLDER;
use retrobox_lib::LibError;

use super::Executor;
use crate::layout::playlist_archive;
use crate::source::Item;
use crate::EngineError;

impl Executor<'_> {
    /// Playlists only carry PinUP media here; their database rows belong to
    /// the PinUP database category.
    pub(super) fn execute_playlist(&self, item: &Item) -> Result<(), EngineError> {
        let entry = &item.entry;
        if !self.wants(Component::PinupMedia) {
            return Ok(());
        }
        let live = self.playlist_media()?;
        match self.ctx.selection.action {
            Action::Install => {
                let archive = playlist_archive(self.ctx, entry)
                    .ok_or_else(|| EngineError::UnknownVersion(entry.name.clone()))?;
                let media = archive.join(MEDIA_FOLDER);
                if !media.is_dir() {
                    return Err(LibError::missing_file(MEDIA_FOLDER, &archive).into());
                }
                self.files.copy_folder(&media, &live)?;
            }
            Action::Uninstall => {
                for relative in self.files.list_relative_paths(&live, &entry.id, false)? {
                    self.files.delete_file(&live.join(relative), false)?;
                }
            }
            Action::Export => {
                let archive = playlist_archive(self.ctx, entry)
                    .ok_or_else(|| EngineError::UnknownVersion(entry.name.clone()))?;
                self.copy_matching(&live, &entry.id, &archive.join(MEDIA_FOLDER))?;
            }
            Action::Copy | Action::Edit => return Err(self.unsupported()),
        }
        Ok(())
    }

    fn playlist_media(&self) -> Result<PathBuf, EngineError> {
        self.ctx
            .playlist_media_path()
            .ok_or_else(|| EngineError::not_configured("PinUP path"))
    }
}
