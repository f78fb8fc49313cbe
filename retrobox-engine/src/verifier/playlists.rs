use std::path::PathBuf;

use retrobox_core::{Action, Column, Component, Status};
use retrobox_lib::context::MEDIA_FOLDER;

use super::Verifier;
use crate::layout::playlist_archive;
use crate::rows::Row;
use crate::source::Item;
use crate::EngineError;

impl Verifier<'_> {
    pub(super) fn verify_playlist(&self, item: &Item, row: &mut Row) -> Result<(), EngineError> {
        let entry = &item.entry;
        let root = self.ctx.playlist_root(&entry.id);
        let archive = playlist_archive(self.ctx, entry);
        match self.ctx.selection.action {
            Action::Install => {
                row.set(Column::LatestVersion, self.playlist_version(item));
                row.set(Component::EmulatorPlaylist, Status::from(item.installed.is_some()));
                row.set(
                    Component::PinupMedia,
                    Status::from(self.any_match(&self.live_playlist_media()?, &entry.id)?),
                );
            }
            Action::Uninstall => {
                row.set(Component::EmulatorPlaylist, Status::from(item.installed.is_none()));
                row.set(
                    Component::PinupMedia,
                    Status::from(!self.any_match(&self.live_playlist_media()?, &entry.id)?),
                );
            }
            Action::Export => {
                row.set(Column::LatestVersion, self.playlist_version(item));
                let Some(archive) = archive else {
                    row.set(Component::EmulatorPlaylist, Status::NotApplicable);
                    return Ok(());
                };
                row.set(
                    Component::EmulatorPlaylist,
                    Status::from(self.any_match(&archive, retrobox_lib::files::ANY)?),
                );
                row.set(
                    Component::PinupMedia,
                    Status::from(self.any_match(&archive.join(MEDIA_FOLDER), &entry.id)?),
                );
            }
            Action::Edit => {
                row.set(Column::UniqueVersion, self.unique_version(&root)?);
                let media = match archive {
                    Some(archive) => self.unique_per_folder(&archive.join(MEDIA_FOLDER))?,
                    None => Status::NotApplicable,
                };
                row.set(Component::PinupMedia, media);
            }
            Action::Copy => {}
        }
        Ok(())
    }

    /// PinUP keeps no version for playlists, so an installed playlist is
    /// only compared when a version was recorded for it.
    fn playlist_version(&self, item: &Item) -> Status {
        match &item.installed {
            Some(live) if live.version.is_none() => Status::NotApplicable,
            _ => self.version_agreement(item),
        }
    }

    fn live_playlist_media(&self) -> Result<PathBuf, EngineError> {
        self.ctx
            .playlist_media_path()
            .ok_or_else(|| EngineError::not_configured("PinUP path"))
    }
}
