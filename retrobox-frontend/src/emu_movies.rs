//! EmuMovies media packs: `<root>/<platform>/<MediaFolder>/<rom stem><ext>`.
//! Media only, no payload and no game info.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use retrobox_core::{Media, Platform, Software};
use retrobox_lib::FileOps;

use crate::manager::{GameRef, InstallPayload, Manager, ManagerBase, dotted_extension, first_match};
use crate::mapping::{MediaTable, PlatformTable};
use crate::FrontendError;

static MEDIA: &[(&str, Media)] = &[
    ("Background", Media::FanArt),
    ("Box", Media::Box2dFront),
    ("Box_3D", Media::Box3d),
    ("Box_Full", Media::Box2dFront),
    ("BoxBack", Media::Box2dBack),
    ("Cart", Media::Box2dFront),
    ("Cart_3D", Media::Box3d),
    ("CartTop", Media::Box2dFront),
    ("Logos", Media::Logo),
    ("Marquee", Media::Logo),
    ("Snap", Media::ScreenshotGame),
    ("Title", Media::ScreenshotTitle),
    ("Video_MP4_HI_QUAL", Media::Video),
];

const PLATFORMS: &[(&str, Platform)] = &[
    ("mastersystem", Platform::SegaMasterSystem),
    ("megadrive", Platform::SegaMegadrive),
];

#[derive(Debug, Clone)]
pub struct EmuMoviesManager {
    base: ManagerBase,
}

impl EmuMoviesManager {
    pub fn new(
        root: impl Into<PathBuf>,
        overrides: &[(Platform, String)],
    ) -> Result<Self, FrontendError> {
        Ok(Self {
            base: ManagerBase::new(Software::EmuMovies, root.into(), PLATFORMS, MEDIA, overrides)?,
        })
    }

    fn platform_dir(&self, platform: Platform) -> Result<PathBuf, FrontendError> {
        Ok(self.base.root.join(self.base.key(platform)?))
    }
}

/// Media packs are named after the payload, falling back to the game name.
fn media_stem(game: &GameRef) -> String {
    game.rom_stem().unwrap_or_else(|| game.name.clone())
}

impl Manager for EmuMoviesManager {
    fn software(&self) -> Software {
        Software::EmuMovies
    }

    fn root(&self) -> &Path {
        &self.base.root
    }

    fn platforms(&self) -> &PlatformTable {
        &self.base.platforms
    }

    fn media(&self) -> &MediaTable {
        &self.base.media
    }

    fn game_info_priority(&self) -> &'static [Software] {
        &[]
    }

    fn handles_roms(&self) -> bool {
        false
    }

    fn list_platforms(&self) -> Result<Vec<Platform>, FrontendError> {
        self.base.platforms_in(&self.base.root)
    }

    /// Without payloads, games are the distinct media file stems.
    fn list_games_with_rom(
        &self,
        platform: Platform,
    ) -> Result<BTreeMap<String, String>, FrontendError> {
        let dir = self.platform_dir(platform)?;
        let files = FileOps::default();
        let mut stems = BTreeSet::new();
        for (folder, _) in MEDIA {
            for relative in files.list_relative_paths(&dir.join(folder), "*", false)? {
                if let Some(stem) = relative.file_stem() {
                    stems.insert(stem.to_string_lossy().into_owned());
                }
            }
        }
        Ok(stems.into_iter().map(|s| (s.clone(), s)).collect())
    }

    fn retrieve_media_files(
        &self,
        platform: Platform,
        game: &GameRef,
    ) -> Result<BTreeMap<Media, PathBuf>, FrontendError> {
        let dir = self.platform_dir(platform)?;
        let stem = media_stem(game);
        let mut result = BTreeMap::new();
        for (folder, media) in MEDIA {
            if result.contains_key(media) {
                continue;
            }
            if let Some(path) = first_match(&dir.join(folder), &stem)? {
                result.insert(*media, path);
            }
        }
        Ok(result)
    }

    fn retrieve_rom_file(
        &self,
        _platform: Platform,
        _game: &GameRef,
    ) -> Result<Option<PathBuf>, FrontendError> {
        Ok(None)
    }

    fn retrieve_game_info(
        &self,
        _platform: Platform,
        _game: &GameRef,
    ) -> Result<Option<String>, FrontendError> {
        Ok(None)
    }

    fn install_game(
        &self,
        platform: Platform,
        game: &GameRef,
        payload: &InstallPayload,
        files: &FileOps,
    ) -> Result<bool, FrontendError> {
        let dir = self.platform_dir(platform)?;
        let stem = match (&game.rom, &payload.rom_file) {
            (Some(_), _) => media_stem(game),
            (None, Some(rom)) => rom
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| game.name.clone()),
            (None, None) => game.name.clone(),
        };
        let mut copied = 0;
        for (media, source) in &payload.media_files {
            let Some(folder) = self.base.media.key(*media) else {
                log::debug!("{} has no folder for {}", Software::EmuMovies, media);
                continue;
            };
            let target = dir.join(folder).join(format!("{stem}{}", dotted_extension(source)));
            files.copy_file(source, &target)?;
            copied += 1;
        }
        Ok(copied > 0)
    }

    fn uninstall_game(
        &self,
        platform: Platform,
        game: &GameRef,
        files: &FileOps,
    ) -> Result<bool, FrontendError> {
        let mut deleted = false;
        for path in self.retrieve_media_files(platform, game)?.values() {
            deleted |= files.delete_file(path, false)?;
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("archive");
        std::fs::create_dir_all(&archive).unwrap();
        std::fs::write(archive.join("front.png"), "png").unwrap();
        std::fs::write(archive.join("clip.mp4"), "mp4").unwrap();
        std::fs::write(archive.join("manual.pdf"), "pdf").unwrap();

        let root = dir.path().join("emumovies");
        let manager = EmuMoviesManager::new(&root, &[]).unwrap();
        let mut payload = InstallPayload::default();
        payload.media_files.insert(Media::Box2dFront, archive.join("front.png"));
        payload.media_files.insert(Media::Video, archive.join("clip.mp4"));
        payload.media_files.insert(Media::Manual, archive.join("manual.pdf"));

        let game = GameRef::new("Sonic the Hedgehog").with_rom("Sonic (W).md");
        let files = FileOps::new(false);
        assert!(manager.install_game(Platform::SegaMegadrive, &game, &payload, &files).unwrap());
        // The first folder mapped to a media kind receives it
        assert!(root.join("megadrive/Box/Sonic (W).png").is_file());
        assert!(root.join("megadrive/Video_MP4_HI_QUAL/Sonic (W).mp4").is_file());

        let media = manager.retrieve_media_files(Platform::SegaMegadrive, &game).unwrap();
        assert_eq!(media.len(), 2);
        assert_eq!(manager.list_platforms().unwrap(), vec![Platform::SegaMegadrive]);
        let games = manager.list_games_with_rom(Platform::SegaMegadrive).unwrap();
        assert_eq!(games.keys().collect::<Vec<_>>(), vec!["Sonic (W)"]);
        assert!(manager.retrieve_rom_file(Platform::SegaMegadrive, &game).unwrap().is_none());

        assert!(manager.uninstall_game(Platform::SegaMegadrive, &game, &files).unwrap());
        assert!(manager.retrieve_media_files(Platform::SegaMegadrive, &game).unwrap().is_empty());
    }
}
