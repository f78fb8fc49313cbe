//! Batocera: `roms/<platform>/gamelist.xml`, payloads next to it and media
//! under `images/`, `manuals/` and `videos/`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use retrobox_core::{Media, Platform, Software};
use retrobox_lib::FileOps;

use crate::gamelist::{self, FILE_PREFIX, GAMELIST, PATH_TAG};
use crate::manager::{
    GameRef, InstallPayload, Manager, ManagerBase, compose_game_block, dotted_extension,
    escape_xml, file_name, preferred_game_info, resolve_listed_path,
};
use crate::mapping::{MediaTable, PlatformTable};
use crate::FrontendError;

const ROMS_FOLDER: &str = "roms";

static MEDIA: &[(&str, Media)] = &[
    ("image", Media::ScreenshotGame),
    ("marquee", Media::Logo),
    ("thumbnail", Media::Box3d),
    ("fanart", Media::FanArt),
    ("titleshot", Media::ScreenshotTitle),
    ("boxback", Media::Box2dBack),
    ("bezel", Media::Bezel),
    ("manual", Media::Manual),
    ("video", Media::Video),
];

const PLATFORMS: &[(&str, Platform)] = &[
    ("mastersystem", Platform::SegaMasterSystem),
    ("megadrive", Platform::SegaMegadrive),
];

const GAME_INFO_PRIORITY: &[Software] = &[Software::Batocera, Software::Skraper];

/// Folder of the platform directory holding a media kind.
fn media_folder(media: Media) -> &'static str {
    match media {
        Media::Manual => "manuals",
        Media::Video => "videos",
        _ => "images",
    }
}

#[derive(Debug, Clone)]
pub struct BatoceraManager {
    base: ManagerBase,
}

impl BatoceraManager {
    pub fn new(
        root: impl Into<PathBuf>,
        overrides: &[(Platform, String)],
    ) -> Result<Self, FrontendError> {
        Ok(Self {
            base: ManagerBase::new(Software::Batocera, root.into(), PLATFORMS, MEDIA, overrides)?,
        })
    }

    fn platform_dir(&self, platform: Platform) -> Result<PathBuf, FrontendError> {
        Ok(self.base.root.join(ROMS_FOLDER).join(self.base.key(platform)?))
    }

    fn gamelist(&self, platform: Platform) -> Result<PathBuf, FrontendError> {
        Ok(self.platform_dir(platform)?.join(GAMELIST))
    }
}

impl Manager for BatoceraManager {
    fn software(&self) -> Software {
        Software::Batocera
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
        GAME_INFO_PRIORITY
    }

    fn list_platforms(&self) -> Result<Vec<Platform>, FrontendError> {
        self.base.platforms_in(&self.base.root.join(ROMS_FOLDER))
    }

    fn list_games_with_rom(
        &self,
        platform: Platform,
    ) -> Result<BTreeMap<String, String>, FrontendError> {
        let dir = self.platform_dir(platform)?;
        gamelist::list_games(&dir.join(GAMELIST), &dir, true)
    }

    fn retrieve_media_files(
        &self,
        platform: Platform,
        game: &GameRef,
    ) -> Result<BTreeMap<Media, PathBuf>, FrontendError> {
        let dir = self.platform_dir(platform)?;
        let record = gamelist::game_record(&dir.join(GAMELIST), &game.name)?;
        let mut result = BTreeMap::new();
        for (tag, value) in record.iter() {
            let Some(media) = self.base.media.media(tag) else {
                continue;
            };
            let path = resolve_listed_path(&dir, value);
            if path.is_file() {
                result.insert(media, path);
            } else {
                log::debug!("{} of {} not found: {}", tag, game.name, path.display());
            }
        }
        Ok(result)
    }

    fn retrieve_rom_file(
        &self,
        platform: Platform,
        game: &GameRef,
    ) -> Result<Option<PathBuf>, FrontendError> {
        let dir = self.platform_dir(platform)?;
        let path = match &game.rom {
            Some(rom) => dir.join(rom),
            None => {
                let record = gamelist::game_record(&dir.join(GAMELIST), &game.name)?;
                match record.get(PATH_TAG) {
                    Some(listed) => resolve_listed_path(&dir, listed),
                    None => return Ok(None),
                }
            }
        };
        Ok(path.is_file().then_some(path))
    }

    fn retrieve_game_info(
        &self,
        platform: Platform,
        game: &GameRef,
    ) -> Result<Option<String>, FrontendError> {
        gamelist::game_info(&self.gamelist(platform)?, &game.name)
    }

    fn install_game(
        &self,
        platform: Platform,
        game: &GameRef,
        payload: &InstallPayload,
        files: &FileOps,
    ) -> Result<bool, FrontendError> {
        let dir = self.platform_dir(platform)?;
        let Some(rom_file) = payload.rom_file.as_deref() else {
            log::warn!("No ROM archived for {}, nothing installed", game.name);
            return Ok(false);
        };
        let rom_name = file_name(rom_file).unwrap_or_default();
        files.copy_file(rom_file, &dir.join(&rom_name))?;

        let Some(info) = preferred_game_info(GAME_INFO_PRIORITY, payload, files)? else {
            log::info!("No game info archived for {}, ROM installed alone", game.name);
            return Ok(true);
        };

        let rom_stem = Path::new(&rom_name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut extra = vec![format!(
            "\t\t<{PATH_TAG}>{FILE_PREFIX}{}</{PATH_TAG}>",
            escape_xml(&rom_name)
        )];
        for (key, media) in MEDIA {
            let Some(source) = payload.media_files.get(media) else {
                continue;
            };
            let folder = media_folder(*media);
            let target_name = format!("{rom_stem}-{key}{}", dotted_extension(source));
            files.copy_file(source, &dir.join(folder).join(&target_name))?;
            extra.push(format!(
                "\t\t<{key}>{FILE_PREFIX}{folder}/{}</{key}>",
                escape_xml(&target_name)
            ));
        }

        let block = compose_game_block(&info, FILE_PREFIX, &extra);
        gamelist::write_game_block(&dir.join(GAMELIST), &game.name, &block, files)?;
        Ok(true)
    }

    fn uninstall_game(
        &self,
        platform: Platform,
        game: &GameRef,
        files: &FileOps,
    ) -> Result<bool, FrontendError> {
        for path in self.retrieve_media_files(platform, game)?.values() {
            files.delete_file(path, false)?;
        }
        let rom_deleted = match self.retrieve_rom_file(platform, game)? {
            Some(rom) => files.delete_file(&rom, false)?,
            None => false,
        };
        let record_deleted = gamelist::remove_game(&self.gamelist(platform)?, &game.name, files)?;
        Ok(rom_deleted || record_deleted)
    }
}

#[cfg(test)]
#[path = "tests/batocera_tests.rs"]
mod tests;
