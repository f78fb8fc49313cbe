//! Skraper output: `<root>/<platform>/gamelist.xml` and media under
//! `<root>/<platform>/media/<folder>/<rom stem><ext>`. Payloads stay in
//! the front-end; only their names are recorded.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use retrobox_core::{Media, Platform, Software};
use retrobox_lib::FileOps;

use crate::gamelist::{self, FILE_PREFIX, GAMELIST, PATH_TAG};
use crate::manager::{
    GameRef, InstallPayload, Manager, ManagerBase, compose_game_block, dotted_extension,
    escape_xml, file_name, first_match, preferred_game_info, resolve_listed_path,
};
use crate::mapping::{MediaTable, PlatformTable};
use crate::FrontendError;

const MEDIA_FOLDER: &str = "media";

static MEDIA: &[(&str, Media)] = &[
    ("box2dfront", Media::Box2dFront),
    ("box2dside", Media::Box2dSide),
    ("box2dback", Media::Box2dBack),
    ("box3d", Media::Box3d),
    ("boxtexture", Media::Box2dBack),
    ("support", Media::Support),
    ("supporttexture", Media::Support),
    ("wheel", Media::Logo),
    ("wheelcarbon", Media::LogoCarbon),
    ("wheelsteel", Media::LogoSteel),
    ("steamgrid", Media::Logo),
    ("screenmarquee", Media::Logo),
    ("screenmarqueesmall", Media::Logo),
    ("marquee", Media::Logo),
    ("screenshot", Media::ScreenshotGame),
    ("screenshottitle", Media::ScreenshotTitle),
    ("fanart", Media::FanArt),
    ("mix", Media::ScreenshotGame),
    ("images", Media::ScreenshotGame),
    ("manuals", Media::Manual),
    ("videos", Media::Video),
];

const PLATFORMS: &[(&str, Platform)] = &[
    ("mastersystem", Platform::SegaMasterSystem),
    ("megadrive", Platform::SegaMegadrive),
];

const GAME_INFO_PRIORITY: &[Software] = &[Software::Skraper, Software::Batocera];

#[derive(Debug, Clone)]
pub struct SkraperManager {
    base: ManagerBase,
}

impl SkraperManager {
    pub fn new(
        root: impl Into<PathBuf>,
        overrides: &[(Platform, String)],
    ) -> Result<Self, FrontendError> {
        Ok(Self {
            base: ManagerBase::new(Software::Skraper, root.into(), PLATFORMS, MEDIA, overrides)?,
        })
    }

    fn platform_dir(&self, platform: Platform) -> Result<PathBuf, FrontendError> {
        Ok(self.base.root.join(self.base.key(platform)?))
    }

    /// Stem media files are named after: the payload when known, else the
    /// path recorded in the game list, else the game name.
    fn media_stem(&self, dir: &Path, game: &GameRef) -> Result<String, FrontendError> {
        if let Some(stem) = game.rom_stem() {
            return Ok(stem);
        }
        let record = gamelist::game_record(&dir.join(GAMELIST), &game.name)?;
        Ok(record
            .get(PATH_TAG)
            .and_then(|p| {
                resolve_listed_path(dir, p)
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
            })
            .unwrap_or_else(|| game.name.clone()))
    }
}

impl Manager for SkraperManager {
    fn software(&self) -> Software {
        Software::Skraper
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

    fn handles_roms(&self) -> bool {
        false
    }

    fn list_platforms(&self) -> Result<Vec<Platform>, FrontendError> {
        self.base.platforms_in(&self.base.root)
    }

    fn list_games_with_rom(
        &self,
        platform: Platform,
    ) -> Result<BTreeMap<String, String>, FrontendError> {
        let dir = self.platform_dir(platform)?;
        gamelist::list_games(&dir.join(GAMELIST), &dir, false)
    }

    fn retrieve_media_files(
        &self,
        platform: Platform,
        game: &GameRef,
    ) -> Result<BTreeMap<Media, PathBuf>, FrontendError> {
        let dir = self.platform_dir(platform)?;
        let stem = self.media_stem(&dir, game)?;
        let mut result = BTreeMap::new();
        for (folder, media) in MEDIA {
            if result.contains_key(media) {
                continue;
            }
            if let Some(path) = first_match(&dir.join(MEDIA_FOLDER).join(folder), &stem)? {
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
        platform: Platform,
        game: &GameRef,
    ) -> Result<Option<String>, FrontendError> {
        let dir = self.platform_dir(platform)?;
        gamelist::game_info(&dir.join(GAMELIST), &game.name)
    }

    fn install_game(
        &self,
        platform: Platform,
        game: &GameRef,
        payload: &InstallPayload,
        files: &FileOps,
    ) -> Result<bool, FrontendError> {
        let dir = self.platform_dir(platform)?;
        let rom_name = game
            .rom
            .clone()
            .or_else(|| payload.rom_file.as_deref().and_then(file_name));
        let stem = rom_name
            .as_deref()
            .and_then(|r| Path::new(r).file_stem())
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| game.name.clone());

        for (media, source) in &payload.media_files {
            let Some(folder) = self.base.media.key(*media) else {
                continue;
            };
            let target = dir
                .join(MEDIA_FOLDER)
                .join(folder)
                .join(format!("{stem}{}", dotted_extension(source)));
            files.copy_file(source, &target)?;
        }

        let Some(info) = preferred_game_info(GAME_INFO_PRIORITY, payload, files)? else {
            return Ok(true);
        };
        let extra: Vec<String> = rom_name
            .iter()
            .map(|rom| format!("\t\t<{PATH_TAG}>{FILE_PREFIX}{}</{PATH_TAG}>", escape_xml(rom)))
            .collect();
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
        let mut deleted = false;
        for path in self.retrieve_media_files(platform, game)?.values() {
            deleted |= files.delete_file(path, false)?;
        }
        let dir = self.platform_dir(platform)?;
        deleted |= gamelist::remove_game(&dir.join(GAMELIST), &game.name, files)?;
        Ok(deleted)
    }
}
