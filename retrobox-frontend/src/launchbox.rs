//! LaunchBox: one `Data/Platforms/<Platform>.xml` per platform, payloads
//! under `Games/<Platform>/` and media named `<Title>-01<ext>` under
//! `Images/<Platform>/<Category>/`, `Videos/<Platform>/` and
//! `Manuals/<Platform>/`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use retrobox_core::{Media, Platform, Software};
use retrobox_lib::document;
use retrobox_lib::FileOps;

use crate::manager::{
    GameRef, InstallPayload, Manager, ManagerBase, compose_game_block, dotted_extension,
    escape_xml, file_name, filter_game_info, first_match, preferred_game_info,
    resolve_listed_path,
};
use crate::mapping::{MediaTable, PlatformTable};
use crate::FrontendError;

const PLATFORMS_FOLDER: &str = "Data/Platforms";
const GAMES_FOLDER: &str = "Games";
const IMAGES_FOLDER: &str = "Images";
const VIDEOS_FOLDER: &str = "Videos";
const MANUALS_FOLDER: &str = "Manuals";

const GAME_TAG: &str = "Game";
const TITLE_TAG: &str = "Title";
const APPLICATION_PATH_TAG: &str = "ApplicationPath";
const PLATFORM_TAG: &str = "Platform";

const VIDEO_KEY: &str = "Video";
const MANUAL_KEY: &str = "Manual";

/// Suffix LaunchBox appends to the first media file of a game.
const MEDIA_SUFFIX: &str = "-01";

const EMPTY_PLATFORM: &str =
    "<?xml version=\"1.0\" standalone=\"yes\"?>\n<LaunchBox>\n</LaunchBox>\n";

static MEDIA: &[(&str, Media)] = &[
    ("Screenshot - Gameplay", Media::ScreenshotGame),
    ("Screenshot - Game Title", Media::ScreenshotTitle),
    ("Box - Front", Media::Box2dFront),
    ("Box - Spine", Media::Box2dSide),
    ("Box - Back", Media::Box2dBack),
    ("Box - 3D", Media::Box3d),
    ("Cart - Front", Media::Support),
    ("Clear Logo", Media::Logo),
    ("Arcade - Marquee", Media::Logo),
    ("Fanart - Background", Media::FanArt),
    (VIDEO_KEY, Media::Video),
    (MANUAL_KEY, Media::Manual),
];

const PLATFORMS: &[(&str, Platform)] = &[
    ("Sega Master System", Platform::SegaMasterSystem),
    ("MegaDrive", Platform::SegaMegadrive),
];

const GAME_INFO_PRIORITY: &[Software] = &[Software::LaunchBox];

/// Title as LaunchBox writes it in media file names.
fn file_title(title: &str) -> String {
    title
        .chars()
        .map(|c| match c {
            '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\'' => '_',
            other => other,
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct LaunchBoxManager {
    base: ManagerBase,
}

impl LaunchBoxManager {
    pub fn new(
        root: impl Into<PathBuf>,
        overrides: &[(Platform, String)],
    ) -> Result<Self, FrontendError> {
        Ok(Self {
            base: ManagerBase::new(Software::LaunchBox, root.into(), PLATFORMS, MEDIA, overrides)?,
        })
    }

    fn platform_xml(&self, platform: Platform) -> Result<PathBuf, FrontendError> {
        let key = self.base.key(platform)?;
        Ok(self.base.root.join(PLATFORMS_FOLDER).join(format!("{key}.xml")))
    }

    fn media_dir(&self, key: &str, platform_key: &str) -> PathBuf {
        match key {
            VIDEO_KEY => self.base.root.join(VIDEOS_FOLDER).join(platform_key),
            MANUAL_KEY => self.base.root.join(MANUALS_FOLDER).join(platform_key),
            _ => self.base.root.join(IMAGES_FOLDER).join(platform_key).join(key),
        }
    }
}

impl Manager for LaunchBoxManager {
    fn software(&self) -> Software {
        Software::LaunchBox
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
        let folder = self.base.root.join(PLATFORMS_FOLDER);
        let listed = FileOps::default().list_relative_paths(&folder, "*.xml", false)?;
        Ok(listed
            .iter()
            .filter(|p| p.parent().is_none_or(|parent| parent.as_os_str().is_empty()))
            .filter_map(|p| p.file_stem())
            .filter_map(|stem| self.base.platforms.platform(&stem.to_string_lossy()))
            .collect())
    }

    fn list_games_with_rom(
        &self,
        platform: Platform,
    ) -> Result<BTreeMap<String, String>, FrontendError> {
        let xml = self.platform_xml(platform)?;
        let mut result = BTreeMap::new();
        if !xml.is_file() {
            return Ok(result);
        }
        let titles = document::list_values(&xml, Some(GAME_TAG), TITLE_TAG)?;
        let paths = document::list_values(&xml, Some(GAME_TAG), APPLICATION_PATH_TAG)?;
        if titles.len() != paths.len() {
            return Err(FrontendError::inconsistent(
                &xml,
                format!("{} titles for {} application paths", titles.len(), paths.len()),
            ));
        }
        for (title, path) in titles.into_iter().zip(paths) {
            let rom = resolve_listed_path(&self.base.root, &path);
            if !rom.is_file() {
                continue;
            }
            if let Some(name) = file_name(&rom) {
                result.insert(name, title);
            }
        }
        Ok(result)
    }

    fn retrieve_media_files(
        &self,
        platform: Platform,
        game: &GameRef,
    ) -> Result<BTreeMap<Media, PathBuf>, FrontendError> {
        let platform_key = self.base.key(platform)?;
        let stem = format!("{}{MEDIA_SUFFIX}", file_title(&game.name));
        let mut result = BTreeMap::new();
        for (key, media) in MEDIA {
            if result.contains_key(media) {
                continue;
            }
            if let Some(path) = first_match(&self.media_dir(key, platform_key), &stem)? {
                result.insert(*media, path);
            }
        }
        Ok(result)
    }

    fn retrieve_rom_file(
        &self,
        platform: Platform,
        game: &GameRef,
    ) -> Result<Option<PathBuf>, FrontendError> {
        let xml = self.platform_xml(platform)?;
        let listed = if xml.is_file() {
            document::get_record(&xml, None, GAME_TAG, &[(TITLE_TAG, &game.name)])?
                .get(APPLICATION_PATH_TAG)
                .map(|p| resolve_listed_path(&self.base.root, p))
        } else {
            None
        };
        let path = match (listed, &game.rom) {
            (Some(path), _) => path,
            (None, Some(rom)) => self
                .base
                .root
                .join(GAMES_FOLDER)
                .join(self.base.key(platform)?)
                .join(rom),
            (None, None) => return Ok(None),
        };
        Ok(path.is_file().then_some(path))
    }

    fn retrieve_game_info(
        &self,
        platform: Platform,
        game: &GameRef,
    ) -> Result<Option<String>, FrontendError> {
        let xml = self.platform_xml(platform)?;
        if !xml.is_file() {
            return Ok(None);
        }
        let raw = document::get_raw_content(&xml, None, GAME_TAG, &[(TITLE_TAG, &game.name)])?;
        Ok(raw.map(|r| filter_game_info(&r, APPLICATION_PATH_TAG)))
    }

    fn install_game(
        &self,
        platform: Platform,
        game: &GameRef,
        payload: &InstallPayload,
        files: &FileOps,
    ) -> Result<bool, FrontendError> {
        let platform_key = self.base.key(platform)?.to_string();
        let Some(rom_file) = payload.rom_file.as_deref() else {
            log::warn!("No ROM archived for {}, nothing installed", game.name);
            return Ok(false);
        };
        let rom_name = file_name(rom_file).unwrap_or_default();
        files.copy_file(
            rom_file,
            &self.base.root.join(GAMES_FOLDER).join(&platform_key).join(&rom_name),
        )?;

        let title = file_title(&game.name);
        for (media, source) in &payload.media_files {
            let Some(key) = self.base.media.key(*media) else {
                continue;
            };
            let target = self
                .media_dir(key, &platform_key)
                .join(format!("{title}{MEDIA_SUFFIX}{}", dotted_extension(source)));
            files.copy_file(source, &target)?;
        }

        // A game without a record is invisible in LaunchBox, so one is
        // always written.
        let info = preferred_game_info(GAME_INFO_PRIORITY, payload, files)?.unwrap_or_else(|| {
            format!(
                "\t<{GAME_TAG}>\n\t\t<{TITLE_TAG}>{}</{TITLE_TAG}>\n\
                 \t\t<{PLATFORM_TAG}>{}</{PLATFORM_TAG}>\n\t</{GAME_TAG}>",
                escape_xml(&game.name),
                escape_xml(&platform_key)
            )
        });
        let application_path = format!("{GAMES_FOLDER}\\{platform_key}\\{rom_name}");
        let block = compose_game_block(
            &info,
            APPLICATION_PATH_TAG,
            &[format!(
                "\t\t<{APPLICATION_PATH_TAG}>{}</{APPLICATION_PATH_TAG}>",
                escape_xml(&application_path)
            )],
        );

        let xml = self.platform_xml(platform)?;
        if files.is_simulated() {
            log::info!("[SIMULATION] Write game '{}' in {}", game.name, xml.display());
            return Ok(true);
        }
        if !xml.is_file() {
            files.write_file(&xml, EMPTY_PLATFORM)?;
        }
        document::delete_record(&xml, None, GAME_TAG, &[(TITLE_TAG, &game.name)])?;
        document::append_raw(&xml, &block)?;
        log::info!("Wrote game '{}' in {}", game.name, xml.display());
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
        let xml = self.platform_xml(platform)?;
        if !xml.is_file() {
            return Ok(rom_deleted);
        }
        if files.is_simulated() {
            log::info!("[SIMULATION] Remove game '{}' from {}", game.name, xml.display());
            return Ok(true);
        }
        let record_deleted =
            document::delete_record(&xml, None, GAME_TAG, &[(TITLE_TAG, &game.name)])?;
        Ok(rom_deleted || record_deleted)
    }
}
