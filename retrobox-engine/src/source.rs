//! The items a selection iterates over.
//!
//! Install-like actions start from what the archive or the catalog offers;
//! uninstall and export start from what is live.

use std::path::Path;

use retrobox_core::{Action, CatalogEntry, Category, Emulator, Platform, Software, is_none_like};
use retrobox_db::{InstalledItem, PINUP_TABLES, list_playlists, list_tables};
use retrobox_lib::context::ROM_FOLDER;
use retrobox_lib::{FileOps, RunContext, document, list_sub_directories};

use crate::catalog::{find, read_catalog};
use crate::services::Services;
use crate::EngineError;

/// Version folder used when neither PinUP nor the catalog knows one.
pub const LATEST_VERSION: &str = "latest";

/// Tags holding a game's display name in an archived game-info block.
const GAME_NAME_TAGS: &[&str] = &["name", "Title"];

/// One catalog item with what PinUP knows about it.
///
/// `entry.version` names the archived version folder to work with, while
/// `catalog_version` keeps what the catalog row itself says.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub entry: CatalogEntry,
    pub catalog_version: Option<String>,
    pub installed: Option<InstalledItem>,
}

impl Item {
    pub fn new(entry: CatalogEntry) -> Self {
        Self {
            catalog_version: entry.version.clone(),
            entry,
            installed: None,
        }
    }

    pub fn with_installed(mut self, installed: InstalledItem) -> Self {
        self.installed = Some(installed);
        self
    }

    /// Version PinUP records for the installed item.
    pub fn installed_version(&self) -> Option<&str> {
        self.installed.as_ref().and_then(|i| i.version.as_deref())
    }

    pub fn id(&self) -> &str {
        &self.entry.id
    }

    pub fn name(&self) -> &str {
        &self.entry.name
    }
}

pub(crate) fn require_emulator(ctx: &RunContext) -> Result<Emulator, EngineError> {
    ctx.selection
        .emulator
        .ok_or(EngineError::MissingSelection("emulator"))
}

pub(crate) fn require_platform(ctx: &RunContext) -> Result<Platform, EngineError> {
    ctx.selection
        .platform
        .ok_or(EngineError::MissingSelection("platform"))
}

/// Every item of the current selection, before the partial-refresh filter.
pub fn list_items(ctx: &RunContext, services: &Services<'_>) -> Result<Vec<Item>, EngineError> {
    let action = ctx.selection.action;
    match ctx.selection.category {
        Category::Tables => {
            let emulator = require_emulator(ctx)?;
            let catalog = read_catalog(&ctx.tables_csv(emulator))?;
            if matches!(action, Action::Uninstall | Action::Export) {
                let installed = list_tables(services.database()?, emulator)?;
                return Ok(from_installed(installed, &catalog));
            }
            let installed = match services.database {
                Some(conn) => list_tables(conn, emulator)?,
                None => Vec::new(),
            };
            Ok(from_catalog(catalog, &installed))
        }
        Category::Playlists => {
            let catalog = read_catalog(&ctx.playlists_csv())?;
            let installed = list_playlists(services.database()?)?;
            if matches!(action, Action::Uninstall | Action::Export) {
                Ok(from_installed(installed, &catalog))
            } else {
                Ok(from_catalog(catalog, &installed))
            }
        }
        Category::PinupDatabase => Ok(PINUP_TABLES
            .iter()
            .map(|table| Item::new(CatalogEntry::new(*table).with_id(*table)))
            .collect()),
        Category::Configs => Ok(list_sub_directories(&ctx.configs_path())?
            .into_iter()
            .map(|name| Item::new(CatalogEntry::new(name.clone()).with_id(name)))
            .collect()),
        Category::Games => {
            let platform = require_platform(ctx)?;
            if matches!(action, Action::Uninstall | Action::Export) {
                let manager = services.manager()?;
                Ok(manager
                    .list_games_with_rom(platform)?
                    .into_iter()
                    .map(|(rom, name)| Item::new(CatalogEntry::new(name).with_rom(rom)))
                    .collect())
            } else {
                archived_games(ctx, platform)
            }
        }
    }
}

/// Catalog items, each joined with its PinUP counterpart when installed.
fn from_catalog(catalog: Vec<CatalogEntry>, installed: &[InstalledItem]) -> Vec<Item> {
    catalog
        .into_iter()
        .map(|entry| {
            let live = installed.iter().find(|i| i.id == entry.id).cloned();
            let item = Item::new(entry);
            match live {
                Some(live) => item.with_installed(live),
                None => item,
            }
        })
        .collect()
}

/// Installed items, completed from the catalog. The version comes from
/// PinUP first, then the catalog, then [`LATEST_VERSION`].
fn from_installed(installed: Vec<InstalledItem>, catalog: &[CatalogEntry]) -> Vec<Item> {
    installed
        .into_iter()
        .map(|live| {
            let mut entry = find(catalog, &live.id)
                .cloned()
                .unwrap_or_else(|| CatalogEntry::new(live.name.clone()).with_id(live.id.clone()));
            let catalog_version = entry.version.clone();
            entry.name = live.name.clone();
            let known = |v: &String| !is_none_like(Some(v.as_str()));
            entry.version = live
                .version
                .clone()
                .filter(known)
                .or(entry.version.take().filter(known))
                .or_else(|| Some(LATEST_VERSION.to_string()));
            if live.rom.is_some() {
                entry.rom = live.rom.clone();
            }
            Item {
                entry,
                catalog_version,
                installed: Some(live),
            }
        })
        .collect()
}

/// One item per game folder of the platform archive.
fn archived_games(ctx: &RunContext, platform: Platform) -> Result<Vec<Item>, EngineError> {
    let files = ctx.files();
    let mut items = Vec::new();
    for id in list_sub_directories(&ctx.games_path(platform))? {
        let archive = ctx.game_archive(platform, &id);
        let name = archived_game_name(&archive).unwrap_or_else(|| id.clone());
        let mut entry = CatalogEntry::new(name).with_id(id);
        entry.rom = archived_rom(&files, &archive)?;
        items.push(Item::new(entry));
    }
    Ok(items)
}

/// Display name from the first archived game-info block that carries one.
fn archived_game_name(archive: &Path) -> Option<String> {
    for software in Software::all() {
        let path = archive.join(game_info_file_name(*software));
        if !path.is_file() {
            continue;
        }
        for tag in GAME_NAME_TAGS {
            match document::list_values(&path, None, tag) {
                Ok(values) => {
                    if let Some(name) = values.into_iter().find(|v| !v.trim().is_empty()) {
                        return Some(name.trim().to_string());
                    }
                }
                Err(e) => log::debug!("Unreadable game info {}: {}", path.display(), e),
            }
        }
    }
    None
}

/// File name of the archived payload, if any.
pub(crate) fn archived_rom(files: &FileOps, archive: &Path) -> Result<Option<String>, EngineError> {
    let rom_folder = archive.join(ROM_FOLDER);
    Ok(files
        .list_relative_paths(&rom_folder, retrobox_lib::files::ANY, false)?
        .into_iter()
        .find_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned())))
}

/// `<software>.xml`: game-info block exported from one software.
pub fn game_info_file_name(software: Software) -> String {
    format!("{}.xml", software.id())
}
