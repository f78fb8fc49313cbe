//! EmulationStation-style `gamelist.xml`, written by Batocera and by
//! Skraper.

use std::collections::BTreeMap;
use std::path::Path;

use retrobox_lib::document::{self, Record};
use retrobox_lib::FileOps;

use crate::manager::{filter_game_info, resolve_listed_path};
use crate::FrontendError;

pub const GAMELIST: &str = "gamelist.xml";
pub const ROOT_TAG: &str = "gameList";
pub const GAME_TAG: &str = "game";
pub const PATH_TAG: &str = "path";
pub const NAME_TAG: &str = "name";

/// Prefix of every file reference in a game list.
pub const FILE_PREFIX: &str = "./";

const EMPTY_GAMELIST: &str = "<?xml version=\"1.0\"?>\n<gameList>\n</gameList>\n";

/// Payload file name to display name.
///
/// With `require_file`, only games whose payload exists under `base` are
/// listed. The `path` and `name` lists must line up one to one.
pub fn list_games(
    gamelist: &Path,
    base: &Path,
    require_file: bool,
) -> Result<BTreeMap<String, String>, FrontendError> {
    let mut result = BTreeMap::new();
    if !gamelist.is_file() {
        return Ok(result);
    }
    let paths = document::list_values(gamelist, Some(GAME_TAG), PATH_TAG)?;
    let names = document::list_values(gamelist, Some(GAME_TAG), NAME_TAG)?;
    if paths.len() != names.len() {
        return Err(FrontendError::inconsistent(
            gamelist,
            format!("{} paths for {} names", paths.len(), names.len()),
        ));
    }
    for (path, name) in paths.iter().zip(names) {
        let rom = resolve_listed_path(base, path);
        if require_file && !rom.is_file() {
            log::debug!("Skipping {}: {} does not exist", name, rom.display());
            continue;
        }
        if let Some(file_name) = rom.file_name() {
            result.insert(file_name.to_string_lossy().into_owned(), name);
        }
    }
    Ok(result)
}

/// Fields of the game named `name`; empty when absent.
pub fn game_record(gamelist: &Path, name: &str) -> Result<Record, FrontendError> {
    if !gamelist.is_file() {
        return Ok(Record::new());
    }
    Ok(document::get_record(gamelist, None, GAME_TAG, &[(NAME_TAG, name)])?)
}

pub fn game_info(gamelist: &Path, name: &str) -> Result<Option<String>, FrontendError> {
    if !gamelist.is_file() {
        return Ok(None);
    }
    let raw = document::get_raw_content(gamelist, None, GAME_TAG, &[(NAME_TAG, name)])?;
    Ok(raw.map(|r| filter_game_info(&r, FILE_PREFIX)))
}

/// Replace the block of the game named `name` by `block`, creating the game
/// list when needed.
pub fn write_game_block(
    gamelist: &Path,
    name: &str,
    block: &str,
    files: &FileOps,
) -> Result<(), FrontendError> {
    if files.is_simulated() {
        log::info!("[SIMULATION] Write game '{}' in {}", name, gamelist.display());
        return Ok(());
    }
    if !gamelist.is_file() {
        files.write_file(gamelist, EMPTY_GAMELIST)?;
    }
    remove_game(gamelist, name, files)?;
    document::append_raw(gamelist, block)?;
    log::info!("Wrote game '{}' in {}", name, gamelist.display());
    Ok(())
}

/// Remove the block of the game named `name`. Returns whether it existed.
pub fn remove_game(gamelist: &Path, name: &str, files: &FileOps) -> Result<bool, FrontendError> {
    if !gamelist.is_file() {
        return Ok(false);
    }
    if files.is_simulated() {
        log::info!("[SIMULATION] Remove game '{}' from {}", name, gamelist.display());
        return Ok(true);
    }
    Ok(document::delete_record(gamelist, None, GAME_TAG, &[(NAME_TAG, name)])?)
}
