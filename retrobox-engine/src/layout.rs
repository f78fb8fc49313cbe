//! File and folder names inside the emulator installs and the archive.

use std::path::{Path, PathBuf};

use retrobox_core::{CatalogEntry, Emulator, is_none_like};
use retrobox_lib::RunContext;
use retrobox_lib::registry::VPINMAME_REG_KEY;

/// Table files of Visual Pinball X.
pub const TABLES_FOLDER: &str = "Tables";
/// ROMs, NVRAM and settings of VPinMAME.
pub const VPINMAME_FOLDER: &str = "VPinMAME";

/// Backglass settings, one element per ROM. Its writer does not always
/// produce well-formed XML, so it is only searched literally.
pub const B2S_SETTINGS: &str = "B2STableSettings.xml";
pub const B2S_ROOT_TAG: &str = "B2STableSettings";

/// Exported VPinMAME registry settings of one ROM.
pub const USER_VALUES_REG: &str = "user_values.reg";

/// The value when it is a usable identity key.
pub fn known_key(value: Option<&str>) -> Option<&str> {
    if is_none_like(value) { None } else { value }
}

/// Registry key holding the VPinMAME settings of a ROM.
pub fn rom_registry_key(rom: &str) -> String {
    format!(r"{VPINMAME_REG_KEY}\{rom}")
}

/// Live backglass settings file.
pub fn live_b2s_settings(emulator_path: &Path) -> PathBuf {
    emulator_path.join(TABLES_FOLDER).join(B2S_SETTINGS)
}

/// Archive folder of a table version; `None` when the id or the version is
/// unknown.
pub fn table_archive(
    ctx: &RunContext,
    emulator: Emulator,
    entry: &CatalogEntry,
) -> Option<PathBuf> {
    let id = known_key(Some(entry.id.as_str()))?;
    let version = known_key(entry.version.as_deref())?;
    Some(ctx.table_archive(emulator, id, version))
}

/// Archive folder of a playlist version; `None` when unknown.
pub fn playlist_archive(ctx: &RunContext, entry: &CatalogEntry) -> Option<PathBuf> {
    let id = known_key(Some(entry.id.as_str()))?;
    let version = known_key(entry.version.as_deref())?;
    Some(ctx.playlist_archive(id, version))
}
