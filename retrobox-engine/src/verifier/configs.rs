//! Config bundles: files stored relative to the PinUP drive root and
//! registry exports.

use std::path::{Path, PathBuf};

use retrobox_core::{Action, Component, Status};
use retrobox_lib::context::{FILES_FOLDER, REGISTRY_FOLDER};
use retrobox_lib::files::ANY;
use retrobox_lib::registry::strip_user_root;
use retrobox_lib::{FileOps, RegFile, is_cache_path};

use super::Verifier;
use crate::rows::Row;
use crate::source::Item;
use crate::EngineError;

/// Extension of registry exports in a config bundle.
const REG_EXTENSION: &str = "reg";

impl Verifier<'_> {
    pub(super) fn verify_config(&self, item: &Item, row: &mut Row) -> Result<(), EngineError> {
        let archive = self.ctx.config_archive(item.id());
        row.set(Component::Files, self.config_files(&archive.join(FILES_FOLDER))?);
        row.set(Component::Registry, self.config_registry(&archive.join(REGISTRY_FOLDER))?);
        Ok(())
    }

    fn config_files(&self, archived: &Path) -> Result<Status, EngineError> {
        if !self.any_match(archived, ANY)? {
            return Ok(Status::NotApplicable);
        }
        let drive = self
            .ctx
            .drive_root()
            .ok_or_else(|| EngineError::not_configured("PinUP path"))?;
        match self.ctx.selection.action {
            Action::Install => {
                for relative in self.files.list_relative_paths(archived, ANY, false)? {
                    if is_cache_path(&relative) {
                        continue;
                    }
                    let live = drive.join(&relative);
                    if !live.exists() {
                        log::warn!("Missing file {}", live.display());
                        return Ok(Status::Absent);
                    }
                }
                Ok(Status::Present)
            }
            Action::Export => self.mirror(archived, ANY, &drive, true),
            Action::Uninstall => self.removed(archived, ANY, &drive),
            Action::Edit => Ok(Status::Present),
            Action::Copy => Ok(Status::NotApplicable),
        }
    }

    fn config_registry(&self, archived: &Path) -> Result<Status, EngineError> {
        let exports = registry_exports(&self.files, archived)?;
        if exports.is_empty() {
            return Ok(Status::NotApplicable);
        }
        let registry = self.services.registry;
        for path in &exports {
            let file = RegFile::load(path)?;
            let keys = file.user_keys();
            let ok = match self.ctx.selection.action {
                Action::Install => {
                    let mut all = true;
                    for key in &keys {
                        all &= registry.key_exists(key)?;
                    }
                    all && registry.matches_exported_file(path)?
                }
                Action::Export => self.existing_keys_match(&file)?,
                Action::Uninstall => {
                    let mut none = true;
                    for key in &keys {
                        none &= !registry.key_exists(key)?;
                    }
                    none
                }
                Action::Edit => true,
                Action::Copy => return Ok(Status::NotApplicable),
            };
            if !ok {
                log::warn!("Registry does not match {}", path.display());
                return Ok(Status::Absent);
            }
        }
        Ok(Status::Present)
    }

    /// Exported values of the keys that exist live are up to date.
    fn existing_keys_match(&self, file: &RegFile) -> Result<bool, EngineError> {
        let registry = self.services.registry;
        for entry in file.keys.iter().filter(|k| !k.delete) {
            let Some(key) = strip_user_root(&entry.path) else {
                continue;
            };
            if !registry.key_exists(key)? {
                continue;
            }
            for (name, expected) in &entry.values {
                if registry.read_value(key, name)?.as_ref() != Some(expected) {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }
}

/// `.reg` files of a bundle's registry folder.
pub(crate) fn registry_exports(
    files: &FileOps,
    folder: &Path,
) -> Result<Vec<PathBuf>, EngineError> {
    Ok(files
        .list_relative_paths(folder, ANY, false)?
        .into_iter()
        .filter(|p| {
            p.extension()
                .is_some_and(|e| e.eq_ignore_ascii_case(REG_EXTENSION))
        })
        .map(|p| folder.join(p))
        .collect())
}
