use std::path::Path;

use retrobox_core::{Action, Component};
use retrobox_lib::context::{FILES_FOLDER, REGISTRY_FOLDER};
use retrobox_lib::files::ANY;
use retrobox_lib::registry::{RegFile, RegKeyEntry};

use super::Executor;
use crate::source::Item;
use crate::verifier::registry_exports;
use crate::EngineError;

impl Executor<'_> {
    /// Config bundles: `files/` mirrors paths relative to the drive root,
    /// `registry/` holds `.reg` exports.
    pub(super) fn execute_config(&self, item: &Item) -> Result<(), EngineError> {
        let archive = self.ctx.config_archive(item.id());
        let archived_files = archive.join(FILES_FOLDER);
        let exports = registry_exports(&self.files, &archive.join(REGISTRY_FOLDER))?;
        let drive = self
            .ctx
            .drive_root()
            .ok_or_else(|| EngineError::not_configured("PinUP path"))?;
        let do_files = self.wants(Component::Files);
        let do_registry = self.wants(Component::Registry);

        match self.ctx.selection.action {
            Action::Install => {
                if do_files {
                    for relative in self.files.list_relative_paths(&archived_files, ANY, false)? {
                        self.files
                            .copy_file(&archived_files.join(&relative), &drive.join(&relative))?;
                    }
                }
                if do_registry {
                    for export in &exports {
                        if self.files.is_simulated() {
                            log::info!("[SIMULATION] Import {}", export.display());
                        } else {
                            let written = self.services.registry.import_file(export)?;
                            log::info!(
                                "Imported {} registry values from {}",
                                written,
                                export.display()
                            );
                        }
                    }
                }
            }
            Action::Export => {
                if do_files {
                    for relative in self.files.list_relative_paths(&archived_files, ANY, false)? {
                        let live = drive.join(&relative);
                        if live.is_file() {
                            self.files.copy_file(&live, &archived_files.join(&relative))?;
                        } else {
                            log::warn!("Missing file {}", live.display());
                        }
                    }
                }
                if do_registry {
                    for export in &exports {
                        self.refresh_export(export)?;
                    }
                }
            }
            Action::Uninstall => {
                if do_files {
                    for relative in self.files.list_relative_paths(&archived_files, ANY, false)? {
                        self.files.delete_file(&drive.join(relative), false)?;
                    }
                }
                if do_registry {
                    for export in &exports {
                        self.delete_exported_keys(export)?;
                    }
                }
            }
            Action::Copy | Action::Edit => return Err(self.unsupported()),
        }
        Ok(())
    }

    /// Rewrite an export with the live values of the keys it names.
    fn refresh_export(&self, export: &Path) -> Result<(), EngineError> {
        let registry = self.services.registry;
        let file = RegFile::load(export)?;
        let mut keys: Vec<RegKeyEntry> = Vec::new();
        for key in file.user_keys() {
            if registry.key_exists(key)? {
                keys.extend(registry.export_key(key)?.keys);
            } else {
                log::warn!("Registry key {} not found", key);
            }
        }
        if keys.is_empty() {
            return Ok(());
        }
        let updated = RegFile { keys };
        self.files.write_bytes(export, &updated.to_utf16_bytes())?;
        Ok(())
    }

    fn delete_exported_keys(&self, export: &Path) -> Result<(), EngineError> {
        let file = RegFile::load(export)?;
        for key in file.user_keys() {
            if self.files.is_simulated() {
                log::info!("[SIMULATION] Delete registry key {}", key);
            } else if self.services.registry.delete_key(key)? {
                log::info!("Deleted registry key {}", key);
            }
        }
        Ok(())
    }
}
