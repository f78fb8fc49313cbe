//! User-defined platform mappings persisted in `platforms.xml`.
//!
//! A record names a canonical platform and, per software, the native key to
//! use for it. Records take precedence over the static tables of the
//! managers and are created when exporting from a front-end folder that no
//! static table knows.

use std::path::{Path, PathBuf};

use retrobox_core::{Platform, Software};
use retrobox_lib::document::{self, Record};
use retrobox_lib::FileOps;

use crate::FrontendError;

pub const ROOT_TAG: &str = "platforms";
pub const ITEM_TAG: &str = "platform";
pub const ID_TAG: &str = "id";

#[derive(Debug, Clone, Default)]
pub struct PlatformMappings {
    path: PathBuf,
    records: Vec<Record>,
}

impl PlatformMappings {
    /// Load the records at `path`. A missing file holds no record.
    pub fn load(path: &Path) -> Result<Self, FrontendError> {
        let records = if path.is_file() {
            document::list_records(path, Some(ROOT_TAG), ITEM_TAG)?
        } else {
            Vec::new()
        };
        Ok(Self {
            path: path.to_path_buf(),
            records,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Native keys recorded for `software`, by platform.
    pub fn overrides(&self, software: Software) -> Vec<(Platform, String)> {
        self.records
            .iter()
            .filter_map(|record| {
                let id = record.get(ID_TAG)?;
                let key = record.get(software.id()).filter(|k| !k.is_empty())?;
                match id.parse::<Platform>() {
                    Ok(platform) => Some((platform, key.to_string())),
                    Err(e) => {
                        log::warn!("Ignoring platform mapping in {}: {}", self.path.display(), e);
                        None
                    }
                }
            })
            .collect()
    }

    pub fn native_key(&self, platform: Platform, software: Software) -> Option<&str> {
        self.records
            .iter()
            .find(|r| r.get(ID_TAG) == Some(platform.short_name()))
            .and_then(|r| r.get(software.id()))
    }

    /// Record `key` as the native name of `platform` for `software`,
    /// keeping the keys already recorded for other software.
    pub fn set(
        &mut self,
        platform: Platform,
        software: Software,
        key: &str,
        files: &FileOps,
    ) -> Result<(), FrontendError> {
        let id = platform.short_name();
        let index = match self.records.iter().position(|r| r.get(ID_TAG) == Some(id)) {
            Some(index) => index,
            None => {
                self.records.push(Record::new().with(ID_TAG, id));
                self.records.len() - 1
            }
        };
        self.records[index].set(software.id(), key);

        if files.is_simulated() {
            log::info!(
                "[SIMULATION] Map {} platform '{}' to {} in {}",
                software,
                key,
                platform.short_name(),
                self.path.display()
            );
            return Ok(());
        }
        document::replace_record(
            &self.path,
            ROOT_TAG,
            ITEM_TAG,
            &[(ID_TAG, id)],
            self.records[index].clone(),
        )?;
        log::info!("Mapped {} platform '{}' to {}", software, key, id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mappings = PlatformMappings::load(&dir.path().join("platforms.xml")).unwrap();
        assert!(mappings.is_empty());
        assert!(mappings.overrides(Software::Batocera).is_empty());
    }

    #[test]
    fn test_set_persists_and_merges() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("platforms.xml");
        let files = FileOps::new(false);

        let mut mappings = PlatformMappings::load(&path).unwrap();
        mappings
            .set(Platform::SegaMegadrive, Software::Batocera, "genesis", &files)
            .unwrap();
        mappings
            .set(Platform::SegaMegadrive, Software::LaunchBox, "Sega Genesis", &files)
            .unwrap();

        let reloaded = PlatformMappings::load(&path).unwrap();
        assert_eq!(
            reloaded.native_key(Platform::SegaMegadrive, Software::Batocera),
            Some("genesis")
        );
        assert_eq!(
            reloaded.overrides(Software::LaunchBox),
            vec![(Platform::SegaMegadrive, "Sega Genesis".to_string())]
        );
        assert!(reloaded.overrides(Software::Skraper).is_empty());
    }

    #[test]
    fn test_simulated_set_does_not_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("platforms.xml");
        let mut mappings = PlatformMappings::load(&path).unwrap();
        mappings
            .set(Platform::NintendoSnes, Software::Batocera, "snes", &FileOps::new(true))
            .unwrap();
        assert_eq!(mappings.native_key(Platform::NintendoSnes, Software::Batocera), Some("snes"));
        assert!(!path.exists());
    }
}
