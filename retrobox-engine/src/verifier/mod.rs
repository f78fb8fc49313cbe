//! Verification engine: one tri-state predicate per category, component
//! and action.
//!
//! Common policy, shared by every predicate:
//!
//! - a none-like identity key (id, version, rom, videos path) makes the
//!   check not applicable;
//! - expected paths come from the archive under the working path;
//! - install and export need every expected file on the other side with
//!   the same size, uninstall needs none of them left;
//! - edit only needs the archive, plus at most one file per media folder;
//! - paths containing a cache name are ignored;
//! - a mismatch logs one warning before reporting [`Status::Absent`].

mod configs;
mod database;
mod games;
mod playlists;
mod tables;
mod versions;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use retrobox_core::{Category, Status};
use retrobox_lib::{FileOps, RunContext, compare_files, is_cache_path};

use crate::rows::Row;
use crate::services::Services;
use crate::source::Item;
use crate::EngineError;

pub(crate) use configs::registry_exports;
pub(crate) use games::{archived_media, game_ref, media_archive_path};
pub use versions::verify_csv_bdd_version;

/// Media folder exempt from the one-file-per-folder rule.
pub const LOADING_FOLDER: &str = "Loading";

/// Verifies the items of one selection.
pub struct Verifier<'a> {
    ctx: &'a RunContext,
    services: Services<'a>,
    files: FileOps,
}

impl<'a> Verifier<'a> {
    pub fn new(ctx: &'a RunContext, services: Services<'a>) -> Self {
        Self {
            ctx,
            services,
            files: ctx.files(),
        }
    }

    /// Compute the colored row of one item.
    pub fn verify(&self, item: &Item) -> Result<Row, EngineError> {
        let mut row = Row::new(item.id(), item.name());
        match self.ctx.selection.category {
            Category::Tables => self.verify_table(item, &mut row)?,
            Category::Playlists => self.verify_playlist(item, &mut row)?,
            Category::PinupDatabase => self.verify_database_table(item, &mut row)?,
            Category::Configs => self.verify_config(item, &mut row)?,
            Category::Games => self.verify_game(item, &mut row)?,
        }
        row.recolor();
        Ok(row)
    }

    /// Every file under `source` matching `pattern` must exist under
    /// `target` at the same relative path with the same size.
    ///
    /// With `require_any`, an empty source is a failure too.
    fn mirror(
        &self,
        source: &Path,
        pattern: &str,
        target: &Path,
        require_any: bool,
    ) -> Result<Status, EngineError> {
        let mut found = false;
        for relative in self.files.list_relative_paths(source, pattern, false)? {
            if is_cache_path(&relative) {
                continue;
            }
            found = true;
            let expected = target.join(&relative);
            if !expected.exists() {
                log::warn!("Missing file {}", expected.display());
                return Ok(Status::Absent);
            }
            let origin = source.join(&relative);
            if !compare_files(&origin, &expected) {
                log::warn!(
                    "Files differ: {} and {}",
                    origin.display(),
                    expected.display()
                );
                return Ok(Status::Absent);
            }
        }
        if require_any && !found {
            log::warn!("Nothing matching '{}' in {}", pattern, source.display());
            return Ok(Status::Absent);
        }
        Ok(Status::Present)
    }

    /// No file under `source` matching `pattern` may remain under `target`.
    fn removed(&self, source: &Path, pattern: &str, target: &Path) -> Result<Status, EngineError> {
        for relative in self.files.list_relative_paths(source, pattern, false)? {
            if is_cache_path(&relative) {
                continue;
            }
            let remaining = target.join(&relative);
            if remaining.exists() {
                log::warn!("File still present: {}", remaining.display());
                return Ok(Status::Absent);
            }
        }
        Ok(Status::Present)
    }

    /// True when some non-cache file under `root` matches `pattern`.
    fn any_match(&self, root: &Path, pattern: &str) -> Result<bool, EngineError> {
        Ok(self
            .files
            .list_relative_paths(root, pattern, false)?
            .iter()
            .any(|relative| !is_cache_path(relative)))
    }

    /// The archive folder exists and each of its folders holds at most one
    /// file, except `Loading` folders.
    fn unique_per_folder(&self, root: &Path) -> Result<Status, EngineError> {
        if !root.is_dir() {
            log::warn!("Missing folder {}", root.display());
            return Ok(Status::Absent);
        }
        let mut counts: BTreeMap<PathBuf, usize> = BTreeMap::new();
        for relative in self.files.list_relative_paths(root, retrobox_lib::files::ANY, false)? {
            if is_cache_path(&relative) {
                continue;
            }
            let folder = relative.parent().map(Path::to_path_buf).unwrap_or_default();
            if folder.iter().any(|part| part == LOADING_FOLDER) {
                continue;
            }
            *counts.entry(folder).or_default() += 1;
        }
        for (folder, count) in counts {
            if count > 1 {
                log::warn!(
                    "{} files in {}, expected one",
                    count,
                    root.join(folder).display()
                );
                return Ok(Status::Absent);
            }
        }
        Ok(Status::Present)
    }
}

#[cfg(test)]
#[path = "../tests/verifier_tests.rs"]
mod tests;
