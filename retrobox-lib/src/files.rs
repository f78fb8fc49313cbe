//! Directory-tree listing and comparison, plus the file mutation service.
//!
//! Listing and comparison are read-only. Every mutation goes through
//! [`FileOps`], which only logs the intended action in simulation mode.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;
use walkdir::WalkDir;

use crate::LibError;

/// Substrings marking thumbnail caches written by Windows and PinUP Popper.
///
/// A relative path containing any of them is ignored by every verification.
pub const CACHE_FILE_NAMES: &[&str] = &["thumb", "pthumbs", "Thumbs"];

/// Windows Explorer thumbnail database, deleted whenever a listing meets it.
pub const THUMBS_DB: &str = "Thumbs.db";

/// Pattern matching every file.
pub const ANY: &str = "*";

/// True if the relative path contains a cache name anywhere.
pub fn is_cache_path(relative: &Path) -> bool {
    let text = relative.to_string_lossy();
    CACHE_FILE_NAMES.iter().any(|name| text.contains(name))
}

/// Compare two files by existence and byte size.
///
/// Two missing files are equal, one missing file is not. Content is never
/// read, so same-sized files with different bytes compare equal.
pub fn compare_files(a: &Path, b: &Path) -> bool {
    match (file_size(a), file_size(b)) {
        (None, None) => true,
        (Some(size_a), Some(size_b)) => size_a == size_b,
        _ => false,
    }
}

fn file_size(path: &Path) -> Option<u64> {
    fs::metadata(path)
        .ok()
        .filter(|m| m.is_file())
        .map(|m| m.len())
}

/// Names of the direct sub-directories of `root`, sorted. Missing root gives
/// an empty list.
pub fn list_sub_directories(root: &Path) -> Result<Vec<String>, LibError> {
    if !root.is_dir() {
        return Ok(Vec::new());
    }
    let mut names = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

/// Matcher for one listing pattern.
struct NameMatcher {
    pattern: String,
    whole: Option<Pattern>,
    with_extension: Option<Pattern>,
}

impl NameMatcher {
    fn new(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            whole: Pattern::new(pattern).ok(),
            with_extension: Pattern::new(&format!("{pattern}.*")).ok(),
        }
    }

    fn matches(&self, file_name: &str) -> bool {
        if file_name == self.pattern {
            return true;
        }
        let stem = Path::new(file_name)
            .file_stem()
            .map(|s| s.to_string_lossy())
            .unwrap_or_default();
        if stem == self.pattern {
            return true;
        }
        self.whole.as_ref().is_some_and(|p| p.matches(file_name))
            || self
                .with_extension
                .as_ref()
                .is_some_and(|p| p.matches(file_name))
    }
}

/// File mutation service.
///
/// Holds the simulation flag so that every write, copy, move and delete in
/// the tool either happens or is logged, never half of each.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileOps {
    simulated: bool,
}

impl FileOps {
    pub fn new(simulated: bool) -> Self {
        Self { simulated }
    }

    pub fn is_simulated(&self) -> bool {
        self.simulated
    }

    /// Recursively list the paths under `root` matching `pattern`, relative
    /// to `root` and sorted.
    ///
    /// A file matches when its name equals the pattern, its stem equals the
    /// pattern, or it matches the glob `pattern` or `pattern.*`. A directory
    /// named like the pattern contributes every file below it. `Thumbs.db`
    /// files are deleted and never returned.
    ///
    /// A missing root yields an empty list; with `error_if_not_found`, an
    /// empty result is a [`LibError::MissingFile`].
    pub fn list_relative_paths(
        &self,
        root: &Path,
        pattern: &str,
        error_if_not_found: bool,
    ) -> Result<Vec<PathBuf>, LibError> {
        let mut result = BTreeSet::new();
        if root.is_dir() {
            let matcher = NameMatcher::new(pattern);
            for entry in WalkDir::new(root).min_depth(1) {
                let entry = entry.map_err(walk_error)?;
                let name = entry.file_name().to_string_lossy();
                if entry.file_type().is_dir() {
                    if name == pattern {
                        self.collect_all(root, entry.path(), &mut result)?;
                    }
                    continue;
                }
                if !matcher.matches(&name) {
                    continue;
                }
                if name == THUMBS_DB {
                    self.delete_file(entry.path(), false)?;
                    continue;
                }
                if let Ok(relative) = entry.path().strip_prefix(root) {
                    result.insert(relative.to_path_buf());
                }
            }
        }

        if error_if_not_found && result.is_empty() {
            return Err(LibError::missing_file(pattern, root));
        }
        Ok(result.into_iter().collect())
    }

    fn collect_all(
        &self,
        root: &Path,
        folder: &Path,
        result: &mut BTreeSet<PathBuf>,
    ) -> Result<(), LibError> {
        for entry in WalkDir::new(folder).min_depth(1) {
            let entry = entry.map_err(walk_error)?;
            if !entry.file_type().is_file() {
                continue;
            }
            if entry.file_name() == THUMBS_DB {
                self.delete_file(entry.path(), false)?;
                continue;
            }
            if let Ok(relative) = entry.path().strip_prefix(root) {
                result.insert(relative.to_path_buf());
            }
        }
        Ok(())
    }

    /// Copy a file, creating the destination's parents.
    ///
    /// Returns `false` without copying when the destination already exists
    /// with the same size.
    pub fn copy_file(&self, source: &Path, destination: &Path) -> Result<bool, LibError> {
        if destination.exists() && compare_files(source, destination) {
            return Ok(false);
        }
        if self.simulated {
            log::info!(
                "[SIMULATION] Copy {} to {}",
                source.display(),
                destination.display()
            );
            return Ok(true);
        }
        log::info!("Copying {} to {}", source.display(), destination.display());
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(source, destination)?;
        Ok(true)
    }

    pub fn move_file(&self, source: &Path, destination: &Path) -> Result<bool, LibError> {
        if self.simulated {
            log::info!(
                "[SIMULATION] Move {} to {}",
                source.display(),
                destination.display()
            );
            return Ok(true);
        }
        log::info!("Moving {} to {}", source.display(), destination.display());
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }
        if fs::rename(source, destination).is_err() {
            // Cross-device move
            fs::copy(source, destination)?;
            fs::remove_file(source)?;
        }
        Ok(true)
    }

    /// Recursively copy a folder into `destination`.
    pub fn copy_folder(&self, source: &Path, destination: &Path) -> Result<bool, LibError> {
        if self.simulated {
            log::info!(
                "[SIMULATION] Copy folder {} to {}",
                source.display(),
                destination.display()
            );
            return Ok(true);
        }
        log::info!(
            "Copying folder {} to {}",
            source.display(),
            destination.display()
        );
        copy_tree(source, destination)?;
        Ok(true)
    }

    pub fn move_folder(&self, source: &Path, destination: &Path) -> Result<bool, LibError> {
        if self.simulated {
            log::info!(
                "[SIMULATION] Move folder {} to {}",
                source.display(),
                destination.display()
            );
            return Ok(true);
        }
        log::info!(
            "Moving folder {} to {}",
            source.display(),
            destination.display()
        );
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }
        if fs::rename(source, destination).is_err() {
            copy_tree(source, destination)?;
            fs::remove_dir_all(source)?;
        }
        Ok(true)
    }

    /// Delete a file. With `all_extensions`, every file next to it sharing
    /// its stem is deleted too.
    ///
    /// Returns `false` when nothing was there to delete.
    pub fn delete_file(&self, path: &Path, all_extensions: bool) -> Result<bool, LibError> {
        if !path.is_file() {
            return Ok(false);
        }
        if self.simulated {
            log::info!("[SIMULATION] Delete {}", path.display());
            return Ok(true);
        }
        if !all_extensions {
            log::info!("Deleting {}", path.display());
            fs::remove_file(path)?;
            return Ok(true);
        }

        let Some(parent) = path.parent() else {
            return Ok(false);
        };
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut deleted = 0;
        for relative in self.list_relative_paths(parent, &stem, false)? {
            if self.delete_file(&parent.join(relative), false)? {
                deleted += 1;
            }
        }
        Ok(deleted > 0)
    }

    pub fn delete_folder(&self, path: &Path) -> Result<bool, LibError> {
        if !path.is_dir() {
            return Ok(false);
        }
        if self.simulated {
            log::info!("[SIMULATION] Delete folder {}", path.display());
            return Ok(true);
        }
        log::info!("Deleting folder {}", path.display());
        fs::remove_dir_all(path)?;
        Ok(true)
    }

    pub fn create_folder(&self, path: &Path) -> Result<bool, LibError> {
        if self.simulated {
            log::info!("[SIMULATION] Create folder {}", path.display());
            return Ok(true);
        }
        log::debug!("Creating folder {}", path.display());
        fs::create_dir_all(path)?;
        Ok(true)
    }

    /// Write a UTF-8 text file with `\n` line endings.
    pub fn write_file(&self, path: &Path, content: &str) -> Result<bool, LibError> {
        if self.simulated {
            log::info!("[SIMULATION] Write {}", path.display());
            return Ok(true);
        }
        log::info!("Writing {}", path.display());
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content.replace("\r\n", "\n"))?;
        Ok(true)
    }

    /// Write raw bytes (registry exports are UTF-16).
    pub fn write_bytes(&self, path: &Path, content: &[u8]) -> Result<bool, LibError> {
        if self.simulated {
            log::info!("[SIMULATION] Write {}", path.display());
            return Ok(true);
        }
        log::info!("Writing {}", path.display());
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(true)
    }

    /// Read a UTF-8 text file; a missing file reads as empty.
    pub fn read_file(&self, path: &Path) -> Result<String, LibError> {
        if !path.is_file() {
            return Ok(String::new());
        }
        Ok(fs::read_to_string(path)?)
    }
}

fn copy_tree(source: &Path, destination: &Path) -> Result<(), LibError> {
    for entry in WalkDir::new(source) {
        let entry = entry.map_err(walk_error)?;
        let Ok(relative) = entry.path().strip_prefix(source) else {
            continue;
        };
        let target = destination.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

fn walk_error(err: walkdir::Error) -> LibError {
    LibError::Io(err.into())
}

#[cfg(test)]
#[path = "tests/files_tests.rs"]
mod tests;
