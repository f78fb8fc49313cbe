//! The user's catalog: one CSV file per category, the source of truth for
//! what should be installed.

use std::path::Path;

use retrobox_core::util::normalize_cell;
use retrobox_core::{CatalogEntry, sanitize};

use crate::EngineError;

pub const HEADERS: [&str; 6] = ["id", "name", "version", "rom", "videos_path", "weblink_url"];

/// Read the catalog at `path`. A missing file is an empty catalog.
///
/// Rows without a name are skipped. A missing id is derived from the name.
pub fn read_catalog(path: &Path) -> Result<Vec<CatalogEntry>, EngineError> {
    if !path.is_file() {
        log::warn!("Catalog {} does not exist", path.display());
        return Ok(Vec::new());
    }
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;
    let headers = reader.headers()?.clone();
    let position = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
    let [id, name, version, rom, videos_path, weblink_url] = HEADERS.map(position);

    let mut entries = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record?;
        let cell = |index: Option<usize>| {
            index.and_then(|i| record.get(i)).and_then(normalize_cell)
        };
        let Some(display) = cell(name) else {
            log::warn!("Skipping unnamed entry on line {} of {}", line + 2, path.display());
            continue;
        };
        entries.push(CatalogEntry {
            id: cell(id).unwrap_or_else(|| sanitize(&display)),
            name: display,
            version: cell(version),
            rom: cell(rom),
            videos_path: cell(videos_path),
            weblink_url: cell(weblink_url),
        });
    }
    log::debug!("Read {} catalog entries from {}", entries.len(), path.display());
    Ok(entries)
}

/// Write a catalog, sorted by id.
pub fn write_catalog(path: &Path, entries: &[CatalogEntry]) -> Result<(), EngineError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut sorted: Vec<&CatalogEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| a.id.cmp(&b.id));

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(HEADERS)?;
    for entry in sorted {
        let optional = |v: &Option<String>| v.clone().unwrap_or_default();
        writer.write_record([
            entry.id.clone(),
            entry.name.clone(),
            optional(&entry.version),
            optional(&entry.rom),
            optional(&entry.videos_path),
            optional(&entry.weblink_url),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Entry with the given id.
pub fn find<'a>(entries: &'a [CatalogEntry], id: &str) -> Option<&'a CatalogEntry> {
    entries.iter().find(|e| e.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_normalizes_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tables_visual_pinball_x.csv");
        std::fs::write(
            &path,
            "id,name,version,rom,videos_path,weblink_url\n\
             Attack_from_Mars,Attack from Mars,\"1.1\",afm_113b,AFM,https://vpuniverse.com/f/1\n\
             ,Medieval Madness,NULL, , ,\n\
             x,,1.0,,,\n",
        )
        .unwrap();

        let entries = read_catalog(&path).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].version.as_deref(), Some("1.1"));
        assert_eq!(entries[0].rom.as_deref(), Some("afm_113b"));
        assert_eq!(entries[1].id, "Medieval_Madness");
        assert_eq!(entries[1].version, None);
        assert_eq!(entries[1].rom, None);
        assert!(find(&entries, "Medieval_Madness").is_some());
        assert!(find(&entries, "x").is_none());
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("csv").join("playlists.csv");
        let entries = vec![
            CatalogEntry::new("Williams").with_version("2"),
            CatalogEntry::new("Bally, Classics"),
        ];
        write_catalog(&path, &entries).unwrap();
        let read = read_catalog(&path).unwrap();
        assert_eq!(read[0].id, "Bally,_Classics");
        assert_eq!(read[1], entries[0]);
    }

    #[test]
    fn test_missing_catalog_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_catalog(&dir.path().join("none.csv")).unwrap().is_empty());
    }
}
