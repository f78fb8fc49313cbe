//! Verified rows and their CSV persistence.
//!
//! A row file has the fixed columns `selection,id,name,color` followed by
//! one column per component or version check present in any row. Statuses
//! are written as `YES`, `NO` or an empty cell.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use retrobox_core::{Column, RowColor, Status};

use crate::aggregate::row_color;
use crate::EngineError;

pub const SELECTION_HEADER: &str = "selection";
pub const ID_HEADER: &str = "id";
pub const NAME_HEADER: &str = "name";
pub const COLOR_HEADER: &str = "color";

const FIXED_HEADERS: [&str; 4] = [SELECTION_HEADER, ID_HEADER, NAME_HEADER, COLOR_HEADER];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: String,
    pub name: String,
    /// Checked by the user for the next execute; never aggregated
    pub selected: bool,
    pub columns: BTreeMap<Column, Status>,
    pub color: RowColor,
}

impl Row {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            selected: false,
            columns: BTreeMap::new(),
            color: RowColor::default(),
        }
    }

    pub fn set(&mut self, column: impl Into<Column>, status: Status) {
        self.columns.insert(column.into(), status);
    }

    pub fn with(mut self, column: impl Into<Column>, status: Status) -> Self {
        self.set(column, status);
        self
    }

    /// Status of a column; missing columns are not applicable.
    pub fn get(&self, column: impl Into<Column>) -> Status {
        self.columns.get(&column.into()).copied().unwrap_or_default()
    }

    /// Recompute the color from the column statuses.
    pub fn recolor(&mut self) {
        self.color = row_color(self.columns.values().copied());
    }

    /// Recolored copy, for building rows in one expression.
    pub fn colored(mut self) -> Self {
        self.recolor();
        self
    }
}

/// Red rows first, then green, then black; by name within a color.
pub fn sort_rows(rows: &mut [Row]) {
    rows.sort_by(|a, b| {
        (a.color.sort_rank(), &a.name).cmp(&(b.color.sort_rank(), &b.name))
    });
}

/// Merge the rows of a partial refresh into the previously persisted set.
///
/// Previous rows whose id was refreshed are replaced; the others are kept
/// untouched. The result is sorted.
pub fn merge_partial(fresh: Vec<Row>, previous: Vec<Row>, only_ids: &[String]) -> Vec<Row> {
    let mut merged = fresh;
    merged.extend(
        previous
            .into_iter()
            .filter(|row| !only_ids.iter().any(|id| *id == row.id)),
    );
    sort_rows(&mut merged);
    merged
}

pub fn write_rows(path: &Path, rows: &[Row]) -> Result<(), EngineError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let columns: BTreeSet<Column> = rows.iter().flat_map(|r| r.columns.keys().copied()).collect();

    let mut writer = csv::Writer::from_path(path)?;
    let mut header: Vec<&str> = FIXED_HEADERS.to_vec();
    header.extend(columns.iter().map(Column::key));
    writer.write_record(&header)?;

    for row in rows {
        let mut record = vec![
            Status::from(row.selected).as_csv(),
            row.id.as_str(),
            row.name.as_str(),
            row.color.as_str(),
        ];
        record.extend(columns.iter().map(|c| row.get(*c).as_csv()));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    log::debug!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// Read a row file. A missing file holds no row.
///
/// Empty cells are left out of the row, which reads them back as not
/// applicable.
///
/// Unknown column headers and unreadable status cells are skipped with a
/// warning rather than failing the whole file.
pub fn read_rows(path: &Path) -> Result<Vec<Row>, EngineError> {
    if !path.is_file() {
        return Ok(Vec::new());
    }
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let headers = reader.headers()?.clone();

    let columns: Vec<(usize, Column)> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| !FIXED_HEADERS.contains(h))
        .filter_map(|(i, h)| match h.parse::<Column>() {
            Ok(column) => Some((i, column)),
            Err(e) => {
                log::warn!("Ignoring column of {}: {}", path.display(), e);
                None
            }
        })
        .collect();
    let position = |name: &str| headers.iter().position(|h| h == name);
    let (selection, id, name, color) = (
        position(SELECTION_HEADER),
        position(ID_HEADER),
        position(NAME_HEADER),
        position(COLOR_HEADER),
    );

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let cell = |index: Option<usize>| index.and_then(|i| record.get(i)).unwrap_or("");
        let mut row = Row::new(cell(id), cell(name));
        row.selected = Status::from_csv(cell(selection)).is_some_and(|s| s.is_present());
        row.color = cell(color).parse().unwrap_or_default();
        for (index, column) in &columns {
            match Status::from_csv(record.get(*index).unwrap_or("")) {
                Some(Status::NotApplicable) => {}
                Some(status) => row.set(*column, status),
                None => log::warn!("Bad {} cell for '{}' in {}", column, row.id, path.display()),
            }
        }
        rows.push(row);
    }
    Ok(rows)
}

#[cfg(test)]
#[path = "tests/rows_tests.rs"]
mod tests;
