use std::path::Path;

use retrobox_core::Action;
use retrobox_core::util::normalize_cell;
use retrobox_db::{TableDump, clear_table, dump_table, restore_table};
use retrobox_lib::LibError;

use super::Executor;
use crate::source::Item;
use crate::EngineError;

impl Executor<'_> {
    /// Export dumps a PinUP table to CSV, install restores it from there,
    /// uninstall empties it.
    pub(super) fn execute_database_table(&self, item: &Item) -> Result<(), EngineError> {
        let conn = self.services.database()?;
        let table = item.id();
        let archive = self.ctx.database_archive(table);
        match self.ctx.selection.action {
            Action::Export => {
                let dump = dump_table(conn, table)?;
                if self.files.is_simulated() {
                    log::info!(
                        "[SIMULATION] Export {} rows of {} to {}",
                        dump.rows.len(),
                        table,
                        archive.display()
                    );
                    return Ok(());
                }
                write_dump(&archive, &dump)?;
                log::info!("Exported {} rows of {}", dump.rows.len(), table);
            }
            Action::Install => {
                if !archive.is_file() {
                    let folder = archive.parent().unwrap_or(archive.as_path());
                    return Err(LibError::missing_file(format!("{table}.csv"), folder).into());
                }
                let dump = read_dump(&archive)?;
                if self.files.is_simulated() {
                    log::info!("[SIMULATION] Restore {} rows into {}", dump.rows.len(), table);
                    return Ok(());
                }
                restore_table(conn, table, &dump)?;
            }
            Action::Uninstall => {
                if self.files.is_simulated() {
                    log::info!("[SIMULATION] Clear {}", table);
                    return Ok(());
                }
                clear_table(conn, table)?;
            }
            Action::Copy | Action::Edit => return Err(self.unsupported()),
        }
        Ok(())
    }
}

/// NULL is written as an empty cell and read back as NULL.
fn write_dump(path: &Path, dump: &TableDump) -> Result<(), EngineError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&dump.columns)?;
    for row in &dump.rows {
        writer.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))?;
    }
    writer.flush()?;
    Ok(())
}

fn read_dump(path: &Path) -> Result<TableDump, EngineError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(normalize_cell).collect());
    }
    Ok(TableDump { columns, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dump_file_keeps_nulls() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pinup_database").join("Games.csv");
        let dump = TableDump {
            columns: vec!["GameID".into(), "GameName".into(), "ROM".into()],
            rows: vec![
                vec![Some("1".into()), Some("Attack, from Mars".into()), Some("afm_113b".into())],
                vec![Some("2".into()), Some("Medieval Madness".into()), None],
            ],
        };
        write_dump(&path, &dump).unwrap();
        assert_eq!(read_dump(&path).unwrap(), dump);
    }
}
