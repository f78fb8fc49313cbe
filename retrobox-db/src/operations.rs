//! Whole-table dump, clear and restore for the PinUP database category.

use rusqlite::Connection;
use rusqlite::types::ValueRef;

use crate::queries::table_exists;
use crate::schema::{DbError, quote_identifier};

/// Every row of one table, values rendered as text.
///
/// SQLite column affinity turns numeric text back into numbers on restore.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableDump {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl TableDump {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn value_to_text(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(t) | ValueRef::Blob(t) => Some(String::from_utf8_lossy(t).into_owned()),
    }
}

fn ensure_table(conn: &Connection, table: &str) -> Result<(), DbError> {
    if table_exists(conn, table)? {
        Ok(())
    } else {
        Err(DbError::UnknownTable(table.to_string()))
    }
}

pub fn dump_table(conn: &Connection, table: &str) -> Result<TableDump, DbError> {
    ensure_table(conn, table)?;
    let mut stmt = conn.prepare(&format!("SELECT * FROM {}", quote_identifier(table)))?;
    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
    let count = columns.len();
    let rows = stmt.query_map([], |row| {
        (0..count)
            .map(|i| row.get_ref(i).map(value_to_text))
            .collect::<Result<Vec<_>, _>>()
    })?;
    let rows = rows.collect::<Result<Vec<_>, _>>()?;
    Ok(TableDump { columns, rows })
}

/// Delete every row of `table`. Returns the number of rows deleted.
pub fn clear_table(conn: &Connection, table: &str) -> Result<usize, DbError> {
    ensure_table(conn, table)?;
    let deleted = conn.execute(&format!("DELETE FROM {}", quote_identifier(table)), [])?;
    log::info!("Cleared {} rows from {}", deleted, table);
    Ok(deleted)
}

/// Replace the content of `table` with `dump`, in one transaction.
pub fn restore_table(conn: &Connection, table: &str, dump: &TableDump) -> Result<usize, DbError> {
    ensure_table(conn, table)?;
    if let Some(row) = dump.rows.iter().find(|r| r.len() != dump.columns.len()) {
        return Err(DbError::ColumnMismatch {
            table: table.to_string(),
            expected: dump.columns.len(),
            found: row.len(),
        });
    }

    let tx = conn.unchecked_transaction()?;
    tx.execute(&format!("DELETE FROM {}", quote_identifier(table)), [])?;
    if !dump.columns.is_empty() {
        let columns: Vec<String> = dump.columns.iter().map(|c| quote_identifier(c)).collect();
        let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{i}")).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_identifier(table),
            columns.join(", "),
            placeholders.join(", ")
        );
        let mut stmt = tx.prepare(&sql)?;
        for row in &dump.rows {
            stmt.execute(rusqlite::params_from_iter(row.iter()))?;
        }
        stmt.finalize()?;
    }
    tx.commit()?;
    log::info!("Restored {} rows into {}", dump.rows.len(), table);
    Ok(dump.rows.len())
}
