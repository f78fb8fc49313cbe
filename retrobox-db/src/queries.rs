//! Read queries over the PinUP database.

use retrobox_core::util::normalize_cell;
use retrobox_core::{Emulator, sanitize};
use rusqlite::{Connection, Row, params};

use crate::schema::{DbError, quote_identifier};

/// A table or playlist as PinUP knows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledItem {
    /// Sanitized from the PinUP name, comparable with archive ids
    pub id: String,
    pub name: String,
    pub version: Option<String>,
    pub rom: Option<String>,
}

fn text(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<String>> {
    let value: Option<String> = row.get(idx)?;
    Ok(value.as_deref().and_then(normalize_cell))
}

fn row_to_table(row: &Row<'_>) -> rusqlite::Result<InstalledItem> {
    let game_name = text(row, 0)?.unwrap_or_default();
    let display = text(row, 1)?;
    Ok(InstalledItem {
        id: sanitize(&game_name),
        name: display.unwrap_or_else(|| game_name.clone()),
        version: text(row, 2)?,
        rom: text(row, 3)?,
    })
}

/// Tables installed in PinUP for one emulator, ordered by display name.
pub fn list_tables(conn: &Connection, emulator: Emulator) -> Result<Vec<InstalledItem>, DbError> {
    let mut stmt = conn.prepare(
        "SELECT g.GameName, g.GameDisplay, g.GameVer, g.ROM
         FROM Games g JOIN Emulators e ON g.EMUID = e.EMUID
         WHERE e.EmuName = ?1 AND g.GameName IS NOT NULL
         ORDER BY COALESCE(g.GameDisplay, g.GameName)",
    )?;
    let rows = stmt.query_map(params![emulator.pinup_name()], row_to_table)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Playlists defined in PinUP. PinUP stores no playlist version.
pub fn list_playlists(conn: &Connection) -> Result<Vec<InstalledItem>, DbError> {
    let mut stmt =
        conn.prepare("SELECT PlayName FROM Playlists ORDER BY PlayDisplayOrder, PlayName")?;
    let rows = stmt.query_map([], |row| {
        let name = text(row, 0)?.unwrap_or_default();
        Ok(InstalledItem {
            id: sanitize(&name),
            name,
            version: None,
            rom: None,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Names of every table in the database, sorted.
pub fn table_names(conn: &Connection) -> Result<Vec<String>, DbError> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master
         WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
         ORDER BY name",
    )?;
    let rows = stmt.query_map([], |row| row.get(0))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

pub fn table_exists(conn: &Connection, table: &str) -> Result<bool, DbError> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
        params![table],
        |row| row.get(0),
    )?;
    Ok(exists)
}

/// Number of rows in `table`. Unknown tables are an error.
pub fn count_rows(conn: &Connection, table: &str) -> Result<usize, DbError> {
    if !table_exists(conn, table)? {
        return Err(DbError::UnknownTable(table.to_string()));
    }
    let count: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM {}", quote_identifier(table)),
        [],
        |row| row.get(0),
    )?;
    Ok(usize::try_from(count).unwrap_or(0))
}
