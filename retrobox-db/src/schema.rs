//! Connection handling and the subset of the PinUP Popper schema this
//! crate reads.

use std::path::Path;

use rusqlite::{Connection, OpenFlags};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Unknown database table: '{0}'")]
    UnknownTable(String),
    #[error("Row has {found} values but table {table} has {expected} columns")]
    ColumnMismatch {
        table: String,
        expected: usize,
        found: usize,
    },
}

/// Database tables handled by the PinUP database category, in display order.
pub const PINUP_TABLES: &[&str] = &["Emulators", "Games", "PlayListDetails", "Playlists"];

/// Open an existing PinUP database.
///
/// The file is never created: a missing database is an error, since an empty
/// one would make every installed table look absent.
pub fn open_database(path: &Path) -> Result<Connection, DbError> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    log::debug!("Opened PinUP database {}", path.display());
    Ok(conn)
}

/// Create the PinUP tables if they don't exist.
///
/// Only the columns read or written by this crate are declared; a real
/// PinUP database carries many more, which the queries ignore.
pub fn create_schema(conn: &Connection) -> Result<(), DbError> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

/// Open an in-memory database with the PinUP schema. Useful for testing.
pub fn open_memory() -> Result<Connection, DbError> {
    let conn = Connection::open_in_memory()?;
    create_schema(&conn)?;
    Ok(conn)
}

/// Quote an identifier for interpolation into SQL.
pub(crate) fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS Emulators (
    EMUID INTEGER PRIMARY KEY,
    EmuName TEXT NOT NULL,
    EmuDisplay TEXT,
    DirGames TEXT,
    DirMedia TEXT,
    Visible INTEGER DEFAULT 1
);

CREATE TABLE IF NOT EXISTS Games (
    GameID INTEGER PRIMARY KEY,
    EMUID INTEGER REFERENCES Emulators(EMUID),
    GameName TEXT,
    GameFileName TEXT,
    GameDisplay TEXT,
    GameVer TEXT,
    ROM TEXT,
    Manufact TEXT,
    GameYear TEXT,
    WEBLinkURL TEXT,
    Visible INTEGER DEFAULT 1
);

CREATE TABLE IF NOT EXISTS Playlists (
    PlayListID INTEGER PRIMARY KEY,
    PlayName TEXT NOT NULL,
    PlayDisplayOrder INTEGER,
    Logo TEXT,
    PlayListSQL TEXT,
    Active INTEGER DEFAULT 1
);

CREATE TABLE IF NOT EXISTS PlayListDetails (
    ID INTEGER PRIMARY KEY,
    PlayListID INTEGER REFERENCES Playlists(PlayListID),
    GameID INTEGER REFERENCES Games(GameID),
    Visible INTEGER DEFAULT 1
);
"#;
