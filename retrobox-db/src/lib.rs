//! Access to the PinUP Popper SQLite database.
//!
//! Reads the installed tables and playlists that the verification engine
//! compares against the archive, and dumps or restores whole database
//! tables for the PinUP database category.

pub mod operations;
pub mod queries;
pub mod schema;

pub use rusqlite::Connection;

pub use operations::{TableDump, clear_table, dump_table, restore_table};
pub use queries::{
    InstalledItem, count_rows, list_playlists, list_tables, table_exists, table_names,
};
pub use schema::{DbError, PINUP_TABLES, open_database, open_memory};
