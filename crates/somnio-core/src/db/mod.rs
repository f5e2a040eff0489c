//! SQLite database module for somnio

mod dreams;
mod edges;
mod schema;

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;

use crate::error::{Result, SomnioError};
use crate::map_db_err;

pub use schema::{create_schema, SchemaCreateResult, CURRENT_SCHEMA_VERSION};

/// SQLite database holding dreams and their similarity edges
///
/// The connection sits behind a mutex so one database can be shared between
/// the caller and background similarity tasks.
#[derive(Debug)]
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open or create the database file at `db_path`
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = Connection::open(db_path)
            .map_err(|e| map_db_err!(&format!("open database at {}", db_path.display()), e))?;

        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| map_db_err!("enable WAL mode", e))?;

        Self::from_connection(conn)
    }

    /// Database that lives only as long as the returned value
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| map_db_err!("open in-memory database", e))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        let created = create_schema(&conn)
            .map_err(|e| map_db_err!("create database schema", e))?;
        if created == SchemaCreateResult::Recreated {
            tracing::info!("Database schema was recreated, stored dreams were discarded");
        }
        Ok(Database {
            conn: Mutex::new(conn),
        })
    }

    /// Lock the connection for one unit of work
    pub(crate) fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| SomnioError::collaborator("lock database", "connection mutex poisoned"))
    }

    pub fn get_dream_count(&self) -> Result<i64> {
        self.conn()?
            .query_row("SELECT COUNT(*) FROM dreams", [], |r| r.get(0))
            .map_err(|e| map_db_err!("count dreams", e))
    }

    pub fn get_edge_count(&self) -> Result<i64> {
        self.conn()?
            .query_row("SELECT COUNT(*) FROM similarity_edges", [], |r| r.get(0))
            .map_err(|e| map_db_err!("count similarity edges", e))
    }

    pub fn get_schema_version(&self) -> Result<i32> {
        self.conn()?
            .query_row(
                "SELECT value FROM index_meta WHERE key = 'schema_version'",
                [],
                |r| {
                    let s: String = r.get(0)?;
                    Ok(s.parse().unwrap_or(0))
                },
            )
            .map_err(|e| map_db_err!("read schema version", e))
    }
}

impl Drop for Database {
    fn drop(&mut self) {
        // Fold the WAL back into the main file before the connection closes
        if let Ok(conn) = self.conn.get_mut() {
            let _ = conn.pragma_update(None, "wal_checkpoint", "TRUNCATE");
        }
    }
}
