//! SQLite database schema for somnio

use rusqlite::{Connection, Result};

pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Result of schema creation
#[derive(Debug, PartialEq, Eq)]
pub enum SchemaCreateResult {
    /// Schema already current or freshly created
    Ok,
    /// An incompatible schema was dropped and recreated; stored data is gone
    Recreated,
}

const SCHEMA_SQL: &str = r#"
-- Dream records
CREATE TABLE IF NOT EXISTS dreams (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    tags TEXT NOT NULL DEFAULT '[]',
    emotion TEXT,
    is_public INTEGER NOT NULL DEFAULT 1,
    user_id TEXT NOT NULL,
    date TEXT,
    lucid_dream INTEGER NOT NULL DEFAULT 0,
    recurring INTEGER NOT NULL DEFAULT 0,
    created_at TEXT,
    updated_at TEXT
);
CREATE INDEX IF NOT EXISTS idx_dreams_public ON dreams(is_public);
CREATE INDEX IF NOT EXISTS idx_dreams_user ON dreams(user_id);

-- SIMILAR_TO edges; the unordered pair is the key (dream_a < dream_b)
CREATE TABLE IF NOT EXISTS similarity_edges (
    dream_a TEXT NOT NULL,
    dream_b TEXT NOT NULL,
    source_id TEXT NOT NULL,
    similarity REAL NOT NULL,
    shared_themes TEXT NOT NULL DEFAULT '[]',
    calculated_at TEXT NOT NULL,
    PRIMARY KEY (dream_a, dream_b),
    CHECK (dream_a < dream_b)
);
CREATE INDEX IF NOT EXISTS idx_edges_b ON similarity_edges(dream_b);
CREATE INDEX IF NOT EXISTS idx_edges_similarity ON similarity_edges(similarity);

-- Schema metadata
CREATE TABLE IF NOT EXISTS index_meta (
    key TEXT PRIMARY KEY,
    value TEXT
);
"#;

fn drop_all_tables(conn: &Connection) -> Result<()> {
    conn.execute("DROP TABLE IF EXISTS dreams", [])?;
    conn.execute("DROP TABLE IF EXISTS similarity_edges", [])?;
    conn.execute("DROP TABLE IF EXISTS index_meta", [])?;
    Ok(())
}

fn write_version(conn: &Connection) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO index_meta (key, value) VALUES ('schema_version', ?1)",
        [&CURRENT_SCHEMA_VERSION.to_string()],
    )?;
    Ok(())
}

pub fn create_schema(conn: &Connection) -> Result<SchemaCreateResult> {
    let current_version: Option<i32> = conn
        .query_row(
            "SELECT value FROM index_meta WHERE key = 'schema_version'",
            [],
            |r| r.get::<_, String>(0).map(|s| s.parse().unwrap_or(0)),
        )
        .ok();

    let result = match current_version {
        None => {
            conn.execute_batch(SCHEMA_SQL)?;
            write_version(conn)?;
            SchemaCreateResult::Ok
        }
        Some(v) if v == CURRENT_SCHEMA_VERSION => SchemaCreateResult::Ok,
        Some(v) => {
            drop_all_tables(conn)?;
            conn.execute_batch(SCHEMA_SQL)?;
            write_version(conn)?;
            tracing::warn!(
                "Database schema version {} is incompatible with {}, recreated empty schema",
                v,
                CURRENT_SCHEMA_VERSION
            );
            SchemaCreateResult::Recreated
        }
    };

    Ok(result)
}

#[cfg(test)]
pub fn force_set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO index_meta (key, value) VALUES ('schema_version', ?1)",
        [&version.to_string()],
    )?;
    Ok(())
}
