use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::dream::{Dream, DreamUpdate, Emotion};
use crate::error::Result;
use crate::map_db_err;

const DREAM_COLUMNS: &str = "id, title, description, tags, emotion, is_public, user_id, date, \
     lucid_dream, recurring, created_at, updated_at";

const DATE_FORMAT: &str = "%Y-%m-%d";

fn conversion_error(
    column: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(err))
}

fn parse_timestamp(column: usize, value: Option<String>) -> rusqlite::Result<Option<DateTime<Utc>>> {
    value
        .map(|s| {
            DateTime::parse_from_rfc3339(&s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| conversion_error(column, e))
        })
        .transpose()
}

/// Dream columns prefixed with a table alias, for joins
pub(super) fn qualified_columns(alias: &str) -> String {
    DREAM_COLUMNS
        .split(", ")
        .map(|column| format!("{}.{}", alias, column))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Map a row whose first columns follow [`DREAM_COLUMNS`] to a dream
pub(super) fn dream_from_row(row: &Row<'_>) -> rusqlite::Result<Dream> {
    let tags_json: String = row.get(3)?;
    let tags: Vec<String> =
        serde_json::from_str(&tags_json).map_err(|e| conversion_error(3, e))?;

    let date = row
        .get::<_, Option<String>>(7)?
        .map(|s| NaiveDate::parse_from_str(&s, DATE_FORMAT).map_err(|e| conversion_error(7, e)))
        .transpose()?;

    Ok(Dream {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        tags,
        emotion: row.get::<_, Option<String>>(4)?.map(Emotion::from),
        is_public: row.get::<_, i64>(5)? != 0,
        user_id: row.get(6)?,
        date,
        lucid_dream: row.get::<_, i64>(8)? != 0,
        recurring: row.get::<_, i64>(9)? != 0,
        created_at: parse_timestamp(10, row.get(10)?)?,
        updated_at: parse_timestamp(11, row.get(11)?)?,
    })
}

fn write_dream(conn: &Connection, dream: &Dream) -> Result<()> {
    let tags_json = serde_json::to_string(&dream.tags)?;
    conn.execute(
        &format!(
            "INSERT INTO dreams ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
             ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                tags = excluded.tags,
                emotion = excluded.emotion,
                is_public = excluded.is_public,
                user_id = excluded.user_id,
                date = excluded.date,
                lucid_dream = excluded.lucid_dream,
                recurring = excluded.recurring,
                created_at = excluded.created_at,
                updated_at = excluded.updated_at",
            DREAM_COLUMNS
        ),
        params![
            dream.id,
            dream.title,
            dream.description,
            tags_json,
            dream.emotion.as_ref().map(|e| e.as_str()),
            dream.is_public as i64,
            dream.user_id,
            dream.date.map(|d| d.format(DATE_FORMAT).to_string()),
            dream.lucid_dream as i64,
            dream.recurring as i64,
            dream.created_at.map(|t| t.to_rfc3339()),
            dream.updated_at.map(|t| t.to_rfc3339()),
        ],
    )
    .map_err(|e| map_db_err!(&format!("write dream {}", dream.id), e))?;
    Ok(())
}

pub(super) fn select_dream(conn: &Connection, id: &str) -> Result<Option<Dream>> {
    conn.query_row(
        &format!("SELECT {} FROM dreams WHERE id = ?1", DREAM_COLUMNS),
        params![id],
        dream_from_row,
    )
    .optional()
    .map_err(|e| map_db_err!(&format!("read dream {}", id), e))
}

pub(super) fn select_dreams(conn: &Connection, where_clause: &str) -> Result<Vec<Dream>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {} FROM dreams {} ORDER BY created_at, id",
            DREAM_COLUMNS, where_clause
        ))
        .map_err(|e| map_db_err!("prepare dream query", e))?;

    let dreams = stmt
        .query_map([], dream_from_row)
        .map_err(|e| map_db_err!("query dreams", e))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| map_db_err!("read dream row", e))?;

    Ok(dreams)
}

impl super::Database {
    /// Insert a new dream; fails if the id is already taken
    pub fn insert_dream(&self, dream: &Dream) -> Result<()> {
        let conn = self.conn()?;
        if select_dream(&conn, &dream.id)?.is_some() {
            crate::bail_invalid!("dream id (already exists)", &dream.id);
        }
        write_dream(&conn, dream)?;
        tracing::debug!(dream_id = %dream.id, "Inserted dream");
        Ok(())
    }

    pub fn get_dream(&self, id: &str) -> Result<Option<Dream>> {
        let conn = self.conn()?;
        select_dream(&conn, id)
    }

    /// Apply `update` to the stored dream and return the result, `None` if absent
    pub fn update_dream(
        &self,
        id: &str,
        update: &DreamUpdate,
        now: DateTime<Utc>,
    ) -> Result<Option<Dream>> {
        let conn = self.conn()?;
        let Some(mut dream) = select_dream(&conn, id)? else {
            return Ok(None);
        };
        update.apply_to(&mut dream, now);
        write_dream(&conn, &dream)?;
        tracing::debug!(dream_id = %id, "Updated dream");
        Ok(Some(dream))
    }

    /// Delete a dream together with every edge touching it
    ///
    /// Returns whether the dream existed.
    pub fn delete_dream(&self, id: &str) -> Result<bool> {
        let mut conn = self.conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| map_db_err!("start transaction", e))?;

        tx.execute(
            "DELETE FROM similarity_edges WHERE dream_a = ?1 OR dream_b = ?1",
            params![id],
        )
        .map_err(|e| map_db_err!(&format!("delete edges of {}", id), e))?;
        let deleted = tx
            .execute("DELETE FROM dreams WHERE id = ?1", params![id])
            .map_err(|e| map_db_err!(&format!("delete dream {}", id), e))?;

        tx.commit()
            .map_err(|e| map_db_err!("commit transaction", e))?;

        tracing::debug!(dream_id = %id, deleted, "Deleted dream");
        Ok(deleted > 0)
    }

    /// All dreams ordered by creation time, optionally only public ones
    pub fn list_dreams(&self, public_only: bool) -> Result<Vec<Dream>> {
        let where_clause = if public_only { "WHERE is_public = 1" } else { "" };
        let conn = self.conn()?;
        select_dreams(&conn, where_clause)
    }
}
