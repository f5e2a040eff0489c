use std::collections::HashMap;

use chrono::Utc;
use rusqlite::params;

use super::dreams::{dream_from_row, qualified_columns, select_dreams};
use super::Database;
use crate::dream::Dream;
use crate::error::Result;
use crate::map_db_err;
use crate::store::{
    NetworkConnection, NetworkLink, NetworkNode, PublicNetwork, SimilarDream, SimilarityEdge,
    SimilarityStore,
};

/// Insert or refresh one edge, keyed on the sorted pair
///
/// Rows referencing a missing dream are skipped, so an edge computed just
/// before a dream was deleted never resurrects it.
const UPSERT_EDGE_SQL: &str = "
    INSERT INTO similarity_edges
        (dream_a, dream_b, source_id, similarity, shared_themes, calculated_at)
    SELECT ?1, ?2, ?3, ?4, ?5, ?6
    WHERE EXISTS (SELECT 1 FROM dreams WHERE id = ?1)
      AND EXISTS (SELECT 1 FROM dreams WHERE id = ?2)
    ON CONFLICT(dream_a, dream_b) DO UPDATE SET
        source_id = excluded.source_id,
        similarity = excluded.similarity,
        shared_themes = excluded.shared_themes,
        calculated_at = excluded.calculated_at";

impl Database {
    /// Write a batch of edges in a single transaction
    ///
    /// Returns the number of edges actually stored.
    pub fn upsert_edges(&self, edges: &[SimilarityEdge]) -> Result<usize> {
        if edges.is_empty() {
            return Ok(0);
        }

        let mut conn = self.conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| map_db_err!("start transaction", e))?;

        let mut written = 0;
        {
            let mut stmt = tx
                .prepare(UPSERT_EDGE_SQL)
                .map_err(|e| map_db_err!("prepare edge upsert", e))?;

            for edge in edges {
                let (a, b) = edge.pair_key();
                if a == b {
                    tracing::debug!(dream_id = %a, "Skipping self-referencing edge");
                    continue;
                }
                let themes = serde_json::to_string(&edge.shared_themes)?;
                written += stmt
                    .execute(params![
                        a,
                        b,
                        edge.dream1_id,
                        edge.similarity,
                        themes,
                        edge.calculated_at.to_rfc3339(),
                    ])
                    .map_err(|e| map_db_err!(&format!("write edge {} - {}", a, b), e))?;
            }
        }

        tx.commit()
            .map_err(|e| map_db_err!("commit edge batch", e))?;

        tracing::debug!(requested = edges.len(), written, "Upserted similarity edges");
        Ok(written)
    }

    /// Delete every edge touching `dream_id`; returns how many were removed
    pub fn delete_edges_for(&self, dream_id: &str) -> Result<usize> {
        self.conn()?
            .execute(
                "DELETE FROM similarity_edges WHERE dream_a = ?1 OR dream_b = ?1",
                params![dream_id],
            )
            .map_err(|e| map_db_err!(&format!("delete edges of {}", dream_id), e))
    }

    pub fn delete_all_edges(&self) -> Result<usize> {
        self.conn()?
            .execute("DELETE FROM similarity_edges", [])
            .map_err(|e| map_db_err!("delete all similarity edges", e))
    }

    /// Stored edges touching `dream_id`, strongest first
    pub fn get_edges_for(&self, dream_id: &str) -> Result<Vec<SimilarityEdge>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT dream_a, dream_b, source_id, similarity, shared_themes, calculated_at
                 FROM similarity_edges
                 WHERE dream_a = ?1 OR dream_b = ?1
                 ORDER BY similarity DESC, dream_a, dream_b",
            )
            .map_err(|e| map_db_err!("prepare edge query", e))?;

        let rows = stmt
            .query_map(params![dream_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, f64>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                ))
            })
            .map_err(|e| map_db_err!("query edges", e))?;

        let mut edges = Vec::new();
        for row in rows {
            let (a, b, source, similarity, themes, calculated_at) =
                row.map_err(|e| map_db_err!("read edge row", e))?;
            let other = if source == a { b } else { a };
            let calculated_at = chrono::DateTime::parse_from_rfc3339(&calculated_at)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| map_db_err!("parse edge timestamp", e))?;
            edges.push(SimilarityEdge {
                dream1_id: source,
                dream2_id: other,
                similarity,
                shared_themes: serde_json::from_str(&themes)?,
                calculated_at,
            });
        }

        Ok(edges)
    }

    /// Public dreams linked to `dream_id` at or above `min_similarity`
    pub fn similar_dreams(&self, dream_id: &str, min_similarity: f64) -> Result<Vec<SimilarDream>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {}, e.similarity
             FROM similarity_edges e
             JOIN dreams d
               ON d.id = CASE WHEN e.dream_a = ?1 THEN e.dream_b ELSE e.dream_a END
             WHERE (e.dream_a = ?1 OR e.dream_b = ?1)
               AND e.similarity >= ?2
               AND d.is_public = 1
             ORDER BY e.similarity DESC, d.id",
            qualified_columns("d")
        );
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| map_db_err!("prepare similar dreams query", e))?;

        let similar = stmt
            .query_map(params![dream_id, min_similarity], |row| {
                Ok(SimilarDream {
                    dream: dream_from_row(row)?,
                    similarity: row.get(12)?,
                })
            })
            .map_err(|e| map_db_err!("query similar dreams", e))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| map_db_err!("read similar dream row", e))?;

        Ok(similar)
    }

    /// Public dreams with their connections to other public dreams
    pub fn network(&self, min_similarity: f64) -> Result<Vec<NetworkNode>> {
        let conn = self.conn()?;
        let dreams = select_dreams(&conn, "WHERE is_public = 1")?;

        let mut stmt = conn
            .prepare(
                "SELECT e.dream_a, e.dream_b, e.similarity
                 FROM similarity_edges e
                 JOIN dreams a ON a.id = e.dream_a AND a.is_public = 1
                 JOIN dreams b ON b.id = e.dream_b AND b.is_public = 1
                 WHERE e.similarity >= ?1
                 ORDER BY e.similarity DESC, e.dream_a, e.dream_b",
            )
            .map_err(|e| map_db_err!("prepare network query", e))?;

        let links = stmt
            .query_map(params![min_similarity], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, f64>(2)?,
                ))
            })
            .map_err(|e| map_db_err!("query network edges", e))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| map_db_err!("read network edge row", e))?;

        let mut adjacency: HashMap<String, Vec<NetworkConnection>> = HashMap::new();
        for (a, b, similarity) in links {
            adjacency.entry(a.clone()).or_default().push(NetworkConnection {
                target_id: b.clone(),
                similarity,
            });
            adjacency.entry(b).or_default().push(NetworkConnection {
                target_id: a,
                similarity,
            });
        }

        Ok(dreams
            .into_iter()
            .map(|dream| NetworkNode {
                connections: adjacency.remove(&dream.id).unwrap_or_default(),
                dream,
            })
            .collect())
    }
}

impl Database {
    /// Edges between public dreams with their themes, plus the dreams they join
    ///
    /// Nodes appear in the order they are first reached by a link; dreams
    /// without any public relationship are left out.
    pub fn public_network(&self) -> Result<PublicNetwork> {
        let conn = self.conn()?;
        let dreams = select_dreams(&conn, "WHERE is_public = 1")?;

        let mut stmt = conn
            .prepare(
                "SELECT e.dream_a, e.dream_b, e.source_id, e.similarity, e.shared_themes
                 FROM similarity_edges e
                 JOIN dreams a ON a.id = e.dream_a AND a.is_public = 1
                 JOIN dreams b ON b.id = e.dream_b AND b.is_public = 1
                 ORDER BY e.similarity DESC, e.dream_a, e.dream_b",
            )
            .map_err(|e| map_db_err!("prepare public network query", e))?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, f64>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })
            .map_err(|e| map_db_err!("query public network", e))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| map_db_err!("read public network row", e))?;

        let mut links = Vec::with_capacity(rows.len());
        for (a, b, source, similarity, themes) in rows {
            let target = if source == a { b } else { a };
            links.push(NetworkLink {
                source,
                target,
                similarity,
                shared_themes: serde_json::from_str(&themes)?,
            });
        }

        let mut by_id: HashMap<String, Dream> =
            dreams.into_iter().map(|d| (d.id.clone(), d)).collect();
        let mut nodes = Vec::new();
        for link in &links {
            for id in [&link.source, &link.target] {
                if let Some(dream) = by_id.remove(id) {
                    nodes.push(dream);
                }
            }
        }

        Ok(PublicNetwork { nodes, links })
    }
}

impl SimilarityStore for Database {
    fn fetch_public_dreams(&self) -> Result<Vec<Dream>> {
        self.list_dreams(true)
    }

    fn fetch_dream_by_id(&self, id: &str) -> Result<Option<Dream>> {
        self.get_dream(id)
    }

    fn upsert_similarity_edges(&self, edges: &[SimilarityEdge]) -> Result<()> {
        self.upsert_edges(edges).map(|_| ())
    }

    fn delete_similarity_edges(&self, dream_id: &str) -> Result<()> {
        self.delete_edges_for(dream_id).map(|_| ())
    }

    fn delete_all_similarity_edges(&self) -> Result<()> {
        self.delete_all_edges().map(|_| ())
    }

    fn fetch_similar_dreams(
        &self,
        dream_id: &str,
        min_similarity: f64,
    ) -> Result<Vec<SimilarDream>> {
        self.similar_dreams(dream_id, min_similarity)
    }

    fn fetch_network(&self, min_similarity: f64) -> Result<Vec<NetworkNode>> {
        self.network(min_similarity)
    }

    fn fetch_public_network(&self) -> Result<PublicNetwork> {
        self.public_network()
    }
}
