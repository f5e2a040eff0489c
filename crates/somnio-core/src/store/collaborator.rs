//! Persistence operations the similarity engine depends on

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dream::Dream;
use crate::error::Result;
use crate::similarity::SimilarityResult;

/// A SIMILAR_TO relationship between two dreams
///
/// The pair is unordered for identity purposes; `dream1_id` is the dream whose
/// computation produced the edge and the one `shared_themes` is ordered by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityEdge {
    pub dream1_id: String,
    pub dream2_id: String,
    pub similarity: f64,
    pub shared_themes: Vec<String>,
    pub calculated_at: DateTime<Utc>,
}

impl SimilarityEdge {
    /// Edge from `source_id` to the dream named in `result`
    pub fn from_result(source_id: &str, result: SimilarityResult, now: DateTime<Utc>) -> Self {
        SimilarityEdge {
            dream1_id: source_id.to_string(),
            dream2_id: result.dream_id,
            similarity: result.similarity,
            shared_themes: result.shared_themes,
            calculated_at: now,
        }
    }

    /// The pair in canonical (sorted) order, used as the natural key
    pub fn pair_key(&self) -> (&str, &str) {
        if self.dream1_id <= self.dream2_id {
            (&self.dream1_id, &self.dream2_id)
        } else {
            (&self.dream2_id, &self.dream1_id)
        }
    }

    /// Whether this edge touches `dream_id`
    pub fn touches(&self, dream_id: &str) -> bool {
        self.dream1_id == dream_id || self.dream2_id == dream_id
    }
}

/// A related dream read back from stored edges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarDream {
    pub dream: Dream,
    pub similarity: f64,
}

/// One outgoing connection in the network view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConnection {
    pub target_id: String,
    pub similarity: f64,
}

/// A public dream with its strong connections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkNode {
    pub dream: Dream,
    pub connections: Vec<NetworkConnection>,
}

/// One stored relationship between two public dreams
///
/// `source` is the dream whose computation produced the edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkLink {
    pub source: String,
    pub target: String,
    pub similarity: f64,
    pub shared_themes: Vec<String>,
}

/// Graph of public dreams that have at least one relationship
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublicNetwork {
    pub nodes: Vec<Dream>,
    pub links: Vec<NetworkLink>,
}

/// Storage collaborator for dreams and their similarity edges
///
/// Implementations must treat the unordered dream pair as the natural key of
/// an edge so that writing the same pair twice leaves a single edge.
pub trait SimilarityStore: Send + Sync {
    /// All public dreams, in a stable order
    fn fetch_public_dreams(&self) -> Result<Vec<Dream>>;

    fn fetch_dream_by_id(&self, id: &str) -> Result<Option<Dream>>;

    /// Insert or refresh edges in one call
    fn upsert_similarity_edges(&self, edges: &[SimilarityEdge]) -> Result<()>;

    /// Remove every edge touching `dream_id`, in either direction
    fn delete_similarity_edges(&self, dream_id: &str) -> Result<()>;

    fn delete_all_similarity_edges(&self) -> Result<()>;

    /// Public dreams linked to `dream_id` with similarity at or above `min_similarity`,
    /// strongest first
    fn fetch_similar_dreams(&self, dream_id: &str, min_similarity: f64)
        -> Result<Vec<SimilarDream>>;

    /// Every public dream with its connections at or above `min_similarity`
    fn fetch_network(&self, min_similarity: f64) -> Result<Vec<NetworkNode>>;

    /// Every edge whose ends are both public, with the dreams it connects
    fn fetch_public_network(&self) -> Result<PublicNetwork>;
}
