//! Relationship synchronizer
//!
//! Keeps stored similarity edges in step with dream content. Create and
//! update triggers run in the background and never fail the triggering call;
//! the full recompute is a synchronous administrative operation.

mod task;

pub use task::{BackgroundTask, ErrorSink, TracingErrorSink};

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::SimilarityConfig;
use crate::dream::{Dream, DreamUpdate};
use crate::error::{Result, SomnioError};
use crate::similarity::{
    explain_similarity, find_similar_dreams, resolve_threshold, SimilarityExplanation,
};
use crate::store::{NetworkNode, PublicNetwork, SimilarDream, SimilarityEdge, SimilarityStore};

/// Progress is logged every this many dreams during a full recompute
const PROGRESS_INTERVAL: usize = 10;

/// Counts returned by [`RelationshipSynchronizer::recalculate_all`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecalculateSummary {
    pub processed_count: usize,
    pub relationships_created: usize,
}

/// Score `dream` against the public corpus and store every qualifying edge
///
/// With `clear_first` the dream's existing edges are removed before scoring.
fn sync_dream(
    store: &dyn SimilarityStore,
    dream: &Dream,
    threshold: f64,
    clear_first: bool,
) -> Result<usize> {
    let start = Instant::now();
    tracing::info!(dream_id = %dream.id, "Calculating similarities");

    if clear_first {
        store.delete_similarity_edges(&dream.id)?;
    }

    let candidates = store.fetch_public_dreams()?;
    let results = find_similar_dreams(dream, &candidates, threshold);
    tracing::info!(
        dream_id = %dream.id,
        found = results.len(),
        "Found similar dreams"
    );

    if results.is_empty() {
        return Ok(0);
    }

    let now = Utc::now();
    let edges: Vec<SimilarityEdge> = results
        .into_iter()
        .map(|result| SimilarityEdge::from_result(&dream.id, result, now))
        .collect();
    store.upsert_similarity_edges(&edges)?;

    tracing::info!(dream_id = %dream.id, edges = edges.len(), "Stored similarity edges");
    crate::trace_time!(start, "sync_dream", candidates = candidates.len());
    Ok(edges.len())
}

/// Maintains SIMILAR_TO edges for a store
#[derive(Clone)]
pub struct RelationshipSynchronizer {
    store: Arc<dyn SimilarityStore>,
    config: SimilarityConfig,
    sink: Arc<dyn ErrorSink>,
}

impl RelationshipSynchronizer {
    /// Synchronizer with default thresholds that reports failures via `tracing`
    pub fn new(store: Arc<dyn SimilarityStore>) -> Self {
        Self {
            store,
            config: SimilarityConfig::default(),
            sink: Arc::new(TracingErrorSink),
        }
    }

    pub fn with_config(mut self, config: SimilarityConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_error_sink(mut self, sink: Arc<dyn ErrorSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &SimilarityConfig {
        &self.config
    }

    fn spawn_sync(
        &self,
        operation: &'static str,
        dream: &Dream,
        threshold: f64,
        clear_first: bool,
    ) -> Option<BackgroundTask> {
        let store = Arc::clone(&self.store);
        let dream_owned = dream.clone();
        let spawned = BackgroundTask::spawn(operation, &dream.id, Arc::clone(&self.sink), move || {
            sync_dream(store.as_ref(), &dream_owned, threshold, clear_first)
        });

        match spawned {
            Ok(task) => Some(task),
            Err(e) => {
                self.sink.report(operation, &dream.id, &e);
                None
            }
        }
    }

    /// Schedule similarity computation for a newly created dream
    ///
    /// Returns `None` when nothing was scheduled (private dream, or the
    /// background thread could not be started, which is reported to the sink).
    pub fn on_dream_created(&self, dream: &Dream) -> Option<BackgroundTask> {
        if !dream.is_public {
            tracing::debug!(dream_id = %dream.id, "Private dream, skipping similarity");
            return None;
        }
        self.spawn_sync("create", dream, self.config.create_threshold, false)
    }

    /// Schedule a refresh of the edges touching an updated dream
    ///
    /// Only runs when the dream is public and the update carried a field
    /// that feeds the score.
    pub fn on_dream_updated(
        &self,
        dream_id: &str,
        update: &DreamUpdate,
        dream: &Dream,
    ) -> Option<BackgroundTask> {
        if !dream.is_public || !update.has_significant_changes() {
            tracing::debug!(dream_id, "No similarity-relevant change, skipping");
            return None;
        }
        if dream.id != dream_id {
            tracing::warn!(
                dream_id,
                resulting_id = %dream.id,
                "Updated dream id does not match trigger id"
            );
        }
        self.spawn_sync("update", dream, self.config.update_threshold, true)
    }

    /// Recompute every edge from scratch
    ///
    /// Each unordered pair of public dreams is scored once. All existing
    /// edges are deleted before the new ones are written in batches. A
    /// failure during the batch writes leaves the batches already written in
    /// place; rerunning the recompute restores a consistent edge set.
    pub fn recalculate_all(&self, threshold: Option<f64>) -> Result<RecalculateSummary> {
        let threshold = resolve_threshold(threshold, self.config.recalculate_threshold)?;
        let start = Instant::now();
        tracing::info!(threshold, "Starting similarity recalculation");

        let dreams = self.store.fetch_public_dreams()?;
        let now = Utc::now();

        let mut edges = Vec::new();
        for (i, dream) in dreams.iter().enumerate() {
            let results = find_similar_dreams(dream, &dreams[i + 1..], threshold);
            edges.extend(
                results
                    .into_iter()
                    .map(|result| SimilarityEdge::from_result(&dream.id, result, now)),
            );

            if (i + 1) % PROGRESS_INTERVAL == 0 {
                tracing::debug!(
                    processed = i + 1,
                    total = dreams.len(),
                    "Recalculation progress"
                );
            }
        }

        self.store.delete_all_similarity_edges()?;

        let batch_size = self.config.batch_size.max(1);
        for (batch, chunk) in edges.chunks(batch_size).enumerate() {
            self.store.upsert_similarity_edges(chunk)?;
            tracing::debug!(batch = batch + 1, edges = chunk.len(), "Wrote edge batch");
        }

        let summary = RecalculateSummary {
            processed_count: dreams.len(),
            relationships_created: edges.len(),
        };
        tracing::info!(
            processed = summary.processed_count,
            relationships = summary.relationships_created,
            "Similarity recalculation complete"
        );
        crate::trace_time!(start, "recalculate_all");
        Ok(summary)
    }

    fn require_dream(&self, dream_id: &str) -> Result<Dream> {
        self.store
            .fetch_dream_by_id(dream_id)?
            .ok_or_else(|| SomnioError::not_found("dream", dream_id))
    }

    /// Stored relationships of a dream, strongest first
    pub fn find_similar(
        &self,
        dream_id: &str,
        min_similarity: Option<f64>,
    ) -> Result<Vec<SimilarDream>> {
        let min_similarity = resolve_threshold(min_similarity, self.config.read_threshold)?;
        self.require_dream(dream_id)?;
        self.store.fetch_similar_dreams(dream_id, min_similarity)
    }

    /// Breakdown of why two dreams score the way they do
    pub fn explain(&self, dream_a: &str, dream_b: &str) -> Result<SimilarityExplanation> {
        let a = self.require_dream(dream_a)?;
        let b = self.require_dream(dream_b)?;
        Ok(explain_similarity(&a, &b))
    }

    /// Store a relationship chosen by hand
    pub fn link_dreams(
        &self,
        source_id: &str,
        target_id: &str,
        similarity: f64,
        shared_themes: Vec<String>,
    ) -> Result<SimilarityEdge> {
        if !(0.0..=1.0).contains(&similarity) {
            crate::bail_invalid!("similarity (expected 0.0-1.0)", similarity);
        }
        if source_id == target_id {
            crate::bail_invalid!("link target (a dream cannot link to itself)", target_id);
        }
        self.require_dream(source_id)?;
        self.require_dream(target_id)?;

        let edge = SimilarityEdge {
            dream1_id: source_id.to_string(),
            dream2_id: target_id.to_string(),
            similarity,
            shared_themes,
            calculated_at: Utc::now(),
        };
        self.store
            .upsert_similarity_edges(std::slice::from_ref(&edge))?;
        tracing::info!(source_id, target_id, similarity, "Linked dreams");
        Ok(edge)
    }

    /// Public dreams with their connections at or above the threshold
    pub fn network(&self, min_similarity: Option<f64>) -> Result<Vec<NetworkNode>> {
        let min_similarity = resolve_threshold(min_similarity, self.config.read_threshold)?;
        self.store.fetch_network(min_similarity)
    }

    /// Every relationship between public dreams with its shared themes
    pub fn public_network(&self) -> Result<PublicNetwork> {
        let network = self.store.fetch_public_network()?;
        tracing::debug!(
            nodes = network.nodes.len(),
            links = network.links.len(),
            "Loaded public network"
        );
        Ok(network)
    }
}

#[cfg(test)]
mod tests;
