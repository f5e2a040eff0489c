//! Configuration type definitions

use serde::{Deserialize, Serialize};

use crate::similarity::{
    DEFAULT_READ_THRESHOLD, DEFAULT_RECALCULATE_THRESHOLD, DEFAULT_SYNC_THRESHOLD,
};

/// Number of edges written per collaborator call during bulk recompute
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Thresholds and batching for relationship maintenance
    #[serde(default)]
    pub similarity: SimilarityConfig,
}

/// Thresholds used by each similarity path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityConfig {
    /// Minimum score stored when a dream is created (default 0.2)
    #[serde(default = "default_sync_threshold")]
    pub create_threshold: f64,

    /// Minimum score stored when a dream is updated (default 0.2)
    #[serde(default = "default_sync_threshold")]
    pub update_threshold: f64,

    /// Default cutoff for a full recompute (default 0.3)
    #[serde(default = "default_recalculate_threshold")]
    pub recalculate_threshold: f64,

    /// Default cutoff when reading relationships back (default 0.7)
    #[serde(default = "default_read_threshold")]
    pub read_threshold: f64,

    /// Edges per upsert call during a full recompute (default 100)
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            create_threshold: default_sync_threshold(),
            update_threshold: default_sync_threshold(),
            recalculate_threshold: default_recalculate_threshold(),
            read_threshold: default_read_threshold(),
            batch_size: default_batch_size(),
        }
    }
}

fn default_sync_threshold() -> f64 {
    DEFAULT_SYNC_THRESHOLD
}

fn default_recalculate_threshold() -> f64 {
    DEFAULT_RECALCULATE_THRESHOLD
}

fn default_read_threshold() -> f64 {
    DEFAULT_READ_THRESHOLD
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}
