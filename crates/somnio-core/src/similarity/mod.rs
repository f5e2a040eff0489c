//! Similarity engine for scoring dream pairs and selecting related dreams
//!
//! The score is a fixed weighted sum of three components: tag overlap
//! (Jaccard), keyword overlap (Jaccard over extracted keywords) and emotion
//! closeness.

mod calculation;

mod emotion;

mod explain;

mod finder;

mod sets;

pub use calculation::{
    calculate_similarity, ComponentScores, EMOTION_WEIGHT, KEYWORD_WEIGHT, TAG_WEIGHT,
};
pub use emotion::emotion_similarity;
pub use explain::{explain_similarity, SimilarityExplanation, MAX_SHARED_KEYWORDS};
pub use finder::find_similar_dreams;
pub use sets::{jaccard, shared_in_order};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Threshold used when a dream is created or updated
pub const DEFAULT_SYNC_THRESHOLD: f64 = 0.2;

/// Threshold used by a full recompute of the corpus
pub const DEFAULT_RECALCULATE_THRESHOLD: f64 = 0.3;

/// Threshold used when reading stored relationships for display
pub const DEFAULT_READ_THRESHOLD: f64 = 0.7;

/// A candidate that cleared the threshold for some target dream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityResult {
    /// The other dream's id
    pub dream_id: String,
    /// Score rounded to three decimals
    pub similarity: f64,
    /// Target tags also present on the other dream, in target order
    pub shared_themes: Vec<String>,
}

/// Round a score to three decimal places
pub fn round_score(score: f64) -> f64 {
    (score * 1000.0).round() / 1000.0
}

/// Validate a caller-supplied threshold, falling back to `default` when absent
pub fn resolve_threshold(threshold: Option<f64>, default: f64) -> Result<f64> {
    let value = threshold.unwrap_or(default);
    if !(0.0..=1.0).contains(&value) {
        crate::bail_invalid!("similarity threshold (expected 0.0-1.0)", value);
    }
    Ok(value)
}
