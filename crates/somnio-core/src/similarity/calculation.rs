use serde::Serialize;

use super::emotion::emotion_similarity;
use super::sets::jaccard;
use crate::dream::Dream;
use crate::text::extract_keywords;

/// Weight of the tag overlap component
pub const TAG_WEIGHT: f64 = 0.50;

/// Weight of the keyword overlap component
pub const KEYWORD_WEIGHT: f64 = 0.35;

/// Weight of the emotion component
pub const EMOTION_WEIGHT: f64 = 0.15;

/// Individual component scores for a dream pair
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentScores {
    pub tag_similarity: f64,
    pub keyword_similarity: f64,
    pub emotion_similarity: f64,
}

impl ComponentScores {
    /// Compute the three components for a pair of dreams
    pub fn between(a: &Dream, b: &Dream) -> Self {
        let keywords_a = extract_keywords(&a.similarity_text());
        let keywords_b = extract_keywords(&b.similarity_text());

        ComponentScores {
            tag_similarity: jaccard(&a.tags, &b.tags),
            keyword_similarity: jaccard(&keywords_a, &keywords_b),
            emotion_similarity: emotion_similarity(a.emotion.as_ref(), b.emotion.as_ref()),
        }
    }

    /// Weighted combination of the components
    pub fn weighted(&self) -> f64 {
        (self.tag_similarity * TAG_WEIGHT)
            + (self.keyword_similarity * KEYWORD_WEIGHT)
            + (self.emotion_similarity * EMOTION_WEIGHT)
    }
}

/// Overall similarity between two dreams in `[0, 1]`
///
/// A dream compared with itself (same id) scores 0.
pub fn calculate_similarity(a: &Dream, b: &Dream) -> f64 {
    if a.id == b.id {
        return 0.0;
    }

    ComponentScores::between(a, b).weighted()
}
