use serde::Serialize;

use super::calculation::ComponentScores;
use super::sets::shared_in_order;
use crate::dream::Dream;
use crate::text::extract_keywords;

/// Maximum number of shared keywords reported
pub const MAX_SHARED_KEYWORDS: usize = 5;

/// Why two dreams are considered similar
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityExplanation {
    pub shared_tags: Vec<String>,
    pub shared_keywords: Vec<String>,
    pub same_emotion: bool,
    pub emotion_match: f64,
    pub tag_similarity: f64,
    pub keyword_similarity: f64,
    pub score: f64,
}

/// Explain the score between `a` and `b` from `a`'s point of view
///
/// Unlike the score itself, this does not short-circuit on identical ids.
pub fn explain_similarity(a: &Dream, b: &Dream) -> SimilarityExplanation {
    let keywords_a = extract_keywords(&a.similarity_text());
    let keywords_b = extract_keywords(&b.similarity_text());

    let mut shared_keywords = shared_in_order(&keywords_a, &keywords_b);
    shared_keywords.truncate(MAX_SHARED_KEYWORDS);

    let components = ComponentScores::between(a, b);

    SimilarityExplanation {
        shared_tags: shared_in_order(&a.tags, &b.tags),
        shared_keywords,
        same_emotion: a.emotion == b.emotion,
        emotion_match: components.emotion_similarity,
        tag_similarity: components.tag_similarity,
        keyword_similarity: components.keyword_similarity,
        score: components.weighted(),
    }
}
