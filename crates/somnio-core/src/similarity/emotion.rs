use crate::dream::Emotion;

/// Score for identical labels
pub const SAME_EMOTION: f64 = 1.0;

/// Score for distinct labels within the same group
pub const RELATED_EMOTION: f64 = 0.5;

/// Similarity between two emotion labels
///
/// Identical labels score 1.0, including two absent labels. Distinct labels
/// from the same group score 0.5. Anything else, including labels outside the
/// vocabulary, scores 0.
pub fn emotion_similarity(a: Option<&Emotion>, b: Option<&Emotion>) -> f64 {
    if a == b {
        return SAME_EMOTION;
    }

    match (a.and_then(Emotion::group), b.and_then(Emotion::group)) {
        (Some(group_a), Some(group_b)) if group_a == group_b => RELATED_EMOTION,
        _ => 0.0,
    }
}
