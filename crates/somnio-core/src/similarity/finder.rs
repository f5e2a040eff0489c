use super::calculation::calculate_similarity;
use super::sets::shared_in_order;
use super::{round_score, SimilarityResult};
use crate::dream::Dream;

/// Score `target` against every candidate and keep those at or above `threshold`
///
/// Candidates sharing the target's id are skipped. Results carry the score
/// rounded to three decimals and are sorted by score, highest first; equal
/// scores keep candidate order.
pub fn find_similar_dreams<'a, I>(target: &Dream, candidates: I, threshold: f64) -> Vec<SimilarityResult>
where
    I: IntoIterator<Item = &'a Dream>,
{
    let mut results: Vec<SimilarityResult> = candidates
        .into_iter()
        .filter(|candidate| candidate.id != target.id)
        .filter_map(|candidate| {
            let similarity = calculate_similarity(target, candidate);
            if similarity < threshold {
                return None;
            }
            Some(SimilarityResult {
                dream_id: candidate.id.clone(),
                similarity: round_score(similarity),
                shared_themes: shared_in_order(&target.tags, &candidate.tags),
            })
        })
        .collect();

    results.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    results
}
