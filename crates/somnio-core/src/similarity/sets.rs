use std::collections::HashSet;
use std::hash::Hash;

/// Jaccard similarity of two collections treated as sets
///
/// Duplicates collapse and order is ignored. Two empty inputs score 0.
pub fn jaccard<T: Eq + Hash>(a: &[T], b: &[T]) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }

    let set_a: HashSet<&T> = a.iter().collect();
    let set_b: HashSet<&T> = b.iter().collect();

    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();

    intersection as f64 / union as f64
}

/// Items of `source`, in source order, that also occur in `other`
///
/// A plain filter: duplicates in `source` are kept.
pub fn shared_in_order(source: &[String], other: &[String]) -> Vec<String> {
    source
        .iter()
        .filter(|item| other.contains(item))
        .cloned()
        .collect()
}
