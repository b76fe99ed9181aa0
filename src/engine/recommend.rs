use std::cmp::Ordering;

use crate::matrix::SimilarityMatrix;

/// The `k` indices most similar to `index`, best first, with their scores.
/// The item itself is never part of the result; equal scores are ordered by
/// ascending index.
pub fn top_k(similarity: &SimilarityMatrix, index: usize, k: usize) -> Vec<(usize, f64)> {
    if index >= similarity.len() {
        return Vec::new();
    }

    let mut scores: Vec<(usize, f64)> = similarity
        .row(index)
        .enumerate()
        .filter(|&(other, _)| other != index)
        .collect();

    scores.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then(a.0.cmp(&b.0))
    });
    scores.truncate(k);
    scores
}
