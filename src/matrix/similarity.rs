use std::time::Instant;

use log::info;

use super::TfIdfMatrix;

/// Pairwise cosine similarity between feature rows.
///
/// Only the upper triangle (diagonal included) is stored, row-major, so each
/// pair is computed once and `get(i, j)` and `get(j, i)` read the same value.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    n: usize,
    values: Vec<f64>,
}

impl SimilarityMatrix {
    pub fn build(features: &TfIdfMatrix) -> Self {
        let start = Instant::now();
        let n = features.len();

        let rows: Vec<_> = features.matrix.outer_iterator().collect();
        let mut values = Vec::with_capacity(n * (n + 1) / 2);

        for i in 0..n {
            let zero_i = features.is_zero(i);
            values.push(if zero_i { 0.0 } else { 1.0 });

            for j in (i + 1)..n {
                let sim = if zero_i || features.is_zero(j) {
                    0.0
                } else {
                    // Rows are unit length, the dot product is the cosine.
                    rows[i].dot(&rows[j]).clamp(-1.0, 1.0)
                };
                values.push(sim);
            }
        }

        info!(
            "Similarity matrix built for {} items ({} stored values) in {:?}",
            n,
            values.len(),
            start.elapsed()
        );

        Self { n, values }
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Panics if either index is out of bounds.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.n && j < self.n, "index ({i}, {j}) out of bounds for {}", self.n);
        let (lo, hi) = if i <= j { (i, j) } else { (j, i) };
        self.values[self.row_offset(lo) + (hi - lo)]
    }

    pub fn row(&self, i: usize) -> impl ExactSizeIterator<Item = f64> + '_ {
        (0..self.n).map(move |j| self.get(i, j))
    }

    fn row_offset(&self, i: usize) -> usize {
        i * (2 * self.n - i + 1) / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Item;
    use crate::preprocessing::{Tokenizer, build_vocabulary};

    fn similarity(tags: &[&str]) -> SimilarityMatrix {
        let items: Vec<Item> = tags
            .iter()
            .enumerate()
            .map(|(i, t)| Item {
                id: i as i64,
                title: format!("movie {i}"),
                tags: t.to_string(),
            })
            .collect();
        let tokenizer = Tokenizer::default();
        let terms = build_vocabulary(&items, &tokenizer);
        SimilarityMatrix::build(&TfIdfMatrix::build(&items, &terms, &tokenizer))
    }

    #[test]
    fn identical_tags_are_fully_similar() {
        let sim = similarity(&["Animation|Comedy", "Animation|Comedy", "Action|Thriller"]);

        assert!((sim.get(0, 1) - 1.0).abs() < 1e-12);
        assert_eq!(sim.get(0, 2), 0.0);
        assert_eq!(sim.get(1, 2), 0.0);
    }

    #[test]
    fn matrix_is_symmetric_with_unit_diagonal() {
        let sim = similarity(&[
            "Adventure|Animation|Children|Comedy|Fantasy",
            "Adventure|Children|Fantasy",
            "Comedy|Romance",
            "Comedy|Drama|Romance",
            "Action|Crime|Thriller",
        ]);

        for i in 0..sim.len() {
            assert_eq!(sim.get(i, i), 1.0);
            for j in 0..sim.len() {
                assert_eq!(sim.get(i, j), sim.get(j, i));
                let v = sim.get(i, j);
                assert!((-1.0..=1.0).contains(&v), "value {v} out of range");
            }
        }
    }

    #[test]
    fn partial_overlap_is_between_zero_and_one() {
        let sim = similarity(&["Comedy|Romance", "Comedy|Drama"]);
        let v = sim.get(0, 1);
        assert!(v > 0.0 && v < 1.0);
    }

    #[test]
    fn zero_magnitude_rows_score_zero() {
        let sim = similarity(&["Comedy", "", "Comedy"]);

        assert_eq!(sim.get(1, 1), 0.0);
        assert_eq!(sim.get(0, 1), 0.0);
        assert_eq!(sim.get(1, 2), 0.0);
        assert!((sim.get(0, 2) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn row_matches_get() {
        let sim = similarity(&["A|B", "B|C", "C|D", "A"]);
        let row: Vec<f64> = sim.row(2).collect();

        assert_eq!(row.len(), 4);
        for (j, v) in row.iter().enumerate() {
            assert_eq!(*v, sim.get(2, j));
        }
    }

    #[test]
    fn empty_features_give_empty_matrix() {
        let sim = similarity(&[]);
        assert!(sim.is_empty());
        assert_eq!(sim.row(0).count(), 0);
    }

    #[test]
    fn build_is_deterministic() {
        let tags = ["Crime|Drama", "Drama|Romance|War", "Crime|Thriller", "Drama"];
        assert_eq!(similarity(&tags), similarity(&tags));
    }
}
