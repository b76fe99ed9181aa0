pub mod similarity;

use std::collections::{BTreeMap, HashMap};

use sprs::{CsMat, CsVecView, TriMat};

use crate::document::Item;
use crate::preprocessing::Tokenizer;

pub use similarity::SimilarityMatrix;

/// TF-IDF feature vectors, one L2-normalised row per catalog item.
#[derive(Debug, Clone, PartialEq)]
pub struct TfIdfMatrix {
    pub terms: HashMap<String, usize>,
    pub vocabulary: Vec<String>,
    pub matrix: CsMat<f64>,
    pub idf: Vec<f64>,
    /// Row norms before normalisation. Zero means the tags produced no term.
    pub magnitudes: Vec<f64>,
}

impl TfIdfMatrix {
    pub fn build(items: &[Item], terms: &HashMap<String, usize>, tokenizer: &Tokenizer) -> Self {
        let n_items = items.len();
        let n_terms = terms.len();

        let mut df = vec![0usize; n_terms];
        let mut triplets = Vec::new(); // (item_index, term_index, tf)

        for (item_index, item) in items.iter().enumerate() {
            let mut term_counts: BTreeMap<usize, usize> = BTreeMap::new();
            let mut total_terms = 0;

            for token in tokenizer.tokenize(&item.tags) {
                if let Some(&term_index) = terms.get(&token) {
                    *term_counts.entry(term_index).or_insert(0) += 1;
                    total_terms += 1;
                }
            }

            for (term_index, count) in term_counts {
                df[term_index] += 1;
                let tf = count as f64 / total_terms as f64;
                triplets.push((item_index, term_index, tf));
            }
        }

        // Smoothed: a term present in every row still gets weight 1.
        let idf: Vec<f64> = df
            .iter()
            .map(|&df| ((1 + n_items) as f64 / (1 + df) as f64).ln() + 1.0)
            .collect();

        let mut tri_mat = TriMat::new((n_items, n_terms));
        for (row, col, tf) in triplets {
            tri_mat.add_triplet(row, col, tf * idf[col]);
        }

        let mut matrix: CsMat<f64> = tri_mat.to_csr();

        let mut magnitudes = Vec::with_capacity(n_items);
        for mut row in matrix.outer_iterator_mut() {
            let norm = row.iter().map(|(_, v)| v * v).sum::<f64>().sqrt();
            if norm > 0.0 {
                for (_, value) in row.iter_mut() {
                    *value /= norm;
                }
            }
            magnitudes.push(norm);
        }

        let mut vocabulary = vec![String::new(); n_terms];
        for (term, &index) in terms {
            vocabulary[index] = term.clone();
        }

        Self {
            terms: terms.clone(),
            vocabulary,
            matrix,
            idf,
            magnitudes,
        }
    }

    pub fn len(&self) -> usize {
        self.matrix.rows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dimension(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn row(&self, index: usize) -> Option<CsVecView<'_, f64>> {
        self.matrix.outer_view(index)
    }

    pub fn is_zero(&self, index: usize) -> bool {
        self.magnitudes.get(index).is_none_or(|&m| m == 0.0)
    }
}
