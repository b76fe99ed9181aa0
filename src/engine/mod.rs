//! Query side of the recommender.
//!
//! [`Recommender::build`] runs the whole indexing pipeline once and produces
//! an immutable value that request handlers share behind an `Arc`:
//!
//! ```text
//! items -> vocabulary -> TF-IDF rows -> cosine similarity
//!                                    \-> title / id lookup tables
//! ```
//!
//! Title lookups are exact and the first item carrying a title wins. Ids are
//! the unambiguous key and every result exposes them.

pub mod recommend;
pub mod scorer;
pub mod search;

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use std::time::Instant;

use log::{debug, info, warn};

use crate::document::Item;
use crate::error::{RecommenderError, Result};
use crate::matrix::{SimilarityMatrix, TfIdfMatrix};
use crate::preprocessing::{Tokenizer, build_vocabulary};

pub use scorer::{NormalizedLevenshtein, Scorer, WeightedRatio};
pub use search::{FuzzyMatch, MAX_QUERY_CHARS};

pub const DEFAULT_SEARCH_LIMIT: usize = 5;
pub const DEFAULT_MIN_SCORE: u8 = 60;
pub const DEFAULT_TOP_K: usize = 5;

#[derive(Clone)]
pub struct RecommenderOptions {
    pub search_limit: usize,
    pub min_score: u8,
    pub top_k: usize,
    pub lowercase_tags: bool,
    pub scorer: Arc<dyn Scorer>,
}

impl Default for RecommenderOptions {
    fn default() -> Self {
        Self {
            search_limit: DEFAULT_SEARCH_LIMIT,
            min_score: DEFAULT_MIN_SCORE,
            top_k: DEFAULT_TOP_K,
            lowercase_tags: false,
            scorer: Arc::new(WeightedRatio),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation<'a> {
    pub index: usize,
    pub item: &'a Item,
    pub score: f64,
}

pub struct Recommender {
    items: Vec<Item>,
    titles: Vec<String>,
    features: TfIdfMatrix,
    similarity: SimilarityMatrix,
    by_title: HashMap<String, usize>,
    by_id: HashMap<i64, usize>,
    options: RecommenderOptions,
}

impl Recommender {
    pub fn build(items: Vec<Item>, options: RecommenderOptions) -> Self {
        let start = Instant::now();
        let tokenizer = Tokenizer::new(options.lowercase_tags);

        let terms = build_vocabulary(&items, &tokenizer);
        let features = TfIdfMatrix::build(&items, &terms, &tokenizer);
        info!(
            "TF-IDF matrix built: {} items x {} terms",
            features.len(),
            features.dimension()
        );

        let similarity = SimilarityMatrix::build(&features);

        let mut by_title = HashMap::with_capacity(items.len());
        let mut by_id = HashMap::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            match by_title.entry(item.title.clone()) {
                Entry::Occupied(first) => warn!(
                    "Duplicate title '{}' at position {}, lookups resolve to position {}",
                    item.title,
                    index,
                    first.get()
                ),
                Entry::Vacant(slot) => {
                    slot.insert(index);
                }
            }
            match by_id.entry(item.id) {
                Entry::Occupied(first) => warn!(
                    "Duplicate id {} at position {}, lookups resolve to position {}",
                    item.id,
                    index,
                    first.get()
                ),
                Entry::Vacant(slot) => {
                    slot.insert(index);
                }
            }
        }

        let titles = items.iter().map(|item| item.title.clone()).collect();

        info!(
            "Recommender ready in {:?} (scorer: {}, min score: {}, top k: {})",
            start.elapsed(),
            options.scorer.name(),
            options.min_score,
            options.top_k
        );

        Self {
            items,
            titles,
            features,
            similarity,
            by_title,
            by_id,
            options,
        }
    }

    /// Fuzzy title candidates for free text. Empty text gives an empty list.
    pub fn search_candidates(&self, text: &str) -> Vec<FuzzyMatch> {
        let matches = search::resolve(
            text,
            &self.titles,
            self.options.search_limit,
            self.options.min_score,
            self.options.scorer.as_ref(),
        );
        debug!("search '{}' -> {} candidates", text, matches.len());
        matches
    }

    /// Top-k items similar to the item with exactly this title.
    pub fn get_recommendations(&self, title: &str) -> Result<Vec<Recommendation<'_>>> {
        let index = self
            .position_of_title(title)
            .ok_or_else(|| RecommenderError::NotFound(format!("title '{title}'")))?;
        Ok(self.recommendations_at(index))
    }

    pub fn recommend_by_id(&self, id: i64) -> Result<Vec<Recommendation<'_>>> {
        let index = self
            .position_of_id(id)
            .ok_or_else(|| RecommenderError::NotFound(format!("id {id}")))?;
        Ok(self.recommendations_at(index))
    }

    fn recommendations_at(&self, index: usize) -> Vec<Recommendation<'_>> {
        recommend::top_k(&self.similarity, index, self.options.top_k)
            .into_iter()
            .map(|(other, score)| Recommendation {
                index: other,
                item: &self.items[other],
                score,
            })
            .collect()
    }

    pub fn position_of_title(&self, title: &str) -> Option<usize> {
        self.by_title.get(title).copied()
    }

    pub fn position_of_id(&self, id: i64) -> Option<usize> {
        self.by_id.get(&id).copied()
    }

    pub fn item(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.features.vocabulary
    }

    pub fn features(&self) -> &TfIdfMatrix {
        &self.features
    }

    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }

    pub fn options(&self) -> &RecommenderOptions {
        &self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, title: &str, tags: &str) -> Item {
        Item {
            id,
            title: title.to_string(),
            tags: tags.to_string(),
        }
    }

    fn toy_catalog() -> Vec<Item> {
        vec![
            item(1, "Toy Story", "Animation|Comedy"),
            item(2, "Toy Story 2", "Animation|Comedy"),
            item(3, "Die Hard", "Action|Thriller"),
        ]
    }

    fn titles(recs: &[Recommendation<'_>]) -> Vec<String> {
        recs.iter().map(|r| r.item.title.clone()).collect()
    }

    #[test]
    fn search_then_recommend() {
        let recommender = Recommender::build(toy_catalog(), RecommenderOptions::default());

        let candidates = recommender.search_candidates("toy stry");
        assert!(candidates.iter().any(|c| c.title == "Toy Story"));
        assert!(candidates.iter().all(|c| c.title != "Die Hard"));
        assert!(candidates.iter().all(|c| c.score >= DEFAULT_MIN_SCORE));

        let recs = recommender
            .get_recommendations(&candidates[0].title)
            .expect("exact title");
        assert_eq!(titles(&recs), vec!["Toy Story 2", "Die Hard"]);
        assert!((recs[0].score - 1.0).abs() < 1e-12);
        assert!(recs[0].score > recs[1].score);
    }

    #[test]
    fn unknown_title_is_not_found() {
        let recommender = Recommender::build(toy_catalog(), RecommenderOptions::default());
        let err = recommender.get_recommendations("Nonexistent Movie").unwrap_err();
        assert!(matches!(err, RecommenderError::NotFound(_)));
    }

    #[test]
    fn title_lookup_is_exact() {
        let recommender = Recommender::build(toy_catalog(), RecommenderOptions::default());
        assert!(recommender.get_recommendations("toy story").is_err());
        assert!(recommender.get_recommendations("Toy Story ").is_err());
    }

    #[test]
    fn empty_search_is_empty() {
        let recommender = Recommender::build(toy_catalog(), RecommenderOptions::default());
        assert!(recommender.search_candidates("").is_empty());
    }

    #[test]
    fn lookup_by_id() {
        let recommender = Recommender::build(toy_catalog(), RecommenderOptions::default());
        let recs = recommender.recommend_by_id(3).expect("id 3");

        assert_eq!(recs.len(), 2);
        assert!(recs.iter().all(|r| r.item.id != 3));
        assert!(matches!(
            recommender.recommend_by_id(99),
            Err(RecommenderError::NotFound(_))
        ));
    }

    #[test]
    fn duplicate_titles_resolve_to_first() {
        let catalog = vec![
            item(10, "Heat", "Action|Crime"),
            item(11, "Heat", "Comedy"),
            item(12, "Ronin", "Action|Crime"),
            item(13, "Airplane!", "Comedy"),
        ];
        let recommender = Recommender::build(catalog, RecommenderOptions::default());

        assert_eq!(recommender.position_of_title("Heat"), Some(0));
        let recs = recommender.get_recommendations("Heat").expect("first Heat");
        assert_eq!(recs[0].item.id, 12);
        // Only the queried position is excluded, not its namesake.
        assert!(recs.iter().any(|r| r.index == 1));
        assert!(recs.iter().all(|r| r.index != 0));

        let recs = recommender.recommend_by_id(11).expect("second Heat");
        assert_eq!(recs[0].item.id, 13);
    }

    #[test]
    fn top_k_is_configurable() {
        let catalog: Vec<Item> = (0..10)
            .map(|i| item(i, &format!("Movie {i}"), "Drama"))
            .collect();
        let options = RecommenderOptions {
            top_k: 3,
            ..RecommenderOptions::default()
        };
        let recommender = Recommender::build(catalog, options);
        let recs = recommender.get_recommendations("Movie 4").expect("exists");

        let ids: Vec<i64> = recs.iter().map(|r| r.item.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn empty_catalog_degrades_to_not_found() {
        let recommender = Recommender::build(Vec::new(), RecommenderOptions::default());

        assert!(recommender.is_empty());
        assert!(recommender.vocabulary().is_empty());
        assert!(recommender.search_candidates("toy story").is_empty());
        assert!(matches!(
            recommender.get_recommendations("Toy Story"),
            Err(RecommenderError::NotFound(_))
        ));
    }

    #[test]
    fn lowercase_option_merges_case_variants() {
        let catalog = vec![item(1, "A", "Drama"), item(2, "B", "drama")];

        let sensitive = Recommender::build(catalog.clone(), RecommenderOptions::default());
        assert_eq!(sensitive.vocabulary().len(), 2);
        assert_eq!(sensitive.similarity().get(0, 1), 0.0);

        let options = RecommenderOptions {
            lowercase_tags: true,
            ..RecommenderOptions::default()
        };
        let folded = Recommender::build(catalog, options);
        assert_eq!(folded.vocabulary(), ["drama"]);
        assert!((folded.similarity().get(0, 1) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rebuild_is_identical() {
        let first = Recommender::build(toy_catalog(), RecommenderOptions::default());
        let second = Recommender::build(toy_catalog(), RecommenderOptions::default());

        assert_eq!(first.vocabulary(), second.vocabulary());
        assert_eq!(first.features(), second.features());
        assert_eq!(first.similarity(), second.similarity());
    }
}
