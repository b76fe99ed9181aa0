use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};

use crate::engine::{
    DEFAULT_MIN_SCORE, DEFAULT_SEARCH_LIMIT, DEFAULT_TOP_K, NormalizedLevenshtein,
    RecommenderOptions, Scorer, WeightedRatio,
};

pub const DEFAULT_MOVIES_PATH: &str = "movies.csv";
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScorerKind {
    Weighted,
    Levenshtein,
}

impl ScorerKind {
    pub fn build(self) -> Arc<dyn Scorer> {
        match self {
            ScorerKind::Weighted => Arc::new(WeightedRatio),
            ScorerKind::Levenshtein => Arc::new(NormalizedLevenshtein),
        }
    }
}

/// Content-based movie recommender with fuzzy title search.
#[derive(Debug, Clone, Parser)]
#[command(name = "movie-recommender", version)]
pub struct Config {
    /// Items table (id/movieId, title, tags/genres)
    #[arg(long, env = "RECOMMENDER_MOVIES", default_value = DEFAULT_MOVIES_PATH)]
    pub movies: PathBuf,

    /// Optional ratings table (userId, itemId/movieId, score/rating)
    #[arg(long, env = "RECOMMENDER_RATINGS")]
    pub ratings: Option<PathBuf>,

    #[arg(long, env = "RECOMMENDER_BIND", default_value = DEFAULT_BIND)]
    pub bind: String,

    /// Maximum number of fuzzy candidates per search
    #[arg(long, env = "RECOMMENDER_SEARCH_LIMIT", default_value_t = DEFAULT_SEARCH_LIMIT)]
    pub search_limit: usize,

    /// Candidates scoring below this are dropped
    #[arg(
        long,
        env = "RECOMMENDER_MIN_SCORE",
        default_value_t = DEFAULT_MIN_SCORE,
        value_parser = clap::value_parser!(u8).range(0..=100)
    )]
    pub min_score: u8,

    /// Number of recommendations per request
    #[arg(long, env = "RECOMMENDER_TOP_K", default_value_t = DEFAULT_TOP_K)]
    pub top_k: usize,

    #[arg(long, env = "RECOMMENDER_SCORER", value_enum, default_value_t = ScorerKind::Weighted)]
    pub scorer: ScorerKind,

    /// Fold tag case before building the vocabulary
    #[arg(long, env = "RECOMMENDER_LOWERCASE_TAGS")]
    pub lowercase_tags: bool,
}

impl Config {
    pub fn recommender_options(&self) -> RecommenderOptions {
        RecommenderOptions {
            search_limit: self.search_limit,
            min_score: self.min_score,
            top_k: self.top_k,
            lowercase_tags: self.lowercase_tags,
            scorer: self.scorer.build(),
        }
    }
}
