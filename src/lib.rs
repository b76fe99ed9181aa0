//! Content-based movie recommender.
//!
//! Item tags are turned into TF-IDF vectors, compared pairwise with cosine
//! similarity once at startup, and queried through a fuzzy title search
//! followed by an exact-title (or id) recommendation lookup.

pub mod api;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod matrix;
pub mod preprocessing;

pub use document::{Catalog, Item, Rating};
pub use engine::{FuzzyMatch, Recommendation, Recommender, RecommenderOptions};
pub use error::{RecommenderError, Result};
