use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchQuery {
    pub query: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    Ok,
    /// Nothing usable was typed.
    EmptyQuery,
    /// Text was given but no title reached the threshold.
    NoMatch,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Candidate {
    pub id: i64,
    pub title: String,
    pub score: u8,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub status: SearchStatus,
    pub candidates: Vec<Candidate>,
}

/// The selection made from a previous search. `id` wins when both are set.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RecommendQuery {
    pub title: Option<String>,
    pub id: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ItemRef {
    pub id: i64,
    pub title: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendedItem {
    pub id: i64,
    pub title: String,
    pub tags: String,
    pub score: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub query: ItemRef,
    pub recommendations: Vec<RecommendedItem>,
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsResponse {
    pub item_count: usize,
    pub vocabulary_size: usize,
    pub rating_count: usize,
}
