use serde::Serialize;

use super::scorer::{Scorer, process};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FuzzyMatch {
    /// Catalog position of the matched title.
    pub index: usize,
    pub title: String,
    pub score: u8,
}

/// Longest normalised query that gets scored; the rest is dropped.
pub const MAX_QUERY_CHARS: usize = 256;

/// Scores `query` against every title and returns at most `limit` matches
/// scoring `min_score` or more, best first. Equal scores keep catalog order.
///
/// A query that is empty once normalised yields no matches. Only the first
/// [`MAX_QUERY_CHARS`] characters of the normalised query are scored.
pub fn resolve<S: AsRef<str>>(
    query: &str,
    titles: &[S],
    limit: usize,
    min_score: u8,
    scorer: &dyn Scorer,
) -> Vec<FuzzyMatch> {
    let query = clamp_query(&process(query));
    if query.is_empty() || limit == 0 {
        return Vec::new();
    }

    let mut matches: Vec<FuzzyMatch> = titles
        .iter()
        .enumerate()
        .filter_map(|(index, title)| {
            let title = title.as_ref();
            let score = scorer.score(&query, &process(title));
            (score >= min_score).then(|| FuzzyMatch {
                index,
                title: title.to_string(),
                score,
            })
        })
        .collect();

    // Stable, so ties stay in catalog order.
    matches.sort_by(|a, b| b.score.cmp(&a.score));
    matches.truncate(limit);
    matches
}

fn clamp_query(query: &str) -> String {
    match query.char_indices().nth(MAX_QUERY_CHARS) {
        Some((end, _)) => query[..end].trim_end().to_string(),
        None => query.to_string(),
    }
}
