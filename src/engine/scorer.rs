//! Approximate string scorers used to match free text against titles.
//!
//! Scorers expect input already passed through [`process`] and return an
//! integer score in `0..=100`.

use std::collections::BTreeSet;

use rapidfuzz::distance::indel;
use strsim::normalized_levenshtein;

pub trait Scorer: Send + Sync {
    fn score(&self, query: &str, choice: &str) -> u8;

    fn name(&self) -> &'static str;
}

/// Lowercases, turns every non-alphanumeric character into a space and trims.
pub fn process(text: &str) -> String {
    let mapped: String = text
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    mapped.to_lowercase().trim().to_string()
}

/// Best of plain, partial and token-based ratios, scaled by how different the
/// two lengths are. Tolerates typos, reordered words and substrings.
#[derive(Debug, Default, Clone, Copy)]
pub struct WeightedRatio;

const UNBASE_SCALE: f64 = 0.95;

impl Scorer for WeightedRatio {
    fn score(&self, query: &str, choice: &str) -> u8 {
        to_score(weighted_ratio(query, choice))
    }

    fn name(&self) -> &'static str {
        "weighted"
    }
}

/// Levenshtein distance normalised by the longer length.
#[derive(Debug, Default, Clone, Copy)]
pub struct NormalizedLevenshtein;

impl Scorer for NormalizedLevenshtein {
    fn score(&self, query: &str, choice: &str) -> u8 {
        to_score(normalized_levenshtein(query, choice) * 100.0)
    }

    fn name(&self) -> &'static str {
        "levenshtein"
    }
}

fn to_score(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

pub fn weighted_ratio(a: &str, b: &str) -> f64 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    if a_chars.is_empty() || b_chars.is_empty() {
        return 0.0;
    }

    let base = indel_ratio(&a_chars, &b_chars);

    let (short, long) = if a_chars.len() <= b_chars.len() {
        (a_chars.len(), b_chars.len())
    } else {
        (b_chars.len(), a_chars.len())
    };
    let len_ratio = long as f64 / short as f64;

    if len_ratio < 1.5 {
        let token = token_sort_ratio(a, b).max(token_set_ratio(a, b));
        return base.max(token * UNBASE_SCALE);
    }

    let partial_scale = if len_ratio < 8.0 { 0.9 } else { 0.6 };
    let best = base.max(best_window_ratio(&a_chars, &b_chars) * partial_scale);
    let partial_token = partial_token_sort_ratio(a, b).max(partial_token_set_ratio(a, b));
    best.max(partial_token * UNBASE_SCALE * partial_scale)
}

/// Normalised indel similarity, `2 * LCS / (|a| + |b|)`, on a 0..100 scale.
pub fn ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    indel::normalized_similarity(a.chars(), b.chars()) * 100.0
}

/// Best ratio between the shorter string and any full-width window of the
/// longer one.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    best_window_ratio(&a, &b)
}

pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

pub fn partial_token_sort_ratio(a: &str, b: &str) -> f64 {
    partial_ratio(&sorted_tokens(a), &sorted_tokens(b))
}

pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    token_set(a, b, ratio)
}

pub fn partial_token_set_ratio(a: &str, b: &str) -> f64 {
    token_set(a, b, partial_ratio)
}

fn token_set(a: &str, b: &str, scorer: fn(&str, &str) -> f64) -> f64 {
    let a_tokens: BTreeSet<&str> = a.split_whitespace().collect();
    let b_tokens: BTreeSet<&str> = b.split_whitespace().collect();

    let sect = join(a_tokens.intersection(&b_tokens));
    let a_diff = join(a_tokens.difference(&b_tokens));
    let b_diff = join(b_tokens.difference(&a_tokens));

    let combined_a = format!("{sect} {a_diff}").trim().to_string();
    let combined_b = format!("{sect} {b_diff}").trim().to_string();

    scorer(&sect, &combined_a)
        .max(scorer(&sect, &combined_b))
        .max(scorer(&combined_a, &combined_b))
}

fn join<'a, 'b: 'a>(tokens: impl Iterator<Item = &'a &'b str>) -> String {
    tokens.copied().collect::<Vec<_>>().join(" ")
}

fn sorted_tokens(text: &str) -> String {
    let mut tokens: Vec<&str> = text.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn indel_ratio(a: &[char], b: &[char]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    indel::normalized_similarity(a.iter().copied(), b.iter().copied()) * 100.0
}

fn best_window_ratio(a: &[char], b: &[char]) -> f64 {
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return 0.0;
    }

    let mut best = 0.0f64;
    for window in long.windows(short.len()) {
        best = best.max(indel_ratio(short, window));
        if best >= 100.0 {
            return 100.0;
        }
    }
    best
}
