use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

use regex::Regex;

use crate::document::Item;

static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9]+").expect("token pattern is valid"));

/// Splits a tags field into alphanumeric runs. Case is preserved unless
/// `lowercase` is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tokenizer {
    pub lowercase: bool,
}

impl Tokenizer {
    pub fn new(lowercase: bool) -> Self {
        Tokenizer { lowercase }
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        TOKEN_PATTERN
            .find_iter(text)
            .map(|m| {
                if self.lowercase {
                    m.as_str().to_lowercase()
                } else {
                    m.as_str().to_string()
                }
            })
            .collect()
    }
}

/// Union of all tag tokens, indexed by lexicographic rank.
pub fn build_vocabulary(items: &[Item], tokenizer: &Tokenizer) -> HashMap<String, usize> {
    let mut terms = BTreeSet::new();

    for item in items {
        terms.extend(tokenizer.tokenize(&item.tags));
    }

    terms
        .into_iter()
        .enumerate()
        .map(|(i, term)| (term, i))
        .collect()
}
