// Corpus-wide keyword extraction: frequency tally over every input text,
// ranked by descending count with first-encountered order breaking ties.
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Ranked output is capped at the top 20 tokens.
pub const MAX_KEYWORDS: usize = 20;

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{L}\p{N}]+").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCount {
    pub word: String,
    pub count: usize,
}

/// Tokenize the whole corpus, drop noise tokens (length <= 2, stop words,
/// purely numeric) and return the most frequent remainder.
pub fn extract_keywords(texts: &[String], stop_words: &HashSet<String>) -> Vec<KeywordCount> {
    // (count, first-seen rank) per token
    let mut tally: HashMap<String, (usize, usize)> = HashMap::new();
    let mut next_rank = 0usize;

    for text in texts {
        let lower = text.to_lowercase();
        for token in WORD_RE.find_iter(&lower) {
            let token = token.as_str();
            if token.chars().count() <= 2 {
                continue;
            }
            if stop_words.contains(token) {
                continue;
            }
            if token.chars().all(|c| c.is_numeric()) {
                continue;
            }
            let entry = tally.entry(token.to_string()).or_insert_with(|| {
                let rank = next_rank;
                next_rank += 1;
                (0, rank)
            });
            entry.0 += 1;
        }
    }

    let mut ranked: Vec<(String, usize, usize)> = tally
        .into_iter()
        .map(|(word, (count, rank))| (word, count, rank))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked.truncate(MAX_KEYWORDS);

    ranked
        .into_iter()
        .map(|(word, count, _)| KeywordCount { word, count })
        .collect()
}
