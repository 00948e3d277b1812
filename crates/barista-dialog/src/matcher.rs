use std::sync::Arc;

use crate::keywords::{Category, KeywordCatalog};

pub const DEFAULT_THRESHOLD: u8 = 80;

/// Fuzzy keyword matcher.
///
/// Scores a transcript against every phrase of a category and returns the
/// best label when it clears the threshold. Candidate ordering: higher score
/// wins; on a score tie the phrase with more words wins (specificity); on a
/// full tie the first entry in catalog order stays, which is why the catalog
/// pins iteration order.
pub struct IntentMatcher {
    catalog: Arc<KeywordCatalog>,
    threshold: u8,
}

impl IntentMatcher {
    pub fn new(catalog: Arc<KeywordCatalog>) -> Self {
        Self {
            catalog,
            threshold: DEFAULT_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold.min(100);
        self
    }

    /// Best matching label for `text` in `category`, or `None` when nothing
    /// clears the threshold. An empty phrase table always yields `None`.
    pub fn best_match(&self, text: &str, category: Category) -> Option<&str> {
        let mut best: Option<(u8, usize, &str)> = None;
        for entry in self.catalog.entries(category) {
            for phrase in &entry.phrases {
                let score = partial_alignment_score(text, phrase);
                let words = phrase.split_whitespace().count();
                let better = match best {
                    None => true,
                    Some((best_score, best_words, _)) => {
                        score > best_score || (score == best_score && words > best_words)
                    }
                };
                if better {
                    best = Some((score, words, entry.label.as_str()));
                }
            }
        }
        best.filter(|(score, _, _)| *score >= self.threshold)
            .map(|(_, _, label)| label)
    }
}

/// Partial-alignment similarity in [0, 100]: the shorter string is scored
/// against its best-aligned equal-length window of the longer one, so a
/// phrase buried in a longer utterance still scores 100.
pub fn partial_alignment_score(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };

    if short.is_empty() {
        return if long.is_empty() { 100 } else { 0 };
    }

    let mut best = 0u8;
    for start in 0..=(long.len() - short.len()) {
        let window = &long[start..start + short.len()];
        let dist = indel_distance(&short, window);
        let total = short.len() + window.len();
        let score = (100.0 * (1.0 - dist as f64 / total as f64)).round() as u8;
        if score > best {
            best = score;
            if best == 100 {
                break;
            }
        }
    }
    best
}

/// Insert/delete edit distance (no substitutions), computed from the longest
/// common subsequence with a rolling row.
fn indel_distance(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for i in 1..=a.len() {
        for j in 1..=b.len() {
            curr[j] = if a[i - 1] == b[j - 1] {
                prev[j - 1] + 1
            } else {
                prev[j].max(curr[j - 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    a.len() + b.len() - 2 * prev[b.len()]
}
