//! N-gram entities and their collection
//!
//! Every candidate expression is an [`NGram`] stored once in an
//! [`NGramTable`](builder::NGramTable) arena. Links between an n-gram and
//! its shorter/longer relatives are recorded as [`NGramId`]s into that same
//! arena, never as owning references.

pub mod builder;

pub use builder::NGramTable;

use rustc_hash::FxHashMap;

/// Index of an n-gram inside its [`NGramTable`]
pub type NGramId = u32;

/// Canonical lookup key of a token span: tokens joined by single spaces
pub fn ngram_key(tokens: &[String]) -> String {
    tokens.join(" ")
}

/// A candidate multiword expression
#[derive(Debug, Clone, PartialEq)]
pub struct NGram {
    /// Canonical key (space-joined tokens)
    pub key: String,
    /// Tokens of the expression, 2..=8 of them
    pub tokens: Vec<String>,
    /// Number of (possibly overlapping) occurrences in the corpus
    pub frequency: usize,
    /// Own cohesion score
    pub glue: f64,
    /// Glue of the boundary-valid (size-1) sub-n-grams, by id
    pub neighbor_glue_shorter: FxHashMap<NGramId, f64>,
    /// Glue of every (size+1) n-gram containing this one as head or tail, by id
    pub neighbor_glue_longer: FxHashMap<NGramId, f64>,
    /// Maximum of `neighbor_glue_shorter`, 0.0 when empty
    pub max_neighbor_glue_shorter: f64,
    /// Maximum of `neighbor_glue_longer`, 0.0 when empty
    pub max_neighbor_glue_longer: f64,
    /// Set by the LocalMaxs classifier
    pub is_relevant_expression: bool,
}

impl NGram {
    /// Create a new n-gram seen once
    pub fn new(tokens: Vec<String>) -> Self {
        Self {
            key: ngram_key(&tokens),
            tokens,
            frequency: 1,
            glue: 0.0,
            neighbor_glue_shorter: FxHashMap::default(),
            neighbor_glue_longer: FxHashMap::default(),
            max_neighbor_glue_shorter: 0.0,
            max_neighbor_glue_longer: 0.0,
            is_relevant_expression: false,
        }
    }

    /// Create an n-gram with an explicit frequency
    pub fn with_frequency(tokens: Vec<String>, frequency: usize) -> Self {
        Self {
            frequency,
            ..Self::new(tokens)
        }
    }

    /// Number of tokens
    pub fn size(&self) -> usize {
        self.tokens.len()
    }

    /// All tokens but the last
    pub fn head(&self) -> &[String] {
        &self.tokens[..self.tokens.len().saturating_sub(1)]
    }

    /// All tokens but the first
    pub fn tail(&self) -> &[String] {
        if self.tokens.is_empty() {
            &self.tokens[..]
        } else {
            &self.tokens[1..]
        }
    }

    /// Forget everything computed by a previous propagation pass
    pub(crate) fn reset_scores(&mut self) {
        self.glue = 0.0;
        self.neighbor_glue_shorter.clear();
        self.neighbor_glue_longer.clear();
        self.max_neighbor_glue_shorter = 0.0;
        self.max_neighbor_glue_longer = 0.0;
        self.is_relevant_expression = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(s: &str) -> Vec<String> {
        s.split(' ').map(String::from).collect()
    }

    #[test]
    fn test_key_and_size() {
        let ngram = NGram::new(toks("quick brown fox"));
        assert_eq!(ngram.key, "quick brown fox");
        assert_eq!(ngram.size(), 3);
        assert_eq!(ngram.frequency, 1);
        assert!(!ngram.is_relevant_expression);
    }

    #[test]
    fn test_head_and_tail() {
        let ngram = NGram::new(toks("quick brown fox"));
        assert_eq!(ngram_key(ngram.head()), "quick brown");
        assert_eq!(ngram_key(ngram.tail()), "brown fox");
    }

    #[test]
    fn test_reset_scores() {
        let mut ngram = NGram::with_frequency(toks("a b"), 4);
        ngram.glue = 0.5;
        ngram.neighbor_glue_longer.insert(3, 0.2);
        ngram.max_neighbor_glue_longer = 0.2;
        ngram.is_relevant_expression = true;

        ngram.reset_scores();

        assert_eq!(ngram.frequency, 4);
        assert_eq!(ngram.glue, 0.0);
        assert!(ngram.neighbor_glue_longer.is_empty());
        assert!(!ngram.is_relevant_expression);
    }
}
