//! Cohesion ("glue") engine
//!
//! Stateless: [`compute_glue`] reads an n-gram and the table it lives in
//! and returns a score without mutating either. Spans missing from the
//! table count as seen once.

pub mod metrics;

pub use metrics::SplitFrequencies;

use crate::ngram::{NGram, NGramTable};
use crate::types::GlueFunction;

impl GlueFunction {
    /// Score a pseudo-bigram split with this metric
    ///
    /// `total_count` is ignored by Dice. [`GlueFunction::Unrecognized`] always scores 0.0.
    pub fn score(&self, freq: SplitFrequencies, total_count: usize) -> f64 {
        match self {
            GlueFunction::Scp => metrics::scp(freq, total_count),
            GlueFunction::Dice => metrics::dice(freq),
            GlueFunction::MutualInformation => metrics::mutual_information(freq, total_count),
            GlueFunction::Unrecognized => 0.0,
        }
    }
}

/// Frequencies of an n-gram and its head/tail spans, smoothed to 1 when absent
///
/// Returns `None` for n-grams of fewer than two tokens.
pub fn split_frequencies(ngram: &NGram, table: &NGramTable) -> Option<SplitFrequencies> {
    if ngram.size() < 2 {
        return None;
    }
    let head = table.frequency_of(ngram.head()).unwrap_or(1);
    let tail = table.frequency_of(ngram.tail()).unwrap_or(1);
    Some(SplitFrequencies::new(ngram.frequency, head, tail))
}

/// Glue of an n-gram under the chosen metric
///
/// `total_count` is the number of distinct n-grams in `table`.
pub fn compute_glue(
    ngram: &NGram,
    table: &NGramTable,
    function: GlueFunction,
    total_count: usize,
) -> f64 {
    match split_frequencies(ngram, table) {
        Some(freq) => function.score(freq, total_count),
        None => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(s: &str) -> Vec<String> {
        s.split(' ').map(String::from).collect()
    }

    /// Hand-built table: "the quick brown" family with known frequencies
    fn table() -> NGramTable {
        let mut table = NGramTable::new();
        table.insert(NGram::with_frequency(toks("the quick"), 60));
        table.insert(NGram::with_frequency(toks("quick brown"), 50));
        table.insert(NGram::with_frequency(toks("brown fox"), 40));
        table.insert(NGram::with_frequency(toks("the quick brown"), 30));
        table.insert(NGram::with_frequency(toks("quick brown fox"), 25));
        table
    }

    #[test]
    fn test_split_frequencies_lookup() {
        let table = table();
        let ngram = table.get_by_key("quick brown fox").unwrap();
        assert_eq!(
            split_frequencies(ngram, &table),
            Some(SplitFrequencies::new(25, 50, 40))
        );
    }

    #[test]
    fn test_missing_spans_smoothed_to_one() {
        let table = table();
        // Neither "quick" nor "brown" exists as an entity
        let ngram = table.get_by_key("quick brown").unwrap();
        assert_eq!(
            split_frequencies(ngram, &table),
            Some(SplitFrequencies::new(50, 1, 1))
        );
    }

    #[test]
    fn test_dice_through_table() {
        let table = table();
        let ngram = table.get_by_key("quick brown fox").unwrap();
        let g = compute_glue(ngram, &table, GlueFunction::Dice, table.len());
        assert!((g - 50.0 / 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_scp_through_table() {
        let table = table();
        let ngram = table.get_by_key("the quick brown").unwrap();
        let g = compute_glue(ngram, &table, GlueFunction::Scp, table.len());
        assert!((g - 900.0 / 3000.0).abs() < 1e-9);
    }

    #[test]
    fn test_unrecognized_scores_zero() {
        let table = table();
        let ngram = table.get_by_key("quick brown fox").unwrap();
        assert_eq!(compute_glue(ngram, &table, GlueFunction::Unrecognized, table.len()), 0.0);
    }

    #[test]
    fn test_short_ngram_scores_zero() {
        let table = table();
        let unigram = NGram::with_frequency(toks("fox"), 9);
        assert_eq!(compute_glue(&unigram, &table, GlueFunction::Dice, table.len()), 0.0);
    }

    #[test]
    fn test_glue_is_pure() {
        let table = table();
        let ngram = table.get_by_key("the quick brown").unwrap();
        let first = compute_glue(ngram, &table, GlueFunction::MutualInformation, table.len());
        let second = compute_glue(ngram, &table, GlueFunction::MutualInformation, table.len());
        assert_eq!(first, second);
        assert_eq!(ngram.glue, 0.0);
    }
}
