//! Random sample of relevant expressions for manual evaluation

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::ngram::NGramTable;
use crate::types::LocalMaxsConfig;

/// Draws up to `sample_size` relevant expressions without replacement
#[derive(Debug, Clone)]
pub struct ExpressionSampler {
    sample_size: usize,
    seed: Option<u64>,
}

impl Default for ExpressionSampler {
    fn default() -> Self {
        Self::new(200)
    }
}

impl ExpressionSampler {
    /// Create an entropy-seeded sampler
    pub fn new(sample_size: usize) -> Self {
        Self {
            sample_size,
            seed: None,
        }
    }

    /// Create a sampler from an extraction config
    pub fn from_config(cfg: &LocalMaxsConfig) -> Self {
        Self {
            sample_size: cfg.sample_size,
            seed: cfg.sample_seed,
        }
    }

    /// Fix the seed so repeated runs draw the same sample
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sample relevant expression keys from a classified table
    pub fn sample(&self, table: &NGramTable) -> Vec<String> {
        let mut rng = match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        self.sample_with_rng(table, &mut rng)
    }

    /// Sample with a caller-provided random source
    ///
    /// Returns every relevant expression when there are no more than
    /// `sample_size` of them.
    pub fn sample_with_rng<R: Rng + ?Sized>(&self, table: &NGramTable, rng: &mut R) -> Vec<String> {
        let relevant = table.relevant_keys();
        relevant
            .choose_multiple(rng, self.sample_size.min(relevant.len()))
            .map(|key| key.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ngram::NGram;
    use rustc_hash::FxHashSet;

    fn table_with_relevant(relevant: usize, irrelevant: usize) -> NGramTable {
        let mut table = NGramTable::new();
        for i in 0..relevant + irrelevant {
            let mut ngram = NGram::new(vec![format!("w{i}"), "x".to_string()]);
            ngram.is_relevant_expression = i < relevant;
            table.insert(ngram);
        }
        table
    }

    #[test]
    fn test_returns_all_when_fewer_than_k() {
        let table = table_with_relevant(50, 30);
        let sample = ExpressionSampler::new(200).with_seed(1).sample(&table);

        assert_eq!(sample.len(), 50);
        let unique: FxHashSet<&String> = sample.iter().collect();
        assert_eq!(unique.len(), 50);
    }

    #[test]
    fn test_bounded_without_replacement() {
        let table = table_with_relevant(500, 0);
        let sample = ExpressionSampler::new(200).with_seed(7).sample(&table);

        assert_eq!(sample.len(), 200);
        let unique: FxHashSet<&String> = sample.iter().collect();
        assert_eq!(unique.len(), 200);
        for key in &sample {
            assert!(table.get_by_key(key).unwrap().is_relevant_expression);
        }
    }

    #[test]
    fn test_seeded_sample_is_reproducible() {
        let table = table_with_relevant(300, 10);
        let a = ExpressionSampler::new(20).with_seed(42).sample(&table);
        let b = ExpressionSampler::new(20).with_seed(42).sample(&table);
        assert_eq!(a, b);
    }

    #[test]
    fn test_sampling_does_not_mutate() {
        let table = table_with_relevant(10, 10);
        let before = table.clone();
        let _ = ExpressionSampler::new(5).sample(&table);
        assert_eq!(before.as_slice(), table.as_slice());
    }

    #[test]
    fn test_empty_and_zero() {
        assert!(ExpressionSampler::new(10).sample(&NGramTable::new()).is_empty());
        assert!(ExpressionSampler::new(0).sample(&table_with_relevant(5, 0)).is_empty());
    }
}
