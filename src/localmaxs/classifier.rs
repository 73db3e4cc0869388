//! LocalMaxs decision rule
//!
//! An n-gram is a relevant expression when its glue reaches the
//! generalized mean of its best shorter and best longer neighbour:
//!
//! ```text
//! threshold = ((max_shorter^p + max_longer^p) / 2)^(1/p)
//! relevant  = glue >= threshold && frequency > frequency_floor
//! ```
//!
//! An n-gram without any valid neighbour has a threshold of 0.0 and is
//! relevant as soon as its glue is non-negative and it is frequent enough.
//!
//! Mutual information can make a neighbour maximum negative, where the
//! generalized mean is undefined for most `p`. When either maximum is
//! negative the threshold is the larger of the two, so the n-gram must
//! still beat both neighbours.

use crate::ngram::{NGram, NGramTable};
use crate::types::LocalMaxsConfig;

const DEFAULT_P: f64 = 2.0;

/// Marks n-grams whose glue is a local maximum
#[derive(Debug, Clone)]
pub struct LocalMaxsClassifier {
    /// Generalized-mean exponent
    p: f64,
    /// Frequencies at or below this value are never relevant
    frequency_floor: usize,
}

impl Default for LocalMaxsClassifier {
    fn default() -> Self {
        Self {
            p: DEFAULT_P,
            frequency_floor: 2,
        }
    }
}

impl LocalMaxsClassifier {
    /// Create a classifier with p = 2 and a frequency floor of 2
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a classifier from an extraction config
    pub fn from_config(cfg: &LocalMaxsConfig) -> Self {
        Self {
            p: checked_p(cfg.p),
            frequency_floor: cfg.frequency_floor,
        }
    }

    /// Set the generalized-mean exponent
    ///
    /// Values that are not finite and positive fall back to 2.
    pub fn with_p(mut self, p: f64) -> Self {
        self.p = checked_p(p);
        self
    }

    /// Generalized-mean exponent in use
    pub fn p(&self) -> f64 {
        self.p
    }

    /// Set the frequency floor
    pub fn with_frequency_floor(mut self, floor: usize) -> Self {
        self.frequency_floor = floor;
        self
    }

    /// Generalized mean of the two neighbour maxima
    ///
    /// Falls back to `max(max_shorter, max_longer)` when either is negative.
    pub fn threshold(&self, max_shorter: f64, max_longer: f64) -> f64 {
        if max_shorter < 0.0 || max_longer < 0.0 {
            return max_shorter.max(max_longer);
        }
        ((max_shorter.powf(self.p) + max_longer.powf(self.p)) / 2.0).powf(1.0 / self.p)
    }

    /// Apply the decision rule to a propagated n-gram
    pub fn is_relevant(&self, ngram: &NGram) -> bool {
        let threshold = self.threshold(ngram.max_neighbor_glue_shorter, ngram.max_neighbor_glue_longer);
        ngram.glue >= threshold && ngram.frequency > self.frequency_floor
    }

    /// Classify every n-gram of a propagated table, returning the relevant count
    pub fn classify(&self, table: &mut NGramTable) -> usize {
        let mut relevant = 0;
        for ngram in table.iter_mut() {
            ngram.is_relevant_expression = self.is_relevant(ngram);
            if ngram.is_relevant_expression {
                relevant += 1;
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            ngrams = table.len(),
            relevant,
            p = self.p,
            frequency_floor = self.frequency_floor,
            "localmaxs classification"
        );

        relevant
    }
}

fn checked_p(p: f64) -> f64 {
    if p.is_finite() && p > 0.0 {
        return p;
    }
    #[cfg(feature = "tracing")]
    tracing::warn!(p, fallback = DEFAULT_P, "invalid generalized-mean exponent");
    DEFAULT_P
}
