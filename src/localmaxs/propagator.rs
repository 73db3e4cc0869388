//! Neighbor-glue propagation
//!
//! Links every n-gram to its head and tail sub-n-grams and records glue
//! values in both directions:
//!
//! - `w.neighbor_glue_shorter[s] = glue(s)` for each boundary-valid sub-n-gram `s`
//! - `s.neighbor_glue_longer[w] = glue(w)` in the other direction
//!
//! Pass 1 only reads the table and emits write requests, so it can run
//! per-entity on the rayon pool. All writes are applied after pass 1 has
//! finished; pass 2 then reduces each entity's neighbour maps to maxima.

use rayon::prelude::*;
use smallvec::SmallVec;

use crate::glue::compute_glue;
use crate::ngram::{NGramId, NGramTable};
use crate::nlp::stopwords::StopwordFilter;
use crate::types::{GlueFunction, LocalMaxsConfig, MAX_NGRAM_SIZE, MIN_NGRAM_SIZE};

/// Pass-1 result for one n-gram
#[derive(Debug, Clone, Default)]
struct EntityUpdate {
    glue: f64,
    /// (sub-n-gram, its glue); at most head and tail
    shorter: SmallVec<[(NGramId, f64); 2]>,
}

/// `target.neighbor_glue_longer[source] = glue`
#[derive(Debug, Clone, Copy)]
struct LongerWrite {
    target: NGramId,
    source: NGramId,
    glue: f64,
}

/// Counters from one propagation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropagationStats {
    /// N-grams scored
    pub ngrams: usize,
    /// Entries written into `neighbor_glue_shorter` maps
    pub shorter_links: usize,
    /// Entries written into `neighbor_glue_longer` maps
    pub longer_links: usize,
}

/// Computes glue and neighbour maxima for a whole table
#[derive(Debug, Clone)]
pub struct GluePropagator {
    function: GlueFunction,
    max_ngram_size: usize,
    parallel: bool,
}

impl Default for GluePropagator {
    fn default() -> Self {
        Self::new(GlueFunction::Scp)
    }
}

impl GluePropagator {
    /// Create a sequential propagator for the given metric
    pub fn new(function: GlueFunction) -> Self {
        Self {
            function,
            max_ngram_size: MAX_NGRAM_SIZE,
            parallel: false,
        }
    }

    /// Create a propagator from an extraction config
    pub fn from_config(cfg: &LocalMaxsConfig) -> Self {
        Self::new(cfg.glue_function)
            .with_max_ngram_size(cfg.max_ngram_size)
            .with_parallel(cfg.parallel)
    }

    /// Largest n-gram size allowed to push its glue into a shorter neighbour
    pub fn with_max_ngram_size(mut self, size: usize) -> Self {
        self.max_ngram_size = size.clamp(MIN_NGRAM_SIZE, MAX_NGRAM_SIZE);
        self
    }

    /// Run pass 1 and pass 2 on the rayon pool
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Metric in use
    pub fn function(&self) -> GlueFunction {
        self.function
    }

    /// Compute `glue`, both neighbour maps and their maxima for every n-gram
    ///
    /// Previous results are discarded first, so re-running on an unchanged
    /// table gives identical values.
    pub fn propagate(&self, table: &mut NGramTable, stopwords: &StopwordFilter) -> PropagationStats {
        for ngram in table.iter_mut() {
            ngram.reset_scores();
        }

        let total_count = table.len();

        // Pass 1: read-only scoring
        let (updates, longer_writes) = {
            let view: &NGramTable = table;
            let results: Vec<(EntityUpdate, SmallVec<[LongerWrite; 2]>)> = if self.parallel {
                (0..total_count as NGramId)
                    .into_par_iter()
                    .map(|id| self.score_entity(view, id, stopwords, total_count))
                    .collect()
            } else {
                (0..total_count as NGramId)
                    .map(|id| self.score_entity(view, id, stopwords, total_count))
                    .collect()
            };

            let mut updates = Vec::with_capacity(results.len());
            let mut writes = Vec::new();
            for (update, entity_writes) in results {
                updates.push(update);
                writes.extend(entity_writes);
            }
            (updates, writes)
        };

        // Barrier: apply every write before any maximum is read
        let mut stats = PropagationStats {
            ngrams: total_count,
            ..PropagationStats::default()
        };
        for (ngram, update) in table.iter_mut().zip(updates) {
            ngram.glue = update.glue;
            for (sub_id, sub_glue) in update.shorter {
                if ngram.neighbor_glue_shorter.insert(sub_id, sub_glue).is_none() {
                    stats.shorter_links += 1;
                }
            }
        }
        for write in &longer_writes {
            if let Some(target) = table.get_mut(write.target) {
                if target
                    .neighbor_glue_longer
                    .insert(write.source, write.glue)
                    .is_none()
                {
                    stats.longer_links += 1;
                }
            }
        }

        // Pass 2: per-entity maxima
        if self.parallel {
            table.as_mut_slice().par_iter_mut().for_each(finalize_maxima);
        } else {
            table.as_mut_slice().iter_mut().for_each(finalize_maxima);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            function = %self.function,
            ngrams = stats.ngrams,
            shorter_links = stats.shorter_links,
            longer_links = stats.longer_links,
            "glue propagated"
        );

        stats
    }

    /// Pass-1 work for a single n-gram
    fn score_entity(
        &self,
        table: &NGramTable,
        id: NGramId,
        stopwords: &StopwordFilter,
        total_count: usize,
    ) -> (EntityUpdate, SmallVec<[LongerWrite; 2]>) {
        let mut update = EntityUpdate::default();
        let mut writes = SmallVec::new();

        let Some(ngram) = table.get(id) else {
            return (update, writes);
        };

        update.glue = compute_glue(ngram, table, self.function, total_count);

        let n = ngram.size();
        if n <= MIN_NGRAM_SIZE {
            return (update, writes);
        }

        for span in [ngram.head(), ngram.tail()] {
            // Boundaries are re-checked here; a like-keyed entity does not
            // make a stopword-bounded span a neighbour.
            if !stopwords.is_valid_boundary(span) {
                continue;
            }
            let Some(sub_id) = table.lookup(span) else {
                continue;
            };
            let Some(sub) = table.get(sub_id) else {
                continue;
            };

            let sub_glue = compute_glue(sub, table, self.function, total_count);
            update.shorter.push((sub_id, sub_glue));

            if n <= self.max_ngram_size {
                writes.push(LongerWrite {
                    target: sub_id,
                    source: id,
                    glue: update.glue,
                });
            }
        }

        (update, writes)
    }
}

/// Reduce both neighbour maps to their maxima (0.0 when empty)
fn finalize_maxima(ngram: &mut crate::ngram::NGram) {
    ngram.max_neighbor_glue_shorter = max_or_zero(ngram.neighbor_glue_shorter.values().copied());
    ngram.max_neighbor_glue_longer = max_or_zero(ngram.neighbor_glue_longer.values().copied());
}

fn max_or_zero(values: impl Iterator<Item = f64>) -> f64 {
    values.reduce(f64::max).unwrap_or(0.0)
}
