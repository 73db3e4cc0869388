//! N-gram enumeration into an arena
//!
//! [`NGramTable`] stores every n-gram exactly once and maps canonical keys
//! to ids with an FxHashMap, so repeated occurrences only bump a counter.

use rayon::prelude::*;
use rustc_hash::FxHashMap;

use super::{ngram_key, NGram, NGramId};
use crate::nlp::stopwords::StopwordFilter;
use crate::types::{MAX_NGRAM_SIZE, MIN_NGRAM_SIZE};

/// Below this many tokens the parallel builder falls back to a single pass
const PARALLEL_MIN_TOKENS: usize = 20_000;

/// Start positions handled by one parallel chunk
const PARALLEL_CHUNK: usize = 4_096;

/// Owned collection of all n-grams of a corpus
#[derive(Debug, Clone, Default)]
pub struct NGramTable {
    /// Maps canonical key -> n-gram ID
    key_to_id: FxHashMap<String, NGramId>,
    /// N-gram storage, indexed by ID
    ngrams: Vec<NGram>,
}

impl NGramTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table with pre-allocated capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            key_to_id: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            ngrams: Vec::with_capacity(capacity),
        }
    }

    /// Record `count` occurrences of a span, returning its ID
    ///
    /// The span is inserted on first sight; afterwards only its frequency grows.
    pub fn add_occurrences(&mut self, tokens: &[String], count: usize) -> NGramId {
        let key = ngram_key(tokens);
        if let Some(&id) = self.key_to_id.get(&key) {
            self.ngrams[id as usize].frequency += count;
            return id;
        }

        let id = self.ngrams.len() as NGramId;
        self.key_to_id.insert(key, id);
        self.ngrams.push(NGram::with_frequency(tokens.to_vec(), count));
        id
    }

    /// Record one occurrence of a span
    pub fn add_occurrence(&mut self, tokens: &[String]) -> NGramId {
        self.add_occurrences(tokens, 1)
    }

    /// Insert a ready-made n-gram, replacing any entry with the same key
    pub fn insert(&mut self, ngram: NGram) -> NGramId {
        if let Some(&id) = self.key_to_id.get(&ngram.key) {
            self.ngrams[id as usize] = ngram;
            return id;
        }
        let id = self.ngrams.len() as NGramId;
        self.key_to_id.insert(ngram.key.clone(), id);
        self.ngrams.push(ngram);
        id
    }

    /// Enumerate every boundary-valid span of 2..=`max_size` tokens
    ///
    /// A stopword at position `i` rules out every span starting there; a
    /// stopword at the end of a span rules out only that length.
    ///
    /// Stopword matching follows the filter's case mode: by default a
    /// capitalised "The" blocks like "the". Pass a filter built with
    /// [`StopwordFilter::with_case_sensitive`] to match exact forms only.
    pub fn from_tokens(tokens: &[String], stopwords: &StopwordFilter, max_size: usize) -> Self {
        let max_size = max_size.clamp(MIN_NGRAM_SIZE, MAX_NGRAM_SIZE);
        let mut table = Self::with_capacity(tokens.len());

        for start in 0..tokens.len() {
            for len in MIN_NGRAM_SIZE..=max_size {
                if start + len > tokens.len() {
                    break;
                }
                if stopwords.is_stopword(&tokens[start]) {
                    break;
                }
                if stopwords.is_stopword(&tokens[start + len - 1]) {
                    continue;
                }
                table.add_occurrence(&tokens[start..start + len]);
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(tokens = tokens.len(), ngrams = table.len(), "n-grams enumerated");

        table
    }

    /// Number of distinct n-grams (the `total_count` of SCP and MI)
    pub fn len(&self) -> usize {
        self.ngrams.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.ngrams.is_empty()
    }

    /// Get an n-gram by ID
    pub fn get(&self, id: NGramId) -> Option<&NGram> {
        self.ngrams.get(id as usize)
    }

    /// Get an n-gram mutably by ID
    pub fn get_mut(&mut self, id: NGramId) -> Option<&mut NGram> {
        self.ngrams.get_mut(id as usize)
    }

    /// Get an n-gram ID by key
    pub fn get_id(&self, key: &str) -> Option<NGramId> {
        self.key_to_id.get(key).copied()
    }

    /// Get an n-gram by key
    pub fn get_by_key(&self, key: &str) -> Option<&NGram> {
        self.get_id(key).and_then(|id| self.get(id))
    }

    /// Get the ID of a token span, if it was enumerated
    pub fn lookup(&self, tokens: &[String]) -> Option<NGramId> {
        self.get_id(&ngram_key(tokens))
    }

    /// Get the key of an n-gram by ID
    pub fn key(&self, id: NGramId) -> Option<&str> {
        self.ngrams.get(id as usize).map(|n| n.key.as_str())
    }

    /// Frequency of a span, if it was enumerated
    pub fn frequency_of(&self, tokens: &[String]) -> Option<usize> {
        self.lookup(tokens).map(|id| self.ngrams[id as usize].frequency)
    }

    /// Iterate over all n-grams with their IDs
    pub fn iter(&self) -> impl Iterator<Item = (NGramId, &NGram)> {
        self.ngrams
            .iter()
            .enumerate()
            .map(|(i, n)| (i as NGramId, n))
    }

    /// Iterate mutably over all n-grams
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut NGram> {
        self.ngrams.iter_mut()
    }

    /// Borrow the n-gram storage as a slice
    pub fn as_slice(&self) -> &[NGram] {
        &self.ngrams
    }

    /// Borrow the n-gram storage mutably
    pub(crate) fn as_mut_slice(&mut self) -> &mut [NGram] {
        &mut self.ngrams
    }

    /// Resolve an n-gram's shorter neighbours to `(key, glue)` pairs
    pub fn shorter_neighbors(&self, id: NGramId) -> Vec<(&str, f64)> {
        self.resolve(self.get(id).map(|n| &n.neighbor_glue_shorter))
    }

    /// Resolve an n-gram's longer neighbours to `(key, glue)` pairs
    pub fn longer_neighbors(&self, id: NGramId) -> Vec<(&str, f64)> {
        self.resolve(self.get(id).map(|n| &n.neighbor_glue_longer))
    }

    fn resolve(&self, links: Option<&FxHashMap<NGramId, f64>>) -> Vec<(&str, f64)> {
        let mut out: Vec<(&str, f64)> = links
            .into_iter()
            .flatten()
            .filter_map(|(&id, &glue)| self.key(id).map(|k| (k, glue)))
            .collect();
        out.sort_by(|a, b| a.0.cmp(b.0));
        out
    }

    /// Keys of all n-grams marked relevant
    pub fn relevant_keys(&self) -> Vec<&str> {
        self.ngrams
            .iter()
            .filter(|n| n.is_relevant_expression)
            .map(|n| n.key.as_str())
            .collect()
    }
}

/// Build an n-gram table in parallel (for large corpora)
///
/// Start positions are split into chunks that count spans independently;
/// the partial counts are merged in first-occurrence order so IDs match
/// the sequential [`NGramTable::from_tokens`].
pub fn build_ngrams_parallel(
    tokens: &[String],
    stopwords: &StopwordFilter,
    max_size: usize,
) -> NGramTable {
    if tokens.len() < PARALLEL_MIN_TOKENS {
        return NGramTable::from_tokens(tokens, stopwords, max_size);
    }
    let max_size = max_size.clamp(MIN_NGRAM_SIZE, MAX_NGRAM_SIZE);

    let starts: Vec<usize> = (0..tokens.len()).step_by(PARALLEL_CHUNK).collect();

    // key -> (first start, span length, count)
    let partials: Vec<FxHashMap<String, (usize, usize, usize)>> = starts
        .par_iter()
        .map(|&chunk_start| {
            let chunk_end = (chunk_start + PARALLEL_CHUNK).min(tokens.len());
            let mut counts: FxHashMap<String, (usize, usize, usize)> = FxHashMap::default();
            for start in chunk_start..chunk_end {
                if stopwords.is_stopword(&tokens[start]) {
                    continue;
                }
                for len in MIN_NGRAM_SIZE..=max_size {
                    if start + len > tokens.len() {
                        break;
                    }
                    if stopwords.is_stopword(&tokens[start + len - 1]) {
                        continue;
                    }
                    let entry = counts
                        .entry(ngram_key(&tokens[start..start + len]))
                        .or_insert((start, len, 0));
                    entry.2 += 1;
                }
            }
            counts
        })
        .collect();

    let mut merged: FxHashMap<String, (usize, usize, usize)> = FxHashMap::default();
    for partial in partials {
        for (key, (first, len, count)) in partial {
            let entry = merged.entry(key).or_insert((first, len, 0));
            entry.0 = entry.0.min(first);
            entry.2 += count;
        }
    }

    let mut ordered: Vec<(usize, usize, usize)> = merged.into_values().collect();
    ordered.sort_unstable_by_key(|&(first, len, _)| (first, len));

    let mut table = NGramTable::with_capacity(ordered.len());
    for (first, len, count) in ordered {
        table.add_occurrences(&tokens[first..first + len], count);
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(tokens = tokens.len(), ngrams = table.len(), "n-grams enumerated in parallel");

    table
}
