//! Corpus-derived stopwords via the NeigSyl elbow heuristic
//!
//! Function words sit next to many different words and tend to be short.
//! NeigSyl(w) = distinct neighbours of w / syllables of w. Sorting the
//! vocabulary by NeigSyl gives a curve that falls steeply through the
//! function words and then flattens; the stopwords are everything before
//! the point where the slope over `delta_k` ranks reaches -1.

use rustc_hash::{FxHashMap, FxHashSet};

use super::stopwords::{normalize_word, StopwordFilter};
use crate::types::Document;

const VOWELS: &str = "aeiou";

/// Count syllables as maximal runs of vowels
pub fn count_syllables(word: &str) -> usize {
    let mut syllables = 0;
    let mut in_vowel_run = false;

    for ch in word.to_lowercase().chars() {
        if VOWELS.contains(ch) {
            if !in_vowel_run {
                syllables += 1;
                in_vowel_run = true;
            }
        } else {
            in_vowel_run = false;
        }
    }

    syllables
}

/// Number of distinct left-or-right neighbours of every word
///
/// Adjacency never crosses text boundaries.
pub fn neighbor_counts<'a, I>(texts: I) -> FxHashMap<String, usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut neighbors: FxHashMap<String, FxHashSet<String>> = FxHashMap::default();

    for text in texts {
        let words: Vec<String> = text.split_whitespace().map(normalize_word).collect();
        for pair in words.windows(2) {
            let (w1, w2) = (&pair[0], &pair[1]);
            neighbors.entry(w1.clone()).or_default().insert(w2.clone());
            neighbors.entry(w2.clone()).or_default().insert(w1.clone());
        }
    }

    neighbors
        .into_iter()
        .map(|(word, set)| (word, set.len()))
        .collect()
}

/// NeigSyl score for each word with at least one syllable
pub fn compute_neigsyl(
    words: &FxHashSet<String>,
    neighbor_counts: &FxHashMap<String, usize>,
) -> FxHashMap<String, f64> {
    words
        .iter()
        .filter_map(|word| {
            let syllables = count_syllables(word);
            if syllables == 0 {
                return None;
            }
            let neighbors = neighbor_counts.get(word).copied().unwrap_or(0);
            Some((word.clone(), neighbors as f64 / syllables as f64))
        })
        .collect()
}

/// Words before the elbow of the descending NeigSyl curve
///
/// Returns every word when the curve has no elbow.
pub fn find_elbow(scores: &FxHashMap<String, f64>, delta_k: usize, tolerance: f64) -> Vec<String> {
    let mut sorted: Vec<(&String, f64)> = scores.iter().map(|(w, &s)| (w, s)).collect();
    sorted.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let delta_k = delta_k.max(1);
    let mut cut = sorted.len();
    if sorted.len() > delta_k {
        for r in 0..sorted.len() - delta_k {
            let slope = (sorted[r + delta_k].1 - sorted[r].1) / delta_k as f64;
            if (slope + 1.0).abs() < tolerance {
                cut = r + delta_k;
                break;
            }
        }
    }

    sorted
        .into_iter()
        .take(cut)
        .map(|(word, _)| word.clone())
        .collect()
}

/// Stopword provider based on the NeigSyl elbow
#[derive(Debug, Clone)]
pub struct NeigSylStopwords {
    /// Rank distance used for the slope
    pub delta_k: usize,
    /// How close to -1 the slope must be
    pub tolerance: f64,
}

impl Default for NeigSylStopwords {
    fn default() -> Self {
        Self {
            delta_k: 4,
            tolerance: 0.1,
        }
    }
}

impl NeigSylStopwords {
    /// Create a provider with default parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the rank distance used for the slope
    pub fn with_delta_k(mut self, delta_k: usize) -> Self {
        self.delta_k = delta_k.max(1);
        self
    }

    /// Set the slope tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Derive the stopword set from a corpus
    pub fn collect(&self, documents: &[Document]) -> StopwordFilter {
        let vocabulary: FxHashSet<String> = documents
            .iter()
            .flat_map(|doc| doc.text.split_whitespace())
            .map(normalize_word)
            .filter(|w| !w.is_empty())
            .collect();

        let counts = neighbor_counts(documents.iter().map(|d| d.text.as_str()));
        let scores = compute_neigsyl(&vocabulary, &counts);
        let stopwords = find_elbow(&scores, self.delta_k, self.tolerance);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            vocabulary = vocabulary.len(),
            stopwords = stopwords.len(),
            "neigsyl stopwords"
        );

        StopwordFilter::from_words(stopwords)
    }
}
