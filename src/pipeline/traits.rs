//! Stage trait definitions for the pipeline.
//!
//! Each trait represents one processing stage boundary that callers may
//! swap out. Implementations are statically dispatched through the
//! generics of [`Pipeline`](super::runner::Pipeline).

use crate::nlp::neigsyl::NeigSylStopwords;
use crate::nlp::stopwords::{LibraryStopwords, StopwordFilter};
use crate::nlp::tokenizer::tokenize_corpus;
use crate::types::{Document, LocalMaxsConfig, StopwordSource};

// ============================================================================
// CorpusTokenizer: documents to one token stream (stage 0)
// ============================================================================

/// Turns a corpus into the single token sequence n-grams are counted over.
///
/// # Contract
///
/// - Tokens of consecutive documents are concatenated in document order.
/// - No token is empty.
pub trait CorpusTokenizer {
    fn tokenize(&self, documents: &[Document]) -> Vec<String>;
}

/// Default tokenizer: pads punctuation with spaces and splits on whitespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokenizer;

impl CorpusTokenizer for WhitespaceTokenizer {
    fn tokenize(&self, documents: &[Document]) -> Vec<String> {
        tokenize_corpus(documents)
    }
}

// ============================================================================
// StopwordProvider: corpus to stopword set (stage 1)
// ============================================================================

/// Decides which words may not start or end an n-gram.
pub trait StopwordProvider {
    fn stopwords(&self, documents: &[Document]) -> StopwordFilter;
}

impl StopwordProvider for LibraryStopwords {
    fn stopwords(&self, documents: &[Document]) -> StopwordFilter {
        self.collect(documents)
    }
}

impl StopwordProvider for NeigSylStopwords {
    fn stopwords(&self, documents: &[Document]) -> StopwordFilter {
        self.collect(documents)
    }
}

/// No stopwords: every span is a valid n-gram boundary.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoStopwords;

impl StopwordProvider for NoStopwords {
    fn stopwords(&self, _documents: &[Document]) -> StopwordFilter {
        StopwordFilter::empty()
    }
}

/// A fixed, caller-supplied stopword set.
#[derive(Debug, Clone, Default)]
pub struct FixedStopwords(pub StopwordFilter);

impl StopwordProvider for FixedStopwords {
    fn stopwords(&self, _documents: &[Document]) -> StopwordFilter {
        self.0.clone()
    }
}

/// Provider picked at runtime from a [`StopwordSource`].
#[derive(Debug, Clone)]
pub enum ConfiguredStopwords {
    Library(LibraryStopwords),
    Neigsyl(NeigSylStopwords),
    None,
}

impl ConfiguredStopwords {
    pub fn from_config(cfg: &LocalMaxsConfig) -> Self {
        match cfg.stopword_source {
            StopwordSource::Library => Self::Library(LibraryStopwords::new(cfg.language.as_str())),
            StopwordSource::Neigsyl => Self::Neigsyl(NeigSylStopwords::new()),
            StopwordSource::None => Self::None,
        }
    }
}

impl Default for ConfiguredStopwords {
    fn default() -> Self {
        Self::Library(LibraryStopwords::default())
    }
}

impl StopwordProvider for ConfiguredStopwords {
    fn stopwords(&self, documents: &[Document]) -> StopwordFilter {
        match self {
            Self::Library(p) => p.stopwords(documents),
            Self::Neigsyl(p) => p.stopwords(documents),
            Self::None => NoStopwords.stopwords(documents),
        }
    }
}
