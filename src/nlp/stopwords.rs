//! Stopword sets
//!
//! A stopword may sit inside a candidate expression but never at either
//! end of it. [`StopwordFilter`] is the set every boundary check goes
//! through; [`LibraryStopwords`] fills it from the `stop-words` crate,
//! restricted to words the corpus actually uses.

use rustc_hash::FxHashSet;
use stop_words::{get, LANGUAGE};

use crate::types::Document;

/// Characters stripped from both ends of a word before vocabulary lookups
const STRIP_CHARS: &[char] = &['.', ',', '!', '?', ';', ':', '"', '\'', '(', ')', '[', ']'];

/// Lowercase a raw word and strip surrounding punctuation
pub(crate) fn normalize_word(word: &str) -> String {
    word.to_lowercase().trim_matches(STRIP_CHARS).to_string()
}

/// A set of words that may not open or close an expression
#[derive(Debug, Clone, Default)]
pub struct StopwordFilter {
    /// Set of stopwords (lowercase unless case-sensitive)
    stopwords: FxHashSet<String>,
    /// Whether lookups are case-sensitive
    case_sensitive: bool,
}

impl StopwordFilter {
    /// Create a filter holding the full library list for a language
    ///
    /// Supported languages: en, de, fr, es, it, pt, nl, ru, sv, no, da, fi, hu, tr, pl, ar
    pub fn new(language: &str) -> Self {
        Self {
            stopwords: library_stopwords(language),
            case_sensitive: false,
        }
    }

    /// Create an empty filter (nothing is a stopword)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a filter from a custom list
    pub fn from_list(words: &[&str]) -> Self {
        Self {
            stopwords: words.iter().map(|w| w.to_lowercase()).collect(),
            case_sensitive: false,
        }
    }

    /// Create a filter from owned words
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            stopwords: words.into_iter().map(|w| w.into().to_lowercase()).collect(),
            case_sensitive: false,
        }
    }

    /// Set case sensitivity
    ///
    /// A case-sensitive filter only matches tokens spelled exactly like the
    /// stored (lowercase) words, so `"The"` would open an n-gram.
    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Add additional stopwords
    pub fn add_stopwords(&mut self, words: &[&str]) {
        for word in words {
            self.stopwords.insert(word.to_lowercase());
        }
    }

    /// Remove stopwords
    pub fn remove_stopwords(&mut self, words: &[&str]) {
        for word in words {
            self.stopwords.remove(&word.to_lowercase());
        }
    }

    /// Check if a word is a stopword
    pub fn is_stopword(&self, word: &str) -> bool {
        if self.case_sensitive {
            self.stopwords.contains(word)
        } else {
            self.stopwords.contains(&word.to_lowercase())
        }
    }

    /// Check whether a span may stand as an expression boundary-wise
    ///
    /// Empty spans are never valid.
    pub fn is_valid_boundary(&self, tokens: &[String]) -> bool {
        match (tokens.first(), tokens.last()) {
            (Some(first), Some(last)) => !self.is_stopword(first) && !self.is_stopword(last),
            _ => false,
        }
    }

    /// Stopwords in sorted order
    pub fn words(&self) -> Vec<&str> {
        let mut words: Vec<&str> = self.stopwords.iter().map(String::as_str).collect();
        words.sort_unstable();
        words
    }

    /// Number of stopwords
    pub fn len(&self) -> usize {
        self.stopwords.len()
    }

    /// Check if the filter is empty
    pub fn is_empty(&self) -> bool {
        self.stopwords.is_empty()
    }
}

/// Load the library list for a language
fn library_stopwords(language: &str) -> FxHashSet<String> {
    let lang = match language.to_lowercase().as_str() {
        "en" | "english" => LANGUAGE::English,
        "de" | "german" => LANGUAGE::German,
        "fr" | "french" => LANGUAGE::French,
        "es" | "spanish" => LANGUAGE::Spanish,
        "it" | "italian" => LANGUAGE::Italian,
        "pt" | "portuguese" => LANGUAGE::Portuguese,
        "nl" | "dutch" => LANGUAGE::Dutch,
        "ru" | "russian" => LANGUAGE::Russian,
        "sv" | "swedish" => LANGUAGE::Swedish,
        "no" | "norwegian" => LANGUAGE::Norwegian,
        "da" | "danish" => LANGUAGE::Danish,
        "fi" | "finnish" => LANGUAGE::Finnish,
        "hu" | "hungarian" => LANGUAGE::Hungarian,
        "tr" | "turkish" => LANGUAGE::Turkish,
        "pl" | "polish" => LANGUAGE::Polish,
        "ar" | "arabic" => LANGUAGE::Arabic,
        // Unknown languages fall back to English
        _ => LANGUAGE::English,
    };

    get(lang).iter().map(|s| s.to_lowercase()).collect()
}

/// Library stopwords that occur in the corpus
///
/// Only alphabetic words are considered, after lowercasing and stripping
/// surrounding punctuation.
#[derive(Debug, Clone)]
pub struct LibraryStopwords {
    /// Language of the library list
    pub language: String,
}

impl Default for LibraryStopwords {
    fn default() -> Self {
        Self::new("en")
    }
}

impl LibraryStopwords {
    /// Create a provider for the given language
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
        }
    }

    /// Intersect the library list with the corpus vocabulary
    pub fn collect(&self, documents: &[Document]) -> StopwordFilter {
        let library = library_stopwords(&self.language);

        let found: FxHashSet<String> = documents
            .iter()
            .flat_map(|doc| doc.text.split_whitespace())
            .map(normalize_word)
            .filter(|w| !w.is_empty() && w.chars().all(char::is_alphabetic))
            .filter(|w| library.contains(w))
            .collect();

        #[cfg(feature = "tracing")]
        tracing::debug!(language = %self.language, found = found.len(), "library stopwords");

        StopwordFilter {
            stopwords: found,
            case_sensitive: false,
        }
    }
}
