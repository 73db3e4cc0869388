//! Corpus loading and whitespace tokenization
//!
//! Punctuation is split off into its own tokens before the text is
//! divided on whitespace, so `"(see below)."` yields `( see below ) .`
//! only where a sentence-ending dot is followed by a space.

use std::fs;
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;

use crate::errors::{LocalMaxsError, Result};
use crate::types::Document;

lazy_static! {
    /// A dot followed by a space ends a sentence. Decimal points ("3.14")
    /// and inner acronym dots ("U.S") are never followed by a space.
    static ref SENTENCE_DOT: Regex = Regex::new(r"\. ").unwrap();
    static ref PUNCTUATION: Regex = Regex::new(r"([;:!?,<>&\)\(\]\[])").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Read every regular file of a corpus directory
///
/// Sub-directories are ignored. Documents are returned sorted by file name.
pub fn read_corpus(dir: impl AsRef<Path>) -> Result<Vec<Document>> {
    let dir = dir.as_ref();
    let entries = fs::read_dir(dir).map_err(|e| LocalMaxsError::io(dir, e))?;

    let mut documents = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| LocalMaxsError::io(dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let text = fs::read_to_string(&path).map_err(|e| LocalMaxsError::io(&path, e))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        documents.push(Document { name, text });
    }

    documents.sort_by(|a, b| a.name.cmp(&b.name));

    #[cfg(feature = "tracing")]
    tracing::debug!(dir = %dir.display(), documents = documents.len(), "corpus loaded");

    Ok(documents)
}

/// Surround punctuation marks with spaces and collapse whitespace
pub fn add_spaces(text: &str) -> String {
    let spaced = SENTENCE_DOT.replace_all(text, " . ");
    let spaced = PUNCTUATION.replace_all(&spaced, " ${1} ");
    let spaced = WHITESPACE.replace_all(&spaced, " ");
    spaced.trim().to_string()
}

/// Split already-spaced text into tokens
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

/// Tokenize every document and concatenate the token streams in order
pub fn tokenize_corpus(documents: &[Document]) -> Vec<String> {
    let mut tokens = Vec::new();
    for doc in documents {
        tokens.extend(tokenize(&add_spaces(&doc.text)));
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_spaces_punctuation() {
        assert_eq!(add_spaces("Hello, world!"), "Hello , world !");
        assert_eq!(add_spaces("(see [1]); done"), "( see [ 1 ] ) ; done");
        assert_eq!(add_spaces("a<b>&c: d?"), "a < b > & c : d ?");
    }

    #[test]
    fn test_add_spaces_sentence_dot() {
        assert_eq!(add_spaces("First one. Second one."), "First one . Second one.");
    }

    #[test]
    fn test_add_spaces_keeps_decimals_and_acronyms() {
        assert_eq!(add_spaces("pi is 3.14 in the U.S today"), "pi is 3.14 in the U.S today");
    }

    #[test]
    fn test_add_spaces_collapses_whitespace() {
        assert_eq!(add_spaces("  lots \n of\t\tspace  "), "lots of space");
    }

    #[test]
    fn test_tokenize() {
        let tokens = tokenize(&add_spaces("New York, city."));
        assert_eq!(tokens, vec!["New", "York", ",", "city."]);
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize_corpus(&[]).is_empty());
    }

    #[test]
    fn test_tokenize_corpus_concatenates() {
        let docs = vec![Document::new("a.txt", "red wine"), Document::new("b.txt", "white wine")];
        assert_eq!(tokenize_corpus(&docs), vec!["red", "wine", "white", "wine"]);
    }

    #[test]
    fn test_read_corpus_sorted_and_skips_dirs() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "second").unwrap();
        fs::write(dir.path().join("a.txt"), "first").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();

        let docs = read_corpus(dir.path()).unwrap();
        let names: Vec<_> = docs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
        assert_eq!(docs[0].text, "first");
    }

    #[test]
    fn test_read_corpus_missing_dir() {
        let err = read_corpus("/definitely/not/a/corpus").unwrap_err();
        assert!(matches!(err, LocalMaxsError::Io { .. }));
    }
}
