//! # rapid_localmaxs
//!
//! Multiword expression extraction with the LocalMaxs algorithm.
//!
//! Every stopword-free span of 2 to 8 tokens is counted, scored with a
//! cohesion ("glue") metric (SCP, Dice or mutual information), compared
//! with its one-token-shorter and one-token-longer relatives, and kept as a
//! relevant expression when its glue is a local maximum.
//!
//! ```
//! use rapid_localmaxs::{extract_expressions, GlueFunction, LocalMaxsConfig, StopwordFilter};
//!
//! let tokens: Vec<String> = "new york is big new york is old new york is far"
//!     .split(' ')
//!     .map(String::from)
//!     .collect();
//! let cfg = LocalMaxsConfig::new().with_glue_function(GlueFunction::Dice);
//! let result = extract_expressions(&tokens, StopwordFilter::from_list(&["is"]), &cfg);
//!
//! assert!(result.relevant_expressions().contains(&"new york".to_string()));
//! ```

pub mod errors;
pub mod evaluation;
pub mod glue;
pub mod keywords;
pub mod localmaxs;
pub mod ngram;
pub mod nlp;
pub mod pipeline;
pub mod types;

pub use errors::{LocalMaxsError, Result};
pub use evaluation::EvaluationReport;
pub use glue::compute_glue;
pub use keywords::{explicit_keywords, implicit_keywords, DocumentKeywords, Keyword, KeywordKind};
pub use localmaxs::{ExpressionSampler, GluePropagator, LocalMaxsClassifier, PropagationStats};
pub use ngram::{NGram, NGramId, NGramTable};
pub use nlp::neigsyl::NeigSylStopwords;
pub use nlp::stopwords::{LibraryStopwords, StopwordFilter};
pub use nlp::tokenizer::{read_corpus, tokenize_corpus};
pub use pipeline::{ExtractionResult, ExtractionSpec, LocalMaxsPipeline, NoopObserver};
pub use types::{Document, GlueFunction, LocalMaxsConfig, StopwordSource};

/// Run the extraction stages on a token stream with a fixed stopword set
pub fn extract_expressions(
    tokens: &[String],
    stopwords: StopwordFilter,
    cfg: &LocalMaxsConfig,
) -> ExtractionResult {
    LocalMaxsPipeline::from_config(cfg).run_tokens(tokens, stopwords, cfg, &mut NoopObserver)
}

/// Load a corpus directory and extract its relevant expressions
///
/// Stopwords come from `cfg.stopword_source` plus `cfg.extra_stopwords`.
pub fn extract_from_dir(
    dir: impl AsRef<std::path::Path>,
    cfg: &LocalMaxsConfig,
) -> Result<ExtractionResult> {
    let documents = read_corpus(dir)?;
    Ok(LocalMaxsPipeline::from_config(cfg).run(&documents, cfg, &mut NoopObserver))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_extract_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "hot dog stand . hot dog stand . ").unwrap();
        fs::write(dir.path().join("b.txt"), "a hot dog stand again . ").unwrap();

        let cfg = LocalMaxsConfig::new()
            .with_stopword_source(StopwordSource::None)
            .with_sample_seed(11);
        let result = extract_from_dir(dir.path(), &cfg).unwrap();

        assert_eq!(result.table.get_by_key("hot dog").unwrap().frequency, 3);
        assert!(result.num_relevant() > 0);
        assert!(result.stopwords.is_empty());
    }

    #[test]
    fn test_extract_from_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = extract_from_dir(dir.path().join("missing"), &LocalMaxsConfig::new()).unwrap_err();
        assert!(matches!(err, LocalMaxsError::Io { .. }));
    }

    #[test]
    fn test_keywords_from_extraction() {
        let docs = vec![
            Document::new("a", "hot dog stand near the park"),
            Document::new("b", "the park is green"),
        ];
        let keywords = explicit_keywords(
            &docs,
            &["hot dog".to_string()],
            4,
            &StopwordFilter::from_list(&["the", "is", "near"]),
        );
        assert_eq!(keywords[0].keywords[0].term, "hot dog");
        assert_eq!(keywords[0].keywords[0].kind, KeywordKind::Expression);
        assert!(keywords[1].keywords.iter().all(|k| k.kind == KeywordKind::Unigram));
    }
}
