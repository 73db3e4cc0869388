//! Core types shared across the extraction pipeline

use serde::{Deserialize, Serialize};

/// Largest n-gram the builder will ever enumerate.
pub const MAX_NGRAM_SIZE: usize = 8;

/// Smallest n-gram the builder enumerates (there are no unigram entities).
pub const MIN_NGRAM_SIZE: usize = 2;

/// Cohesion ("glue") metric used to score an n-gram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GlueFunction {
    /// Symmetric conditional probability
    #[default]
    Scp,
    /// Dice coefficient
    Dice,
    /// Pointwise mutual information (log2)
    MutualInformation,
    /// A selector nobody recognized; every glue computed with it is 0.0
    Unrecognized,
}

impl GlueFunction {
    fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "scp" => GlueFunction::Scp,
            "dice" => GlueFunction::Dice,
            "mi" | "mutual_information" | "mutualinformation" => GlueFunction::MutualInformation,
            _ => GlueFunction::Unrecognized,
        }
    }

    /// Returns the user-facing name used in JSON and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scp => "scp",
            Self::Dice => "dice",
            Self::MutualInformation => "mi",
            Self::Unrecognized => "unrecognized",
        }
    }

    /// Whether the metric needs the number of distinct n-gram types
    pub fn needs_total_count(&self) -> bool {
        matches!(self, Self::Scp | Self::MutualInformation)
    }
}

impl std::str::FromStr for GlueFunction {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        Ok(GlueFunction::parse(value))
    }
}

impl std::fmt::Display for GlueFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the pipeline gets its stopword set from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopwordSource {
    /// Language list from the `stop-words` crate, restricted to the corpus vocabulary.
    #[default]
    Library,
    /// Corpus-derived list from the NeigSyl elbow heuristic.
    Neigsyl,
    /// No stopwords at all.
    None,
}

/// A single corpus document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// File name (or any caller-chosen identifier)
    pub name: String,
    /// Raw text content
    pub text: String,
}

impl Document {
    /// Create a new document
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// Configuration for LocalMaxs extraction
#[derive(Debug, Clone)]
pub struct LocalMaxsConfig {
    /// Cohesion metric
    pub glue_function: GlueFunction,
    /// Generalized-mean exponent of the LocalMaxs threshold
    pub p: f64,
    /// An expression must occur strictly more often than this
    pub frequency_floor: usize,
    /// Longest n-gram to enumerate (2..=8)
    pub max_ngram_size: usize,
    /// Number of relevant expressions handed to evaluation
    pub sample_size: usize,
    /// Seed for the sampler; `None` draws from entropy
    pub sample_seed: Option<u64>,
    /// Language of the library stopword list
    pub language: String,
    /// Stopword provider used by the default pipeline
    pub stopword_source: StopwordSource,
    /// Words added to whatever the provider returns
    pub extra_stopwords: Vec<String>,
    /// Run the propagator's first pass on the rayon pool
    pub parallel: bool,
}

impl Default for LocalMaxsConfig {
    fn default() -> Self {
        Self {
            glue_function: GlueFunction::Scp,
            p: 2.0,
            frequency_floor: 2,
            max_ngram_size: MAX_NGRAM_SIZE,
            sample_size: 200,
            sample_seed: None,
            language: "en".to_string(),
            stopword_source: StopwordSource::Library,
            extra_stopwords: Vec::new(),
            parallel: false,
        }
    }
}

impl LocalMaxsConfig {
    /// Create a config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the glue function
    pub fn with_glue_function(mut self, glue_function: GlueFunction) -> Self {
        self.glue_function = glue_function;
        self
    }

    /// Set the generalized-mean exponent
    pub fn with_p(mut self, p: f64) -> Self {
        self.p = p;
        self
    }

    /// Set the frequency floor
    pub fn with_frequency_floor(mut self, floor: usize) -> Self {
        self.frequency_floor = floor;
        self
    }

    /// Set the maximum n-gram size, clamped to 2..=8
    pub fn with_max_ngram_size(mut self, size: usize) -> Self {
        self.max_ngram_size = size.clamp(MIN_NGRAM_SIZE, MAX_NGRAM_SIZE);
        self
    }

    /// Set the sample size
    pub fn with_sample_size(mut self, size: usize) -> Self {
        self.sample_size = size;
        self
    }

    /// Fix the sampler seed
    pub fn with_sample_seed(mut self, seed: u64) -> Self {
        self.sample_seed = Some(seed);
        self
    }

    /// Set the stopword source
    pub fn with_stopword_source(mut self, source: StopwordSource) -> Self {
        self.stopword_source = source;
        self
    }

    /// Set the stopword language
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Add words to the stopword set on top of the provider's list
    pub fn with_extra_stopwords<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_stopwords.extend(words.into_iter().map(Into::into));
        self
    }

    /// Enable or disable parallel propagation
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
