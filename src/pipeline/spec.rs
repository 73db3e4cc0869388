//! Extraction specification types.
//!
//! An [`ExtractionSpec`] is the declarative, JSON-facing form of a
//! [`LocalMaxsConfig`]. Every section is optional; omitted values fall back
//! to the config defaults. These types are the input to the
//! [`super::validation::ValidationEngine`].
//!
//! # JSON shape
//!
//! ```json
//! {
//!   "v": 1,
//!   "glue_function": "dice",
//!   "localmaxs": { "p": 2.0, "frequency_floor": 2 },
//!   "ngram": { "max_size": 8 },
//!   "sampling": { "size": 200, "seed": 7 },
//!   "stopwords": { "source": "library", "language": "en", "extra": ["via"] },
//!   "parallel": false,
//!   "strict": false
//! }
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::types::{GlueFunction, LocalMaxsConfig, StopwordSource};

/// Spec version understood by this crate.
pub const SPEC_VERSION: u32 = 1;

/// Top-level extraction specification (v1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionSpec {
    /// Spec version (currently `1`).
    pub v: u32,

    /// Glue metric name: `"scp"`, `"dice"` or `"mi"`.
    ///
    /// Kept as a string so an unknown name survives parsing and can be
    /// reported by validation.
    #[serde(default)]
    pub glue_function: Option<String>,

    #[serde(default)]
    pub localmaxs: LocalMaxsSpec,

    #[serde(default)]
    pub ngram: NGramSpec,

    #[serde(default)]
    pub sampling: SamplingSpec,

    #[serde(default)]
    pub stopwords: StopwordSpec,

    /// Run the propagator's first pass in parallel.
    #[serde(default)]
    pub parallel: bool,

    /// If `true`, unrecognized fields are errors; if `false`, warnings.
    #[serde(default)]
    pub strict: bool,

    /// Captures any fields not recognized by the schema.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

/// Decision-rule parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalMaxsSpec {
    #[serde(default)]
    pub p: Option<f64>,

    #[serde(default)]
    pub frequency_floor: Option<usize>,

    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

/// N-gram enumeration parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NGramSpec {
    #[serde(default)]
    pub max_size: Option<usize>,

    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

/// Evaluation sampling parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SamplingSpec {
    #[serde(default)]
    pub size: Option<usize>,

    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

/// Stopword selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StopwordSpec {
    #[serde(default)]
    pub source: Option<StopwordSource>,

    #[serde(default)]
    pub language: Option<String>,

    /// Words added on top of the provider's list.
    #[serde(default)]
    pub extra: Vec<String>,

    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

impl Default for ExtractionSpec {
    fn default() -> Self {
        Self {
            v: SPEC_VERSION,
            glue_function: None,
            localmaxs: LocalMaxsSpec::default(),
            ngram: NGramSpec::default(),
            sampling: SamplingSpec::default(),
            stopwords: StopwordSpec::default(),
            parallel: false,
            strict: false,
            unknown_fields: HashMap::new(),
        }
    }
}

impl ExtractionSpec {
    /// Parse a spec from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The selected glue function, defaulting to SCP.
    pub fn glue(&self) -> GlueFunction {
        self.glue_function
            .as_deref()
            .map(|name| name.parse::<GlueFunction>().unwrap_or_default())
            .unwrap_or_default()
    }

    /// Resolve into a runtime config.
    ///
    /// Does not validate; out-of-range n-gram sizes are clamped.
    pub fn to_config(&self) -> LocalMaxsConfig {
        let defaults = LocalMaxsConfig::default();
        let mut cfg = LocalMaxsConfig::new()
            .with_glue_function(self.glue())
            .with_p(self.localmaxs.p.unwrap_or(defaults.p))
            .with_frequency_floor(self.localmaxs.frequency_floor.unwrap_or(defaults.frequency_floor))
            .with_max_ngram_size(self.ngram.max_size.unwrap_or(defaults.max_ngram_size))
            .with_sample_size(self.sampling.size.unwrap_or(defaults.sample_size))
            .with_stopword_source(self.stopwords.source.unwrap_or(defaults.stopword_source))
            .with_extra_stopwords(self.stopwords.extra.iter().cloned())
            .with_parallel(self.parallel);
        if let Some(seed) = self.sampling.seed {
            cfg = cfg.with_sample_seed(seed);
        }
        if let Some(language) = &self.stopwords.language {
            cfg = cfg.with_language(language.as_str());
        }
        cfg
    }
}
