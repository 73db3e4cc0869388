//! Pipeline specification, validation, and execution.
//!
//! ## Submodules
//!
//! - [`spec`]: Declarative JSON configuration
//! - [`validation`]: Rule-based spec validation
//! - [`artifacts`]: Typed results flowing out of a run
//! - [`traits`]: Stage trait definitions
//! - [`runner`]: Pipeline orchestration and artifact threading
//! - [`observer`]: Logging, profiling, and debug hooks

pub mod artifacts;
pub mod error_code;
pub mod errors;
pub mod observer;
pub mod runner;
pub mod spec;
pub mod traits;
pub mod validation;

// Re-export artifact types for convenient access.
pub use artifacts::{rank_relevant, ExtractionResult, ExtractionSummary, RelevantExpression};

// Re-export observer types.
pub use observer::{
    NoopObserver, PipelineObserver, StageClock, StageReport, StageReportBuilder,
    StageTimingObserver, STAGE_CLASSIFY, STAGE_NGRAMS, STAGE_PROPAGATE, STAGE_SAMPLE,
    STAGE_STOPWORDS, STAGE_TOKENIZE,
};

// Re-export runner types (Pipeline, builder, type alias).
pub use runner::{LocalMaxsPipeline, Pipeline, PipelineBuilder};

// Re-export spec and validation entry points.
pub use error_code::ErrorCode;
pub use errors::PipelineSpecError;
pub use spec::ExtractionSpec;
pub use validation::{load_config, ValidationEngine, ValidationReport};

// Re-export stage traits and default implementations.
pub use traits::{
    ConfiguredStopwords, CorpusTokenizer, FixedStopwords, NoStopwords, StopwordProvider,
    WhitespaceTokenizer,
};
