//! Pipeline runner: orchestrates stage execution and artifact flow.
//!
//! The [`Pipeline`] struct holds a statically-composed tokenizer and
//! stopword provider. Calling [`Pipeline::run`] executes every stage in
//! order, threading artifacts between them and notifying a
//! [`PipelineObserver`] at each boundary:
//!
//! 1. tokenize the corpus
//! 2. collect stopwords
//! 3. enumerate n-grams
//! 4. propagate glue to neighbours
//! 5. classify local maxima
//! 6. sample relevant expressions
//!
//! Use [`LocalMaxsPipeline::from_config`] to pick the stopword provider
//! named in a [`LocalMaxsConfig`], or [`PipelineBuilder`] to plug in custom
//! stages.

use crate::localmaxs::{ExpressionSampler, GluePropagator, LocalMaxsClassifier};
use crate::ngram::builder::build_ngrams_parallel;
use crate::ngram::NGramTable;
use crate::nlp::stopwords::StopwordFilter;
use crate::pipeline::artifacts::{rank_relevant, ExtractionResult};
use crate::pipeline::observer::{
    PipelineObserver, StageClock, StageReportBuilder, STAGE_CLASSIFY, STAGE_NGRAMS,
    STAGE_PROPAGATE, STAGE_SAMPLE, STAGE_STOPWORDS, STAGE_TOKENIZE,
};
use crate::pipeline::traits::{
    ConfiguredStopwords, CorpusTokenizer, StopwordProvider, WhitespaceTokenizer,
};
use crate::types::{Document, LocalMaxsConfig};

// ---------------------------------------------------------------------------
// Conditional tracing support
// ---------------------------------------------------------------------------

/// Enter a tracing span for a pipeline stage (when the `tracing` feature is
/// enabled). When disabled, this is a no-op and the compiler eliminates it.
macro_rules! trace_stage {
    ($name:expr) => {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("pipeline_stage", stage = $name).entered();
    };
}

// ============================================================================
// Pipeline: statically-composed stage container
// ============================================================================

/// A pipeline composed of concrete stage implementations.
///
/// | Param | Trait | Default impl |
/// |-------|-------|--------------|
/// | `Tok` | [`CorpusTokenizer`] | [`WhitespaceTokenizer`] |
/// | `Sw`  | [`StopwordProvider`] | [`ConfiguredStopwords`] |
#[derive(Debug, Clone)]
pub struct Pipeline<Tok, Sw> {
    pub tokenizer: Tok,
    pub stopwords: Sw,
}

/// Type alias for the default pipeline.
pub type LocalMaxsPipeline = Pipeline<WhitespaceTokenizer, ConfiguredStopwords>;

impl LocalMaxsPipeline {
    /// Whitespace tokenizer plus the stopword source named in `cfg`.
    pub fn from_config(cfg: &LocalMaxsConfig) -> Self {
        Pipeline {
            tokenizer: WhitespaceTokenizer,
            stopwords: ConfiguredStopwords::from_config(cfg),
        }
    }
}

// ============================================================================
// Pipeline::run: execute stages in order
// ============================================================================

impl<Tok, Sw> Pipeline<Tok, Sw>
where
    Tok: CorpusTokenizer,
    Sw: StopwordProvider,
{
    /// Extract relevant expressions from a corpus.
    ///
    /// `cfg.extra_stopwords` are added to whatever the provider returns.
    /// Pass [`NoopObserver`](super::observer::NoopObserver) when no
    /// callbacks are needed.
    pub fn run(
        &self,
        documents: &[Document],
        cfg: &LocalMaxsConfig,
        observer: &mut impl PipelineObserver,
    ) -> ExtractionResult {
        // Stage 0: Tokenize
        trace_stage!(STAGE_TOKENIZE);
        observer.on_stage_start(STAGE_TOKENIZE);
        let clock = StageClock::start();
        let tokens = self.tokenizer.tokenize(documents);
        let report = StageReportBuilder::new(clock.elapsed())
            .items(tokens.len())
            .build();
        observer.on_stage_end(STAGE_TOKENIZE, &report);
        observer.on_tokens(&tokens);

        // Stage 1: Stopwords
        trace_stage!(STAGE_STOPWORDS);
        observer.on_stage_start(STAGE_STOPWORDS);
        let clock = StageClock::start();
        let mut stopwords = self.stopwords.stopwords(documents);
        let extra: Vec<&str> = cfg.extra_stopwords.iter().map(String::as_str).collect();
        stopwords.add_stopwords(&extra);
        let report = StageReportBuilder::new(clock.elapsed())
            .items(stopwords.len())
            .build();
        observer.on_stage_end(STAGE_STOPWORDS, &report);
        observer.on_stopwords(&stopwords);

        self.run_tokens(&tokens, stopwords, cfg, observer)
    }

    /// Run the extraction stages on an already tokenized stream.
    ///
    /// Skips tokenization and stopword collection; `stopwords` is used as is.
    pub fn run_tokens(
        &self,
        tokens: &[String],
        stopwords: StopwordFilter,
        cfg: &LocalMaxsConfig,
        observer: &mut impl PipelineObserver,
    ) -> ExtractionResult {
        // Stage 2: Enumerate n-grams
        trace_stage!(STAGE_NGRAMS);
        observer.on_stage_start(STAGE_NGRAMS);
        let clock = StageClock::start();
        let mut table = if cfg.parallel {
            build_ngrams_parallel(tokens, &stopwords, cfg.max_ngram_size)
        } else {
            NGramTable::from_tokens(tokens, &stopwords, cfg.max_ngram_size)
        };
        let report = StageReportBuilder::new(clock.elapsed())
            .items(table.len())
            .build();
        observer.on_stage_end(STAGE_NGRAMS, &report);
        observer.on_ngrams(&table);

        // Stage 3: Propagate glue
        trace_stage!(STAGE_PROPAGATE);
        observer.on_stage_start(STAGE_PROPAGATE);
        let clock = StageClock::start();
        let stats = GluePropagator::from_config(cfg).propagate(&mut table, &stopwords);
        let report = StageReportBuilder::new(clock.elapsed())
            .items(stats.ngrams)
            .links(stats.shorter_links + stats.longer_links)
            .build();
        observer.on_stage_end(STAGE_PROPAGATE, &report);

        // Stage 4: Classify
        trace_stage!(STAGE_CLASSIFY);
        observer.on_stage_start(STAGE_CLASSIFY);
        let clock = StageClock::start();
        let num_relevant = LocalMaxsClassifier::from_config(cfg).classify(&mut table);
        let report = StageReportBuilder::new(clock.elapsed())
            .relevant(num_relevant)
            .build();
        observer.on_stage_end(STAGE_CLASSIFY, &report);
        observer.on_classified(&table);

        // Stage 5: Sample
        trace_stage!(STAGE_SAMPLE);
        observer.on_stage_start(STAGE_SAMPLE);
        let clock = StageClock::start();
        let sample = ExpressionSampler::from_config(cfg).sample(&table);
        let report = StageReportBuilder::new(clock.elapsed())
            .items(sample.len())
            .build();
        observer.on_stage_end(STAGE_SAMPLE, &report);

        ExtractionResult {
            relevant: rank_relevant(&table),
            table,
            stopwords,
            sample,
            num_tokens: tokens.len(),
            stats,
        }
    }
}

// ============================================================================
// PipelineBuilder: fluent construction with custom stages
// ============================================================================

/// Fluent builder for constructing a [`Pipeline`] with custom stages.
///
/// Starts from the default stages and allows overriding each one.
///
/// ```
/// # use rapid_localmaxs::pipeline::runner::PipelineBuilder;
/// # use rapid_localmaxs::pipeline::traits::NoStopwords;
/// let pipeline = PipelineBuilder::new().stopwords(NoStopwords).build();
/// ```
pub struct PipelineBuilder<Tok = WhitespaceTokenizer, Sw = ConfiguredStopwords> {
    tokenizer: Tok,
    stopwords: Sw,
}

impl PipelineBuilder {
    /// Start building from the default stages.
    pub fn new() -> Self {
        PipelineBuilder {
            tokenizer: WhitespaceTokenizer,
            stopwords: ConfiguredStopwords::default(),
        }
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<Tok, Sw> PipelineBuilder<Tok, Sw> {
    /// Override the tokenizer stage.
    pub fn tokenizer<T: CorpusTokenizer>(self, t: T) -> PipelineBuilder<T, Sw> {
        PipelineBuilder {
            tokenizer: t,
            stopwords: self.stopwords,
        }
    }

    /// Override the stopword stage.
    pub fn stopwords<S: StopwordProvider>(self, s: S) -> PipelineBuilder<Tok, S> {
        PipelineBuilder {
            tokenizer: self.tokenizer,
            stopwords: s,
        }
    }

    /// Consume the builder and produce a [`Pipeline`].
    pub fn build(self) -> Pipeline<Tok, Sw> {
        Pipeline {
            tokenizer: self.tokenizer,
            stopwords: self.stopwords,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
