//! Pipeline observer: hooks for logging, profiling and debugging.
//!
//! Observers receive notifications at stage boundaries without coupling to
//! stage logic. Use cases include timing stages, capturing intermediate
//! artifacts for debugging, and emitting structured telemetry.

use std::time::{Duration, Instant};

use crate::ngram::NGramTable;
use crate::nlp::stopwords::StopwordFilter;

// ─── Stage names ────────────────────────────────────────────────────────────

pub const STAGE_TOKENIZE: &str = "tokenize";
pub const STAGE_STOPWORDS: &str = "stopwords";
pub const STAGE_NGRAMS: &str = "ngrams";
pub const STAGE_PROPAGATE: &str = "propagate";
pub const STAGE_CLASSIFY: &str = "classify";
pub const STAGE_SAMPLE: &str = "sample";

// ─── StageClock ─────────────────────────────────────────────────────────────

/// Wall-clock timer for a single stage.
#[derive(Debug, Clone, Copy)]
pub struct StageClock {
    started: Instant,
}

impl StageClock {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

// ─── StageReport ────────────────────────────────────────────────────────────

/// What a stage reports on completion: its duration plus whichever counts
/// make sense for it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageReport {
    elapsed: Duration,
    items: Option<usize>,
    links: Option<usize>,
    relevant: Option<usize>,
}

impl StageReport {
    pub fn new(elapsed: Duration) -> Self {
        Self {
            elapsed,
            ..Self::default()
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Tokens, stopwords, n-grams or sampled expressions, depending on the stage.
    pub fn items(&self) -> Option<usize> {
        self.items
    }

    /// Neighbour links written by propagation.
    pub fn links(&self) -> Option<usize> {
        self.links
    }

    /// Relevant expressions found by classification.
    pub fn relevant(&self) -> Option<usize> {
        self.relevant
    }
}

/// Builder for [`StageReport`]s carrying counts.
#[derive(Debug, Clone)]
pub struct StageReportBuilder {
    report: StageReport,
}

impl StageReportBuilder {
    pub fn new(elapsed: Duration) -> Self {
        Self {
            report: StageReport::new(elapsed),
        }
    }

    pub fn items(mut self, n: usize) -> Self {
        self.report.items = Some(n);
        self
    }

    pub fn links(mut self, n: usize) -> Self {
        self.report.links = Some(n);
        self
    }

    pub fn relevant(mut self, n: usize) -> Self {
        self.report.relevant = Some(n);
        self
    }

    pub fn build(self) -> StageReport {
        self.report
    }
}

// ─── Observer trait ─────────────────────────────────────────────────────────

/// Callbacks fired by [`Pipeline::run`](super::runner::Pipeline::run).
///
/// All methods have empty default bodies; implement only what you need.
pub trait PipelineObserver {
    fn on_stage_start(&mut self, _stage: &'static str) {}

    fn on_stage_end(&mut self, _stage: &'static str, _report: &StageReport) {}

    fn on_tokens(&mut self, _tokens: &[String]) {}

    fn on_stopwords(&mut self, _stopwords: &StopwordFilter) {}

    /// The freshly built table, before any scoring.
    fn on_ngrams(&mut self, _table: &NGramTable) {}

    /// The table after propagation and classification.
    fn on_classified(&mut self, _table: &NGramTable) {}
}

/// Observer that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Records a `(stage, report)` pair per completed stage.
#[derive(Debug, Clone, Default)]
pub struct StageTimingObserver {
    reports: Vec<(&'static str, StageReport)>,
}

impl StageTimingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports in execution order.
    pub fn reports(&self) -> &[(&'static str, StageReport)] {
        &self.reports
    }

    pub fn report(&self, stage: &str) -> Option<&StageReport> {
        self.reports
            .iter()
            .find(|(name, _)| *name == stage)
            .map(|(_, report)| report)
    }

    pub fn total(&self) -> Duration {
        self.reports.iter().map(|(_, r)| r.elapsed()).sum()
    }
}

impl PipelineObserver for StageTimingObserver {
    fn on_stage_end(&mut self, stage: &'static str, report: &StageReport) {
        #[cfg(feature = "tracing")]
        tracing::debug!(stage, elapsed_us = report.elapsed().as_micros() as u64, "stage finished");
        self.reports.push((stage, report.clone()));
    }
}
