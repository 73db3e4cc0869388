//! Validation engine for extraction specifications.
//!
//! The engine runs all registered [`ValidationRule`]s against an
//! [`ExtractionSpec`](super::spec::ExtractionSpec) and collects every
//! diagnostic into a [`ValidationReport`]. It never short-circuits on the
//! first error, so users see all problems at once.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use rapid_localmaxs::pipeline::validation::ValidationEngine;
//!
//! let engine = ValidationEngine::with_defaults();
//! let report = engine.validate(&spec);
//! if report.has_errors() {
//!     for err in report.errors() {
//!         eprintln!("{err}");
//!     }
//! }
//! ```

use std::collections::HashMap;

use serde::Serialize;

use super::error_code::ErrorCode;
use super::errors::PipelineSpecError;
use super::spec::*;
use crate::errors::{LocalMaxsError, Result};
use crate::types::{GlueFunction, LocalMaxsConfig, MAX_NGRAM_SIZE, MIN_NGRAM_SIZE};

// ─── Severity ───────────────────────────────────────────────────────────────

/// Whether a diagnostic is a hard error or a soft warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

// ─── Diagnostic ─────────────────────────────────────────────────────────────

/// A single validation finding: a severity plus the
/// [`PipelineSpecError`] carrying code, path, message and hint.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationDiagnostic {
    pub severity: Severity,
    #[serde(flatten)]
    pub error: PipelineSpecError,
}

impl ValidationDiagnostic {
    pub fn error(err: PipelineSpecError) -> Self {
        Self {
            severity: Severity::Error,
            error: err,
        }
    }

    pub fn warning(err: PipelineSpecError) -> Self {
        Self {
            severity: Severity::Warning,
            error: err,
        }
    }
}

// ─── Report ─────────────────────────────────────────────────────────────────

/// Collected diagnostics from running all validation rules.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    /// Iterate over error-severity diagnostics.
    pub fn errors(&self) -> impl Iterator<Item = &PipelineSpecError> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .map(|d| &d.error)
    }

    /// Iterate over warning-severity diagnostics.
    pub fn warnings(&self) -> impl Iterator<Item = &PipelineSpecError> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .map(|d| &d.error)
    }

    /// Returns `true` if any diagnostic is an error.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Returns `true` if there are no errors (warnings are acceptable).
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// One line per error, for embedding in [`LocalMaxsError::Validation`].
    pub fn error_summary(&self) -> String {
        self.errors()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

// ─── Rule trait ─────────────────────────────────────────────────────────────

/// A single validation rule that inspects an [`ExtractionSpec`] and returns
/// zero or more diagnostics.
///
/// Rules are stateless and must be `Send + Sync` so a long-lived engine can
/// be shared across threads.
pub trait ValidationRule: Send + Sync {
    /// Short, stable identifier for this rule (e.g., `"glue_function"`).
    fn name(&self) -> &str;

    /// Inspect `spec` and return any findings.
    fn validate(&self, spec: &ExtractionSpec) -> Vec<ValidationDiagnostic>;
}

// ─── Engine ─────────────────────────────────────────────────────────────────

/// Runs a set of [`ValidationRule`]s against an [`ExtractionSpec`] and
/// collects all diagnostics into a [`ValidationReport`].
pub struct ValidationEngine {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl ValidationEngine {
    /// Create an empty engine with no rules.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Create an engine pre-loaded with the default rule set.
    pub fn with_defaults() -> Self {
        let mut engine = Self::new();
        engine.add_rule(Box::new(VersionRule));
        engine.add_rule(Box::new(GlueFunctionRule));
        engine.add_rule(Box::new(ThresholdParamsRule));
        engine.add_rule(Box::new(NGramSizeRule));
        engine.add_rule(Box::new(SampleSizeRule));
        engine.add_rule(Box::new(UnknownFieldsRule));
        engine
    }

    /// Register an additional rule.
    pub fn add_rule(&mut self, rule: Box<dyn ValidationRule>) {
        self.rules.push(rule);
    }

    /// Run all rules against `spec` and return the collected report.
    pub fn validate(&self, spec: &ExtractionSpec) -> ValidationReport {
        let mut report = ValidationReport::default();
        for rule in &self.rules {
            report.diagnostics.extend(rule.validate(spec));
        }
        report
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Parse, validate and resolve a JSON spec in one step.
///
/// Warnings are logged and otherwise ignored; any error fails the load.
pub fn load_config(json: &str) -> Result<LocalMaxsConfig> {
    let spec = ExtractionSpec::from_json(json)?;
    let report = ValidationEngine::with_defaults().validate(&spec);

    #[cfg(feature = "tracing")]
    for warning in report.warnings() {
        tracing::warn!(code = %warning.code, path = %warning.path, "{}", warning.message);
    }

    if report.has_errors() {
        return Err(LocalMaxsError::Validation(report.error_summary()));
    }
    Ok(spec.to_config())
}

// ═══════════════════════════════════════════════════════════════════════════
//  Concrete rules
// ═══════════════════════════════════════════════════════════════════════════

// ─── 1. Only v1 specs are understood ────────────────────────────────────────

struct VersionRule;

impl ValidationRule for VersionRule {
    fn name(&self) -> &str {
        "version"
    }

    fn validate(&self, spec: &ExtractionSpec) -> Vec<ValidationDiagnostic> {
        if spec.v == SPEC_VERSION {
            return vec![];
        }
        vec![ValidationDiagnostic::error(
            PipelineSpecError::new(
                ErrorCode::UnsupportedVersion,
                "/v",
                format!("unsupported spec version {}", spec.v),
            )
            .with_hint(format!("Set \"v\" to {SPEC_VERSION}")),
        )]
    }
}

// ─── 2. Glue function must be recognized ────────────────────────────────────

struct GlueFunctionRule;

impl ValidationRule for GlueFunctionRule {
    fn name(&self) -> &str {
        "glue_function"
    }

    fn validate(&self, spec: &ExtractionSpec) -> Vec<ValidationDiagnostic> {
        match spec.glue_function.as_deref() {
            Some(name) if spec.glue() == GlueFunction::Unrecognized => {
                vec![ValidationDiagnostic::error(
                    PipelineSpecError::new(
                        ErrorCode::UnknownModule,
                        "/glue_function",
                        format!("unrecognized glue function \"{name}\""),
                    )
                    .with_hint("Use one of: scp, dice, mi"),
                )]
            }
            _ => vec![],
        }
    }
}

// ─── 3. Generalized-mean exponent must be a positive number ─────────────────

struct ThresholdParamsRule;

impl ValidationRule for ThresholdParamsRule {
    fn name(&self) -> &str {
        "threshold_params"
    }

    fn validate(&self, spec: &ExtractionSpec) -> Vec<ValidationDiagnostic> {
        match spec.localmaxs.p {
            Some(p) if !p.is_finite() || p <= 0.0 => {
                vec![ValidationDiagnostic::error(
                    PipelineSpecError::new(
                        ErrorCode::InvalidValue,
                        "/localmaxs/p",
                        format!("p must be a finite number greater than 0, got {p}"),
                    )
                    .with_hint("Use 2.0 for the quadratic mean"),
                )]
            }
            _ => vec![],
        }
    }
}

// ─── 4. N-gram size within the enumerable range ─────────────────────────────

struct NGramSizeRule;

impl ValidationRule for NGramSizeRule {
    fn name(&self) -> &str {
        "ngram_size"
    }

    fn validate(&self, spec: &ExtractionSpec) -> Vec<ValidationDiagnostic> {
        match spec.ngram.max_size {
            Some(size) if !(MIN_NGRAM_SIZE..=MAX_NGRAM_SIZE).contains(&size) => {
                vec![ValidationDiagnostic::error(
                    PipelineSpecError::new(
                        ErrorCode::InvalidValue,
                        "/ngram/max_size",
                        format!(
                            "max_size must be between {MIN_NGRAM_SIZE} and {MAX_NGRAM_SIZE}, got {size}"
                        ),
                    )
                    .with_hint("Remove max_size to use the default of 8"),
                )]
            }
            _ => vec![],
        }
    }
}

// ─── 5. A zero sample is allowed but almost certainly a mistake ─────────────

struct SampleSizeRule;

impl ValidationRule for SampleSizeRule {
    fn name(&self) -> &str {
        "sample_size"
    }

    fn validate(&self, spec: &ExtractionSpec) -> Vec<ValidationDiagnostic> {
        if spec.sampling.size == Some(0) {
            vec![ValidationDiagnostic::warning(
                PipelineSpecError::new(
                    ErrorCode::LimitExceeded,
                    "/sampling/size",
                    "sampling size 0 draws no expressions",
                )
                .with_hint("Remove size to sample 200 expressions"),
            )]
        } else {
            vec![]
        }
    }
}

// ─── 6. Unknown fields (strict → error, non-strict → warning) ──────────────

struct UnknownFieldsRule;

impl UnknownFieldsRule {
    /// Collect unknown-field diagnostics at the given JSON pointer `path`
    /// from the extra fields captured by `#[serde(flatten)]`.
    fn check_unknowns(
        path: &str,
        unknowns: &HashMap<String, serde_json::Value>,
        strict: bool,
    ) -> Vec<ValidationDiagnostic> {
        let mut keys: Vec<&String> = unknowns.keys().collect();
        keys.sort();
        keys.into_iter()
            .map(|key| {
                let diag_fn = if strict {
                    ValidationDiagnostic::error
                } else {
                    ValidationDiagnostic::warning
                };
                diag_fn(
                    PipelineSpecError::new(
                        ErrorCode::UnknownField,
                        format!("{path}/{key}"),
                        format!("unrecognized field \"{key}\""),
                    )
                    .with_hint("Check spelling or remove this field"),
                )
            })
            .collect()
    }
}

impl ValidationRule for UnknownFieldsRule {
    fn name(&self) -> &str {
        "unknown_fields"
    }

    fn validate(&self, spec: &ExtractionSpec) -> Vec<ValidationDiagnostic> {
        let sections: [(&str, &HashMap<String, serde_json::Value>); 5] = [
            ("", &spec.unknown_fields),
            ("/localmaxs", &spec.localmaxs.unknown_fields),
            ("/ngram", &spec.ngram.unknown_fields),
            ("/sampling", &spec.sampling.unknown_fields),
            ("/stopwords", &spec.stopwords.unknown_fields),
        ];
        sections
            .into_iter()
            .flat_map(|(path, unknowns)| Self::check_unknowns(path, unknowns, spec.strict))
            .collect()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(json: &str) -> ExtractionSpec {
        serde_json::from_str(json).unwrap()
    }

    fn engine() -> ValidationEngine {
        ValidationEngine::with_defaults()
    }

    // ─── Valid specs ────────────────────────────────────────────────────

    #[test]
    fn test_minimal_spec_is_valid() {
        let report = engine().validate(&spec(r#"{ "v": 1 }"#));
        assert!(report.is_valid());
        assert!(report.is_empty());
    }

    #[test]
    fn test_full_spec_is_valid() {
        let report = engine().validate(&spec(
            r#"{
                "v": 1,
                "glue_function": "mi",
                "localmaxs": { "p": 0.5, "frequency_floor": 0 },
                "ngram": { "max_size": 2 },
                "sampling": { "size": 10, "seed": 1 },
                "stopwords": { "source": "none" },
                "strict": true
            }"#,
        ));
        assert!(report.is_empty());
    }

    // ─── Rule: version ──────────────────────────────────────────────────

    #[test]
    fn test_unsupported_version_fails() {
        let report = engine().validate(&spec(r#"{ "v": 2 }"#));
        let errs: Vec<_> = report.errors().collect();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].code, ErrorCode::UnsupportedVersion);
        assert_eq!(errs[0].path, "/v");
    }

    // ─── Rule: glue_function ────────────────────────────────────────────

    #[test]
    fn test_unrecognized_glue_fails_up_front() {
        let report = engine().validate(&spec(r#"{ "v": 1, "glue_function": "tscore" }"#));
        let errs: Vec<_> = report.errors().collect();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].code, ErrorCode::UnknownModule);
        assert_eq!(errs[0].path, "/glue_function");
        assert!(errs[0].message.contains("tscore"));
    }

    #[test]
    fn test_glue_names_case_insensitive() {
        let report = engine().validate(&spec(r#"{ "v": 1, "glue_function": "SCP" }"#));
        assert!(report.is_valid());
    }

    // ─── Rule: threshold_params ─────────────────────────────────────────

    #[test]
    fn test_non_positive_p_fails() {
        for p in ["0.0", "-1.5"] {
            let report = engine().validate(&spec(&format!(
                r#"{{ "v": 1, "localmaxs": {{ "p": {p} }} }}"#
            )));
            let errs: Vec<_> = report.errors().collect();
            assert_eq!(errs.len(), 1, "p = {p}");
            assert_eq!(errs[0].code, ErrorCode::InvalidValue);
            assert_eq!(errs[0].path, "/localmaxs/p");
        }
    }

    // ─── Rule: ngram_size ───────────────────────────────────────────────

    #[test]
    fn test_ngram_size_out_of_range_fails() {
        for size in [0, 1, 9] {
            let report = engine().validate(&spec(&format!(
                r#"{{ "v": 1, "ngram": {{ "max_size": {size} }} }}"#
            )));
            assert!(report.has_errors(), "max_size = {size}");
            let errs: Vec<_> = report.errors().collect();
            assert_eq!(errs[0].path, "/ngram/max_size");
        }
    }

    // ─── Rule: sample_size ──────────────────────────────────────────────

    #[test]
    fn test_zero_sample_is_a_warning() {
        let report = engine().validate(&spec(r#"{ "v": 1, "sampling": { "size": 0 } }"#));
        assert!(report.is_valid());
        let warns: Vec<_> = report.warnings().collect();
        assert_eq!(warns.len(), 1);
        assert_eq!(warns[0].code, ErrorCode::LimitExceeded);
    }

    // ─── Rule: unknown_fields ───────────────────────────────────────────

    #[test]
    fn test_unknown_fields_non_strict_are_warnings() {
        let report = engine().validate(&spec(r#"{ "v": 1, "strict": false, "bogus": 42 }"#));
        assert!(report.is_valid());
        let warns: Vec<_> = report.warnings().collect();
        assert_eq!(warns.len(), 1);
        assert_eq!(warns[0].code, ErrorCode::UnknownField);
        assert_eq!(warns[0].path, "/bogus");
    }

    #[test]
    fn test_unknown_fields_strict_are_errors() {
        let report = engine().validate(&spec(r#"{ "v": 1, "strict": true, "bogus": 42 }"#));
        let errs: Vec<_> = report.errors().collect();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].code, ErrorCode::UnknownField);
    }

    #[test]
    fn test_unknown_nested_fields_reported_with_path() {
        let report = engine().validate(&spec(
            r#"{
                "v": 1,
                "strict": true,
                "ngram": { "min_size": 3 },
                "stopwords": { "lang": "en" }
            }"#,
        ));
        let paths: Vec<_> = report.errors().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["/ngram/min_size", "/stopwords/lang"]);
    }

    // ─── Engine ─────────────────────────────────────────────────────────

    #[test]
    fn test_multiple_rules_fire_independently() {
        let report = engine().validate(&spec(
            r#"{
                "v": 1,
                "strict": true,
                "bogus": true,
                "glue_function": "nope",
                "localmaxs": { "p": -2.0 }
            }"#,
        ));
        assert_eq!(report.errors().count(), 3);
        assert!(report.error_summary().contains("nope"));
    }

    #[test]
    fn test_custom_rule() {
        struct AlwaysWarnRule;
        impl ValidationRule for AlwaysWarnRule {
            fn name(&self) -> &str {
                "always_warn"
            }
            fn validate(&self, _spec: &ExtractionSpec) -> Vec<ValidationDiagnostic> {
                vec![ValidationDiagnostic::warning(PipelineSpecError::new(
                    ErrorCode::ValidationFailed,
                    "",
                    "custom warning",
                ))]
            }
        }

        let mut eng = ValidationEngine::new();
        eng.add_rule(Box::new(AlwaysWarnRule));
        let report = eng.validate(&spec(r#"{ "v": 1 }"#));
        assert!(report.is_valid());
        assert_eq!(report.warnings().count(), 1);
    }

    #[test]
    fn test_report_serializes_to_json() {
        let report = engine().validate(&spec(r#"{ "v": 1, "glue_function": "x" }"#));
        let json = serde_json::to_value(&report).unwrap();
        let diags = json["diagnostics"].as_array().unwrap();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0]["severity"], "error");
        assert_eq!(diags[0]["code"], "unknown_module");
    }

    // ─── load_config ────────────────────────────────────────────────────

    #[test]
    fn test_load_config_valid() {
        let cfg = load_config(r#"{ "v": 1, "glue_function": "dice", "sampling": { "size": 0 } }"#).unwrap();
        assert_eq!(cfg.glue_function, GlueFunction::Dice);
        assert_eq!(cfg.sample_size, 0);
    }

    #[test]
    fn test_load_config_rejects_invalid() {
        let err = load_config(r#"{ "v": 1, "glue_function": "tscore" }"#).unwrap_err();
        assert!(matches!(err, LocalMaxsError::Validation(_)));

        let err = load_config("not json").unwrap_err();
        assert!(matches!(err, LocalMaxsError::InvalidSpec(_)));
    }
}
