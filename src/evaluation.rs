//! Precision, recall and F1 over a manually judged sample

use rustc_hash::FxHashSet;
use serde::Serialize;

/// Fraction of extracted items that are correct
pub fn precision(true_positives: usize, false_positives: usize) -> f64 {
    let total = true_positives + false_positives;
    if total == 0 {
        return 0.0;
    }
    true_positives as f64 / total as f64
}

/// Fraction of correct items that were extracted
pub fn recall(true_positives: usize, false_negatives: usize) -> f64 {
    let total = true_positives + false_negatives;
    if total == 0 {
        return 0.0;
    }
    true_positives as f64 / total as f64
}

/// Harmonic mean of precision and recall
pub fn f1(precision: f64, recall: f64) -> f64 {
    let sum = precision + recall;
    if sum == 0.0 {
        return 0.0;
    }
    2.0 * precision * recall / sum
}

/// Scores for a judged sample of extracted expressions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl EvaluationReport {
    /// Build a report from raw counts
    pub fn from_counts(true_positives: usize, false_positives: usize, false_negatives: usize) -> Self {
        let p = precision(true_positives, false_positives);
        let r = recall(true_positives, false_negatives);
        Self {
            true_positives,
            false_positives,
            false_negatives,
            precision: p,
            recall: r,
            f1: f1(p, r),
        }
    }

    /// Compare a sample against the expressions a judge accepted
    ///
    /// Sampled items that were accepted are true positives, the rest are
    /// false positives. Accepted items missing from the sample are false
    /// negatives.
    pub fn from_judgements<S, A>(sample: &[S], accepted: &[A]) -> Self
    where
        S: AsRef<str>,
        A: AsRef<str>,
    {
        let sampled: FxHashSet<&str> = sample.iter().map(AsRef::as_ref).collect();
        let accepted: FxHashSet<&str> = accepted.iter().map(AsRef::as_ref).collect();

        let tp = sampled.intersection(&accepted).count();
        let fp = sampled.len() - tp;
        let fn_ = accepted.len() - tp;
        Self::from_counts(tp, fp, fn_)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precision_recall_f1() {
        assert!((precision(3, 1) - 0.75).abs() < 1e-12);
        assert!((recall(3, 3) - 0.5).abs() < 1e-12);
        assert!((f1(0.75, 0.5) - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_zero_denominators() {
        assert_eq!(precision(0, 0), 0.0);
        assert_eq!(recall(0, 0), 0.0);
        assert_eq!(f1(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_from_judgements() {
        let sample = ["new york", "york is", "hot dog"];
        let accepted = ["new york", "hot dog", "ice cream", "san francisco"];
        let report = EvaluationReport::from_judgements(&sample, &accepted);

        assert_eq!(report.true_positives, 2);
        assert_eq!(report.false_positives, 1);
        assert_eq!(report.false_negatives, 2);
        assert!((report.precision - 2.0 / 3.0).abs() < 1e-12);
        assert!((report.recall - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_report_serializes() {
        let report = EvaluationReport::from_counts(1, 1, 0);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["true_positives"], 1);
        assert_eq!(json["precision"], 0.5);
        assert_eq!(json["recall"], 1.0);
    }
}
