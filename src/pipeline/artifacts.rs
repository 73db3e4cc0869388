//! Pipeline artifacts.
//!
//! [`ExtractionResult`] is what [`Pipeline::run`](super::runner::Pipeline::run)
//! hands back: the full classified table plus the views callers usually
//! want (relevant expressions ranked by glue, and the evaluation sample).

use serde::Serialize;

use crate::localmaxs::PropagationStats;
use crate::ngram::NGramTable;
use crate::nlp::stopwords::StopwordFilter;

/// A relevant expression with the scores that made it one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelevantExpression {
    pub expression: String,
    pub size: usize,
    pub frequency: usize,
    pub glue: f64,
}

/// Relevant expressions of a classified table, by glue descending.
///
/// Ties are broken by the expression text so the order is stable.
pub fn rank_relevant(table: &NGramTable) -> Vec<RelevantExpression> {
    let mut relevant: Vec<RelevantExpression> = table
        .as_slice()
        .iter()
        .filter(|n| n.is_relevant_expression)
        .map(|n| RelevantExpression {
            expression: n.key.clone(),
            size: n.size(),
            frequency: n.frequency,
            glue: n.glue,
        })
        .collect();
    relevant.sort_by(|a, b| {
        b.glue
            .total_cmp(&a.glue)
            .then_with(|| a.expression.cmp(&b.expression))
    });
    relevant
}

/// Output of one extraction run.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Every n-gram with its glue, neighbour maxima and relevance flag.
    pub table: NGramTable,
    /// Stopwords the run used.
    pub stopwords: StopwordFilter,
    /// Relevant expressions, best glue first.
    pub relevant: Vec<RelevantExpression>,
    /// Random subset of relevant expressions for manual evaluation.
    pub sample: Vec<String>,
    pub num_tokens: usize,
    pub stats: PropagationStats,
}

impl ExtractionResult {
    /// Relevant expression strings, best glue first.
    pub fn relevant_expressions(&self) -> Vec<String> {
        self.relevant.iter().map(|r| r.expression.clone()).collect()
    }

    pub fn num_ngrams(&self) -> usize {
        self.table.len()
    }

    pub fn num_relevant(&self) -> usize {
        self.relevant.len()
    }

    /// Serializable digest of the run (no table).
    pub fn summary(&self) -> ExtractionSummary<'_> {
        ExtractionSummary {
            num_tokens: self.num_tokens,
            num_stopwords: self.stopwords.len(),
            num_ngrams: self.table.len(),
            num_relevant: self.relevant.len(),
            relevant: &self.relevant,
            sample: &self.sample,
        }
    }
}

/// JSON-facing view of an [`ExtractionResult`].
#[derive(Debug, Serialize)]
pub struct ExtractionSummary<'a> {
    pub num_tokens: usize,
    pub num_stopwords: usize,
    pub num_ngrams: usize,
    pub num_relevant: usize,
    pub relevant: &'a [RelevantExpression],
    pub sample: &'a [String],
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ngram::NGram;

    fn scored(key: &str, frequency: usize, glue: f64, relevant: bool) -> NGram {
        let mut n = NGram::with_frequency(key.split(' ').map(String::from).collect(), frequency);
        n.glue = glue;
        n.is_relevant_expression = relevant;
        n
    }

    #[test]
    fn test_rank_relevant_orders_by_glue() {
        let mut table = NGramTable::new();
        table.insert(scored("b c", 3, 0.4, true));
        table.insert(scored("x y", 3, 0.9, false));
        table.insert(scored("a b", 4, 0.7, true));
        table.insert(scored("a c", 5, 0.4, true));

        let ranked: Vec<_> = rank_relevant(&table)
            .into_iter()
            .map(|r| r.expression)
            .collect();
        assert_eq!(ranked, vec!["a b", "a c", "b c"]);
    }

    #[test]
    fn test_summary_serializes() {
        let mut table = NGramTable::new();
        table.insert(scored("new york", 3, 0.5, true));
        let relevant = rank_relevant(&table);
        let result = ExtractionResult {
            table,
            stopwords: StopwordFilter::empty(),
            relevant,
            sample: vec!["new york".to_string()],
            num_tokens: 10,
            stats: PropagationStats::default(),
        };

        let json = serde_json::to_value(result.summary()).unwrap();
        assert_eq!(json["num_ngrams"], 1);
        assert_eq!(json["relevant"][0]["expression"], "new york");
        assert_eq!(json["relevant"][0]["size"], 2);
        assert_eq!(json["sample"][0], "new york");
    }
}
