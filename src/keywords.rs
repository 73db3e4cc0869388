//! Document keywords
//!
//! Explicit keywords occur in a document. Each document gets up to
//! `total_keywords` of them: half (rounded down) from the relevant
//! expressions it contains, the rest from its single words. Terms are
//! ranked by TF-IDF within their group.
//!
//! Implicit keywords do not occur in a document but are semantically close
//! to its explicit keywords. Closeness combines the correlation of the two
//! terms' relative frequencies across documents with how near they sit
//! inside the documents that contain both.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

use crate::nlp::stopwords::StopwordFilter;
use crate::types::Document;

/// Whether a keyword is a single word or a multiword expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordKind {
    Unigram,
    Expression,
}

/// A keyword with its score (TF-IDF or semantic proximity)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Keyword {
    pub term: String,
    pub score: f64,
    pub kind: KeywordKind,
}

/// Keywords selected for one document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentKeywords {
    /// Document name
    pub document: String,
    /// Expressions first, then unigrams, each by descending score
    pub keywords: Vec<Keyword>,
}

impl DocumentKeywords {
    /// Keyword terms in order
    pub fn terms(&self) -> Vec<&str> {
        self.keywords.iter().map(|k| k.term.as_str()).collect()
    }
}

/// Select explicit keywords for every document of a corpus
///
/// Unigrams are whitespace tokens that are not stopwords. An expression
/// counts for a document when it occurs in its raw text; its term
/// frequency is the number of non-overlapping occurrences.
pub fn explicit_keywords(
    documents: &[Document],
    relevant_expressions: &[String],
    total_keywords: usize,
    stopwords: &StopwordFilter,
) -> Vec<DocumentKeywords> {
    let num_docs = documents.len() as f64;
    let num_expressions = total_keywords / 2;
    let num_unigrams = total_keywords - num_expressions;

    let doc_tokens: Vec<Vec<&str>> = documents
        .iter()
        .map(|d| d.text.split_whitespace().collect())
        .collect();
    let doc_matches: Vec<Vec<&str>> = documents
        .iter()
        .map(|d| {
            relevant_expressions
                .iter()
                .filter(|e| !e.is_empty() && d.text.contains(e.as_str()))
                .map(String::as_str)
                .collect()
        })
        .collect();

    // Document frequencies
    let mut df_unigrams: FxHashMap<&str, usize> = FxHashMap::default();
    let mut df_expressions: FxHashMap<&str, usize> = FxHashMap::default();
    for (tokens, matches) in doc_tokens.iter().zip(&doc_matches) {
        let unique: FxHashSet<&str> = tokens
            .iter()
            .copied()
            .filter(|w| !stopwords.is_stopword(w))
            .collect();
        for w in unique {
            *df_unigrams.entry(w).or_insert(0) += 1;
        }
        let unique: FxHashSet<&str> = matches.iter().copied().collect();
        for e in unique {
            *df_expressions.entry(e).or_insert(0) += 1;
        }
    }

    let idf = |df: usize| if df > 0 { (num_docs / df as f64).ln() } else { 0.0 };

    let mut results = Vec::with_capacity(documents.len());
    for ((doc, tokens), matches) in documents.iter().zip(&doc_tokens).zip(&doc_matches) {
        let total_terms = tokens.len() as f64;
        let tf = |count: usize| if total_terms > 0.0 { count as f64 / total_terms } else { 0.0 };

        let mut counts: FxHashMap<&str, usize> = FxHashMap::default();
        for w in tokens.iter().copied().filter(|w| !stopwords.is_stopword(w)) {
            *counts.entry(w).or_insert(0) += 1;
        }
        let unigram_scores: Vec<(&str, f64)> = counts
            .into_iter()
            .map(|(w, c)| (w, tf(c) * idf(df_unigrams.get(w).copied().unwrap_or(0))))
            .collect();

        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let expression_scores: Vec<(&str, f64)> = matches
            .iter()
            .copied()
            .filter(|e| seen.insert(e))
            .map(|e| {
                let count = doc.text.matches(e).count();
                (e, tf(count) * idf(df_expressions.get(e).copied().unwrap_or(0)))
            })
            .collect();

        let mut keywords = top_terms(expression_scores, num_expressions, KeywordKind::Expression);
        keywords.extend(top_terms(unigram_scores, num_unigrams, KeywordKind::Unigram));

        results.push(DocumentKeywords {
            document: doc.name.clone(),
            keywords,
        });
    }

    results
}

/// Best `n` terms by descending score, ties broken alphabetically
fn top_terms(scored: Vec<(&str, f64)>, n: usize, kind: KeywordKind) -> Vec<Keyword> {
    ranked(scored, n)
        .into_iter()
        .map(|(term, score)| Keyword {
            term: term.to_string(),
            score,
            kind,
        })
        .collect()
}

fn ranked(mut scored: Vec<(&str, f64)>, n: usize) -> Vec<(&str, f64)> {
    scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    scored.truncate(n);
    scored
}

// ============================================================================
// Implicit keywords
// ============================================================================

/// Per-document occurrence data for one vocabulary term
struct TermProfile {
    tokens: Vec<String>,
    /// Occurrences in each document
    counts: Vec<usize>,
    /// Occurrences over document length, per document
    relative: Vec<f64>,
    /// Mean of `relative` over the corpus
    mean: f64,
}

impl TermProfile {
    fn occurs_in(&self, doc: usize) -> bool {
        self.counts[doc] > 0
    }
}

/// Lowercased corpus with a term vocabulary and lazily computed proximities
struct ProximityModel {
    doc_tokens: Vec<Vec<String>>,
    terms: Vec<String>,
    index: FxHashMap<String, usize>,
    profiles: Vec<TermProfile>,
    cache: FxHashMap<(usize, usize), f64>,
}

impl ProximityModel {
    fn new(documents: &[Document], relevant_expressions: &[String]) -> Self {
        let texts: Vec<String> = documents.iter().map(|d| d.text.to_lowercase()).collect();
        let doc_tokens: Vec<Vec<String>> = texts
            .iter()
            .map(|t| t.split_whitespace().map(String::from).collect())
            .collect();

        let mut vocabulary: FxHashSet<String> = doc_tokens.iter().flatten().cloned().collect();
        let mut expressions: FxHashSet<String> = FxHashSet::default();
        for e in relevant_expressions {
            let e = e.to_lowercase();
            if e.split_whitespace().count() > 1 {
                expressions.insert(e.clone());
                vocabulary.insert(e);
            }
        }
        let mut terms: Vec<String> = vocabulary.into_iter().collect();
        terms.sort_unstable();

        let token_counts: Vec<FxHashMap<&str, usize>> = doc_tokens
            .iter()
            .map(|tokens| {
                let mut counts: FxHashMap<&str, usize> = FxHashMap::default();
                for t in tokens {
                    *counts.entry(t.as_str()).or_insert(0) += 1;
                }
                counts
            })
            .collect();

        let num_docs = documents.len().max(1) as f64;
        let profiles = terms
            .iter()
            .map(|term| {
                let counts: Vec<usize> = if expressions.contains(term) {
                    texts.iter().map(|t| t.matches(term.as_str()).count()).collect()
                } else {
                    token_counts
                        .iter()
                        .map(|c| c.get(term.as_str()).copied().unwrap_or(0))
                        .collect()
                };
                let relative: Vec<f64> = counts
                    .iter()
                    .zip(&doc_tokens)
                    .map(|(&c, tokens)| {
                        if tokens.is_empty() {
                            0.0
                        } else {
                            c as f64 / tokens.len() as f64
                        }
                    })
                    .collect();
                let mean = relative.iter().sum::<f64>() / num_docs;
                TermProfile {
                    tokens: term.split_whitespace().map(String::from).collect(),
                    counts,
                    relative,
                    mean,
                }
            })
            .collect();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            documents = documents.len(),
            terms = terms.len(),
            expressions = expressions.len(),
            "proximity vocabulary built"
        );

        let index = terms.iter().enumerate().map(|(i, t)| (t.clone(), i)).collect();
        Self {
            doc_tokens,
            terms,
            index,
            profiles,
            cache: FxHashMap::default(),
        }
    }

    /// Semantic proximity of two terms: `corr * sqrt(ip)`
    ///
    /// Zero when no document contains both or when `ip` is zero.
    fn proximity(&mut self, a: usize, b: usize) -> f64 {
        let pair = (a.min(b), a.max(b));
        if let Some(&cached) = self.cache.get(&pair) {
            return cached;
        }
        let value = self.compute_proximity(pair.0, pair.1);
        self.cache.insert(pair, value);
        value
    }

    fn compute_proximity(&self, a: usize, b: usize) -> f64 {
        let (pa, pb) = (&self.profiles[a], &self.profiles[b]);
        let co_docs: Vec<usize> = (0..self.doc_tokens.len())
            .filter(|&d| pa.occurs_in(d) && pb.occurs_in(d))
            .collect();
        if co_docs.is_empty() {
            return 0.0;
        }

        let ip = co_docs
            .iter()
            .map(|&d| intra_document_proximity(&self.doc_tokens[d], &pa.tokens, &pb.tokens))
            .sum::<f64>()
            / co_docs.len() as f64;
        if ip <= 0.0 {
            return 0.0;
        }
        correlation(pa, pb) * ip.sqrt()
    }
}

/// Pearson correlation of two terms' relative frequencies across documents
fn correlation(a: &TermProfile, b: &TermProfile) -> f64 {
    let n = a.relative.len() as f64;
    let (mut cov, mut var_a, mut var_b) = (0.0, 0.0, 0.0);
    for (&ra, &rb) in a.relative.iter().zip(&b.relative) {
        let (da, db) = (ra - a.mean, rb - b.mean);
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }
    let (sd_a, sd_b) = ((var_a / n).sqrt(), (var_b / n).sqrt());
    if sd_a > 0.0 && sd_b > 0.0 {
        cov / n / (sd_a * sd_b)
    } else {
        0.0
    }
}

/// `1 - min_dist / max_dist` over all occurrence pairs in one document
fn intra_document_proximity(tokens: &[String], a: &[String], b: &[String]) -> f64 {
    let pos_a = positions(tokens, a);
    let pos_b = positions(tokens, b);
    let mut min_dist = usize::MAX;
    let mut max_dist = 0;
    for &i in &pos_a {
        for &j in &pos_b {
            let d = i.abs_diff(j);
            min_dist = min_dist.min(d);
            max_dist = max_dist.max(d);
        }
    }
    if max_dist == 0 {
        0.0
    } else {
        1.0 - min_dist as f64 / max_dist as f64
    }
}

fn positions(tokens: &[String], term: &[String]) -> Vec<usize> {
    if term.is_empty() || term.len() > tokens.len() {
        return Vec::new();
    }
    tokens
        .windows(term.len())
        .enumerate()
        .filter(|(_, w)| *w == term)
        .map(|(i, _)| i)
        .collect()
}

/// Select implicit keywords for the documents of an explicit-keyword run
///
/// Candidates are corpus terms (lowercased unigrams and the given relevant
/// expressions) that do not occur in the document, are not explicit
/// keywords or stopwords, and are longer than two characters. A candidate
/// scores the sum of its proximity to each explicit keyword divided by that
/// keyword's 1-based rank. The best `num_implicit` are kept, by descending
/// score with ties broken alphabetically.
///
/// Results follow the order of `explicit`; entries naming a document that
/// is not in `documents` are skipped.
pub fn implicit_keywords(
    documents: &[Document],
    explicit: &[DocumentKeywords],
    relevant_expressions: &[String],
    num_implicit: usize,
    stopwords: &StopwordFilter,
) -> Vec<DocumentKeywords> {
    let mut model = ProximityModel::new(documents, relevant_expressions);
    let doc_index: FxHashMap<&str, usize> = documents
        .iter()
        .enumerate()
        .map(|(i, d)| (d.name.as_str(), i))
        .collect();

    let mut results = Vec::with_capacity(explicit.len());
    for doc_keywords in explicit {
        let Some(&doc) = doc_index.get(doc_keywords.document.as_str()) else {
            continue;
        };

        let explicit_lower: Vec<String> = doc_keywords
            .keywords
            .iter()
            .map(|k| k.term.to_lowercase())
            .collect();
        let anchors: Vec<(usize, f64)> = explicit_lower
            .iter()
            .enumerate()
            .filter_map(|(rank, term)| model.index.get(term).map(|&id| (id, (rank + 1) as f64)))
            .collect();

        let candidates: Vec<usize> = (0..model.terms.len())
            .filter(|&id| {
                let term = &model.terms[id];
                !model.profiles[id].occurs_in(doc)
                    && term.chars().count() > 2
                    && !stopwords.is_stopword(term)
                    && !explicit_lower.contains(term)
            })
            .collect();

        let mut scored: Vec<(usize, f64)> = Vec::with_capacity(candidates.len());
        for cand in candidates {
            let score = anchors
                .iter()
                .map(|&(anchor, rank)| model.proximity(cand, anchor) / rank)
                .sum::<f64>();
            scored.push((cand, score));
        }

        let by_term: Vec<(&str, f64)> = scored
            .iter()
            .map(|&(id, score)| (model.terms[id].as_str(), score))
            .collect();
        let keywords = ranked(by_term, num_implicit)
            .into_iter()
            .map(|(term, score)| Keyword {
                term: term.to_string(),
                score,
                kind: if term.contains(' ') {
                    KeywordKind::Expression
                } else {
                    KeywordKind::Unigram
                },
            })
            .collect();

        results.push(DocumentKeywords {
            document: documents[doc].name.clone(),
            keywords,
        });
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<Document> {
        vec![
            Document::new("doc1.txt", "cat dog cat"),
            Document::new("doc2.txt", "dog bird cat"),
        ]
    }

    #[test]
    fn test_one_result_per_document() {
        let res = explicit_keywords(&corpus(), &["cat dog".to_string()], 2, &StopwordFilter::empty());
        let names: Vec<_> = res.iter().map(|r| r.document.as_str()).collect();
        assert_eq!(names, vec!["doc1.txt", "doc2.txt"]);
    }

    #[test]
    fn test_expression_first_then_unigrams() {
        let res = explicit_keywords(&corpus(), &["cat dog".to_string()], 2, &StopwordFilter::empty());

        let doc1 = &res[0];
        assert_eq!(doc1.keywords.len(), 2);
        assert_eq!(doc1.keywords[0].term, "cat dog");
        assert_eq!(doc1.keywords[0].kind, KeywordKind::Expression);
        // "cat dog" only in doc1: tf = 1/3, idf = ln 2
        assert!((doc1.keywords[0].score - (2f64).ln() / 3.0).abs() < 1e-12);
        assert_eq!(doc1.keywords[1].kind, KeywordKind::Unigram);
    }

    #[test]
    fn test_unigram_idf() {
        let res = explicit_keywords(&corpus(), &[], 3, &StopwordFilter::empty());

        // Every word of doc1 appears in both documents: idf = 0
        assert!(res[0].keywords.iter().all(|k| k.score == 0.0));
        // Only "bird" is exclusive to doc2
        assert_eq!(res[1].keywords[0].term, "bird");
        assert!(res[1].keywords[0].score > 0.0);
    }

    #[test]
    fn test_stopwords_excluded() {
        let docs = vec![Document::new("a", "The river flows"), Document::new("b", "the sea")];
        let res = explicit_keywords(&docs, &[], 10, &StopwordFilter::from_list(&["the"]));
        assert!(res[0].terms().iter().all(|t| !t.eq_ignore_ascii_case("the")));
        assert_eq!(res[0].keywords.len(), 2);
    }

    fn proximity_corpus() -> Vec<Document> {
        vec![
            Document::new("d1", "alpha beta zz zz gamma"),
            Document::new("d2", "alpha beta alpha beta zz"),
            Document::new("d3", "alpha delta zz"),
        ]
    }

    fn explicit_for(document: &str, terms: &[&str]) -> DocumentKeywords {
        DocumentKeywords {
            document: document.to_string(),
            keywords: terms
                .iter()
                .map(|t| Keyword {
                    term: t.to_string(),
                    score: 1.0,
                    kind: KeywordKind::Unigram,
                })
                .collect(),
        }
    }

    #[test]
    fn test_implicit_keywords_are_absent_and_ranked() {
        let res = implicit_keywords(
            &proximity_corpus(),
            &[explicit_for("d3", &["alpha"])],
            &["alpha beta".to_string()],
            5,
            &StopwordFilter::empty(),
        );

        assert_eq!(res.len(), 1);
        assert_eq!(res[0].document, "d3");
        // "delta" occurs in d3, "zz" is too short, "alpha" is explicit
        assert_eq!(res[0].terms(), vec!["alpha beta", "beta", "gamma"]);
        assert_eq!(res[0].keywords[0].kind, KeywordKind::Expression);
        assert_eq!(res[0].keywords[1].kind, KeywordKind::Unigram);
        // corr = 0.327, ip = 1/3: corr * sqrt(ip) = 1/sqrt(28)
        assert!((res[0].keywords[1].score - (1.0f64 / 28.0).sqrt()).abs() < 1e-9);
        // Only co-occurrence in d1 is at a single distance
        assert_eq!(res[0].keywords[2].score, 0.0);
    }

    #[test]
    fn test_implicit_score_weighted_by_explicit_rank() {
        let docs = proximity_corpus();
        let first = implicit_keywords(&docs, &[explicit_for("d3", &["alpha"])], &[], 5, &StopwordFilter::empty());
        let second = implicit_keywords(
            &docs,
            &[explicit_for("d3", &["delta", "alpha"])],
            &[],
            5,
            &StopwordFilter::empty(),
        );

        fn beta(r: &[DocumentKeywords]) -> f64 {
            r[0].keywords.iter().find(|k| k.term == "beta").map(|k| k.score).unwrap()
        }
        assert!(beta(&first) > 0.0);
        assert!((beta(&second) - beta(&first) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_implicit_filters_and_limit() {
        let res = implicit_keywords(
            &proximity_corpus(),
            &[explicit_for("d3", &["ALPHA"])],
            &["alpha beta".to_string()],
            1,
            &StopwordFilter::from_list(&["gamma"]),
        );
        assert_eq!(res[0].terms(), vec!["alpha beta"]);

        let res = implicit_keywords(
            &proximity_corpus(),
            &[explicit_for("d3", &["alpha"])],
            &[],
            5,
            &StopwordFilter::from_list(&["gamma"]),
        );
        assert_eq!(res[0].terms(), vec!["beta"]);
    }

    #[test]
    fn test_implicit_follows_explicit_run() {
        let docs = proximity_corpus();
        let expressions = vec!["alpha beta".to_string()];
        let explicit = explicit_keywords(&docs, &expressions, 2, &StopwordFilter::empty());
        let mut with_unknown = explicit.clone();
        with_unknown.push(explicit_for("missing", &["alpha"]));

        let res = implicit_keywords(&docs, &with_unknown, &expressions, 3, &StopwordFilter::empty());

        let names: Vec<_> = res.iter().map(|r| r.document.as_str()).collect();
        assert_eq!(names, vec!["d1", "d2", "d3"]);
        for (doc, keywords) in docs.iter().zip(&res) {
            assert!(keywords.keywords.len() <= 3);
            for term in keywords.terms() {
                assert!(!doc.text.to_lowercase().contains(term), "{term} occurs in {}", doc.name);
            }
        }
    }

    #[test]
    fn test_implicit_empty_corpus() {
        let res = implicit_keywords(&[], &[explicit_for("d1", &["alpha"])], &[], 3, &StopwordFilter::empty());
        assert!(res.is_empty());
    }

    #[test]
    fn test_empty_document() {
        let docs = vec![Document::new("empty", ""), Document::new("full", "words here")];
        let res = explicit_keywords(&docs, &["words here".to_string()], 4, &StopwordFilter::empty());
        assert!(res[0].keywords.is_empty());
        assert_eq!(res[1].keywords[0].term, "words here");
    }
}
