//! SCP, Dice and Mutual Information over a pseudo-bigram split
//!
//! An n-gram of size n is scored as if it were the bigram (head, tail),
//! where head and tail are its two overlapping (n-1)-token spans.

/// Frequencies of an n-gram and of its two (n-1)-token spans
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitFrequencies {
    /// Frequency of the whole n-gram
    pub full: usize,
    /// Frequency of the span without the last token
    pub head: usize,
    /// Frequency of the span without the first token
    pub tail: usize,
}

impl SplitFrequencies {
    pub fn new(full: usize, head: usize, tail: usize) -> Self {
        Self { full, head, tail }
    }
}

/// Symmetric conditional probability: P(full)^2 / (P(head) * P(tail))
pub fn scp(freq: SplitFrequencies, total_count: usize) -> f64 {
    if total_count == 0 {
        return 0.0;
    }
    let total = total_count as f64;
    let p_full = freq.full as f64 / total;
    let denominator = (freq.head as f64 / total) * (freq.tail as f64 / total);

    if denominator > 0.0 {
        p_full * p_full / denominator
    } else {
        0.0
    }
}

/// Dice coefficient: 2 * f(full) / (f(head) + f(tail))
pub fn dice(freq: SplitFrequencies) -> f64 {
    let denominator = (freq.head + freq.tail) as f64;
    if denominator > 0.0 {
        2.0 * freq.full as f64 / denominator
    } else {
        0.0
    }
}

/// Mutual information: log2(P(full) / (P(head) * P(tail)))
pub fn mutual_information(freq: SplitFrequencies, total_count: usize) -> f64 {
    if total_count == 0 {
        return 0.0;
    }
    let total = total_count as f64;
    let p_full = freq.full as f64 / total;
    let denominator = (freq.head as f64 / total) * (freq.tail as f64 / total);

    if denominator > 0.0 && p_full > 0.0 {
        (p_full / denominator).log2()
    } else {
        0.0
    }
}
