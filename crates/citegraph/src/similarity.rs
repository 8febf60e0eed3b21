//! Bounded similarity between two records.
//!
//! The score is a weighted sum of three Jaccard indices over normalized
//! sets: title tokens, authors and keywords. Each component is 0 when both
//! sets are empty, so degenerate records never anchor an inferred edge.

use crate::config::SimilarityWeights;
use crate::domain::Record;
use serde::Serialize;
use std::collections::BTreeSet;

/// Jaccard index `|A ∩ B| / |A ∪ B|`, or 0 when both sets are empty.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeSet;
/// use citegraph::similarity::jaccard;
///
/// let a: BTreeSet<_> = ["x", "y", "z"].into_iter().collect();
/// let b: BTreeSet<_> = ["y", "z", "w"].into_iter().collect();
/// assert!((jaccard(&a, &b) - 0.5).abs() < 1e-12);
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn jaccard<T: Ord>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

/// Per-component similarity scores for one pair of records.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimilarityBreakdown {
    /// Jaccard index over title tokens.
    pub title: f64,
    /// Jaccard index over authors.
    pub authors: f64,
    /// Jaccard index over keywords.
    pub keywords: f64,
    /// Weighted sum, clamped to `[0, 1]`.
    pub combined: f64,
}

/// Computes combined similarity scores with fixed component weights.
#[derive(Debug, Clone, Copy)]
pub struct SimilarityEstimator {
    weights: SimilarityWeights,
}

impl SimilarityEstimator {
    /// Creates an estimator with the given (already validated) weights.
    #[must_use]
    pub fn new(weights: SimilarityWeights) -> Self {
        Self { weights }
    }

    /// Returns the weights in use.
    #[must_use]
    pub fn weights(&self) -> SimilarityWeights {
        self.weights
    }

    /// Combined similarity of two distinct records, in `[0, 1]`.
    ///
    /// Symmetric in its arguments. Callers never pass a record with itself.
    #[must_use]
    pub fn score(&self, a: &Record, b: &Record) -> f64 {
        self.breakdown(a, b).combined
    }

    /// Component scores and their weighted combination.
    #[must_use]
    pub fn breakdown(&self, a: &Record, b: &Record) -> SimilarityBreakdown {
        debug_assert_ne!(a.id, b.id, "self-similarity is never evaluated");

        let title = jaccard(&a.title_tokens, &b.title_tokens);
        let authors = jaccard(&a.authors, &b.authors);
        let keywords = jaccard(&a.keywords, &b.keywords);
        let combined = (self.weights.title * title
            + self.weights.authors * authors
            + self.weights.keywords * keywords)
            .clamp(0.0, 1.0);

        SimilarityBreakdown {
            title,
            authors,
            keywords,
            combined,
        }
    }
}

impl Default for SimilarityEstimator {
    fn default() -> Self {
        Self::new(SimilarityWeights::default())
    }
}
