//! PageRank computation
//!
//! This module contains the ranking half of the pipeline:
//! - Building the row-stochastic transition matrix from a link index
//! - Damping it into the Google matrix
//! - Power iteration to the stationary distribution
//! - Pairing scores with page URLs for output

mod matrix;
mod solver;

pub use matrix::TransitionMatrix;
pub use solver::{PageRankSolver, DEFAULT_ALPHA, DEFAULT_EPSILON, DEFAULT_MAX_ITERATIONS};

use crate::index::LinkIndex;
use serde::Serialize;

/// Result of a converged PageRank computation
///
/// A run that hits its iteration bound returns
/// `RankError::ConvergenceTimeout` instead, so every result here reached the
/// threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRankResult {
    /// Score of each page, in matrix order
    pub scores: Vec<f64>,
    /// Number of iterations performed
    pub iterations: usize,
    /// L1 distance between the last two vectors
    pub error: f64,
}

impl PageRankResult {
    /// Create a new PageRank result
    pub fn new(scores: Vec<f64>, iterations: usize, error: f64) -> Self {
        Self {
            scores,
            iterations,
            error,
        }
    }
}

/// One row of the ranking output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedPage {
    pub url: String,
    #[serde(rename = "pageRank")]
    pub page_rank: f64,
}

/// Rounds a score to the precision implied by `epsilon`
///
/// `round(value * f) / f` with `f = round(1 / epsilon)`, so the default
/// epsilon of `0.000001` keeps six decimals.
pub fn round_to_epsilon(value: f64, epsilon: f64) -> f64 {
    let factor = (1.0 / epsilon).round();
    if factor < 1.0 {
        return value;
    }
    (value * factor).round() / factor
}

/// Pairs each indexed URL with its score, highest rank first
///
/// `result.scores` must be in the order of `index.all_urls()`, i.e. the index
/// must not have been re-sorted since the matrix was built. Scores are
/// rounded with [`round_to_epsilon`]; equal ranks are ordered by URL.
pub fn rank_pages(index: &LinkIndex, result: &PageRankResult, epsilon: f64) -> Vec<RankedPage> {
    let mut ranked: Vec<RankedPage> = index
        .all_urls()
        .iter()
        .zip(&result.scores)
        .map(|(url, &score)| RankedPage {
            url: url.clone(),
            page_rank: round_to_epsilon(score, epsilon),
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.page_rank
            .total_cmp(&a.page_rank)
            .then_with(|| a.url.cmp(&b.url))
    });

    ranked
}
