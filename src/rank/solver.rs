//! Power-iteration PageRank solver

use super::matrix::TransitionMatrix;
use super::PageRankResult;
use crate::RankError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Default damping factor
pub const DEFAULT_ALPHA: f64 = 0.85;

/// Default convergence threshold (L1 distance between iterations)
pub const DEFAULT_EPSILON: f64 = 0.000001;

/// Default iteration bound
pub const DEFAULT_MAX_ITERATIONS: usize = 10_000;

/// PageRank solver over a row-stochastic transition matrix
///
/// # Example
///
/// ```
/// use sumi_rank::rank::{PageRankSolver, TransitionMatrix};
///
/// let s = TransitionMatrix::from_rows(vec![
///     vec![0.0, 1.0, 0.0],
///     vec![0.0, 0.0, 1.0],
///     vec![1.0, 0.0, 0.0],
/// ])
/// .unwrap();
///
/// let result = PageRankSolver::new(0.85, 1e-6).unwrap().solve(&s).unwrap();
/// assert!(result.error < 1e-6);
/// assert!(result.scores.iter().all(|p| (p - 1.0 / 3.0).abs() < 1e-6));
/// ```
#[derive(Debug, Clone)]
pub struct PageRankSolver {
    alpha: f64,
    epsilon: f64,
    max_iterations: usize,
    cancel: Option<Arc<AtomicBool>>,
}

impl Default for PageRankSolver {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            epsilon: DEFAULT_EPSILON,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            cancel: None,
        }
    }
}

impl PageRankSolver {
    /// Creates a solver with the given damping factor and threshold
    ///
    /// # Errors
    ///
    /// * `RankError::InvalidParameter` - `alpha` outside `(0, 1)` or
    ///   `epsilon` not strictly positive
    pub fn new(alpha: f64, epsilon: f64) -> Result<Self, RankError> {
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(RankError::InvalidParameter(format!(
                "alpha must be in (0, 1), got {}",
                alpha
            )));
        }

        if !(epsilon > 0.0 && epsilon.is_finite()) {
            return Err(RankError::InvalidParameter(format!(
                "epsilon must be positive, got {}",
                epsilon
            )));
        }

        Ok(Self {
            alpha,
            epsilon,
            ..Self::default()
        })
    }

    /// Sets the iteration bound
    ///
    /// # Errors
    ///
    /// * `RankError::InvalidParameter` - `max_iterations` is zero
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Result<Self, RankError> {
        if max_iterations == 0 {
            return Err(RankError::InvalidParameter(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        self.max_iterations = max_iterations;
        Ok(self)
    }

    /// Sets a flag that stops the iteration when raised
    ///
    /// The flag is checked between iterations, never in the middle of one.
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Damping factor
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Convergence threshold
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Iteration bound
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Computes the PageRank vector of `s`
    pub fn solve(&self, s: &TransitionMatrix) -> Result<PageRankResult, RankError> {
        self.solve_with(s, |_, _, _| {})
    }

    /// Computes the PageRank vector of `s`, reporting every iteration
    ///
    /// # Algorithm
    ///
    /// 1. Damp `s` into `G = alpha * S + (1 - alpha) / N`
    /// 2. Start from the uniform vector `P[i] = 1/N`
    /// 3. Repeat: `P'[i] = Σ_j P[j] * G[j][i]`, `error = Σ_i |P'[i] - P[i]|`,
    ///    call `on_iteration(iteration, &P', error)`, `P = P'`
    /// 4. Stop as soon as `error < epsilon`
    ///
    /// At least one iteration always runs. The callback only observes; it
    /// cannot alter the iteration.
    ///
    /// # Errors
    ///
    /// * `RankError::ConvergenceTimeout` - `max_iterations` iterations ran
    ///   without reaching `epsilon`
    /// * `RankError::Cancelled` - the cancel flag was raised
    pub fn solve_with<F>(
        &self,
        s: &TransitionMatrix,
        mut on_iteration: F,
    ) -> Result<PageRankResult, RankError>
    where
        F: FnMut(usize, &[f64], f64),
    {
        let n = s.dimension();
        let g = s.damped(self.alpha);

        let mut scores = vec![1.0 / n as f64; n];
        let mut next = vec![0.0; n];
        let mut iterations = 0;

        loop {
            if self.is_cancelled() {
                tracing::warn!("PageRank cancelled after {} iterations", iterations);
                return Err(RankError::Cancelled { iterations });
            }

            g.left_multiply(&scores, &mut next);

            let error: f64 = next
                .iter()
                .zip(&scores)
                .map(|(new, old)| (new - old).abs())
                .sum();

            on_iteration(iterations, &next, error);
            tracing::trace!("Iteration {}: error {:e}", iterations, error);

            std::mem::swap(&mut scores, &mut next);
            iterations += 1;

            if error < self.epsilon {
                tracing::debug!(
                    "PageRank converged after {} iterations (error {:e})",
                    iterations,
                    error
                );
                return Ok(PageRankResult::new(scores, iterations, error));
            }

            if iterations >= self.max_iterations {
                return Err(RankError::ConvergenceTimeout { iterations, error });
            }
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}
