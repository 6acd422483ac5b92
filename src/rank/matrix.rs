//! Transition matrix construction
//!
//! Converts the link graph into a dense row-stochastic matrix and applies the
//! damping (Google) transform used by the solver.

use crate::index::LinkIndex;
use crate::RankError;

/// Square transition matrix over the indexed pages, stored row-major
///
/// Row `i` holds the probabilities of moving from page `i` (in
/// [`LinkIndex::all_urls`] order) to every other page.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionMatrix {
    dimension: usize,
    cells: Vec<f64>,
}

impl TransitionMatrix {
    /// Builds the row-stochastic link matrix `S` of an index
    ///
    /// # Construction
    ///
    /// For page `x = U[i]` and page `y = U[j]`:
    ///
    /// | Case | `S[i][j]` |
    /// |------|-----------|
    /// | `i == j` | 0 (self links never count) |
    /// | `x` links to `y` | `1 / d(x)` |
    /// | otherwise | 0 |
    ///
    /// `d(x)` counts only the targets of `x` that are themselves indexed.
    /// Links to pages that were never crawled have no column, and dividing
    /// by the raw out-degree would leak their share of probability.
    ///
    /// A page without any indexed target is a dangling node: its row becomes
    /// the uniform row `1/N`, since a surfer stuck there can only jump to an
    /// arbitrary page.
    ///
    /// # Errors
    ///
    /// * `RankError::EmptyGraph` - the index has no pages
    pub fn from_index(index: &LinkIndex) -> Result<Self, RankError> {
        let urls = index.all_urls();
        let n = urls.len();

        if n == 0 {
            return Err(RankError::EmptyGraph);
        }

        let mut cells = vec![0.0; n * n];
        let mut dangling = 0usize;

        for (row, x) in urls.iter().enumerate() {
            let targets: Vec<usize> = urls
                .iter()
                .enumerate()
                .filter(|&(col, y)| col != row && index.has_outlink(x, y))
                .map(|(col, _)| col)
                .collect();

            let row_cells = &mut cells[row * n..(row + 1) * n];

            if targets.is_empty() {
                dangling += 1;
                row_cells.fill(1.0 / n as f64);
            } else {
                let probability = 1.0 / targets.len() as f64;
                for col in targets {
                    row_cells[col] = probability;
                }
            }
        }

        tracing::debug!(
            "Built {}x{} transition matrix ({} dangling pages)",
            n,
            n,
            dangling
        );

        Ok(Self {
            dimension: n,
            cells,
        })
    }

    /// Creates a matrix from explicit rows
    ///
    /// # Errors
    ///
    /// * `RankError::EmptyGraph` - no rows
    /// * `RankError::InvalidParameter` - the rows do not form a square matrix
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, RankError> {
        let n = rows.len();
        if n == 0 {
            return Err(RankError::EmptyGraph);
        }

        if let Some((i, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != n) {
            return Err(RankError::InvalidParameter(format!(
                "row {} has {} columns, expected {}",
                i,
                row.len(),
                n
            )));
        }

        Ok(Self {
            dimension: n,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// Applies the damping transform `G = alpha * S + (1 - alpha) / N`
    ///
    /// A random surfer follows a link with probability `alpha` and otherwise
    /// teleports to a uniformly chosen page. Every cell of the result is
    /// strictly positive, so the chain is irreducible and aperiodic and has a
    /// unique stationary distribution that power iteration converges to.
    pub fn damped(&self, alpha: f64) -> Self {
        let teleport = (1.0 - alpha) / self.dimension as f64;

        Self {
            dimension: self.dimension,
            cells: self.cells.iter().map(|s| alpha * s + teleport).collect(),
        }
    }

    /// Matrix dimension `N` (number of pages)
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Returns the cell at row `i`, column `j`
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(j < self.dimension, "column {} out of bounds", j);
        self.row(i)[j]
    }

    /// Returns row `i`
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of bounds.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.cells[i * self.dimension..(i + 1) * self.dimension]
    }

    /// Iterates over the rows in order
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.cells.chunks_exact(self.dimension)
    }

    /// Sum of each row
    pub fn row_sums(&self) -> Vec<f64> {
        self.rows().map(|row| row.iter().sum()).collect()
    }

    /// Returns true if every cell lies in `[0, 1]` and every row sums to 1
    /// within `tolerance`
    pub fn is_row_stochastic(&self, tolerance: f64) -> bool {
        self.cells.iter().all(|&c| (0.0..=1.0).contains(&c))
            && self.row_sums().iter().all(|s| (s - 1.0).abs() <= tolerance)
    }

    /// Left-multiplies a row vector: `out[i] = Σ_j p[j] * M[j][i]`
    pub(crate) fn left_multiply(&self, p: &[f64], out: &mut [f64]) {
        out.fill(0.0);
        for (p_j, row) in p.iter().zip(self.rows()) {
            for (out_i, m_ji) in out.iter_mut().zip(row) {
                *out_i += p_j * m_ji;
            }
        }
    }
}
