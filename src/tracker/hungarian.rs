//! Optimal assignment over a rectangular cost matrix.
//!
//! Rectangular inputs are padded to square with a constant dummy cost, so
//! every perfect matching of the padded matrix restricts to a maximum
//! matching of the original one with the same relative cost.

use ndarray::Array2;

use crate::tracker::error::SolverError;

/// Minimum-cost bipartite matching.
///
/// Returns, for each row, the column it is assigned to, or `None` when the
/// matrix has more rows than columns and the row was left over.
pub trait AssignmentSolver: Send + Sync {
    fn solve(&self, cost: &Array2<f64>) -> Result<Vec<Option<usize>>, SolverError>;
}

/// Cubic Hungarian algorithm over row and column potentials. Rows are
/// inserted in index order and ties go to the lowest column, so equal costs
/// resolve to the identity pairing.
#[derive(Debug, Clone, Copy, Default)]
pub struct HungarianSolver;

/// Jonker-Volgenant solver from the `lapjv` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct LapjvSolver;

impl AssignmentSolver for HungarianSolver {
    fn solve(&self, cost: &Array2<f64>) -> Result<Vec<Option<usize>>, SolverError> {
        let (rows, cols) = validate(cost)?;
        let padded = pad_square(cost);
        let row_to_col = shortest_augmenting_path(&padded);
        Ok(restrict(&row_to_col, rows, cols))
    }
}

impl AssignmentSolver for LapjvSolver {
    fn solve(&self, cost: &Array2<f64>) -> Result<Vec<Option<usize>>, SolverError> {
        let (rows, cols) = validate(cost)?;
        let padded = pad_square(cost);
        let (row_to_col, _) =
            lapjv::lapjv(&padded).map_err(|e| SolverError::Backend(format!("{e:?}")))?;
        Ok(restrict(&row_to_col, rows, cols))
    }
}

fn validate(cost: &Array2<f64>) -> Result<(usize, usize), SolverError> {
    let (rows, cols) = cost.dim();
    if rows == 0 || cols == 0 {
        return Err(SolverError::EmptyMatrix { rows, cols });
    }
    if let Some(((row, col), _)) = cost.indexed_iter().find(|(_, c)| !c.is_finite()) {
        return Err(SolverError::NonFiniteCost { row, col });
    }
    Ok((rows, cols))
}

fn pad_square(cost: &Array2<f64>) -> Array2<f64> {
    let (rows, cols) = cost.dim();
    let size = rows.max(cols);
    let dummy = cost.iter().copied().fold(0.0, f64::max);
    let mut padded = Array2::from_elem((size, size), dummy);
    padded.slice_mut(ndarray::s![..rows, ..cols]).assign(cost);
    padded
}

fn restrict(row_to_col: &[usize], rows: usize, cols: usize) -> Vec<Option<usize>> {
    row_to_col
        .iter()
        .take(rows)
        .map(|&col| (col < cols).then_some(col))
        .collect()
}

/// Kuhn-Munkres with row and column potentials.
///
/// Rows are inserted one at a time, each by a Dijkstra-style search for the
/// shortest augmenting path over reduced costs, which is O(n^2) per row.
/// Columns are scanned in ascending order with strict comparisons, so the
/// lowest column wins among equal candidates.
fn shortest_augmenting_path(cost: &Array2<f64>) -> Vec<usize> {
    let n = cost.nrows();
    // Rows and columns are 1-based here; column 0 roots every search and
    // `col_owner[j] == 0` marks a free column.
    let mut row_potential = vec![0.0; n + 1];
    let mut col_potential = vec![0.0; n + 1];
    let mut col_owner = vec![0usize; n + 1];
    let mut way = vec![0usize; n + 1];

    for row in 1..=n {
        col_owner[0] = row;
        let mut j0 = 0;
        let mut min_slack = vec![f64::INFINITY; n + 1];
        let mut used = vec![false; n + 1];

        loop {
            used[j0] = true;
            let i0 = col_owner[j0];
            let costs = cost.row(i0 - 1);
            let mut delta = f64::INFINITY;
            let mut j1 = 0;
            for j in 1..=n {
                if used[j] {
                    continue;
                }
                let reduced = costs[j - 1] - row_potential[i0] - col_potential[j];
                if reduced < min_slack[j] {
                    min_slack[j] = reduced;
                    way[j] = j0;
                }
                if min_slack[j] < delta {
                    delta = min_slack[j];
                    j1 = j;
                }
            }
            for j in 0..=n {
                if used[j] {
                    row_potential[col_owner[j]] += delta;
                    col_potential[j] -= delta;
                } else {
                    min_slack[j] -= delta;
                }
            }
            j0 = j1;
            if col_owner[j0] == 0 {
                break;
            }
        }

        // Flip the alternating path back to the root.
        while j0 != 0 {
            let prev = way[j0];
            col_owner[j0] = col_owner[prev];
            j0 = prev;
        }
    }

    let mut row_to_col = vec![0; n];
    for (col, &owner) in col_owner.iter().enumerate().skip(1) {
        row_to_col[owner - 1] = col - 1;
    }
    row_to_col
}
