use ndarray::Array2;

use crate::scoring::domain::iou::ScoringError;

/// Domain interface for bipartite assignment.
///
/// Given a rectangular `rows x cols` cost matrix, returns `(row, col)` pairs
/// forming a one-to-one matching of size `min(rows, cols)` with minimal
/// total cost.
pub trait LabelAssigner: Send + Sync {
    fn assign(&self, costs: &Array2<f64>) -> Result<Vec<(usize, usize)>, ScoringError>;
}
