use ndarray::Array2;
use pathfinding::kuhn_munkres::kuhn_munkres_min;
use pathfinding::matrix::Matrix;

use crate::scoring::domain::iou::ScoringError;
use crate::scoring::domain::label_assigner::LabelAssigner;
use crate::shared::constants::IOU_COST_SCALE;

/// Hungarian-method assignment via `pathfinding::kuhn_munkres`.
///
/// Costs are scaled to fixed-point `i64`. The solver needs at least as many
/// columns as rows, so taller matrices are solved transposed. Non-finite
/// costs are treated as the largest finite cost in the matrix.
pub struct KuhnMunkresAssigner {
    scale: f64,
}

impl KuhnMunkresAssigner {
    pub fn new(scale: f64) -> Self {
        Self { scale }
    }
}

impl Default for KuhnMunkresAssigner {
    fn default() -> Self {
        Self::new(IOU_COST_SCALE)
    }
}

impl LabelAssigner for KuhnMunkresAssigner {
    fn assign(&self, costs: &Array2<f64>) -> Result<Vec<(usize, usize)>, ScoringError> {
        let (rows, cols) = costs.dim();
        if rows == 0 || cols == 0 {
            return Ok(Vec::new());
        }

        let transposed = rows > cols;
        let view = if transposed { costs.t() } else { costs.view() };
        let (n, m) = view.dim();

        let fallback = view
            .iter()
            .copied()
            .filter(|c| c.is_finite())
            .fold(0.0_f64, f64::max);
        let weights: Vec<i64> = view
            .iter()
            .map(|&c| {
                let c = if c.is_finite() { c } else { fallback };
                (c * self.scale).round() as i64
            })
            .collect();

        let matrix = Matrix::from_vec(n, m, weights)
            .map_err(|e| ScoringError::Assignment(format!("{e:?}")))?;
        let (total, assignment) = kuhn_munkres_min(&matrix);
        log::debug!(
            "Assigned {n}x{m} cost matrix, total cost {:.4}",
            total as f64 / self.scale
        );

        Ok(assignment
            .into_iter()
            .enumerate()
            .map(|(i, j)| if transposed { (j, i) } else { (i, j) })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn sorted(mut pairs: Vec<(usize, usize)>) -> Vec<(usize, usize)> {
        pairs.sort();
        pairs
    }

    #[test]
    fn test_identity_square_assigns_diagonal() {
        let costs = array![[0.0, 1.0], [1.0, 0.0]];
        let pairs = KuhnMunkresAssigner::default().assign(&costs).unwrap();
        assert_eq!(sorted(pairs), vec![(0, 0), (1, 1)]);
    }

    #[test]
    fn test_swapped_square() {
        let costs = array![[1.0, 0.0], [0.0, 1.0]];
        let pairs = KuhnMunkresAssigner::default().assign(&costs).unwrap();
        assert_eq!(sorted(pairs), vec![(0, 1), (1, 0)]);
    }

    #[test]
    fn test_greedy_choice_is_not_optimal() {
        // greedy would take (0,0)=0.1 then (1,1)=0.9 for 1.0 total;
        // optimal is (0,1)+(1,0) = 0.3 + 0.2 = 0.5
        let costs = array![[0.1, 0.3], [0.2, 0.9]];
        let pairs = KuhnMunkresAssigner::default().assign(&costs).unwrap();
        assert_eq!(sorted(pairs), vec![(0, 1), (1, 0)]);
    }

    #[test]
    fn test_wide_matrix_assigns_every_row() {
        let costs = array![[0.9, 0.0, 0.5], [0.0, 0.9, 0.5]];
        let pairs = KuhnMunkresAssigner::default().assign(&costs).unwrap();
        assert_eq!(sorted(pairs), vec![(0, 1), (1, 0)]);
    }

    #[test]
    fn test_tall_matrix_assigns_every_column() {
        let costs = array![[0.9, 0.0], [0.0, 0.9], [0.5, 0.5]];
        let pairs = KuhnMunkresAssigner::default().assign(&costs).unwrap();
        assert_eq!(sorted(pairs), vec![(0, 1), (1, 0)]);
    }

    #[test]
    fn test_empty_matrix_yields_no_pairs() {
        let costs = Array2::<f64>::zeros((0, 3));
        assert!(KuhnMunkresAssigner::default().assign(&costs).unwrap().is_empty());
    }

    #[test]
    fn test_nan_cost_treated_as_worst() {
        let costs = array![[f64::NAN, 0.2], [0.1, 0.5]];
        let pairs = KuhnMunkresAssigner::default().assign(&costs).unwrap();
        assert_eq!(sorted(pairs), vec![(0, 1), (1, 0)]);
    }
}
