use std::collections::BTreeSet;

use ndarray::{Array2, ArrayBase, Data, Dimension};

/// A body-part identifier. 0 is background by convention.
pub type Label = u32;

/// A 2-D grid of part labels, indexed `[row, col]`.
pub type LabelMap = Array2<Label>;

/// Sorted distinct labels present in an array of any rank.
pub fn unique_labels<S, D>(labels: &ArrayBase<S, D>) -> Vec<Label>
where
    S: Data<Elem = Label>,
    D: Dimension,
{
    labels
        .iter()
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
