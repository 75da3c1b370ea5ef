use std::collections::HashMap;

use ndarray::{Array, Array2, ArrayBase, Data, Dimension, Zip};

use crate::labels::domain::remap::{remap_parts, RemapTable};
use crate::scoring::domain::iou::{check_shapes, ScoringError};
use crate::scoring::domain::label_assigner::LabelAssigner;
use crate::shared::label_map::{unique_labels, Label};

/// Finds the one-to-one mapping from predicted labels to target labels that
/// maximizes total IoU.
///
/// Costs are `1 - IoU` over every (predicted, target) label pair. When there
/// are more predicted than target labels, the surplus stays unmapped and
/// becomes background under [`remap_parts`].
pub fn compute_best_iou_remapping<S1, S2, D>(
    predicted: &ArrayBase<S1, D>,
    target: &ArrayBase<S2, D>,
    assigner: &dyn LabelAssigner,
) -> Result<RemapTable, ScoringError>
where
    S1: Data<Elem = Label>,
    S2: Data<Elem = Label>,
    D: Dimension,
{
    check_shapes(predicted, target)?;
    let predicted_labels = unique_labels(predicted);
    let target_labels = unique_labels(target);

    let mut pair_counts: HashMap<(Label, Label), u64> = HashMap::new();
    let mut predicted_counts: HashMap<Label, u64> = HashMap::new();
    let mut target_counts: HashMap<Label, u64> = HashMap::new();
    Zip::from(predicted).and(target).for_each(|&p, &t| {
        *pair_counts.entry((p, t)).or_default() += 1;
        *predicted_counts.entry(p).or_default() += 1;
        *target_counts.entry(t).or_default() += 1;
    });

    let costs = Array2::from_shape_fn(
        (predicted_labels.len(), target_labels.len()),
        |(i, j)| {
            let (p, t) = (predicted_labels[i], target_labels[j]);
            let intersection = pair_counts.get(&(p, t)).copied().unwrap_or(0);
            let union = predicted_counts[&p] + target_counts[&t] - intersection;
            1.0 - intersection as f64 / union as f64
        },
    );

    let table: RemapTable = assigner
        .assign(&costs)?
        .into_iter()
        .map(|(i, j)| (predicted_labels[i], target_labels[j]))
        .collect();
    log::debug!(
        "Best IoU remapping over {} predicted / {} target labels: {:?}",
        predicted_labels.len(),
        target_labels.len(),
        table
    );
    Ok(table)
}

/// Regroups the ground truth with `target_remap`, then relabels the
/// prediction through its best IoU correspondence with that regrouped
/// ground truth.
///
/// Returns `(remapped_target, remapped_predicted)`.
pub fn best_segmentation<S1, S2, D>(
    target: &ArrayBase<S1, D>,
    predicted: &ArrayBase<S2, D>,
    target_remap: &RemapTable,
    assigner: &dyn LabelAssigner,
) -> Result<(Array<Label, D>, Array<Label, D>), ScoringError>
where
    S1: Data<Elem = Label>,
    S2: Data<Elem = Label>,
    D: Dimension,
{
    let remapped_target = remap_parts(target, target_remap);
    let best = compute_best_iou_remapping(predicted, &remapped_target, assigner)?;
    let remapped_predicted = remap_parts(predicted, &best);
    Ok((remapped_target, remapped_predicted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::domain::iou::compute_iou;
    use crate::scoring::infrastructure::kuhn_munkres_assigner::KuhnMunkresAssigner;
    use crate::shared::label_map::LabelMap;
    use approx::assert_relative_eq;
    use ndarray::{array, Array3};

    #[test]
    fn test_permuted_labels_are_recovered() {
        let target: LabelMap = array![[0, 0, 1, 1], [2, 2, 3, 3]];
        let predicted: LabelMap = array![[7, 7, 5, 5], [9, 9, 6, 6]];
        let table =
            compute_best_iou_remapping(&predicted, &target, &KuhnMunkresAssigner::default())
                .unwrap();
        assert_eq!(table, RemapTable::from([(7, 0), (5, 1), (9, 2), (6, 3)]));
        assert_eq!(remap_parts(&predicted, &table), target);
    }

    #[test]
    fn test_surplus_predicted_labels_stay_unmapped() {
        let target: LabelMap = array![[1, 1, 1, 1, 1]];
        let predicted: LabelMap = array![[4, 4, 4, 8, 8]];
        let table =
            compute_best_iou_remapping(&predicted, &target, &KuhnMunkresAssigner::default())
                .unwrap();
        assert_eq!(table, RemapTable::from([(4, 1)]));
    }

    #[test]
    fn test_assignment_maximizes_total_iou() {
        // 1->10 (1/3) + 2->20 (0) scores worse than 1->20 (1/2) + 2->10 (1/2)
        let target: LabelMap = array![[10, 10, 10, 10, 20, 20]];
        let predicted: LabelMap = array![[2, 2, 1, 1, 1, 1]];
        let table =
            compute_best_iou_remapping(&predicted, &target, &KuhnMunkresAssigner::default())
                .unwrap();
        assert_eq!(table, RemapTable::from([(1, 20), (2, 10)]));
    }

    #[test]
    fn test_shape_mismatch_is_error() {
        let result = compute_best_iou_remapping(
            &LabelMap::zeros((2, 2)),
            &LabelMap::zeros((2, 3)),
            &KuhnMunkresAssigner::default(),
        );
        assert!(matches!(result, Err(ScoringError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_best_segmentation_on_batch() {
        // ground truth parts 1,2 -> group 1, part 3 -> group 2
        let mut target = Array3::<Label>::zeros((2, 2, 3));
        target.slice_mut(ndarray::s![.., 0, ..]).fill(1);
        target[[0, 0, 2]] = 2;
        target.slice_mut(ndarray::s![.., 1, 2]).fill(3);
        let predicted = target.mapv(|l| match l {
            0 => 40,
            1 | 2 => 11,
            _ => 12,
        });
        let target_remap = RemapTable::from([(1, 1), (2, 1), (3, 2)]);

        let (gt, pred) =
            best_segmentation(&target, &predicted, &target_remap, &KuhnMunkresAssigner::default())
                .unwrap();
        assert_eq!(gt, pred);
        for (_, iou) in compute_iou(&pred, &gt).unwrap().iter() {
            assert_relative_eq!(iou, 1.0);
        }
    }
}
