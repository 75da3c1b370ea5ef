use std::collections::{HashMap, HashSet};

use ndarray::{Array, ArrayBase, Data, Dimension};

use crate::shared::constants::BACKGROUND_LABEL;
use crate::shared::label_map::Label;

/// Old label -> new label. Labels without an entry map to background.
pub type RemapTable = HashMap<Label, Label>;

/// Relabels every pixel through `remap`.
///
/// The output starts as background and only mapped labels survive, so an
/// empty table yields an all-background map of the same shape.
pub fn remap_parts<S, D>(part_map: &ArrayBase<S, D>, remap: &RemapTable) -> Array<Label, D>
where
    S: Data<Elem = Label>,
    D: Dimension,
{
    part_map.mapv(|label| remap.get(&label).copied().unwrap_or(BACKGROUND_LABEL))
}

/// Keeps only `included` labels; everything else becomes background.
pub fn filter_parts<S, D>(part_map: &ArrayBase<S, D>, included: &[Label]) -> Array<Label, D>
where
    S: Data<Elem = Label>,
    D: Dimension,
{
    let included: HashSet<Label> = included.iter().copied().collect();
    part_map.mapv(|label| {
        if included.contains(&label) {
            label
        } else {
            BACKGROUND_LABEL
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::label_map::{unique_labels, LabelMap};
    use ndarray::{array, Array3};

    fn sample_map() -> LabelMap {
        array![[0, 1, 1, 2], [3, 3, 1, 2], [4, 0, 0, 2]]
    }

    #[test]
    fn test_empty_table_yields_background() {
        let map = sample_map();
        let remapped = remap_parts(&map, &RemapTable::new());
        assert_eq!(remapped.dim(), map.dim());
        assert!(remapped.iter().all(|&l| l == BACKGROUND_LABEL));
    }

    #[test]
    fn test_identity_table_is_noop() {
        let map = sample_map();
        let identity: RemapTable = unique_labels(&map).into_iter().map(|l| (l, l)).collect();
        assert_eq!(remap_parts(&map, &identity), map);
    }

    #[test]
    fn test_unmapped_labels_become_background() {
        let map = sample_map();
        let table = RemapTable::from([(1, 10), (2, 20)]);
        let expected: LabelMap = array![[0, 10, 10, 20], [0, 0, 10, 20], [0, 0, 0, 20]];
        assert_eq!(remap_parts(&map, &table), expected);
    }

    #[test]
    fn test_swapping_labels_does_not_cascade() {
        let map: LabelMap = array![[1, 2], [2, 1]];
        let expected: LabelMap = array![[2, 1], [1, 2]];
        let table = RemapTable::from([(1, 2), (2, 1)]);
        assert_eq!(remap_parts(&map, &table), expected);
    }

    #[test]
    fn test_remap_batch_keeps_shape() {
        let mut batch = Array3::<Label>::zeros((3, 2, 2));
        batch[[2, 0, 1]] = 5;
        let remapped = remap_parts(&batch, &RemapTable::from([(5, 1)]));
        assert_eq!(remapped.dim(), (3, 2, 2));
        assert_eq!(remapped[[2, 0, 1]], 1);
    }

    #[test]
    fn test_filter_parts_keeps_included() {
        let map = sample_map();
        let expected: LabelMap = array![[0, 1, 1, 0], [3, 3, 1, 0], [0, 0, 0, 0]];
        assert_eq!(filter_parts(&map, &[1, 3]), expected);
    }

    #[test]
    fn test_filter_parts_nothing_included() {
        let filtered = filter_parts(&sample_map(), &[]);
        assert!(filtered.iter().all(|&l| l == BACKGROUND_LABEL));
    }
}
