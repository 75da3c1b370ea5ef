//! Per-label intersection-over-union between predicted and ground-truth
//! label arrays.
//!
//! A label whose union is empty has no defined IoU; it is reported as
//! `f64::NAN`, never as 0 and never as a panic.

use std::collections::BTreeMap;

use ndarray::{ArrayBase, Data, Dimension, Zip};
use thiserror::Error;

use crate::shared::label_map::Label;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoringError {
    #[error("shape mismatch: predicted {predicted:?} vs target {target:?}")]
    ShapeMismatch {
        predicted: Vec<usize>,
        target: Vec<usize>,
    },
    #[error("label assignment failed: {0}")]
    Assignment(String),
    #[error("row has {actual} values but the table has {expected} labels")]
    RowWidth { expected: usize, actual: usize },
    #[error("label name '{0}' is reserved for the sample index column")]
    ReservedLabelName(String),
    #[error("duplicate label name '{0}'")]
    DuplicateLabelName(String),
}

/// IoU per ground-truth label, ordered by ascending label.
#[derive(Clone, Debug, PartialEq)]
pub struct IouScores {
    pub values: Vec<f64>,
    pub labels: Vec<Label>,
}

impl IouScores {
    pub fn get(&self, label: Label) -> Option<f64> {
        self.labels
            .binary_search(&label)
            .ok()
            .map(|idx| self.values[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Label, f64)> + '_ {
        self.labels.iter().copied().zip(self.values.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[derive(Default, Clone, Copy)]
struct OverlapCounts {
    intersection: u64,
    predicted: u64,
    target: u64,
}

impl OverlapCounts {
    fn iou(&self) -> f64 {
        let union = self.predicted + self.target - self.intersection;
        if union == 0 {
            return f64::NAN;
        }
        self.intersection as f64 / union as f64
    }
}

pub(crate) fn check_shapes<S1, S2, D>(
    predicted: &ArrayBase<S1, D>,
    target: &ArrayBase<S2, D>,
) -> Result<(), ScoringError>
where
    S1: Data<Elem = Label>,
    S2: Data<Elem = Label>,
    D: Dimension,
{
    if predicted.shape() != target.shape() {
        return Err(ScoringError::ShapeMismatch {
            predicted: predicted.shape().to_vec(),
            target: target.shape().to_vec(),
        });
    }
    Ok(())
}

/// Jaccard index of the `label` masks of both arrays.
pub fn label_iou<S1, S2, D>(
    predicted: &ArrayBase<S1, D>,
    target: &ArrayBase<S2, D>,
    label: Label,
) -> Result<f64, ScoringError>
where
    S1: Data<Elem = Label>,
    S2: Data<Elem = Label>,
    D: Dimension,
{
    check_shapes(predicted, target)?;
    let counts = Zip::from(predicted)
        .and(target)
        .fold(OverlapCounts::default(), |mut acc, &p, &t| {
            let (in_pred, in_target) = (p == label, t == label);
            acc.predicted += in_pred as u64;
            acc.target += in_target as u64;
            acc.intersection += (in_pred && in_target) as u64;
            acc
        });
    let iou = counts.iou();
    if iou.is_nan() {
        log::warn!("Label {label} is absent from both maps; IoU undefined");
    }
    Ok(iou)
}

/// IoU for every distinct label of `target`, computed in a single pass.
pub fn compute_iou<S1, S2, D>(
    predicted: &ArrayBase<S1, D>,
    target: &ArrayBase<S2, D>,
) -> Result<IouScores, ScoringError>
where
    S1: Data<Elem = Label>,
    S2: Data<Elem = Label>,
    D: Dimension,
{
    check_shapes(predicted, target)?;

    let mut target_counts: BTreeMap<Label, OverlapCounts> = BTreeMap::new();
    let mut predicted_counts: BTreeMap<Label, u64> = BTreeMap::new();
    Zip::from(predicted).and(target).for_each(|&p, &t| {
        let entry = target_counts.entry(t).or_default();
        entry.target += 1;
        if p == t {
            entry.intersection += 1;
        }
        *predicted_counts.entry(p).or_default() += 1;
    });

    let mut scores = IouScores {
        values: Vec::with_capacity(target_counts.len()),
        labels: Vec::with_capacity(target_counts.len()),
    };
    for (label, mut counts) in target_counts {
        counts.predicted = predicted_counts.get(&label).copied().unwrap_or(0);
        scores.labels.push(label);
        scores.values.push(counts.iou());
    }
    Ok(scores)
}
