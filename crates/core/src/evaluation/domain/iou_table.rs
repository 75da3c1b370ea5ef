use std::collections::HashSet;

use ndarray::{ArrayBase, Axis, Data, Ix3};
use serde::Serialize;

use crate::scoring::domain::iou::{check_shapes, compute_iou, ScoringError};
use crate::shared::constants::{BATCH_INDEX_COLUMN, MISSING_IOU};
use crate::shared::label_map::Label;

/// One sample's IoU per named label, [`MISSING_IOU`] where the label is
/// absent from that sample's ground truth.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IouRow {
    pub batch_idx: usize,
    pub values: Vec<f64>,
}

/// Row-per-sample IoU table with columns `batch_idx` followed by one column
/// per label name.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IouTable {
    label_names: Vec<String>,
    rows: Vec<IouRow>,
}

impl IouTable {
    /// Empty table over `label_names`.
    ///
    /// Names must be distinct and must not shadow the `batch_idx` column.
    pub fn new(label_names: &[&str]) -> Result<Self, ScoringError> {
        let mut seen = HashSet::new();
        for name in label_names {
            if *name == BATCH_INDEX_COLUMN {
                return Err(ScoringError::ReservedLabelName(name.to_string()));
            }
            if !seen.insert(*name) {
                return Err(ScoringError::DuplicateLabelName(name.to_string()));
            }
        }
        Ok(Self {
            label_names: label_names.iter().map(|n| n.to_string()).collect(),
            rows: Vec::new(),
        })
    }

    /// Appends a row; it must hold exactly one value per label.
    pub fn push_row(&mut self, row: IouRow) -> Result<(), ScoringError> {
        if row.values.len() != self.label_names.len() {
            return Err(ScoringError::RowWidth {
                expected: self.label_names.len(),
                actual: row.values.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn label_names(&self) -> &[String] {
        &self.label_names
    }

    pub fn column_names(&self) -> Vec<&str> {
        std::iter::once(BATCH_INDEX_COLUMN)
            .chain(self.label_names.iter().map(String::as_str))
            .collect()
    }

    pub fn rows(&self) -> &[IouRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All values of one column as `f64`, or `None` for an unknown name.
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        if name == BATCH_INDEX_COLUMN {
            return Some(self.rows.iter().map(|r| r.batch_idx as f64).collect());
        }
        let idx = self.label_names.iter().position(|n| n == name)?;
        Some(self.rows.iter().map(|r| r.values[idx]).collect())
    }
}

/// Scores each `(predicted[i], target[i])` pair of two `[N, H, W]` stacks.
///
/// The label id of `label_names[k]` is `k`. A label that does not occur in
/// a sample's ground truth is recorded as [`MISSING_IOU`].
pub fn calculate_iou_table<S1, S2>(
    predicted: &ArrayBase<S1, Ix3>,
    target: &ArrayBase<S2, Ix3>,
    label_names: &[&str],
) -> Result<IouTable, ScoringError>
where
    S1: Data<Elem = Label>,
    S2: Data<Elem = Label>,
{
    check_shapes(predicted, target)?;

    let mut table = IouTable::new(label_names)?;
    for (batch_idx, (pred, gt)) in predicted
        .axis_iter(Axis(0))
        .zip(target.axis_iter(Axis(0)))
        .enumerate()
    {
        let scores = compute_iou(&pred, &gt)?;
        let values: Vec<f64> = (0..label_names.len())
            .map(|k| scores.get(k as Label).unwrap_or(MISSING_IOU))
            .collect();
        log::debug!("Sample {batch_idx}: {} ground-truth labels", scores.len());
        table.push_row(IouRow { batch_idx, values })?;
    }
    Ok(table)
}
