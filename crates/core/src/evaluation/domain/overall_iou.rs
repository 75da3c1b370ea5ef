use serde::Serialize;

use crate::evaluation::domain::iou_table::IouTable;
use crate::shared::constants::MISSING_IOU;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ColumnMean {
    pub column: String,
    /// `None` when every entry of the column was missing.
    pub mean: Option<f64>,
}

/// Column-wise means of an [`IouTable`] plus the headline overall score.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OverallIou {
    pub columns: Vec<ColumnMean>,
    pub overall: Option<f64>,
}

impl OverallIou {
    pub fn mean_of(&self, column: &str) -> Option<f64> {
        self.columns
            .iter()
            .find(|c| c.column == column)
            .and_then(|c| c.mean)
    }
}

/// Reduces an IoU table to per-column means and an overall mean.
///
/// Entries equal to [`MISSING_IOU`] or NaN are skipped, not counted as zero.
/// `overall` averages the defined column means of every column not listed in
/// `exclude_columns`; the `batch_idx` column takes part unless excluded.
pub fn calculate_overall_iou(table: &IouTable, exclude_columns: &[&str]) -> OverallIou {
    let columns: Vec<ColumnMean> = table
        .column_names()
        .into_iter()
        .map(|name| ColumnMean {
            column: name.to_string(),
            mean: table.column(name).and_then(|values| valid_mean(&values)),
        })
        .collect();

    let included: Vec<f64> = columns
        .iter()
        .filter(|c| !exclude_columns.contains(&c.column.as_str()))
        .filter_map(|c| c.mean)
        .collect();
    let overall = mean(&included);
    if overall.is_none() {
        log::warn!("No column contributes to the overall IoU");
    }

    OverallIou { columns, overall }
}

fn valid_mean(values: &[f64]) -> Option<f64> {
    let valid: Vec<f64> = values
        .iter()
        .copied()
        .filter(|v| !v.is_nan() && *v != MISSING_IOU)
        .collect();
    mean(&valid)
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
