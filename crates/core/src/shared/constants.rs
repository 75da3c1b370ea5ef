use crate::shared::label_map::Label;

pub const BACKGROUND_LABEL: Label = 0;

/// IoU table value for a label absent from a sample's ground truth.
pub const MISSING_IOU: f64 = -1.0;

pub const BATCH_INDEX_COLUMN: &str = "batch_idx";

/// Columns left out of the overall IoU unless the caller says otherwise.
pub const DEFAULT_EXCLUDED_COLUMNS: &[&str] = &["global_step", BATCH_INDEX_COLUMN, "background"];

/// Fixed-point scale applied to `1 - IoU` costs before integer assignment.
pub const IOU_COST_SCALE: f64 = 1_000_000.0;

pub const IMAGE_EXTENSIONS: &[&str] = &["png", "bmp", "tiff", "tif"];
