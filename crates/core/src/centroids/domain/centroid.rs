use std::collections::BTreeMap;

use ndarray::{ArrayBase, Data, Ix2};
use serde::Serialize;

use crate::centroids::domain::component_labeller::ComponentLabeller;
use crate::shared::constants::BACKGROUND_LABEL;
use crate::shared::label_map::{unique_labels, Label};

/// Integer pixel position of a region's centre of mass, tagged with the
/// label the region was taken from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Centroid {
    pub row: usize,
    pub col: usize,
    pub label: Label,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CentroidConfig {
    /// Split each label into connected regions before taking centroids.
    pub connected_components: bool,
    /// Label excluded from processing.
    pub background: Label,
}

impl Default for CentroidConfig {
    fn default() -> Self {
        Self {
            connected_components: false,
            background: BACKGROUND_LABEL,
        }
    }
}

#[derive(Default)]
struct MassAccumulator {
    row_sum: u64,
    col_sum: u64,
    count: u64,
}

impl MassAccumulator {
    fn add(&mut self, row: usize, col: usize) {
        self.row_sum += row as u64;
        self.col_sum += col as u64;
        self.count += 1;
    }

    /// Mean position truncated toward zero.
    fn centroid(&self, label: Label) -> Centroid {
        Centroid {
            row: (self.row_sum / self.count) as usize,
            col: (self.col_sum / self.count) as usize,
            label,
        }
    }
}

/// Centroids of every non-background label in `labels`.
///
/// Each centroid is the mean pixel position of its region, truncated toward
/// zero to integer coordinates (not rounded).
///
/// Without connected-component splitting there is exactly one centroid per
/// distinct label. With splitting each label contributes one centroid per
/// connected region found by `labeller`. Output is ordered by label, then
/// by region id.
pub fn calculate_centroids<S>(
    labels: &ArrayBase<S, Ix2>,
    config: &CentroidConfig,
    labeller: &dyn ComponentLabeller,
) -> Vec<Centroid>
where
    S: Data<Elem = Label>,
{
    if !config.connected_components {
        let mut masses: BTreeMap<Label, MassAccumulator> = BTreeMap::new();
        for ((row, col), &label) in labels.indexed_iter() {
            if label != config.background {
                masses.entry(label).or_default().add(row, col);
            }
        }
        return masses
            .iter()
            .map(|(&label, mass)| mass.centroid(label))
            .collect();
    }

    let mut centroids = Vec::new();
    for label in unique_labels(labels) {
        if label == config.background {
            continue;
        }
        let mask = labels.mapv(|l| l == label);
        let regions = labeller.label_components(&mask);

        let mut masses: BTreeMap<u32, MassAccumulator> = BTreeMap::new();
        for ((row, col), &region) in regions.indexed_iter() {
            if region != 0 {
                masses.entry(region).or_default().add(row, col);
            }
        }
        log::debug!("Label {label}: {} connected regions", masses.len());
        centroids.extend(masses.values().map(|mass| mass.centroid(label)));
    }
    centroids
}
