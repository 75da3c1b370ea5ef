//! Nearest-neighbour resizing for label maps.
//!
//! Label values are identifiers, so they are only ever copied, never
//! blended. Source indices follow the OpenCV `INTER_NEAREST` rule
//! `src = floor(dst * src_len / dst_len)`.

use ndarray::{Array2, Array3, ArrayBase, ArrayD, Axis, Data, Ix2, Ix3};
use thiserror::Error;

use crate::shared::label_map::{Label, LabelMap};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResizeError {
    #[error("unsupported shape for labels: {0:?}")]
    UnsupportedRank(Vec<usize>),
    #[error("cannot resize an empty label map of shape {0:?}")]
    EmptySource(Vec<usize>),
}

/// Resizes a `[H, W]` map to `size = (height, width)`.
pub fn resize_label_map<S>(
    labels: &ArrayBase<S, Ix2>,
    size: (usize, usize),
) -> Result<LabelMap, ResizeError>
where
    S: Data<Elem = Label>,
{
    let (src_h, src_w) = labels.dim();
    let (dst_h, dst_w) = size;
    if (src_h == 0 || src_w == 0) && dst_h * dst_w > 0 {
        return Err(ResizeError::EmptySource(labels.shape().to_vec()));
    }

    let rows = nearest_indices(src_h, dst_h);
    let cols = nearest_indices(src_w, dst_w);
    Ok(Array2::from_shape_fn((dst_h, dst_w), |(r, c)| {
        labels[[rows[r], cols[c]]]
    }))
}

/// Resizes every `[H, W]` slice of an `[N, H, W]` stack independently.
pub fn resize_label_batch<S>(
    labels: &ArrayBase<S, Ix3>,
    size: (usize, usize),
) -> Result<Array3<Label>, ResizeError>
where
    S: Data<Elem = Label>,
{
    let n = labels.len_of(Axis(0));
    let mut out = Array3::<Label>::zeros((n, size.0, size.1));
    for (src, mut dst) in labels.outer_iter().zip(out.outer_iter_mut()) {
        dst.assign(&resize_label_map(&src, size)?);
    }
    Ok(out)
}

/// Rank-dispatching entry point: `[H, W]` or `[N, H, W]`.
pub fn resize_labels(labels: &ArrayD<Label>, size: (usize, usize)) -> Result<ArrayD<Label>, ResizeError> {
    let unsupported = || ResizeError::UnsupportedRank(labels.shape().to_vec());
    match labels.ndim() {
        2 => {
            let map = labels.view().into_dimensionality::<Ix2>().map_err(|_| unsupported())?;
            Ok(resize_label_map(&map, size)?.into_dyn())
        }
        3 => {
            let batch = labels.view().into_dimensionality::<Ix3>().map_err(|_| unsupported())?;
            Ok(resize_label_batch(&batch, size)?.into_dyn())
        }
        _ => Err(unsupported()),
    }
}

fn nearest_indices(src_len: usize, dst_len: usize) -> Vec<usize> {
    (0..dst_len)
        .map(|i| ((i * src_len) / dst_len).min(src_len.saturating_sub(1)))
        .collect()
}
