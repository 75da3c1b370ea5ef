use std::path::{Path, PathBuf};

use image::RgbImage;
use ndarray::Array2;
use thiserror::Error;

use crate::shared::label_map::{Label, LabelMap};

#[derive(Error, Debug)]
pub enum IuvReadError {
    #[error("failed to read IUV image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// The three planes of a DensePose IUV image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IuvChannels {
    pub index: Array2<u8>,
    pub u: Array2<u8>,
    pub v: Array2<u8>,
}

impl IuvChannels {
    /// Splits an RGB buffer into I, U and V planes.
    ///
    /// IUV files are written in BGR order, so the part index sits in the
    /// blue channel and V in the red one.
    pub fn from_rgb(img: &RgbImage) -> Self {
        let shape = (img.height() as usize, img.width() as usize);
        let plane = |channel: usize| {
            Array2::from_shape_fn(shape, |(r, c)| img.get_pixel(c as u32, r as u32)[channel])
        };
        Self {
            index: plane(2),
            u: plane(1),
            v: plane(0),
        }
    }

    /// Part index plane widened to a [`LabelMap`].
    pub fn labels(&self) -> LabelMap {
        self.index.mapv(Label::from)
    }
}

/// Loads an IUV image from disk.
pub fn load_iuv(path: &Path) -> Result<IuvChannels, IuvReadError> {
    let img = image::open(path)
        .map_err(|source| IuvReadError::Image {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgb8();
    log::debug!(
        "Loaded IUV image {} ({}x{})",
        path.display(),
        img.width(),
        img.height()
    );
    Ok(IuvChannels::from_rgb(&img))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 3x2 image where pixel (x, y) stores V=x, U=10*y, I=x+y in RGB order.
    fn write_test_iuv(dir: &Path) -> PathBuf {
        let path = dir.join("frame_IUV.png");
        let mut img = RgbImage::new(3, 2);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = image::Rgb([x as u8, y as u8 * 10, (x + y) as u8]);
        }
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn test_load_splits_channels() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_iuv(dir.path());
        let iuv = load_iuv(&path).unwrap();

        assert_eq!(iuv.index.dim(), (2, 3));
        assert_eq!(iuv.index[[1, 2]], 3);
        assert_eq!(iuv.u[[1, 0]], 10);
        assert_eq!(iuv.v[[0, 2]], 2);
    }

    #[test]
    fn test_labels_widen_index_plane() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_iuv(dir.path());
        let labels = load_iuv(&path).unwrap().labels();
        assert_eq!(labels.dim(), (2, 3));
        assert_eq!(labels[[1, 1]], 2);
    }

    #[test]
    fn test_from_rgb_shape_is_rows_by_cols() {
        let img = RgbImage::new(5, 4);
        let iuv = IuvChannels::from_rgb(&img);
        assert_eq!(iuv.u.dim(), (4, 5));
        assert_eq!(iuv.v.dim(), (4, 5));
    }

    #[test]
    fn test_load_nonexistent_returns_error() {
        let result = load_iuv(Path::new("/nonexistent/frame_IUV.png"));
        assert!(matches!(result, Err(IuvReadError::Image { .. })));
    }
}
