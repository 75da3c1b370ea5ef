use std::path::{Path, PathBuf};

use image::{DynamicImage, GrayImage};
use ndarray::Array2;
use thiserror::Error;

use crate::shared::label_map::{Label, LabelMap};

#[derive(Error, Debug)]
pub enum LabelImageError {
    #[error("failed to read label image {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to write label image {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("label {0} does not fit in an 8-bit image")]
    LabelOutOfRange(Label),
}

/// Reads a single-channel label image.
///
/// 16-bit images keep their raw values; anything else is converted to
/// 8-bit luma.
pub fn read_label_map(path: &Path) -> Result<LabelMap, LabelImageError> {
    let img = image::open(path).map_err(|source| LabelImageError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let map = match img {
        DynamicImage::ImageLuma16(buf) => {
            let shape = (buf.height() as usize, buf.width() as usize);
            Array2::from_shape_fn(shape, |(r, c)| Label::from(buf.get_pixel(c as u32, r as u32)[0]))
        }
        other => {
            let buf = other.to_luma8();
            let shape = (buf.height() as usize, buf.width() as usize);
            Array2::from_shape_fn(shape, |(r, c)| Label::from(buf.get_pixel(c as u32, r as u32)[0]))
        }
    };
    Ok(map)
}

/// Writes a label map as an 8-bit grayscale image, creating parent
/// directories as needed.
pub fn write_label_map(path: &Path, labels: &LabelMap) -> Result<(), LabelImageError> {
    if let Some(&label) = labels.iter().find(|&&l| l > u8::MAX as Label) {
        return Err(LabelImageError::LabelOutOfRange(label));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| LabelImageError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let (height, width) = labels.dim();
    let img = GrayImage::from_fn(width as u32, height as u32, |x, y| {
        image::Luma([labels[[y as usize, x as usize]] as u8])
    });
    img.save(path).map_err(|source| LabelImageError::Write {
        path: path.to_path_buf(),
        source,
    })
}
