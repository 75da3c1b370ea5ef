use image::{GrayImage, Luma};
use imageproc::region_labelling::{self, connected_components};
use ndarray::Array2;

use crate::centroids::domain::component_labeller::{ComponentLabeller, Connectivity};

const MASK_ON: u8 = 255;

/// Connected-component labelling backed by `imageproc::region_labelling`.
pub struct ImageprocComponentLabeller {
    connectivity: Connectivity,
}

impl ImageprocComponentLabeller {
    pub fn new(connectivity: Connectivity) -> Self {
        Self { connectivity }
    }
}

impl Default for ImageprocComponentLabeller {
    fn default() -> Self {
        Self::new(Connectivity::default())
    }
}

impl ComponentLabeller for ImageprocComponentLabeller {
    fn label_components(&self, mask: &Array2<bool>) -> Array2<u32> {
        let (height, width) = mask.dim();
        let image = GrayImage::from_fn(width as u32, height as u32, |x, y| {
            Luma([if mask[[y as usize, x as usize]] { MASK_ON } else { 0 }])
        });
        let conn = match self.connectivity {
            Connectivity::Four => region_labelling::Connectivity::Four,
            Connectivity::Eight => region_labelling::Connectivity::Eight,
        };
        let components = connected_components(&image, conn, Luma([0u8]));
        Array2::from_shape_fn((height, width), |(r, c)| {
            components.get_pixel(c as u32, r as u32)[0]
        })
    }
}
