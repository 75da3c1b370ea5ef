use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;

use crate::centroids::domain::annotation_canvas::AnnotationCanvas;
use crate::shared::label_map::{Label, LabelMap};

const MARKER_COLOR: Rgb<u8> = Rgb([245, 222, 179]);
const DEFAULT_RADIUS: i32 = 3;

/// [`AnnotationCanvas`] over an RGB image.
///
/// Draws a filled dot boxed by a frame at each annotated position and keeps
/// the texts so callers can render or print them separately.
pub struct MarkerCanvas {
    image: RgbImage,
    radius: i32,
    annotations: Vec<(usize, usize, String)>,
}

impl MarkerCanvas {
    pub fn new(image: RgbImage) -> Self {
        Self {
            image,
            radius: DEFAULT_RADIUS,
            annotations: Vec::new(),
        }
    }

    pub fn with_radius(mut self, radius: i32) -> Self {
        self.radius = radius.max(1);
        self
    }

    /// Canvas pre-filled with a false-colour rendering of `labels`.
    pub fn from_label_map(labels: &LabelMap) -> Self {
        let (height, width) = labels.dim();
        let image = RgbImage::from_fn(width as u32, height as u32, |x, y| {
            label_color(labels[[y as usize, x as usize]])
        });
        Self::new(image)
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }

    pub fn annotations(&self) -> &[(usize, usize, String)] {
        &self.annotations
    }
}

impl AnnotationCanvas for MarkerCanvas {
    fn annotate(&mut self, row: usize, col: usize, text: &str) {
        let (x, y) = (col as i32, row as i32);
        let r = self.radius;
        draw_filled_circle_mut(&mut self.image, (x, y), r, MARKER_COLOR);
        let side = (2 * r + 3) as u32;
        draw_hollow_rect_mut(
            &mut self.image,
            Rect::at(x - r - 1, y - r - 1).of_size(side, side),
            MARKER_COLOR,
        );
        self.annotations.push((row, col, text.to_string()));
    }
}

/// Deterministic false colour per label; background is black.
pub fn label_color(label: Label) -> Rgb<u8> {
    if label == 0 {
        return Rgb([0, 0, 0]);
    }
    let l = label as u64;
    Rgb([
        ((l * 67) % 200 + 55) as u8,
        ((l * 137) % 200 + 55) as u8,
        ((l * 211) % 200 + 55) as u8,
    ])
}
