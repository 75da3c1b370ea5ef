use crate::centroids::domain::centroid::Centroid;

/// Visualization surface that can place a text label at a pixel position.
pub trait AnnotationCanvas {
    fn annotate(&mut self, row: usize, col: usize, text: &str);
}

/// Places `texts[i]` at `centroids[i]`; returns how many were drawn.
///
/// Centroids on row 0 or column 0 are treated as undefined positions and
/// skipped. Extra centroids or texts without a partner are ignored.
pub fn annotate_centroids<C, T>(canvas: &mut C, centroids: &[Centroid], texts: &[T]) -> usize
where
    C: AnnotationCanvas + ?Sized,
    T: AsRef<str>,
{
    let mut drawn = 0;
    for (centroid, text) in centroids.iter().zip(texts) {
        if centroid.row == 0 || centroid.col == 0 {
            log::debug!(
                "Skipping centroid of label {} at ({}, {})",
                centroid.label,
                centroid.row,
                centroid.col
            );
            continue;
        }
        canvas.annotate(centroid.row, centroid.col, text.as_ref());
        drawn += 1;
    }
    drawn
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingCanvas {
        calls: Vec<(usize, usize, String)>,
    }

    impl AnnotationCanvas for RecordingCanvas {
        fn annotate(&mut self, row: usize, col: usize, text: &str) {
            self.calls.push((row, col, text.to_string()));
        }
    }

    fn centroid(row: usize, col: usize, label: u32) -> Centroid {
        Centroid { row, col, label }
    }

    #[test]
    fn test_annotates_each_valid_centroid() {
        let mut canvas = RecordingCanvas::default();
        let centroids = [centroid(3, 4, 1), centroid(10, 2, 2)];
        let drawn = annotate_centroids(&mut canvas, &centroids, &["back", "chest"]);
        assert_eq!(drawn, 2);
        assert_eq!(
            canvas.calls,
            vec![(3, 4, "back".to_string()), (10, 2, "chest".to_string())]
        );
    }

    #[test]
    fn test_skips_non_positive_positions() {
        let mut canvas = RecordingCanvas::default();
        let centroids = [centroid(0, 4, 1), centroid(5, 0, 2), centroid(1, 1, 3)];
        let drawn = annotate_centroids(&mut canvas, &centroids, &["a", "b", "c"]);
        assert_eq!(drawn, 1);
        assert_eq!(canvas.calls, vec![(1, 1, "c".to_string())]);
    }

    #[test]
    fn test_stops_at_shorter_input() {
        let mut canvas = RecordingCanvas::default();
        let centroids = [centroid(1, 1, 1), centroid(2, 2, 2)];
        let texts = vec!["only".to_string()];
        assert_eq!(annotate_centroids(&mut canvas, &centroids, &texts), 1);
    }

    #[test]
    fn test_works_through_trait_object() {
        let mut canvas = RecordingCanvas::default();
        let dyn_canvas: &mut dyn AnnotationCanvas = &mut canvas;
        annotate_centroids(dyn_canvas, &[centroid(2, 3, 1)], &["x"]);
        assert_eq!(canvas.calls.len(), 1);
    }
}
