use ndarray::Array2;

/// Pixel neighbourhood used when growing connected regions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Connectivity {
    Four,
    #[default]
    Eight,
}

/// Domain interface for connected-component labelling of a binary mask.
///
/// Returns a same-shaped grid where 0 marks pixels outside the mask and
/// every maximal connected region of the mask gets its own id from 1 up.
pub trait ComponentLabeller: Send + Sync {
    fn label_components(&self, mask: &Array2<bool>) -> Array2<u32>;
}
