pub mod imageproc_component_labeller;
pub mod marker_canvas;
