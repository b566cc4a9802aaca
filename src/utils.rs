/// Axis-aligned bounding boxes and overlap metrics
pub mod bbox;
