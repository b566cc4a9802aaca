use crate::utils::bbox::BoundingBox;
use std::collections::HashMap;

/// Label assigned to estimated objects the detector could not classify.
/// The matcher may treat it as a wildcard, see
/// [`UnknownMatching`](crate::config::UnknownMatching).
pub const UNKNOWN_LABEL: &str = "unknown";

/// A single detected or labeled entity on the image plane.
///
/// The object is a pure value: label, geometry, detector confidence and
/// free-form string attributes. It is immutable once created.
#[derive(Debug, Clone)]
pub struct DynamicObject {
    label: String,
    bbox: BoundingBox,
    confidence: f32,
    attributes: HashMap<String, String>,
}

impl DynamicObject {
    pub fn new(label: impl Into<String>, bbox: BoundingBox, confidence: f32) -> Self {
        Self {
            label: label.into(),
            bbox,
            confidence,
            attributes: HashMap::default(),
        }
    }

    /// Attaches an attribute, consuming and returning the object
    ///
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    pub fn attributes(&self) -> &HashMap<String, String> {
        &self.attributes
    }

    pub fn is_unknown(&self) -> bool {
        self.label == UNKNOWN_LABEL
    }

    pub fn has_attribute(&self, key: &str, value: &str) -> bool {
        self.attributes.get(key).map(String::as_str) == Some(value)
    }
}
