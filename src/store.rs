use crate::object::DynamicObject;
use crate::Errors;
use anyhow::Result;
use std::collections::HashMap;

/// One ground truth frame of a recorded scene.
///
#[derive(Debug, Clone)]
pub struct GroundTruthFrame {
    pub timestamp: u64,
    pub objects: Vec<DynamicObject>,
}

impl GroundTruthFrame {
    pub fn new(timestamp: u64, objects: Vec<DynamicObject>) -> Self {
        Self { timestamp, objects }
    }
}

/// All ground truth frames of a run, indexed by timestamp.
///
/// The store is filled once by the dataset loader and is read-only afterwards.
/// A timestamp resolves to exactly one frame or the lookup fails; a skipped
/// timestamp in a real perception log must never be silently substituted by a
/// neighboring frame.
#[derive(Debug, Default)]
pub struct GroundTruthStore {
    frames: Vec<GroundTruthFrame>,
    index: HashMap<u64, usize>,
}

impl GroundTruthStore {
    pub fn new(frames: Vec<GroundTruthFrame>) -> Result<Self> {
        let mut index = HashMap::with_capacity(frames.len());
        for (pos, frame) in frames.iter().enumerate() {
            if index.insert(frame.timestamp, pos).is_some() {
                return Err(Errors::DuplicateTimestamp(frame.timestamp).into());
            }
        }
        Ok(Self { frames, index })
    }

    pub fn get_frame(&self, timestamp: u64) -> Result<&GroundTruthFrame> {
        self.index
            .get(&timestamp)
            .map(|pos| &self.frames[*pos])
            .ok_or_else(|| Errors::FrameNotFound(timestamp).into())
    }

    /// Frames in load order, for drivers replaying the scene
    ///
    pub fn frames(&self) -> &[GroundTruthFrame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use crate::object::DynamicObject;
    use crate::store::{GroundTruthFrame, GroundTruthStore};
    use crate::utils::bbox::BoundingBox;

    fn frame(timestamp: u64) -> GroundTruthFrame {
        GroundTruthFrame::new(
            timestamp,
            vec![DynamicObject::new(
                "car",
                BoundingBox::new(0.0, 0.0, 10.0, 10.0),
                1.0,
            )],
        )
    }

    #[test]
    fn lookup() {
        let store = GroundTruthStore::new(vec![frame(100), frame(200)]).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get_frame(200).unwrap().timestamp, 200);
    }

    #[test]
    fn missing_timestamp_is_an_error() {
        let store = GroundTruthStore::new(vec![frame(100), frame(200)]).unwrap();
        assert!(store.get_frame(150).is_err());
    }

    #[test]
    fn duplicate_timestamp_is_rejected() {
        assert!(GroundTruthStore::new(vec![frame(100), frame(100)]).is_err());
    }
}
