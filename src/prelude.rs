pub use crate::accumulator::{FrameAccumulator, FrameResult};
pub use crate::config::{
    CriticalObjectFilterConfig, EvaluationConfig, EvaluationTask, MatchingMetric, ThresholdPolicy,
    UnknownMatching,
};
pub use crate::engine::PerceptionEvaluator;
pub use crate::filtering::{filter_critical, is_critical};
pub use crate::matching::{match_objects, MatchStatus, MatchingResult, ObjectMatch};
pub use crate::metrics::{LabelMetrics, SceneMetrics};
pub use crate::object::{DynamicObject, UNKNOWN_LABEL};
pub use crate::passfail::PassFailResult;
pub use crate::store::{GroundTruthFrame, GroundTruthStore};
pub use crate::utils::bbox::BoundingBox;
