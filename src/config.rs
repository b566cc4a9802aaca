use crate::utils::bbox::BoundingBox;
use crate::Errors;
use anyhow::Result;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// The kind of evaluation performed on every frame.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluationTask {
    Detection,
    Tracking,
    Classification,
}

impl EvaluationTask {
    /// Classification has no spatial geometry and therefore no matching
    /// thresholds.
    pub fn is_spatial(&self) -> bool {
        !matches!(self, EvaluationTask::Classification)
    }
}

impl FromStr for EvaluationTask {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "detection" | "detection2d" => Ok(EvaluationTask::Detection),
            "tracking" | "tracking2d" => Ok(EvaluationTask::Tracking),
            "classification" | "classification2d" => Ok(EvaluationTask::Classification),
            other => Err(Errors::UnsupportedTask(other.to_owned()).into()),
        }
    }
}

impl fmt::Display for EvaluationTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvaluationTask::Detection => write!(f, "detection2d"),
            EvaluationTask::Tracking => write!(f, "tracking2d"),
            EvaluationTask::Classification => write!(f, "classification2d"),
        }
    }
}

/// Spatial criterion used to score candidate pairs.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchingMetric {
    /// Euclidean distance between box centers, lower is better
    CenterDistance,
    /// 2D intersection-over-union, higher is better
    Iou,
}

impl MatchingMetric {
    pub fn score(&self, l: &BoundingBox, r: &BoundingBox) -> f32 {
        match self {
            MatchingMetric::CenterDistance => BoundingBox::center_distance(l, r),
            MatchingMetric::Iou => BoundingBox::iou(l, r),
        }
    }

    /// Threshold boundaries are inclusive: distance exactly at the threshold
    /// and IoU exactly at the threshold are both eligible.
    pub fn eligible(&self, score: f32, threshold: f32) -> bool {
        match self {
            MatchingMetric::CenterDistance => score <= threshold,
            MatchingMetric::Iou => score >= threshold,
        }
    }

    /// Strict comparison so that on equal scores the earlier candidate wins.
    pub fn is_better(&self, candidate: f32, best: f32) -> bool {
        match self {
            MatchingMetric::CenterDistance => candidate < best,
            MatchingMetric::Iou => candidate > best,
        }
    }
}

/// Direction in which the "unknown" label is allowed to match across labels.
///
/// `EstimatedOnly` lets an estimated object labeled "unknown" match ground
/// truth of any label. Whether the relaxation also applies to unknown ground
/// truth is configurable rather than assumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownMatching {
    /// Unknown matches only unknown
    #[default]
    Disallowed,
    /// An unknown estimated object may match any ground truth label
    EstimatedOnly,
    /// Unknown on either side may match any label on the other
    Symmetric,
}

/// Per-label matching thresholds together with the metric kind.
///
/// Two independent instances exist per run: one drives the TP/FP/FN
/// classification, the other the pass/fail judgement. They may assign
/// different thresholds to the same label.
#[derive(Debug, Clone)]
pub struct ThresholdPolicy {
    metric: MatchingMetric,
    thresholds: HashMap<String, f32>,
    default_threshold: Option<f32>,
    unknown_matching: UnknownMatching,
}

impl ThresholdPolicy {
    pub fn new(metric: MatchingMetric) -> Self {
        Self {
            metric,
            thresholds: HashMap::default(),
            default_threshold: None,
            unknown_matching: UnknownMatching::default(),
        }
    }

    /// Sets the threshold for a single label
    ///
    pub fn threshold(mut self, label: impl Into<String>, value: f32) -> Self {
        self.thresholds.insert(label.into(), value);
        self
    }

    /// Sets the same threshold for every label in the slice
    ///
    pub fn thresholds(mut self, labels: &[&str], value: f32) -> Self {
        for label in labels {
            self.thresholds.insert((*label).to_owned(), value);
        }
        self
    }

    /// Fallback threshold for labels without an explicit entry. Without it a
    /// pair whose label has no entry is simply ineligible.
    pub fn default_threshold(mut self, value: f32) -> Self {
        self.default_threshold = Some(value);
        self
    }

    pub fn unknown_matching(mut self, mode: UnknownMatching) -> Self {
        self.unknown_matching = mode;
        self
    }

    pub fn metric(&self) -> MatchingMetric {
        self.metric
    }

    pub fn unknown_mode(&self) -> UnknownMatching {
        self.unknown_matching
    }

    pub fn threshold_for(&self, label: &str) -> Option<f32> {
        self.thresholds
            .get(label)
            .copied()
            .or(self.default_threshold)
    }
}

/// Selects which ground truth objects count as critical for the evaluation.
///
#[derive(Debug, Clone, Default)]
pub struct CriticalObjectFilterConfig {
    target_labels: Vec<String>,
    ignore_attributes: Vec<(String, String)>,
}

impl CriticalObjectFilterConfig {
    /// `target_labels` empty means all labels pass. `ignore_attributes`
    /// entries are exact `key=value` strings; an object carrying any of them
    /// is excluded.
    pub fn new(target_labels: &[&str], ignore_attributes: &[&str]) -> Result<Self> {
        let mut parsed = Vec::with_capacity(ignore_attributes.len());
        for entry in ignore_attributes {
            let (key, value) = entry
                .split_once('=')
                .ok_or_else(|| Errors::MalformedIgnoreAttribute((*entry).to_owned()))?;
            parsed.push((key.to_owned(), value.to_owned()));
        }
        Ok(Self {
            target_labels: target_labels.iter().map(|l| (*l).to_owned()).collect(),
            ignore_attributes: parsed,
        })
    }

    pub fn target_labels(&self) -> &[String] {
        &self.target_labels
    }

    pub fn ignore_attributes(&self) -> &[(String, String)] {
        &self.ignore_attributes
    }

    pub fn is_target(&self, label: &str) -> bool {
        self.target_labels.is_empty() || self.target_labels.iter().any(|l| l == label)
    }
}

/// Full configuration of an evaluation run.
///
/// Construction validates the task against the policies: for spatial tasks
/// every target label must resolve to a threshold in both policies before any
/// frame is processed.
#[derive(Debug, Clone)]
pub struct EvaluationConfig {
    task: EvaluationTask,
    filter: CriticalObjectFilterConfig,
    metrics_policy: ThresholdPolicy,
    pass_fail_policy: ThresholdPolicy,
}

impl EvaluationConfig {
    pub fn new(
        task: EvaluationTask,
        filter: CriticalObjectFilterConfig,
        metrics_policy: ThresholdPolicy,
        pass_fail_policy: ThresholdPolicy,
    ) -> Result<Self> {
        if task.is_spatial() {
            for label in filter.target_labels() {
                for policy in [&metrics_policy, &pass_fail_policy] {
                    if policy.threshold_for(label).is_none() {
                        return Err(Errors::MissingThreshold(label.clone()).into());
                    }
                }
            }
        }
        Ok(Self {
            task,
            filter,
            metrics_policy,
            pass_fail_policy,
        })
    }

    pub fn task(&self) -> EvaluationTask {
        self.task
    }

    pub fn filter(&self) -> &CriticalObjectFilterConfig {
        &self.filter
    }

    pub fn metrics_policy(&self) -> &ThresholdPolicy {
        &self.metrics_policy
    }

    pub fn pass_fail_policy(&self) -> &ThresholdPolicy {
        &self.pass_fail_policy
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{
        CriticalObjectFilterConfig, EvaluationConfig, EvaluationTask, MatchingMetric,
        ThresholdPolicy,
    };

    #[test]
    fn task_parsing() {
        assert_eq!(
            "detection2d".parse::<EvaluationTask>().unwrap(),
            EvaluationTask::Detection
        );
        assert_eq!(
            "tracking".parse::<EvaluationTask>().unwrap(),
            EvaluationTask::Tracking
        );
        assert!("detection3d".parse::<EvaluationTask>().is_err());
    }

    #[test]
    fn threshold_lookup_with_default() {
        let policy = ThresholdPolicy::new(MatchingMetric::CenterDistance)
            .threshold("car", 100.0)
            .default_threshold(50.0);

        assert_eq!(policy.threshold_for("car"), Some(100.0));
        assert_eq!(policy.threshold_for("pedestrian"), Some(50.0));

        let strict = ThresholdPolicy::new(MatchingMetric::Iou).threshold("car", 0.5);
        assert_eq!(strict.threshold_for("pedestrian"), None);
    }

    #[test]
    fn boundary_is_inclusive() {
        assert!(MatchingMetric::CenterDistance.eligible(100.0, 100.0));
        assert!(!MatchingMetric::CenterDistance.eligible(100.1, 100.0));
        assert!(MatchingMetric::Iou.eligible(0.5, 0.5));
        assert!(!MatchingMetric::Iou.eligible(0.49, 0.5));
    }

    #[test]
    fn missing_threshold_fails_validation() {
        let filter = CriticalObjectFilterConfig::new(&["car", "pedestrian"], &[]).unwrap();
        let full = ThresholdPolicy::new(MatchingMetric::CenterDistance)
            .thresholds(&["car", "pedestrian"], 100.0);
        let partial = ThresholdPolicy::new(MatchingMetric::CenterDistance).threshold("car", 100.0);

        assert!(EvaluationConfig::new(
            EvaluationTask::Detection,
            filter.clone(),
            full.clone(),
            partial
        )
        .is_err());
        assert!(
            EvaluationConfig::new(EvaluationTask::Detection, filter, full.clone(), full).is_ok()
        );
    }

    #[test]
    fn classification_needs_no_thresholds() {
        let filter = CriticalObjectFilterConfig::new(&["green", "red"], &[]).unwrap();
        let empty = ThresholdPolicy::new(MatchingMetric::CenterDistance);
        assert!(EvaluationConfig::new(
            EvaluationTask::Classification,
            filter,
            empty.clone(),
            empty
        )
        .is_ok());
    }

    #[test]
    fn malformed_ignore_attribute() {
        assert!(CriticalObjectFilterConfig::new(&[], &["cycle_state.without_rider"]).is_err());
        assert!(CriticalObjectFilterConfig::new(&[], &["cycle_state=without_rider"]).is_ok());
    }
}
