use crate::accumulator::FrameResult;
use crate::config::EvaluationTask;
use itertools::Itertools;
use std::collections::BTreeMap;
use std::fmt;

/// Accumulated confusion counts for one label.
///
#[derive(Debug, Clone, Copy, Default)]
pub struct LabelMetrics {
    pub num_tp: usize,
    pub num_fp: usize,
    pub num_fn: usize,
}

impl LabelMetrics {
    /// TP / (TP + FP). `None` when the label produced no positives at all.
    pub fn precision(&self) -> Option<f32> {
        let denominator = self.num_tp + self.num_fp;
        (denominator > 0).then(|| self.num_tp as f32 / denominator as f32)
    }

    /// TP / (TP + FN). `None` when the label never appeared in ground truth.
    pub fn recall(&self) -> Option<f32> {
        let denominator = self.num_tp + self.num_fn;
        (denominator > 0).then(|| self.num_tp as f32 / denominator as f32)
    }
}

/// Scene-level scores computed over the whole frame history.
///
/// Created once at the end of a run and read-only thereafter. The aggregation
/// is pure: it never mutates the history and yields the same result when
/// invoked twice.
#[derive(Debug, Clone)]
pub struct SceneMetrics {
    task: EvaluationTask,
    per_label: BTreeMap<String, LabelMetrics>,
    confusion: BTreeMap<(String, String), usize>,
    num_frames: usize,
    num_fail: usize,
}

impl SceneMetrics {
    /// Sums TP/FP/FN per label across all frames and derives the rates.
    ///
    /// TPs are booked under the matched ground truth label (which differs
    /// from the estimated one only for unknown-relaxed matches), FPs under
    /// the estimated label, FNs under the ground truth label. Degenerate
    /// inputs are not errors: zero frames or an absent label simply yield
    /// "no data" rates.
    pub fn aggregate(frame_results: &[FrameResult], task: EvaluationTask) -> Self {
        let mut per_label: BTreeMap<String, LabelMetrics> = BTreeMap::new();
        let mut confusion: BTreeMap<(String, String), usize> = BTreeMap::new();
        let mut num_fail = 0;

        for frame in frame_results {
            for m in frame.matching().object_matches() {
                if m.is_tp() {
                    let label = m
                        .ground_truth()
                        .map(|gt| gt.label())
                        .unwrap_or_else(|| m.estimated().label());
                    per_label.entry(label.to_owned()).or_default().num_tp += 1;
                } else {
                    per_label
                        .entry(m.estimated().label().to_owned())
                        .or_default()
                        .num_fp += 1;
                }
                if let Some(gt) = m.ground_truth() {
                    *confusion
                        .entry((gt.label().to_owned(), m.estimated().label().to_owned()))
                        .or_default() += 1;
                }
            }
            for gt in frame.matching().false_negatives() {
                per_label.entry(gt.label().to_owned()).or_default().num_fn += 1;
            }
            num_fail += frame.pass_fail().num_fail;
        }

        Self {
            task,
            per_label,
            confusion,
            num_frames: frame_results.len(),
            num_fail,
        }
    }

    pub fn task(&self) -> EvaluationTask {
        self.task
    }

    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    /// Total number of pass/fail failures over the scene
    ///
    pub fn num_fail(&self) -> usize {
        self.num_fail
    }

    pub fn label_metrics(&self, label: &str) -> LabelMetrics {
        self.per_label.get(label).copied().unwrap_or_default()
    }

    pub fn labels(&self) -> impl Iterator<Item = (&str, &LabelMetrics)> {
        self.per_label.iter().map(|(l, m)| (l.as_str(), m))
    }

    /// (ground truth label, estimated label) -> count, filled for every match
    /// that carries a ground truth link. For the classification task this is
    /// the full confusion breakdown.
    pub fn confusion(&self) -> &BTreeMap<(String, String), usize> {
        &self.confusion
    }
}

fn fmt_rate(rate: Option<f32>) -> String {
    match rate {
        Some(r) => format!("{r:.3}"),
        None => "n/a".to_owned(),
    }
}

impl fmt::Display for SceneMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "task={} frames={} num_fail={}",
            self.task, self.num_frames, self.num_fail
        )?;
        for (label, m) in &self.per_label {
            writeln!(
                f,
                "  {label}: tp={} fp={} fn={} precision={} recall={}",
                m.num_tp,
                m.num_fp,
                m.num_fn,
                fmt_rate(m.precision()),
                fmt_rate(m.recall()),
            )?;
        }
        if self.task == EvaluationTask::Classification && !self.confusion.is_empty() {
            let pairs = self
                .confusion
                .iter()
                .map(|((gt, est), count)| format!("{gt}->{est}: {count}"))
                .join(", ");
            writeln!(f, "  confusion: {pairs}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::accumulator::FrameResult;
    use crate::config::{EvaluationTask, MatchingMetric, ThresholdPolicy};
    use crate::matching::match_objects;
    use crate::metrics::SceneMetrics;
    use crate::object::DynamicObject;
    use crate::passfail::PassFailResult;
    use crate::utils::bbox::BoundingBox;
    use crate::EPS;

    fn obj(label: &str, x: f32) -> DynamicObject {
        DynamicObject::new(label, BoundingBox::new(x, 0.0, 10.0, 10.0), 0.9)
    }

    fn pass_fail(num_fail: usize) -> PassFailResult {
        PassFailResult {
            passed: num_fail == 0,
            num_fail,
            num_tp: 0,
            num_fp: 0,
            num_fn: 0,
            num_critical: 0,
        }
    }

    fn detection_frame(timestamp: u64, num_fail: usize) -> FrameResult {
        let gt = vec![obj("car", 0.0), obj("pedestrian", 300.0)];
        let est = vec![obj("car", 20.0), obj("car", 600.0)];
        let policy = ThresholdPolicy::new(MatchingMetric::CenterDistance)
            .thresholds(&["car", "pedestrian"], 100.0);
        let matching = match_objects(&gt, &[true, true], &est, &policy, EvaluationTask::Detection);
        FrameResult::new(timestamp, matching, pass_fail(num_fail))
    }

    #[test]
    fn per_label_counts_and_rates() {
        let frames = vec![detection_frame(100, 1), detection_frame(200, 2)];
        let metrics = SceneMetrics::aggregate(&frames, EvaluationTask::Detection);

        let car = metrics.label_metrics("car");
        assert_eq!(car.num_tp, 2);
        assert_eq!(car.num_fp, 2);
        assert_eq!(car.num_fn, 0);
        assert!((car.precision().unwrap() - 0.5).abs() < EPS);
        assert!((car.recall().unwrap() - 1.0).abs() < EPS);

        let pedestrian = metrics.label_metrics("pedestrian");
        assert_eq!(pedestrian.num_fn, 2);
        assert!(pedestrian.precision().is_none());
        assert!((pedestrian.recall().unwrap() - 0.0).abs() < EPS);

        assert_eq!(metrics.num_frames(), 2);
        assert_eq!(metrics.num_fail(), 3);
    }

    #[test]
    fn no_data_is_not_an_error() {
        let metrics = SceneMetrics::aggregate(&[], EvaluationTask::Detection);
        assert_eq!(metrics.num_frames(), 0);
        assert!(metrics.label_metrics("car").precision().is_none());
        assert!(metrics.label_metrics("car").recall().is_none());
    }

    #[test]
    fn aggregation_is_idempotent() {
        let frames = vec![detection_frame(100, 1)];
        let first = SceneMetrics::aggregate(&frames, EvaluationTask::Detection);
        let second = SceneMetrics::aggregate(&frames, EvaluationTask::Detection);

        assert_eq!(first.num_fail(), second.num_fail());
        assert_eq!(
            first.label_metrics("car").num_tp,
            second.label_metrics("car").num_tp
        );
        assert_eq!(format!("{first}"), format!("{second}"));
    }

    #[test]
    fn classification_confusion_breakdown() {
        let gt = vec![obj("green", 0.0), obj("red", 20.0)];
        let est = vec![obj("green", 0.0), obj("yellow", 20.0)];
        let empty = ThresholdPolicy::new(MatchingMetric::CenterDistance);
        let matching = match_objects(
            &gt,
            &[true, true],
            &est,
            &empty,
            EvaluationTask::Classification,
        );
        let frames = vec![FrameResult::new(100, matching, pass_fail(1))];

        let metrics = SceneMetrics::aggregate(&frames, EvaluationTask::Classification);
        assert_eq!(
            metrics.confusion()[&("green".to_owned(), "green".to_owned())],
            1
        );
        assert_eq!(
            metrics.confusion()[&("red".to_owned(), "yellow".to_owned())],
            1
        );
    }
}
