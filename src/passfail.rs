use crate::config::{CriticalObjectFilterConfig, EvaluationTask, ThresholdPolicy};
use crate::matching::match_objects;
use crate::object::DynamicObject;

/// Per-frame pass/fail verdict over the critical objects.
///
/// This is a judgement separate from the TP/FP/FN metrics bookkeeping: the
/// same raw objects are re-matched under the pass/fail policy, which may be
/// stricter or looser than the metrics one.
#[derive(Debug, Clone, Copy)]
pub struct PassFailResult {
    pub passed: bool,
    /// Unmatched critical ground truth plus critical-labeled false positives
    pub num_fail: usize,
    pub num_tp: usize,
    pub num_fp: usize,
    pub num_fn: usize,
    /// Critical ground truth objects the verdict was computed over
    pub num_critical: usize,
}

/// Judges one frame: matches the estimated objects against the critical
/// ground truth under the pass/fail policy and counts the failures.
///
/// A false positive contributes to `num_fail` only when its estimated label
/// is a target label; estimated objects outside the critical label set cannot
/// fail a frame.
pub fn evaluate(
    critical_ground_truth: &[DynamicObject],
    estimated: &[DynamicObject],
    policy: &ThresholdPolicy,
    filter: &CriticalObjectFilterConfig,
    task: EvaluationTask,
) -> PassFailResult {
    let critical = vec![true; critical_ground_truth.len()];
    let matching = match_objects(critical_ground_truth, &critical, estimated, policy, task);

    let num_fp = matching
        .object_matches()
        .iter()
        .filter(|m| m.is_fp() && filter.is_target(m.estimated().label()))
        .count();
    let num_fn = matching.num_fn();
    let num_fail = num_fn + num_fp;

    PassFailResult {
        passed: num_fail == 0,
        num_fail,
        num_tp: matching.num_tp(),
        num_fp,
        num_fn,
        num_critical: critical_ground_truth.len(),
    }
}
