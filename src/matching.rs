use crate::config::{EvaluationTask, ThresholdPolicy, UnknownMatching};
use crate::object::DynamicObject;

/// Classification outcome of a single estimated object.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    TruePositive,
    FalsePositive,
}

/// One entry per estimated object: its TP/FP tag, the matched ground truth
/// object (when one exists) and the achieved metric score.
///
/// For the classification task a false positive still links the paired ground
/// truth object, which is what the confusion breakdown is built from.
#[derive(Debug, Clone)]
pub struct ObjectMatch {
    estimated: DynamicObject,
    ground_truth: Option<DynamicObject>,
    score: Option<f32>,
    status: MatchStatus,
}

impl ObjectMatch {
    pub fn estimated(&self) -> &DynamicObject {
        &self.estimated
    }

    pub fn ground_truth(&self) -> Option<&DynamicObject> {
        self.ground_truth.as_ref()
    }

    pub fn score(&self) -> Option<f32> {
        self.score
    }

    pub fn status(&self) -> MatchStatus {
        self.status
    }

    pub fn is_tp(&self) -> bool {
        self.status == MatchStatus::TruePositive
    }

    pub fn is_fp(&self) -> bool {
        self.status == MatchStatus::FalsePositive
    }
}

/// Result of matching one frame: per-estimate outcomes plus the critical
/// ground truth objects nothing matched.
///
#[derive(Debug, Clone, Default)]
pub struct MatchingResult {
    object_matches: Vec<ObjectMatch>,
    false_negatives: Vec<DynamicObject>,
}

impl MatchingResult {
    pub fn object_matches(&self) -> &[ObjectMatch] {
        &self.object_matches
    }

    pub fn false_negatives(&self) -> &[DynamicObject] {
        &self.false_negatives
    }

    pub fn num_tp(&self) -> usize {
        self.object_matches.iter().filter(|m| m.is_tp()).count()
    }

    pub fn num_fp(&self) -> usize {
        self.object_matches.iter().filter(|m| m.is_fp()).count()
    }

    pub fn num_fn(&self) -> usize {
        self.false_negatives.len()
    }
}

fn labels_compatible(
    estimated: &DynamicObject,
    ground_truth: &DynamicObject,
    mode: UnknownMatching,
) -> bool {
    estimated.label() == ground_truth.label()
        || (estimated.is_unknown() && mode != UnknownMatching::Disallowed)
        || (ground_truth.is_unknown() && mode == UnknownMatching::Symmetric)
}

/// Matches estimated objects against ground truth and classifies both sides.
///
/// `critical` is a per-ground-truth flag slice; only flagged objects are
/// accounted as false negatives when they stay unmatched. Matching itself runs
/// over the full ground truth list.
///
/// For the spatial tasks the assignment is deliberately greedy, not a global
/// optimal one: estimated objects are processed in arrival order, each takes
/// the best eligible unmatched candidate (minimal center distance or maximal
/// IoU, threshold boundaries inclusive), ties go to the earlier ground truth
/// entry. The threshold applied to a candidate pair is the ground truth
/// label's one.
///
/// For classification the pairing is the pre-existing order-wise 1:1
/// correspondence and the score is label equality.
pub fn match_objects(
    ground_truth: &[DynamicObject],
    critical: &[bool],
    estimated: &[DynamicObject],
    policy: &ThresholdPolicy,
    task: EvaluationTask,
) -> MatchingResult {
    assert_eq!(
        ground_truth.len(),
        critical.len(),
        "Each ground truth object requires a criticality flag"
    );

    match task {
        EvaluationTask::Detection | EvaluationTask::Tracking => {
            match_spatial(ground_truth, critical, estimated, policy)
        }
        EvaluationTask::Classification => match_by_correspondence(ground_truth, critical, estimated),
    }
}

fn match_spatial(
    ground_truth: &[DynamicObject],
    critical: &[bool],
    estimated: &[DynamicObject],
    policy: &ThresholdPolicy,
) -> MatchingResult {
    let metric = policy.metric();
    let mut used = vec![false; ground_truth.len()];
    let mut object_matches = Vec::with_capacity(estimated.len());

    for est in estimated {
        let mut best: Option<(usize, f32)> = None;

        for (gi, gt) in ground_truth.iter().enumerate() {
            if used[gi] || !labels_compatible(est, gt, policy.unknown_mode()) {
                continue;
            }
            let threshold = match policy.threshold_for(gt.label()) {
                Some(t) => t,
                None => continue,
            };
            let score = metric.score(est.bbox(), gt.bbox());
            if !metric.eligible(score, threshold) {
                continue;
            }
            match best {
                Some((_, best_score)) if !metric.is_better(score, best_score) => {}
                _ => best = Some((gi, score)),
            }
        }

        object_matches.push(match best {
            Some((gi, score)) => {
                used[gi] = true;
                ObjectMatch {
                    estimated: est.clone(),
                    ground_truth: Some(ground_truth[gi].clone()),
                    score: Some(score),
                    status: MatchStatus::TruePositive,
                }
            }
            None => ObjectMatch {
                estimated: est.clone(),
                ground_truth: None,
                score: None,
                status: MatchStatus::FalsePositive,
            },
        });
    }

    let false_negatives = ground_truth
        .iter()
        .zip(used.iter())
        .zip(critical.iter())
        .filter(|((_, used), critical)| !**used && **critical)
        .map(|((gt, _), _)| gt.clone())
        .collect();

    MatchingResult {
        object_matches,
        false_negatives,
    }
}

fn match_by_correspondence(
    ground_truth: &[DynamicObject],
    critical: &[bool],
    estimated: &[DynamicObject],
) -> MatchingResult {
    let object_matches = estimated
        .iter()
        .enumerate()
        .map(|(i, est)| match ground_truth.get(i) {
            Some(gt) => ObjectMatch {
                estimated: est.clone(),
                ground_truth: Some(gt.clone()),
                score: None,
                status: if est.label() == gt.label() {
                    MatchStatus::TruePositive
                } else {
                    MatchStatus::FalsePositive
                },
            },
            None => ObjectMatch {
                estimated: est.clone(),
                ground_truth: None,
                score: None,
                status: MatchStatus::FalsePositive,
            },
        })
        .collect();

    let false_negatives = ground_truth
        .iter()
        .zip(critical.iter())
        .skip(estimated.len())
        .filter(|(_, critical)| **critical)
        .map(|(gt, _)| gt.clone())
        .collect();

    MatchingResult {
        object_matches,
        false_negatives,
    }
}
