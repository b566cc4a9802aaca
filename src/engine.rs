use crate::accumulator::{FrameAccumulator, FrameResult};
use crate::config::EvaluationConfig;
use crate::filtering::{filter_critical, is_critical};
use crate::matching::match_objects;
use crate::metrics::SceneMetrics;
use crate::object::DynamicObject;
use crate::passfail;
use crate::store::{GroundTruthFrame, GroundTruthStore};
use anyhow::Result;
use log::{debug, warn};

/// The frame evaluation engine.
///
/// One instance owns one run: its ground truth, its configuration and its
/// accumulated frame history. The engine is strictly sequential; every
/// `submit_frame` call fully processes one frame before the next begins, and
/// parallel runs (detection vs. tracking vs. classification) must use
/// independent instances.
pub struct PerceptionEvaluator {
    config: EvaluationConfig,
    store: GroundTruthStore,
    accumulator: FrameAccumulator,
}

impl PerceptionEvaluator {
    /// Builds the engine. Configuration problems (unsupported task, missing
    /// thresholds, duplicate ground truth timestamps) fail here, before any
    /// frame is processed.
    pub fn new(config: EvaluationConfig, ground_truth: Vec<GroundTruthFrame>) -> Result<Self> {
        Ok(Self {
            config,
            store: GroundTruthStore::new(ground_truth)?,
            accumulator: FrameAccumulator::default(),
        })
    }

    /// The per-frame entry point: ground truth lookup, critical filtering,
    /// matching under the metrics policy, pass/fail under the pass/fail
    /// policy, accumulation.
    ///
    /// An unknown timestamp is an error and leaves the accumulator untouched.
    pub fn submit_frame(
        &mut self,
        timestamp: u64,
        estimated: Vec<DynamicObject>,
    ) -> Result<&FrameResult> {
        let ground_truth = self.store.get_frame(timestamp)?.objects.clone();
        let filter = self.config.filter();

        let critical_flags: Vec<bool> = ground_truth
            .iter()
            .map(|obj| is_critical(obj, filter))
            .collect();
        let critical_ground_truth = filter_critical(&ground_truth, filter);

        // Valid input, all critical objects become FN; worth a single notice
        // per frame.
        if estimated.is_empty() && !critical_ground_truth.is_empty() {
            warn!(
                "frame {timestamp}: no estimated objects for {} critical ground truth objects; all become FN",
                critical_ground_truth.len()
            );
        }

        let matching = match_objects(
            &ground_truth,
            &critical_flags,
            &estimated,
            self.config.metrics_policy(),
            self.config.task(),
        );
        let pass_fail = passfail::evaluate(
            &critical_ground_truth,
            &estimated,
            self.config.pass_fail_policy(),
            filter,
            self.config.task(),
        );

        debug!(
            "frame {timestamp}: {} TP, {} FP, {} FN, passed={}",
            matching.num_tp(),
            matching.num_fp(),
            matching.num_fn(),
            pass_fail.passed
        );

        self.accumulator
            .append(FrameResult::new(timestamp, matching, pass_fail));
        Ok(self.accumulator.last().unwrap())
    }

    /// Computes the scene metrics over the history accumulated so far.
    ///
    /// Pure with respect to the engine state: calling it repeatedly without
    /// new frames yields identical metrics, and calling it mid-run yields
    /// partial (not wrong) ones.
    pub fn finalize(&self) -> SceneMetrics {
        SceneMetrics::aggregate(self.accumulator.all(), self.config.task())
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    pub fn ground_truth(&self) -> &GroundTruthStore {
        &self.store
    }

    pub fn frame_results(&self) -> &[FrameResult] {
        self.accumulator.all()
    }
}
