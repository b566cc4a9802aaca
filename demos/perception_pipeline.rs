use log::info;
use percept_eval::prelude::*;
use percept_eval::test_stuff::{perturbed, synthetic_scene, ObjectGen};

const TARGET_LABELS: [&str; 4] = ["car", "bicycle", "pedestrian", "motorbike"];

fn ground_truth_scene() -> Vec<GroundTruthFrame> {
    let mut generators = vec![
        ObjectGen::new("car", 100.0, 100.0, 30.0, 20.0, 2.0, 1.0),
        ObjectGen::new("car", 400.0, 150.0, 25.0, 18.0, 2.0, 1.0),
        ObjectGen::new("pedestrian", 250.0, 300.0, 10.0, 25.0, 1.5, 0.5),
        ObjectGen::new("bicycle", 600.0, 280.0, 15.0, 22.0, 1.5, 0.5),
    ];
    synthetic_scene(&mut generators, 1_000_000, 100_000, 20)
}

fn build_config(task: EvaluationTask) -> EvaluationConfig {
    let filter = CriticalObjectFilterConfig::new(&TARGET_LABELS, &[]).unwrap();
    let (metrics_policy, pass_fail_policy) = if task.is_spatial() {
        (
            ThresholdPolicy::new(MatchingMetric::CenterDistance)
                .thresholds(&TARGET_LABELS, 200.0)
                .unknown_matching(UnknownMatching::EstimatedOnly),
            ThresholdPolicy::new(MatchingMetric::CenterDistance)
                .thresholds(&TARGET_LABELS, 100.0)
                .unknown_matching(UnknownMatching::EstimatedOnly),
        )
    } else {
        (
            ThresholdPolicy::new(MatchingMetric::CenterDistance),
            ThresholdPolicy::new(MatchingMetric::CenterDistance),
        )
    };
    EvaluationConfig::new(task, filter, metrics_policy, pass_fail_policy).unwrap()
}

fn run(task: EvaluationTask, scene: &[GroundTruthFrame]) {
    info!("{:=^80}", format!(" Start {task} "));

    let mut evaluator = PerceptionEvaluator::new(build_config(task), scene.to_vec()).unwrap();

    for frame in scene {
        // Fake an imperfect perception output from the ground truth itself:
        // translate the boxes, flip half of the labels to unknown and drop
        // the first object.
        let (dx, dy) = if task.is_spatial() { (50.0, 50.0) } else { (0.0, 0.0) };
        let mut estimated = perturbed(&frame.objects, dx, dy, 0.5);
        if !estimated.is_empty() {
            estimated.remove(0);
        }

        let result = evaluator.submit_frame(frame.timestamp, estimated).unwrap();
        let pf = result.pass_fail();
        info!(
            "{} TP objects, {} FP objects, {} FN objects",
            pf.num_tp, pf.num_fp, pf.num_fn
        );
    }

    let num_fail: usize = evaluator
        .frame_results()
        .iter()
        .map(|r| r.pass_fail().num_fail)
        .sum();
    info!("Number of fails for critical objects: {num_fail}");

    let metrics = evaluator.finalize();
    info!("final metrics result\n{metrics}");
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let scene = ground_truth_scene();

    run(EvaluationTask::Detection, &scene);
    run(EvaluationTask::Tracking, &scene);
    run(EvaluationTask::Classification, &scene);
}
