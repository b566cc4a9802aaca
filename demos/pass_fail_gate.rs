use log::info;
use percept_eval::prelude::*;
use percept_eval::test_stuff::{perturbed, synthetic_scene, ObjectGen};

/// Shows the two threshold policies working independently: the metrics policy
/// accepts a 50px offset the pass/fail gate rejects, so the scene scores a
/// decent recall while most frames still fail.
fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let mut generators = vec![
        ObjectGen::new("car", 200.0, 200.0, 30.0, 20.0, 2.0, 1.0),
        ObjectGen::new("pedestrian", 500.0, 350.0, 10.0, 25.0, 1.5, 0.5),
    ];
    let scene = synthetic_scene(&mut generators, 0, 1000, 10);

    let filter = CriticalObjectFilterConfig::new(&["car", "pedestrian"], &[]).unwrap();
    let metrics_policy = ThresholdPolicy::new(MatchingMetric::CenterDistance)
        .thresholds(&["car", "pedestrian"], 200.0);
    let pass_fail_policy =
        ThresholdPolicy::new(MatchingMetric::CenterDistance).thresholds(&["car", "pedestrian"], 25.0);
    let config = EvaluationConfig::new(
        EvaluationTask::Detection,
        filter,
        metrics_policy,
        pass_fail_policy,
    )
    .unwrap();

    let mut evaluator = PerceptionEvaluator::new(config, scene.clone()).unwrap();

    for frame in &scene {
        let estimated = perturbed(&frame.objects, 50.0, 0.0, 0.0);
        let result = evaluator.submit_frame(frame.timestamp, estimated).unwrap();
        info!(
            "frame {}: passed={} num_fail={}",
            frame.timestamp,
            result.pass_fail().passed,
            result.pass_fail().num_fail
        );
    }

    info!("final metrics result\n{}", evaluator.finalize());
}
