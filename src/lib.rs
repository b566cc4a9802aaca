/// Frame accumulation across a run
pub mod accumulator;
/// Evaluation task, policies and engine configuration
pub mod config;
/// The per-frame evaluation engine
pub mod engine;
/// Critical object selection
pub mod filtering;
/// TP/FP/FN matching between estimated and ground truth objects
pub mod matching;
/// Scene-level metrics computation
pub mod metrics;
/// Detected/labeled object value type
pub mod object;
/// Pass/fail judgement for critical objects
pub mod passfail;
/// Convenience re-exports
pub mod prelude;
/// Ground truth frames indexed by timestamp
pub mod store;
/// Object generators and perturbators used in tests and demos
pub mod test_stuff;
/// Geometry helpers
pub mod utils;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum Errors {
    #[error("Evaluation task '{0}' is not supported.")]
    UnsupportedTask(String),
    #[error("Matching threshold for target label '{0}' is missing in the policy.")]
    MissingThreshold(String),
    #[error("No ground truth frame is registered for timestamp {0}.")]
    FrameNotFound(u64),
    #[error("Ground truth frame for timestamp {0} is registered twice.")]
    DuplicateTimestamp(u64),
    #[error("Ignore attribute entry '{0}' is not a key=value pair.")]
    MalformedIgnoreAttribute(String),
}

pub(crate) const EPS: f32 = 0.00001;
