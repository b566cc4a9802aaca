use crate::matching::MatchingResult;
use crate::passfail::PassFailResult;

/// Everything the engine computed for one frame.
///
/// Created once per callback invocation and immutable afterwards.
#[derive(Debug, Clone)]
pub struct FrameResult {
    timestamp: u64,
    matching: MatchingResult,
    pass_fail: PassFailResult,
}

impl FrameResult {
    pub fn new(timestamp: u64, matching: MatchingResult, pass_fail: PassFailResult) -> Self {
        Self {
            timestamp,
            matching,
            pass_fail,
        }
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn matching(&self) -> &MatchingResult {
        &self.matching
    }

    pub fn pass_fail(&self) -> &PassFailResult {
        &self.pass_fail
    }
}

/// Append-only history of frame results in call order.
///
/// The accumulator never mutates or removes an entry; the caller controls the
/// ordering by the order of its callbacks.
#[derive(Debug, Default)]
pub struct FrameAccumulator {
    results: Vec<FrameResult>,
}

impl FrameAccumulator {
    pub fn append(&mut self, result: FrameResult) {
        self.results.push(result);
    }

    pub fn all(&self) -> &[FrameResult] {
        &self.results
    }

    pub fn last(&self) -> Option<&FrameResult> {
        self.results.last()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
