//! Progress reporting seam between the algorithms and the display layer.

/// Receives one tick per processed item. Called concurrently from worker
/// threads.
pub trait ProgressSink: Send + Sync {
    fn increment(&self);

    fn finish(&self) {}
}

/// Creates a sink for each long-running pass.
pub trait ProgressReporter: Send + Sync {
    fn start(&self, phase: &str, total: usize) -> Box<dyn ProgressSink>;
}

/// Discards every tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn increment(&self) {}
}

impl ProgressReporter for NoProgress {
    fn start(&self, _phase: &str, _total: usize) -> Box<dyn ProgressSink> {
        Box::new(NoProgress)
    }
}
