//! Per-run context: label numbering, cancellation and progress.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::progress::{NoProgress, ProgressReporter, ProgressSink};
use crate::vector::LabelGenerator;

/// Cooperative cancellation flag.
///
/// Clones share the flag. Algorithms poll it between outer iterations, so a
/// parallel pass that is already running always completes.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// State shared by one or more `cluster` calls.
pub struct ClusteringSession {
    labels: LabelGenerator,
    cancel: CancellationToken,
    progress: Arc<dyn ProgressReporter>,
}

impl fmt::Debug for ClusteringSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClusteringSession")
            .field("labels", &self.labels)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl Default for ClusteringSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ClusteringSession {
    pub fn new() -> Self {
        Self {
            labels: LabelGenerator::new(),
            cancel: CancellationToken::new(),
            progress: Arc::new(NoProgress),
        }
    }

    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    #[must_use]
    pub fn with_progress(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress = reporter;
        self
    }

    pub fn labels(&self) -> &LabelGenerator {
        &self.labels
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Open a progress sink for a pass over `total` items.
    pub fn progress(&self, phase: &str, total: usize) -> Box<dyn ProgressSink> {
        self.progress.start(phase, total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancellation_is_shared() {
        let token = CancellationToken::new();
        let session = ClusteringSession::new().with_cancellation(token.clone());
        assert!(!session.is_cancelled());
        token.cancel();
        assert!(session.is_cancelled());
        token.reset();
        assert!(!session.is_cancelled());
    }

    #[test]
    fn test_sessions_number_labels_independently() {
        let a = ClusteringSession::new();
        let b = ClusteringSession::new();
        assert_eq!(a.labels().generate().as_str(), "<CL_0001>");
        assert_eq!(a.labels().generate().as_str(), "<CL_0002>");
        assert_eq!(b.labels().generate().as_str(), "<CL_0001>");
    }
}
