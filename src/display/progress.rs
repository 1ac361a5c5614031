//! Progress bars for long clustering passes.

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

use crate::cluster::{ProgressReporter, ProgressSink};

/// Create a styled progress bar for a pass over `total` items.
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Draws one bar per clustering pass on stderr.
pub struct BarReporter {
    multi: MultiProgress,
}

impl Default for BarReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl BarReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
        }
    }

    /// A reporter that draws nothing, for tests and piped output.
    pub fn hidden() -> Self {
        Self {
            multi: MultiProgress::with_draw_target(ProgressDrawTarget::hidden()),
        }
    }
}

impl ProgressReporter for BarReporter {
    fn start(&self, phase: &str, total: usize) -> Box<dyn ProgressSink> {
        let bar = self.multi.add(create_progress_bar(total as u64, phase));
        Box::new(BarSink(bar))
    }
}

/// One bar; ticks arrive from worker threads.
struct BarSink(ProgressBar);

impl ProgressSink for BarSink {
    fn increment(&self) {
        self.0.inc(1);
    }

    fn finish(&self) {
        self.0.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_counts_ticks() {
        let reporter = BarReporter::hidden();
        let sink = reporter.start("assign", 3);
        for _ in 0..3 {
            sink.increment();
        }
        sink.finish();
    }

    #[test]
    fn test_bar_position() {
        let bar = create_progress_bar(5, "merge");
        bar.inc(2);
        assert_eq!(bar.position(), 2);
        assert_eq!(bar.length(), Some(5));
        bar.finish_and_clear();
    }
}
