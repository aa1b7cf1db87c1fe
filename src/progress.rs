//! Progress sink: where `{saved, max}` updates go
//!
//! The session pushes a fresh pair whenever the saved count changes; what a
//! sink does with it is presentation, not session logic.

use colored::Colorize;
use tracing::info;

/// Consumer of `{saved, max}` progress updates
///
/// Fire-and-forget: no return value, and the session never reads back.
pub trait ProgressSink: Send + Sync {
    fn update(&self, saved: usize, max: usize);
}

/// Sink that drops every update
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn update(&self, _saved: usize, _max: usize) {}
}

/// Sink that logs updates through tracing
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn update(&self, saved: usize, max: usize) {
        info!(saved, max, remaining = max.saturating_sub(saved), "rating progress");
    }
}

/// Sink that prints a saved/remaining caption to stderr
///
/// Console counterpart of the original labeled progress bar; an optional
/// title renders as a leading label.
#[derive(Debug, Clone, Default)]
pub struct ConsoleProgress {
    title: Option<String>,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
        }
    }
}

impl ProgressSink for ConsoleProgress {
    fn update(&self, saved: usize, max: usize) {
        let remaining = max.saturating_sub(saved);
        let label = self.title.as_deref().unwrap_or("Progress");
        eprintln!(
            "{} {} {}",
            label.bold(),
            format!("Saved: {saved}").green(),
            format!("Remaining: {remaining}").yellow()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_progress_tolerates_saved_above_max() {
        // A stale resumed count can exceed the collection length; the
        // remaining field must clamp, not underflow. A subscriber at info
        // level is required so the field actually gets evaluated.
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_writer(std::io::sink)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            LogProgress.update(5, 4);
        });
    }

    #[test]
    fn test_console_progress_tolerates_saved_above_max() {
        ConsoleProgress::with_title("t").update(5, 4);
    }
}

#[cfg(test)]
pub mod mock {
    use std::sync::Mutex;

    use super::*;

    /// Sink that records every update for test assertions
    #[derive(Default)]
    pub struct RecordingProgress {
        updates: Mutex<Vec<(usize, usize)>>,
    }

    impl RecordingProgress {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn updates(&self) -> Vec<(usize, usize)> {
            self.updates.lock().unwrap().clone()
        }

        pub fn last(&self) -> Option<(usize, usize)> {
            self.updates.lock().unwrap().last().copied()
        }
    }

    impl ProgressSink for RecordingProgress {
        fn update(&self, saved: usize, max: usize) {
            self.updates.lock().unwrap().push((saved, max));
        }
    }
}
