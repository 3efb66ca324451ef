/*!
 * Progress reporting for translation runs.
 *
 * Reporting is purely observational; a sink cannot influence the run.
 */

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Snapshot of a run's progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressUpdate {
    /// Items finished so far
    pub completed: usize,
    /// Items in the run
    pub total: usize,
    /// Time since the run started
    pub elapsed: Duration,
    /// Linear estimate of the time left, once anything completed
    pub estimated_remaining: Option<Duration>,
}

/// Receiver of progress updates
pub trait ProgressSink: Send + Sync {
    fn report(&self, update: ProgressUpdate);
}

impl<F> ProgressSink for F
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        self(update)
    }
}

/// Sink that discards every update
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _update: ProgressUpdate) {}
}

/// Shared completion counter that turns increments into updates
#[derive(Debug)]
pub struct ProgressTracker {
    total: usize,
    completed: AtomicUsize,
    started: Instant,
}

impl ProgressTracker {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            completed: AtomicUsize::new(0),
            started: Instant::now(),
        }
    }

    /// Record `count` finished items and notify the sink
    pub fn advance(&self, count: usize, sink: &dyn ProgressSink) {
        if count == 0 {
            return;
        }
        let completed = (self.completed.fetch_add(count, Ordering::SeqCst) + count).min(self.total);
        sink.report(self.snapshot(completed));
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst).min(self.total)
    }

    fn snapshot(&self, completed: usize) -> ProgressUpdate {
        let elapsed = self.started.elapsed();
        let estimated_remaining = (completed > 0).then(|| {
            let per_item = elapsed.as_secs_f64() / completed as f64;
            Duration::from_secs_f64(per_item * (self.total - completed) as f64)
        });

        ProgressUpdate {
            completed,
            total: self.total,
            elapsed,
            estimated_remaining,
        }
    }
}
