//! Recording timer: one-second elapsed counter driven by a tokio interval task.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};

const TICK: Duration = Duration::from_secs(1);

/// `MM:SS` with integer division and modulo by 60.
pub fn format_elapsed(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Counts whole seconds while running. Must be started inside a tokio runtime.
#[derive(Debug)]
pub struct RecordingTimer {
    elapsed: Arc<AtomicU64>,
    handle: Option<JoinHandle<()>>,
}

impl RecordingTimer {
    /// Starts at 0; the first increment lands one second after start.
    pub fn start() -> Self {
        let elapsed = Arc::new(AtomicU64::new(0));
        let counter = elapsed.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + TICK, TICK);
            loop {
                ticker.tick().await;
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });
        Self {
            elapsed,
            handle: Some(handle),
        }
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed.load(Ordering::SeqCst)
    }

    pub fn display(&self) -> String {
        format_elapsed(self.elapsed_seconds())
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Clears the interval. Idempotent.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// Cancels and resets the counter to 0.
    pub fn reset(&mut self) {
        self.cancel();
        self.elapsed.store(0, Ordering::SeqCst);
    }
}

impl Drop for RecordingTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0), "00:00");
        assert_eq!(format_elapsed(3), "00:03");
        assert_eq!(format_elapsed(59), "00:59");
        assert_eq!(format_elapsed(60), "01:00");
        assert_eq!(format_elapsed(754), "12:34");
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_counts_seconds_and_stops_on_cancel() {
        let mut timer = RecordingTimer::start();
        assert_eq!(timer.display(), "00:00");

        tokio::time::sleep(Duration::from_millis(3_100)).await;
        assert_eq!(timer.display(), "00:03");

        timer.cancel();
        assert!(!timer.is_running());
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(timer.elapsed_seconds(), 3);

        timer.cancel();
        timer.reset();
        assert_eq!(timer.elapsed_seconds(), 0);
    }
}
