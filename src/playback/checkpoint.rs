//! Progress checkpoints and the collaborators that persist them.

use serde::{Deserialize, Serialize};
use std::sync::mpsc;
use std::time::{Duration, Instant};

/// Snapshot of playback position and speed handed to the progress sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressCheckpoint {
    pub word_index: usize,
    pub words_per_minute: u32,
}

/// Receives checkpoints. Implementations own retries and error reporting;
/// the scheduler never waits on them.
pub trait ProgressSink: Send {
    fn on_checkpoint(&self, checkpoint: ProgressCheckpoint);
}

/// Supplies the checkpoint to resume from when a session starts.
pub trait ProgressSource {
    fn load_checkpoint(&self) -> Option<ProgressCheckpoint>;
}

impl<F> ProgressSink for F
where
    F: Fn(ProgressCheckpoint) + Send,
{
    fn on_checkpoint(&self, checkpoint: ProgressCheckpoint) {
        self(checkpoint)
    }
}

impl ProgressSink for mpsc::Sender<ProgressCheckpoint> {
    fn on_checkpoint(&self, checkpoint: ProgressCheckpoint) {
        let _ = self.send(checkpoint);
    }
}

/// Last-emit guard that lets through at most one playback checkpoint per
/// window. Pauses bypass the guard but still restart the window.
#[derive(Debug, Clone)]
pub struct CheckpointThrottle {
    window: Duration,
    last_emit: Option<Instant>,
}

impl CheckpointThrottle {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_emit: None,
        }
    }

    /// Returns true and records `now` if a playback checkpoint may be sent.
    pub fn try_acquire(&mut self, now: Instant) -> bool {
        let due = match self.last_emit {
            Some(last) => now.saturating_duration_since(last) >= self.window,
            None => true,
        };
        if due {
            self.last_emit = Some(now);
        }
        due
    }

    /// Record an emission that happened outside the guard.
    pub fn mark(&mut self, now: Instant) {
        self.last_emit = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::{CheckpointThrottle, ProgressCheckpoint, ProgressSink};
    use std::sync::mpsc;
    use std::time::{Duration, Instant};

    #[test]
    fn throttle_allows_one_emit_per_window() {
        let start = Instant::now();
        let mut throttle = CheckpointThrottle::new(Duration::from_millis(2000));
        let allowed = (0..10)
            .filter(|step| throttle.try_acquire(start + Duration::from_millis(step * 150)))
            .count();
        assert_eq!(allowed, 1);
        assert!(throttle.try_acquire(start + Duration::from_millis(2000)));
    }

    #[test]
    fn mark_restarts_the_window() {
        let start = Instant::now();
        let mut throttle = CheckpointThrottle::new(Duration::from_millis(2000));
        assert!(throttle.try_acquire(start));
        throttle.mark(start + Duration::from_millis(1900));
        assert!(!throttle.try_acquire(start + Duration::from_millis(2100)));
        assert!(throttle.try_acquire(start + Duration::from_millis(3900)));
    }

    #[test]
    fn channel_and_closure_sinks_forward_checkpoints() {
        let (tx, rx) = mpsc::channel();
        let checkpoint = ProgressCheckpoint {
            word_index: 7,
            words_per_minute: 320,
        };
        tx.on_checkpoint(checkpoint);
        assert_eq!(rx.recv().ok(), Some(checkpoint));

        let (tx, rx) = mpsc::channel();
        let forward = move |cp: ProgressCheckpoint| {
            let _ = tx.send(cp.word_index);
        };
        forward.on_checkpoint(checkpoint);
        assert_eq!(rx.recv().ok(), Some(7));
    }
}
