// ============================================================================
// ANIMATION
// ============================================================================
//
// Time-based value transitions.
//
// A task describes one transition from a start value to a target. The
// `AnimationDriver` owns at most one task and is advanced by whoever owns
// the frame clock; every advance yields the value to push into the gauge.
// Nothing here spawns threads or timers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Maps `(start, end, fraction)` to an intermediate value.
pub type Interpolator = fn(f64, f64, f64) -> f64;

/// Linear interpolation, the default for value transitions.
pub fn lerp(start: f64, end: f64, fraction: f64) -> f64 {
    start + fraction * (end - start)
}

#[derive(Debug, Default)]
struct TaskStatus {
    cancelled: AtomicBool,
    finished: AtomicBool,
}

/// Shared view of a running task. Cancelling it stops the task at the next
/// frame and leaves the last pushed value in place.
#[derive(Debug, Clone, Default)]
pub struct AnimationHandle {
    status: Arc<TaskStatus>,
}

impl AnimationHandle {
    pub fn cancel(&self) {
        self.status.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.status.cancelled.load(Ordering::Acquire)
    }

    pub fn is_finished(&self) -> bool {
        self.status.finished.load(Ordering::Acquire)
    }

    /// Neither cancelled nor finished.
    pub fn is_active(&self) -> bool {
        !self.is_cancelled() && !self.is_finished()
    }

    fn mark_finished(&self) {
        self.status.finished.store(true, Ordering::Release);
    }
}

#[derive(Debug)]
pub struct AnimationTask {
    pub start_value: f64,
    pub target_value: f64,
    pub duration: Duration,
    pub start_delay: Duration,
    pub started_at: Instant,
    interpolator: Interpolator,
    handle: AnimationHandle,
}

impl AnimationTask {
    pub fn new(
        start_value: f64,
        target_value: f64,
        duration: Duration,
        start_delay: Duration,
        started_at: Instant,
    ) -> Self {
        Self {
            start_value,
            target_value,
            duration,
            start_delay,
            started_at,
            interpolator: lerp,
            handle: AnimationHandle::default(),
        }
    }

    pub fn with_interpolator(mut self, interpolator: Interpolator) -> Self {
        self.interpolator = interpolator;
        self
    }

    pub fn handle(&self) -> AnimationHandle {
        self.handle.clone()
    }

    /// Elapsed fraction of the duration at `now`, in `[0, 1]`.
    ///
    /// Stays at 0 during the start delay. A zero duration jumps to 1 as
    /// soon as the delay has passed.
    pub fn fraction_at(&self, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(self.started_at);
        let Some(running) = elapsed.checked_sub(self.start_delay) else {
            return 0.0;
        };
        if self.duration.is_zero() {
            return 1.0;
        }
        (running.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    pub fn value_at(&self, now: Instant) -> f64 {
        (self.interpolator)(self.start_value, self.target_value, self.fraction_at(now))
    }

    pub fn is_delayed_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started_at) < self.start_delay
    }

    pub fn is_complete_at(&self, now: Instant) -> bool {
        !self.is_delayed_at(now) && self.fraction_at(now) >= 1.0
    }
}

/// Runs at most one task; starting another supersedes the one in flight.
#[derive(Debug, Default)]
pub struct AnimationDriver {
    task: Option<AnimationTask>,
}

impl AnimationDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, task: AnimationTask) -> AnimationHandle {
        let handle = task.handle();
        debug!(
            from = task.start_value,
            to = task.target_value,
            duration_ms = task.duration.as_millis() as u64,
            delay_ms = task.start_delay.as_millis() as u64,
            "animation started"
        );
        if let Some(previous) = self.task.replace(task) {
            previous.handle.cancel();
            debug!(to = previous.target_value, "animation superseded");
        }
        handle
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.handle.cancel();
            debug!(to = task.target_value, "animation cancelled");
        }
    }

    pub fn is_animating(&self) -> bool {
        self.task.is_some()
    }

    pub fn current(&self) -> Option<&AnimationTask> {
        self.task.as_ref()
    }

    /// Advances the running task to `now`.
    ///
    /// Returns the value to push, or `None` when idle, still inside the
    /// start delay, or cancelled through a handle. A task is dropped once it
    /// has produced its target.
    pub fn tick(&mut self, now: Instant) -> Option<f64> {
        let task = self.task.as_ref()?;
        if task.handle.is_cancelled() {
            self.task = None;
            return None;
        }
        if task.is_delayed_at(now) {
            return None;
        }

        let value = task.value_at(now);
        if task.is_complete_at(now) {
            task.handle.mark_finished();
            debug!(value, "animation finished");
            self.task = None;
        }
        Some(value)
    }
}
