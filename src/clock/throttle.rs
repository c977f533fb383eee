use std::time::Duration;

/// Elapsed-time gate: a stage runs at most once per `interval`.
///
/// `is_due` only looks; `mark` records a run. Stages that should only count
/// successful runs call `mark` themselves, everyone else uses `try_acquire`.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    last: Option<Duration>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Throttle for a target rate. A rate of zero never throttles.
    pub fn from_hz(hz: u32) -> Self {
        let interval = if hz == 0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64(1.0 / hz as f64)
        };
        Self::new(interval)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_due(&self, now: Duration) -> bool {
        match self.last {
            None => true,
            // A clock that moved backwards counts as not elapsed.
            Some(last) => now.checked_sub(last).is_some_and(|e| e >= self.interval),
        }
    }

    pub fn mark(&mut self, now: Duration) {
        self.last = Some(now);
    }

    pub fn try_acquire(&mut self, now: Duration) -> bool {
        if self.is_due(now) {
            self.mark(now);
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}
