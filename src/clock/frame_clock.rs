use std::time::Duration;

use anyhow::{bail, Result};
use serde::Serialize;

use super::Throttle;

/// Which stages run on a given tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickSchedule {
    pub index: u64,
    pub at: Duration,
    /// Pose acquisition runs on every tick.
    pub run_pose: bool,
    pub run_racket: bool,
}

/// Splits the display-rate tick stream into per-stage cadences.
///
/// The metric extractor keeps its own 100 ms gate on top of this, so the two
/// throttles nest: a tick may acquire a pose that the extractor then skips.
#[derive(Debug, Clone)]
pub struct FrameClock {
    tick_interval: Duration,
    racket: Throttle,
    ticks: u64,
}

impl FrameClock {
    /// Both rates must be non-zero.
    pub fn new(tick_hz: u32, racket_hz: u32) -> Result<Self> {
        if tick_hz == 0 || racket_hz == 0 {
            bail!("tick and racket rates must be non-zero (tick {tick_hz} Hz, racket {racket_hz} Hz)");
        }
        Ok(Self {
            tick_interval: Throttle::from_hz(tick_hz).interval(),
            racket: Throttle::from_hz(racket_hz),
            ticks: 0,
        })
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn tick(&mut self, now: Duration) -> TickSchedule {
        let index = self.ticks;
        self.ticks = self.ticks.wrapping_add(1);
        TickSchedule {
            index,
            at: now,
            run_pose: true,
            run_racket: self.racket.try_acquire(now),
        }
    }

    pub fn reset(&mut self) {
        self.racket.reset();
        self.ticks = 0;
    }
}
