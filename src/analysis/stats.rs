use std::collections::VecDeque;

use serde::Serialize;

const MAX_RECENT_TICKS: usize = 20;

/// What happened on one tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickRecord {
    pub index: u64,
    pub at_ms: u64,
    pub pose: bool,
    pub racket_ran: bool,
    pub racket_confidence: Option<f32>,
    pub similarity: Option<u8>,
    pub fault: Option<String>,
    pub elapsed_us: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub tick_count: u64,
    pub pose_count: u64,
    pub racket_runs: u64,
    pub racket_count: u64,
    pub extraction_count: u64,
    pub fault_count: u64,
    pub recent_ticks: Vec<TickRecord>,
}

/// Counters plus the last few tick records.
#[derive(Debug, Default)]
pub struct TickStats {
    recent: VecDeque<TickRecord>,
    tick_count: u64,
    pose_count: u64,
    racket_runs: u64,
    racket_count: u64,
    extraction_count: u64,
    fault_count: u64,
}

impl TickStats {
    pub fn new() -> Self {
        Self {
            recent: VecDeque::with_capacity(MAX_RECENT_TICKS),
            ..Self::default()
        }
    }

    pub fn record(&mut self, tick: TickRecord) {
        self.tick_count += 1;
        if tick.pose {
            self.pose_count += 1;
        }
        if tick.racket_ran {
            self.racket_runs += 1;
        }
        if tick.racket_confidence.is_some() {
            self.racket_count += 1;
        }
        if tick.similarity.is_some() {
            self.extraction_count += 1;
        }
        if tick.fault.is_some() {
            self.fault_count += 1;
        }

        self.recent.push_back(tick);
        if self.recent.len() > MAX_RECENT_TICKS {
            self.recent.pop_front();
        }
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            tick_count: self.tick_count,
            pose_count: self.pose_count,
            racket_runs: self.racket_runs,
            racket_count: self.racket_count,
            extraction_count: self.extraction_count,
            fault_count: self.fault_count,
            recent_ticks: self.recent.iter().cloned().collect(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick(index: u64, pose: bool, fault: bool) -> TickRecord {
        TickRecord {
            index,
            at_ms: index * 16,
            pose,
            racket_ran: index % 2 == 0,
            racket_confidence: None,
            similarity: pose.then_some(90),
            fault: fault.then(|| "boom".to_string()),
            elapsed_us: 100,
        }
    }

    #[test]
    fn keeps_last_twenty_and_counts_everything() {
        let mut stats = TickStats::new();
        for i in 0..50 {
            stats.record(tick(i, i % 5 != 0, i == 7));
        }
        let snap = stats.snapshot();
        assert_eq!(snap.tick_count, 50);
        assert_eq!(snap.pose_count, 40);
        assert_eq!(snap.extraction_count, 40);
        assert_eq!(snap.racket_runs, 25);
        assert_eq!(snap.fault_count, 1);
        assert_eq!(snap.recent_ticks.len(), MAX_RECENT_TICKS);
        assert_eq!(snap.recent_ticks[0].index, 30);
    }

    #[test]
    fn reset_clears() {
        let mut stats = TickStats::new();
        stats.record(tick(0, true, false));
        stats.reset();
        assert_eq!(stats.snapshot(), StatsSnapshot::default());
    }
}
