use std::collections::VecDeque;

use super::MetricVector;

/// Hard cap on retained vectors.
pub const HISTORY_CAPACITY: usize = 100;
/// Size the history is compacted to once the cap is exceeded.
pub const HISTORY_RETAIN: usize = 50;

/// Sliding window of recent metric vectors, oldest first.
#[derive(Debug, Clone, Default)]
pub struct MetricsHistory {
    entries: VecDeque<MetricVector>,
}

impl MetricsHistory {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(HISTORY_CAPACITY + 1),
        }
    }

    pub fn push(&mut self, vector: MetricVector) {
        self.entries.push_back(vector);
        if self.entries.len() > HISTORY_CAPACITY {
            let excess = self.entries.len() - HISTORY_RETAIN;
            self.entries.drain(..excess);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&MetricVector> {
        self.entries.back()
    }

    /// The most recent `n` vectors, oldest first.
    pub fn last_n(&self, n: usize) -> Vec<MetricVector> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip).copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetricVector> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(i: usize) -> MetricVector {
        MetricVector {
            elbow: i as f64,
            ..MetricVector::ZERO
        }
    }

    #[test]
    fn holds_up_to_capacity() {
        let mut history = MetricsHistory::new();
        for i in 0..HISTORY_CAPACITY {
            history.push(vector(i));
        }
        assert_eq!(history.len(), 100);
        assert_eq!(history.iter().next().unwrap().elbow, 0.0);
    }

    #[test]
    fn compacts_to_most_recent_fifty_on_overflow() {
        let mut history = MetricsHistory::new();
        for i in 0..101 {
            history.push(vector(i));
        }
        assert_eq!(history.len(), 50);
        assert_eq!(history.iter().next().unwrap().elbow, 51.0);
        assert_eq!(history.latest().unwrap().elbow, 100.0);
    }

    #[test]
    fn never_exceeds_capacity() {
        let mut history = MetricsHistory::new();
        for i in 0..1_000 {
            history.push(vector(i));
            assert!(history.len() <= HISTORY_CAPACITY);
        }
    }

    #[test]
    fn last_n_returns_tail_in_order() {
        let mut history = MetricsHistory::new();
        for i in 0..5 {
            history.push(vector(i));
        }
        let tail: Vec<f64> = history.last_n(3).iter().map(|v| v.elbow).collect();
        assert_eq!(tail, vec![2.0, 3.0, 4.0]);
        assert_eq!(history.last_n(20).len(), 5);
    }
}
