use crate::metrics::{MetricVector, MetricsHistory};
use crate::scoring::{similarity, TargetProfile};

/// Mutable per-session analysis state: latest vector, its score and the
/// rolling history. Mutated only from the tick that extracted the vector.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    current: MetricVector,
    similarity: u8,
    history: MetricsHistory,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an extracted vector, rescoring it and appending it to history.
    pub fn record(&mut self, vector: MetricVector, target: &TargetProfile) -> u8 {
        self.current = vector;
        self.similarity = similarity(&vector, target);
        self.history.push(vector);
        self.similarity
    }

    pub fn current(&self) -> MetricVector {
        self.current
    }

    pub fn similarity(&self) -> u8 {
        self.similarity
    }

    pub fn history(&self) -> &MetricsHistory {
        &self.history
    }

    pub fn reset(&mut self) {
        self.current = MetricVector::ZERO;
        self.similarity = 0;
        self.history.clear();
    }
}
