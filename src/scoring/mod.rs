use serde::{Deserialize, Serialize};

use crate::metrics::{Metric, MetricVector};

/// Ideal serve metrics the similarity score is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetProfile {
    pub elbow: f64,
    pub knee: f64,
    pub x_factor: f64,
    pub contact_height: f64,
    pub follow_through: f64,
}

impl Default for TargetProfile {
    fn default() -> Self {
        Self {
            elbow: 150.0,
            knee: 140.0,
            x_factor: 45.0,
            contact_height: 220.0,
            follow_through: 15.0,
        }
    }
}

impl TargetProfile {
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Elbow => self.elbow,
            Metric::Knee => self.knee,
            Metric::XFactor => self.x_factor,
            Metric::ContactHeight => self.contact_height,
            Metric::FollowThrough => self.follow_through,
        }
    }

    pub fn as_vector(&self) -> MetricVector {
        MetricVector {
            elbow: self.elbow,
            knee: self.knee,
            x_factor: self.x_factor,
            contact_height: self.contact_height,
            follow_through: self.follow_through,
        }
    }
}

/// Relative deviation of one metric from its target.
pub fn deviation(actual: f64, target: f64) -> f64 {
    if target == 0.0 {
        return if actual == 0.0 { 0.0 } else { 1.0 };
    }
    (actual - target).abs() / target.abs()
}

/// Similarity in 0..=100: one minus the mean relative deviation, as a percentage.
pub fn similarity(vector: &MetricVector, target: &TargetProfile) -> u8 {
    let total: f64 = Metric::ALL
        .iter()
        .map(|&m| deviation(vector.get(m), target.get(m)))
        .sum();
    let mean = total / Metric::ALL.len() as f64;
    let score = ((1.0 - mean) * 100.0).round();
    if score.is_nan() {
        return 0;
    }
    score.clamp(0.0, 100.0) as u8
}
