use serde::{Deserialize, Serialize};

/// The five stroke metrics produced per accepted pose.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricVector {
    /// degrees
    pub elbow: f64,
    /// degrees
    pub knee: f64,
    /// Shoulder/hip line separation, degrees.
    pub x_factor: f64,
    /// centimetres
    pub contact_height: f64,
    /// frames
    pub follow_through: f64,
}

impl MetricVector {
    pub const ZERO: MetricVector = MetricVector {
        elbow: 0.0,
        knee: 0.0,
        x_factor: 0.0,
        contact_height: 0.0,
        follow_through: 0.0,
    };

    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Elbow => self.elbow,
            Metric::Knee => self.knee,
            Metric::XFactor => self.x_factor,
            Metric::ContactHeight => self.contact_height,
            Metric::FollowThrough => self.follow_through,
        }
    }

    pub fn set(&mut self, metric: Metric, value: f64) {
        match metric {
            Metric::Elbow => self.elbow = value,
            Metric::Knee => self.knee = value,
            Metric::XFactor => self.x_factor = value,
            Metric::ContactHeight => self.contact_height = value,
            Metric::FollowThrough => self.follow_through = value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    Elbow,
    Knee,
    XFactor,
    ContactHeight,
    FollowThrough,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Elbow,
        Metric::Knee,
        Metric::XFactor,
        Metric::ContactHeight,
        Metric::FollowThrough,
    ];

    /// Output range every extracted value is clamped into.
    pub fn range(&self) -> (f64, f64) {
        match self {
            Metric::Elbow => (90.0, 180.0),
            Metric::Knee => (120.0, 160.0),
            Metric::XFactor => (20.0, 70.0),
            Metric::ContactHeight => (180.0, 250.0),
            Metric::FollowThrough => (5.0, 25.0),
        }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        let (lo, hi) = self.range();
        value.clamp(lo, hi)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Elbow => "Elbow angle",
            Metric::Knee => "Knee bend",
            Metric::XFactor => "X-factor",
            Metric::ContactHeight => "Contact height",
            Metric::FollowThrough => "Follow-through",
        }
    }
}

/// Which arm and leg the metrics are read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DominantSide {
    #[default]
    Right,
    Left,
}
