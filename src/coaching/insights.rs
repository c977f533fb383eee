use serde::{Deserialize, Serialize};

use crate::metrics::{Metric, MetricVector};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightStatus {
    Good,
    Warning,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub metric: Metric,
    pub status: InsightStatus,
    pub title: String,
    pub feedback: String,
}

/// Band boundaries for one metric. Values in `good` are good; values in a
/// warning band are warnings; everything else is danger.
#[derive(Debug, Clone, Copy)]
pub struct MetricBands {
    pub good: (f64, f64),
    pub warn_low: Option<(f64, f64)>,
    pub warn_high: Option<(f64, f64)>,
}

impl MetricBands {
    pub fn for_metric(metric: Metric) -> Self {
        match metric {
            Metric::Elbow => Self {
                good: (140.0, 160.0),
                warn_low: Some((120.0, 140.0)),
                warn_high: Some((160.0, 170.0)),
            },
            // Locking the knee out is never a mild fault.
            Metric::Knee => Self {
                good: (130.0, 150.0),
                warn_low: Some((115.0, 130.0)),
                warn_high: None,
            },
            Metric::XFactor => Self {
                good: (35.0, 55.0),
                warn_low: Some((25.0, 35.0)),
                warn_high: Some((55.0, 65.0)),
            },
            Metric::ContactHeight => Self {
                good: (210.0, 240.0),
                warn_low: Some((195.0, 210.0)),
                warn_high: Some((240.0, 250.0)),
            },
            Metric::FollowThrough => Self {
                good: (10.0, 20.0),
                warn_low: Some((7.0, 10.0)),
                warn_high: Some((20.0, 23.0)),
            },
        }
    }

    pub fn classify(&self, value: f64) -> (InsightStatus, Deviation) {
        let (lo, hi) = self.good;
        if value >= lo && value <= hi {
            return (InsightStatus::Good, Deviation::InBand);
        }
        let side = if value < lo {
            Deviation::Low
        } else {
            Deviation::High
        };
        let band = match side {
            Deviation::Low => self.warn_low,
            _ => self.warn_high,
        };
        match band {
            Some((a, b)) if value >= a && value <= b => (InsightStatus::Warning, side),
            _ => (InsightStatus::Danger, side),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deviation {
    InBand,
    Low,
    High,
}

fn feedback(metric: Metric, deviation: Deviation) -> &'static str {
    use Deviation::*;
    match (metric, deviation) {
        (Metric::Elbow, InBand) => "Elbow extension through contact looks solid.",
        (Metric::Elbow, Low) => "Your hitting arm is too bent at contact. Reach up and extend.",
        (Metric::Elbow, High) => "Arm is locked straight. Keep a slight bend to stay loose.",
        (Metric::Knee, InBand) => "Good knee bend in the loading phase.",
        (Metric::Knee, Low) => "You are sinking too deep. Bend less and push up sooner.",
        (Metric::Knee, High) => "Legs are too straight. Bend your knees to load power.",
        (Metric::XFactor, InBand) => "Shoulder turn against the hips is creating good coil.",
        (Metric::XFactor, Low) => "Turn your shoulders more against your hips to build coil.",
        (Metric::XFactor, High) => "Over-rotation. Keep the shoulder turn controlled.",
        (Metric::ContactHeight, InBand) => "Contact point is nice and high.",
        (Metric::ContactHeight, Low) => "Contact is too low. Toss higher and hit at full reach.",
        (Metric::ContactHeight, High) => "Contact is at the top of the range. Keep the toss steady.",
        (Metric::FollowThrough, InBand) => "Follow-through length is consistent.",
        (Metric::FollowThrough, Low) => "Follow-through is cut short. Let the racket finish across.",
        (Metric::FollowThrough, High) => "Follow-through drags on. Recover faster for the next shot.",
    }
}

/// Classifies one metric value against its bands.
pub fn classify(metric: Metric, value: f64) -> Insight {
    let (status, deviation) = MetricBands::for_metric(metric).classify(value);
    Insight {
        metric,
        status,
        title: metric.label().to_string(),
        feedback: feedback(metric, deviation).to_string(),
    }
}

pub fn insights_for(vector: &MetricVector) -> Vec<Insight> {
    Metric::ALL
        .iter()
        .map(|&m| classify(m, vector.get(m)))
        .collect()
}
