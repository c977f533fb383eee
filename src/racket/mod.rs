pub mod classify;
pub mod cluster;
pub mod config;
pub mod detector;
pub mod weight_map;

pub use config::DetectorConfig;
pub use detector::RacketDetector;

use serde::{Deserialize, Serialize};

/// Default acceptance threshold applied by callers of the detector.
pub const DEFAULT_ACCEPTANCE: f32 = 0.6;

/// Racket bounding box, normalized to the frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RacketBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub confidence: f32,
}

impl RacketBox {
    /// Fixed-size box centred on a pixel-space centroid.
    pub fn around(
        cx: f32,
        cy: f32,
        box_width: f32,
        box_height: f32,
        frame_width: u32,
        frame_height: u32,
        score: f32,
    ) -> Self {
        let (fw, fh) = (frame_width as f32, frame_height as f32);
        Self {
            x: ((cx - box_width / 2.0) / fw).clamp(0.0, 1.0),
            y: ((cy - box_height / 2.0) / fh).clamp(0.0, 1.0),
            width: (box_width / fw).min(1.0),
            height: (box_height / fh).min(1.0),
            confidence: score.clamp(0.0, 1.0),
        }
    }
}

/// Keeps a detection only when its confidence clears `threshold`.
pub fn accept_detection(detection: Option<RacketBox>, threshold: f32) -> Option<RacketBox> {
    detection.filter(|b| b.confidence >= threshold)
}

/// User-facing tracking quality derived from the accepted box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TrackingQuality {
    None,
    Weak,
    Good,
    Excellent,
}

impl TrackingQuality {
    pub fn from_detection(detection: Option<&RacketBox>) -> Self {
        match detection.map(|b| b.confidence) {
            None => TrackingQuality::None,
            Some(c) if c >= 0.85 => TrackingQuality::Excellent,
            Some(c) if c >= 0.7 => TrackingQuality::Good,
            Some(c) if c >= DEFAULT_ACCEPTANCE => TrackingQuality::Weak,
            Some(_) => TrackingQuality::None,
        }
    }
}
