use serde::Serialize;

use super::PoseSample;

/// Player bounding box in pixel space, derived from a pose.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRegion {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Fraction of landmarks that fell inside the frame.
    pub confidence: f32,
}

impl PlayerRegion {
    pub fn from_pose(pose: &PoseSample, frame_width: u32, frame_height: u32) -> Self {
        let landmarks = pose.landmarks();
        let (mut min_x, mut min_y) = (f32::MAX, f32::MAX);
        let (mut max_x, mut max_y) = (f32::MIN, f32::MIN);
        let mut inside = 0usize;

        for landmark in landmarks {
            let x = landmark.x.clamp(0.0, 1.0);
            let y = landmark.y.clamp(0.0, 1.0);
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
            if landmark.in_frame() {
                inside += 1;
            }
        }

        let (fw, fh) = (frame_width as f32, frame_height as f32);
        Self {
            x: min_x * fw,
            y: min_y * fh,
            width: (max_x - min_x) * fw,
            height: (max_y - min_y) * fh,
            confidence: inside as f32 / landmarks.len() as f32,
        }
    }
}
