use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Body landmark indices, 33-point convention shared by every pose producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum LandmarkIndex {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl LandmarkIndex {
    pub const COUNT: usize = 33;
}

/// Normalized image-space point. `z` is relative depth when the producer has it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f32>,
}

impl Landmark {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: None }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.map_or(true, f32::is_finite)
    }

    pub fn in_frame(&self) -> bool {
        (0.0..=1.0).contains(&self.x) && (0.0..=1.0).contains(&self.y)
    }
}

/// All 33 landmarks of one frame. Construction rejects partial or non-finite input.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseSample {
    landmarks: [Landmark; LandmarkIndex::COUNT],
}

impl PoseSample {
    pub fn new(landmarks: [Landmark; LandmarkIndex::COUNT]) -> Result<Self> {
        if let Some(pos) = landmarks.iter().position(|l| !l.is_finite()) {
            bail!("landmark {pos} has non-finite coordinates");
        }
        Ok(Self { landmarks })
    }

    /// Skips the finiteness check for geometry built from finite constants.
    pub(super) fn from_finite(landmarks: [Landmark; LandmarkIndex::COUNT]) -> Self {
        Self { landmarks }
    }

    pub fn from_slice(landmarks: &[Landmark]) -> Result<Self> {
        let array: [Landmark; LandmarkIndex::COUNT] = match landmarks.try_into() {
            Ok(array) => array,
            Err(_) => bail!(
                "expected {} landmarks, got {}",
                LandmarkIndex::COUNT,
                landmarks.len()
            ),
        };
        Self::new(array)
    }

    pub fn get(&self, index: LandmarkIndex) -> &Landmark {
        &self.landmarks[index as usize]
    }

    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }
}
