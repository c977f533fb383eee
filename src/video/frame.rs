use std::time::Duration;

use anyhow::Result;
use image::RgbaImage;
use serde::{Deserialize, Serialize};

/// Playback status of the underlying video element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlaybackState {
    Playing,
    Paused,
    Ended,
    NoStream,
}

impl PlaybackState {
    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackState::Playing)
    }
}

/// One decoded frame: an RGBA pixel buffer plus its media timestamp.
#[derive(Debug, Clone)]
pub struct VideoFrame {
    pub image: RgbaImage,
    pub timestamp: Duration,
}

impl VideoFrame {
    pub fn new(image: RgbaImage, timestamp: Duration) -> Self {
        Self { image, timestamp }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Raw RGBA bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }
}

/// Input boundary: whatever owns playback hands the pipeline its current frame.
pub trait FrameSource: Send {
    fn playback_state(&self) -> PlaybackState;

    /// Current decoded frame, or `None` when nothing is available this tick.
    fn current_frame(&mut self) -> Result<Option<VideoFrame>>;
}
