//! Procedurally painted court frames.
//!
//! Used by the demo binary when no footage is supplied and by detector tests.
//! The background colour is chosen to sit outside every racket pixel class so
//! only the painted racket produces candidates.

use std::time::Duration;

use anyhow::Result;
use image::{Rgba, RgbaImage};
use rand::{rngs::StdRng, Rng, SeedableRng};

use super::{FrameSource, PlaybackState, VideoFrame};

pub const COURT_BACKGROUND: Rgba<u8> = Rgba([128, 138, 150, 255]);
const RIM: Rgba<u8> = Rgba([70, 32, 24, 255]);
const STRINGS: Rgba<u8> = Rgba([236, 236, 228, 255]);
const GRIP: Rgba<u8> = Rgba([92, 64, 44, 255]);

/// Head half-axes in pixels.
const HEAD_RX: f32 = 14.0;
const HEAD_RY: f32 = 20.0;
const RIM_THICKNESS: f32 = 3.0;
const GRIP_LENGTH: i64 = 22;
const GRIP_HALF_WIDTH: i64 = 3;

pub fn blank_court(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_pixel(width, height, COURT_BACKGROUND)
}

/// Paints an upright racket whose head is centred on `(cx, cy)`.
pub fn paint_racket(image: &mut RgbaImage, cx: i64, cy: i64) {
    let (width, height) = (image.width() as i64, image.height() as i64);
    let reach_x = HEAD_RX.ceil() as i64 + 1;
    let reach_y = HEAD_RY.ceil() as i64 + 1;

    for y in (cy - reach_y)..=(cy + reach_y) {
        for x in (cx - reach_x)..=(cx + reach_x) {
            if x < 0 || y < 0 || x >= width || y >= height {
                continue;
            }
            let dx = (x - cx) as f32 / HEAD_RX;
            let dy = (y - cy) as f32 / HEAD_RY;
            let r = (dx * dx + dy * dy).sqrt();
            let rim_inner = 1.0 - RIM_THICKNESS / HEAD_RX;
            let colour = if r <= rim_inner {
                STRINGS
            } else if r <= 1.0 {
                RIM
            } else {
                continue;
            };
            image.put_pixel(x as u32, y as u32, colour);
        }
    }

    let grip_top = cy + HEAD_RY as i64;
    for y in grip_top..(grip_top + GRIP_LENGTH) {
        for x in (cx - GRIP_HALF_WIDTH)..=(cx + GRIP_HALF_WIDTH) {
            if x >= 0 && y >= 0 && x < width && y < height {
                image.put_pixel(x as u32, y as u32, GRIP);
            }
        }
    }
}

/// Adds uniform per-channel noise in `[-amplitude, amplitude]`.
pub fn add_noise(image: &mut RgbaImage, amplitude: u8, rng: &mut StdRng) {
    if amplitude == 0 {
        return;
    }
    let amp = amplitude as i16;
    for pixel in image.pixels_mut() {
        for channel in pixel.0.iter_mut().take(3) {
            let delta: i16 = rng.gen_range(-amp..=amp);
            *channel = (*channel as i16 + delta).clamp(0, 255) as u8;
        }
    }
}

/// Endless stream of court frames with a racket sweeping horizontally.
pub struct SyntheticCourtSource {
    width: u32,
    height: u32,
    frame_interval: Duration,
    frame_index: u64,
    racket: Option<(i64, i64)>,
    sweep_px: i64,
    noise: u8,
    rng: StdRng,
    state: PlaybackState,
}

impl SyntheticCourtSource {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            frame_interval: Duration::from_micros(33_333),
            frame_index: 0,
            racket: Some((width as i64 * 2 / 3, height as i64 / 3)),
            sweep_px: 0,
            noise: 0,
            rng: StdRng::seed_from_u64(7),
            state: PlaybackState::Playing,
        }
    }

    pub fn with_racket_at(mut self, position: Option<(i64, i64)>) -> Self {
        self.racket = position;
        self
    }

    /// Racket oscillates +/- `sweep_px` around its anchor.
    pub fn with_sweep(mut self, sweep_px: i64) -> Self {
        self.sweep_px = sweep_px;
        self
    }

    pub fn with_noise(mut self, amplitude: u8, seed: u64) -> Self {
        self.noise = amplitude;
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn pause(&mut self) {
        self.state = PlaybackState::Paused;
    }

    pub fn play(&mut self) {
        self.state = PlaybackState::Playing;
    }

    fn render(&mut self) -> RgbaImage {
        let mut image = blank_court(self.width, self.height);
        if let Some((x, y)) = self.racket {
            let phase = self.frame_index as f32 * 0.2;
            let offset = (phase.sin() * self.sweep_px as f32).round() as i64;
            paint_racket(&mut image, x + offset, y);
        }
        add_noise(&mut image, self.noise, &mut self.rng);
        image
    }
}

impl FrameSource for SyntheticCourtSource {
    fn playback_state(&self) -> PlaybackState {
        self.state
    }

    fn current_frame(&mut self) -> Result<Option<VideoFrame>> {
        if !self.state.is_playing() {
            return Ok(None);
        }
        let image = self.render();
        let timestamp = self.frame_interval * self.frame_index as u32;
        self.frame_index += 1;
        Ok(Some(VideoFrame::new(image, timestamp)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paused_source_yields_nothing() {
        let mut source = SyntheticCourtSource::new(64, 48);
        source.pause();
        assert_eq!(source.playback_state(), PlaybackState::Paused);
        assert!(source.current_frame().unwrap().is_none());
        source.play();
        assert!(source.current_frame().unwrap().is_some());
    }

    #[test]
    fn racket_is_painted_at_anchor() {
        let mut image = blank_court(100, 100);
        paint_racket(&mut image, 50, 40);
        assert_eq!(*image.get_pixel(50, 40), STRINGS);
        assert_eq!(*image.get_pixel(50, 70), GRIP);
        assert_eq!(*image.get_pixel(5, 5), COURT_BACKGROUND);
    }

    #[test]
    fn noise_is_deterministic_per_seed() {
        let mut a = blank_court(16, 16);
        let mut b = blank_court(16, 16);
        add_noise(&mut a, 10, &mut StdRng::seed_from_u64(3));
        add_noise(&mut b, 10, &mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
    }

    #[test]
    fn timestamps_advance_per_frame() {
        let mut source = SyntheticCourtSource::new(32, 32).with_racket_at(None);
        let first = source.current_frame().unwrap().unwrap();
        let second = source.current_frame().unwrap().unwrap();
        assert!(second.timestamp > first.timestamp);
    }
}
