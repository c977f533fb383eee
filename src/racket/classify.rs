//! Per-pixel racket classifiers.
//!
//! A pixel may fall into more than one class (dark rims are usually also in the
//! grip brightness band); each matching class adds its weight.

use super::DetectorConfig;

const FRAME_MAX_BRIGHTNESS: f32 = 100.0;
const FRAME_MIN_CONTRAST: u8 = 20;
const STRING_MIN_BRIGHTNESS: f32 = 160.0;
const WHITE_MAX_CONTRAST: u8 = 40;
const YELLOW_MIN_CHANNEL: u8 = 150;
const YELLOW_BLUE_MARGIN: u8 = 50;
const HANDLE_BRIGHTNESS: (f32, f32) = (30.0, 120.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelClass {
    pub frame: bool,
    pub string: bool,
    pub handle: bool,
}

impl PixelClass {
    pub fn weight(&self, config: &DetectorConfig) -> f32 {
        let mut weight = 0.0;
        if self.frame {
            weight += config.weight_frame;
        }
        if self.string {
            weight += config.weight_string;
        }
        if self.handle {
            weight += config.weight_handle;
        }
        weight
    }
}

pub fn brightness(r: u8, g: u8, b: u8) -> f32 {
    (r as f32 + g as f32 + b as f32) / 3.0
}

pub fn contrast(r: u8, g: u8, b: u8) -> u8 {
    r.max(g).max(b) - r.min(g).min(b)
}

fn is_yellow_dominant(r: u8, g: u8, b: u8) -> bool {
    r >= YELLOW_MIN_CHANNEL
        && g >= YELLOW_MIN_CHANNEL
        && (b as u16 + YELLOW_BLUE_MARGIN as u16) < r.min(g) as u16
}

pub fn classify(r: u8, g: u8, b: u8) -> PixelClass {
    let luma = brightness(r, g, b);
    let spread = contrast(r, g, b);

    PixelClass {
        frame: luma < FRAME_MAX_BRIGHTNESS && spread > FRAME_MIN_CONTRAST,
        string: luma > STRING_MIN_BRIGHTNESS
            && (spread <= WHITE_MAX_CONTRAST || is_yellow_dominant(r, g, b)),
        handle: (HANDLE_BRIGHTNESS.0..=HANDLE_BRIGHTNESS.1).contains(&luma),
    }
}
