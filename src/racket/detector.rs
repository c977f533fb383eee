use anyhow::{bail, Result};
use log::debug;

use crate::pose::PlayerRegion;

use super::{
    cluster::{cluster_candidates, largest, Candidate},
    weight_map::{PixelRect, WeightMap},
    DetectorConfig, RacketBox,
};

/// Classical racket locator: pixel classification, spatial clustering, box synthesis.
///
/// Each instance owns its scratch weight map, so detectors are independent and
/// can be created freely in tests.
#[derive(Debug, Default)]
pub struct RacketDetector {
    config: DetectorConfig,
    weights: Option<WeightMap>,
}

impl RacketDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            config,
            weights: None,
        }
    }

    /// Locates the most racket-like region of an RGBA buffer.
    ///
    /// Returns the best cluster's box regardless of confidence; callers apply
    /// their acceptance threshold. Errors only on a malformed buffer.
    pub fn detect(
        &mut self,
        pixels: &[u8],
        width: u32,
        height: u32,
        hint: Option<&PlayerRegion>,
    ) -> Result<Option<RacketBox>> {
        let (w, h) = (width as usize, height as usize);
        if w == 0 || h == 0 {
            bail!("frame has zero area ({width}x{height})");
        }
        let expected = w * h * 4;
        if pixels.len() != expected {
            bail!(
                "pixel buffer holds {} bytes, expected {expected} for {width}x{height} RGBA",
                pixels.len()
            );
        }

        let rect = self.search_rect(w, h, hint);
        let margin_x = self.config.window_half_width.max(0) as usize;
        let margin_y = self.config.window_half_height.max(0) as usize;
        let sampled = rect.expanded(margin_x, margin_y, w, h);

        let weights = self.weights.get_or_insert_with(WeightMap::new);
        weights.fill(pixels, w, h, sampled, &self.config);

        let candidates = scan_candidates(weights, w, h, rect, &self.config);
        if candidates.is_empty() {
            return Ok(None);
        }

        let clusters = cluster_candidates(&candidates, self.config.cluster_radius);
        let Some(best) = largest(&clusters) else {
            return Ok(None);
        };

        debug!(
            "racket scan: {} candidates, {} clusters, best has {}",
            candidates.len(),
            clusters.len(),
            best.len()
        );

        let (cx, cy) = best.centroid();
        Ok(Some(RacketBox::around(
            cx,
            cy,
            self.config.box_width,
            self.config.box_height,
            width,
            height,
            best.mean_score(),
        )))
    }

    /// Full frame, or the player's box widened by one width on each side and
    /// half a height above and below when the pose hint is trustworthy.
    fn search_rect(&self, w: usize, h: usize, hint: Option<&PlayerRegion>) -> PixelRect {
        let full = PixelRect::full(w, h);
        let Some(region) = hint.filter(|r| r.confidence > self.config.min_region_confidence)
        else {
            return full;
        };

        let clamp_x = |v: f32| v.clamp(0.0, w as f32) as usize;
        let clamp_y = |v: f32| v.clamp(0.0, h as f32) as usize;
        let rect = PixelRect {
            x0: clamp_x(region.x - region.width),
            y0: clamp_y(region.y - region.height * 0.5),
            x1: clamp_x(region.x + region.width * 2.0),
            y1: clamp_y(region.y + region.height * 1.5),
        };

        if rect.is_empty() {
            full
        } else {
            rect
        }
    }
}

fn scan_candidates(
    weights: &WeightMap,
    w: usize,
    h: usize,
    rect: PixelRect,
    config: &DetectorConfig,
) -> Vec<Candidate> {
    let stride = config.scan_stride.max(1);
    let mut candidates = Vec::new();

    for cy in (rect.y0..rect.y1).step_by(stride) {
        for cx in (rect.x0..rect.x1).step_by(stride) {
            let score = neighbourhood_score(weights, w, h, cx, cy, config);
            if score > config.candidate_threshold {
                candidates.push(Candidate {
                    x: cx as f32,
                    y: cy as f32,
                    score,
                });
            }
        }
    }

    candidates
}

/// Mean class weight over the sampled window; out-of-frame samples are not counted.
fn neighbourhood_score(
    weights: &WeightMap,
    w: usize,
    h: usize,
    cx: usize,
    cy: usize,
    config: &DetectorConfig,
) -> f32 {
    let step = config.window_stride.max(1);
    let (hw, hh) = (config.window_half_width, config.window_half_height);
    let mut total = 0.0;
    let mut checked = 0u32;

    for dy in (-hh..=hh).step_by(step) {
        let y = cy as i64 + dy;
        if y < 0 || y >= h as i64 {
            continue;
        }
        for dx in (-hw..=hw).step_by(step) {
            let x = cx as i64 + dx;
            if x < 0 || x >= w as i64 {
                continue;
            }
            total += weights.at(x as usize, y as usize);
            checked += 1;
        }
    }

    if checked == 0 {
        0.0
    } else {
        total / checked as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::synthetic::{add_noise, blank_court, paint_racket};
    use rand::{rngs::StdRng, SeedableRng};

    fn detect(image: &image::RgbaImage, hint: Option<&PlayerRegion>) -> Option<RacketBox> {
        RacketDetector::default()
            .detect(image.as_raw(), image.width(), image.height(), hint)
            .unwrap()
    }

    fn centre_px(found: &RacketBox, width: u32, height: u32) -> (f32, f32) {
        (
            (found.x + found.width / 2.0) * width as f32,
            (found.y + found.height / 2.0) * height as f32,
        )
    }

    #[test]
    fn finds_painted_racket() {
        let mut image = blank_court(160, 120);
        paint_racket(&mut image, 100, 45);

        let found = detect(&image, None).expect("racket should be found");
        let (cx, cy) = centre_px(&found, 160, 120);
        assert!((cx - 100.0).abs() < 8.0, "centre x {cx}");
        assert!((cy - 45.0).abs() < 12.0, "centre y {cy}");
        assert!(found.confidence > 0.7 && found.confidence <= 1.0);
        assert!((found.width - 50.0 / 160.0).abs() < 1e-6);
        assert!((found.height - 70.0 / 120.0).abs() < 1e-6);
    }

    #[test]
    fn empty_court_has_no_racket() {
        let image = blank_court(120, 90);
        assert!(detect(&image, None).is_none());
    }

    #[test]
    fn survives_mild_sensor_noise() {
        let mut image = blank_court(160, 120);
        paint_racket(&mut image, 60, 50);
        add_noise(&mut image, 8, &mut StdRng::seed_from_u64(11));
        let found = detect(&image, None).expect("racket should be found");
        let (cx, _) = centre_px(&found, 160, 120);
        assert!((cx - 60.0).abs() < 10.0);
    }

    #[test]
    fn largest_cluster_wins() {
        let mut image = blank_court(240, 120);
        paint_racket(&mut image, 60, 50);
        // A compact dark patch far away only clears the threshold near its
        // centre, so its cluster stays smaller than the racket's.
        for y in 20..50 {
            for x in 190..210 {
                image.put_pixel(x, y, image::Rgba([70, 32, 24, 255]));
            }
        }
        let found = detect(&image, None).unwrap();
        let (cx, _) = centre_px(&found, 240, 120);
        assert!(cx < 120.0);
    }

    #[test]
    fn confident_hint_restricts_search() {
        let mut image = blank_court(400, 200);
        paint_racket(&mut image, 340, 60);

        // Player on the far left; widened search stops well before x = 340.
        let region = PlayerRegion {
            x: 20.0,
            y: 60.0,
            width: 40.0,
            height: 60.0,
            confidence: 0.9,
        };
        assert!(detect(&image, Some(&region)).is_none());

        let weak = PlayerRegion {
            confidence: 0.3,
            ..region
        };
        assert!(detect(&image, Some(&weak)).is_some());
    }

    #[test]
    fn malformed_buffer_is_an_error() {
        let mut detector = RacketDetector::default();
        assert!(detector.detect(&[0u8; 10], 4, 4, None).is_err());
        assert!(detector.detect(&[], 0, 0, None).is_err());
    }

    #[test]
    fn scratch_map_is_created_on_first_detect() {
        let mut detector = RacketDetector::default();
        assert!(detector.weights.is_none());
        let image = blank_court(30, 30);
        detector
            .detect(image.as_raw(), 30, 30, None)
            .unwrap();
        assert!(detector.weights.as_ref().is_some_and(WeightMap::is_allocated));
    }
}
