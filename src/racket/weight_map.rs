use super::{classify::classify, DetectorConfig};

/// Inclusive-exclusive pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x0: usize,
    pub y0: usize,
    pub x1: usize,
    pub y1: usize,
}

impl PixelRect {
    pub fn full(width: usize, height: usize) -> Self {
        Self {
            x0: 0,
            y0: 0,
            x1: width,
            y1: height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }

    /// Grows by the given margins, clipped to a `width` x `height` frame.
    pub fn expanded(&self, mx: usize, my: usize, width: usize, height: usize) -> Self {
        Self {
            x0: self.x0.saturating_sub(mx),
            y0: self.y0.saturating_sub(my),
            x1: (self.x1 + mx).min(width),
            y1: (self.y1 + my).min(height),
        }
    }
}

/// Per-pixel class weights for one frame.
///
/// Owned by a single detector and reused across ticks; the buffer is allocated
/// on first use and only reallocated when the frame size changes.
#[derive(Debug, Default)]
pub struct WeightMap {
    width: usize,
    height: usize,
    weights: Vec<f32>,
}

impl WeightMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_allocated(&self) -> bool {
        !self.weights.is_empty()
    }

    /// Classifies every pixel inside `rect` of an RGBA buffer.
    /// Weights outside `rect` are left stale and must not be read.
    pub fn fill(
        &mut self,
        pixels: &[u8],
        width: usize,
        height: usize,
        rect: PixelRect,
        config: &DetectorConfig,
    ) {
        if self.width != width || self.height != height || self.weights.len() != width * height {
            self.width = width;
            self.height = height;
            self.weights = vec![0.0; width * height];
        }

        for y in rect.y0..rect.y1 {
            let row = y * width;
            for x in rect.x0..rect.x1 {
                let offset = (row + x) * 4;
                let class = classify(pixels[offset], pixels[offset + 1], pixels[offset + 2]);
                self.weights[row + x] = class.weight(config);
            }
        }
    }

    pub fn at(&self, x: usize, y: usize) -> f32 {
        self.weights[y * self.width + x]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocates_lazily_and_reuses() {
        let config = DetectorConfig::default();
        let mut map = WeightMap::new();
        assert!(!map.is_allocated());

        let pixels = vec![70u8, 32, 24, 255].repeat(4 * 3);
        map.fill(&pixels, 4, 3, PixelRect::full(4, 3), &config);
        assert!(map.is_allocated());
        assert!((map.at(3, 2) - 2.5).abs() < 1e-6);

        let ptr = map.weights.as_ptr();
        map.fill(&pixels, 4, 3, PixelRect::full(4, 3), &config);
        assert_eq!(ptr, map.weights.as_ptr());
    }

    #[test]
    fn expanded_rect_is_clipped() {
        let rect = PixelRect { x0: 2, y0: 2, x1: 5, y1: 5 };
        assert_eq!(
            rect.expanded(10, 1, 8, 6),
            PixelRect { x0: 0, y0: 1, x1: 8, y1: 6 }
        );
    }
}
