//! Joint and segment angles from normalized landmarks.

use crate::pose::Landmark;

/// Angle at `vertex` between the rays to `a` and `b`, in degrees.
///
/// Uses cos(θ) = (v1 · v2) / (|v1| |v2|) with the cosine clamped to [-1, 1].
/// A zero-length ray has no direction, so the angle is 0 rather than NaN.
pub fn joint_angle(a: &Landmark, vertex: &Landmark, b: &Landmark) -> f64 {
    let v1 = (a.x as f64 - vertex.x as f64, a.y as f64 - vertex.y as f64);
    let v2 = (b.x as f64 - vertex.x as f64, b.y as f64 - vertex.y as f64);

    let mag1 = (v1.0 * v1.0 + v1.1 * v1.1).sqrt();
    let mag2 = (v2.0 * v2.0 + v2.1 * v2.1).sqrt();
    if mag1 == 0.0 || mag2 == 0.0 {
        return 0.0;
    }

    let dot = v1.0 * v2.0 + v1.1 * v2.1;
    (dot / (mag1 * mag2)).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Orientation of the segment `from -> to`, in degrees (atan2 convention).
pub fn line_angle(from: &Landmark, to: &Landmark) -> f64 {
    let dy = to.y as f64 - from.y as f64;
    let dx = to.x as f64 - from.x as f64;
    dy.atan2(dx).to_degrees()
}
