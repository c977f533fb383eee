use std::time::Duration;

use crate::clock::Throttle;
use crate::pose::{Landmark, LandmarkIndex, PoseSample};

use super::{
    angles::{joint_angle, line_angle},
    DominantSide, Metric, MetricVector, MetricsHistory,
};

/// Minimum spacing between successful extractions.
pub const EXTRACTION_INTERVAL: Duration = Duration::from_millis(100);

const ELBOW_OFFSET: f64 = 100.0;
const KNEE_OFFSET: f64 = 20.0;
const CONTACT_BASE_CM: f64 = 180.0;
const CONTACT_SCALE_CM: f64 = 100.0;

/// Source of the follow-through metric.
///
/// No kinematic estimator exists yet; implementations plug in here.
pub trait FollowThroughEstimator: Send {
    fn estimate(&mut self, pose: &PoseSample) -> f64;
}

/// Deterministic placeholder: always reports the same frame count.
#[derive(Debug, Clone, Copy)]
pub struct ConstantFollowThrough(pub f64);

impl Default for ConstantFollowThrough {
    fn default() -> Self {
        Self(15.0)
    }
}

impl FollowThroughEstimator for ConstantFollowThrough {
    fn estimate(&mut self, _pose: &PoseSample) -> f64 {
        self.0
    }
}

struct Limbs {
    shoulder: LandmarkIndex,
    elbow: LandmarkIndex,
    wrist: LandmarkIndex,
    hip: LandmarkIndex,
    knee: LandmarkIndex,
    ankle: LandmarkIndex,
}

fn limbs(side: DominantSide) -> Limbs {
    use LandmarkIndex::*;
    match side {
        DominantSide::Right => Limbs {
            shoulder: RightShoulder,
            elbow: RightElbow,
            wrist: RightWrist,
            hip: RightHip,
            knee: RightKnee,
            ankle: RightAnkle,
        },
        DominantSide::Left => Limbs {
            shoulder: LeftShoulder,
            elbow: LeftElbow,
            wrist: LeftWrist,
            hip: LeftHip,
            knee: LeftKnee,
            ankle: LeftAnkle,
        },
    }
}

/// Turns poses into metric vectors, at most once per [`EXTRACTION_INTERVAL`].
pub struct MetricExtractor {
    side: DominantSide,
    throttle: Throttle,
    follow_through: Box<dyn FollowThroughEstimator>,
}

impl MetricExtractor {
    pub fn new(side: DominantSide) -> Self {
        Self::with_interval(side, EXTRACTION_INTERVAL)
    }

    pub fn with_interval(side: DominantSide, interval: Duration) -> Self {
        Self {
            side,
            throttle: Throttle::new(interval),
            follow_through: Box::new(ConstantFollowThrough::default()),
        }
    }

    pub fn with_follow_through(mut self, estimator: Box<dyn FollowThroughEstimator>) -> Self {
        self.follow_through = estimator;
        self
    }

    /// Metrics for `pose`, or `None` when the previous success was less than
    /// one interval ago.
    pub fn extract(&mut self, pose: &PoseSample, now: Duration) -> Option<MetricVector> {
        if !self.throttle.is_due(now) {
            return None;
        }
        let vector = self.compute(pose);
        self.throttle.mark(now);
        Some(vector)
    }

    /// Like [`extract`](Self::extract) for raw producer output; partial
    /// landmark sets are skipped without touching the throttle.
    pub fn extract_landmarks(
        &mut self,
        landmarks: &[Landmark],
        now: Duration,
    ) -> Option<MetricVector> {
        if landmarks.len() < LandmarkIndex::COUNT {
            return None;
        }
        let pose = PoseSample::from_slice(&landmarks[..LandmarkIndex::COUNT]).ok()?;
        self.extract(&pose, now)
    }

    /// Extracts and appends the result to `history`.
    pub fn extract_into(
        &mut self,
        pose: &PoseSample,
        now: Duration,
        history: &mut MetricsHistory,
    ) -> Option<MetricVector> {
        let vector = self.extract(pose, now)?;
        history.push(vector);
        Some(vector)
    }

    pub fn reset(&mut self) {
        self.throttle.reset();
    }

    fn compute(&mut self, pose: &PoseSample) -> MetricVector {
        let l = limbs(self.side);

        let elbow_raw = joint_angle(pose.get(l.shoulder), pose.get(l.elbow), pose.get(l.wrist));
        let knee_raw = joint_angle(pose.get(l.hip), pose.get(l.knee), pose.get(l.ankle));

        let shoulder_line = line_angle(
            pose.get(LandmarkIndex::LeftShoulder),
            pose.get(LandmarkIndex::RightShoulder),
        );
        let hip_line = line_angle(
            pose.get(LandmarkIndex::LeftHip),
            pose.get(LandmarkIndex::RightHip),
        );

        // Image-space y grows downward, so a higher wrist means a smaller y.
        let wrist_y = pose.get(l.wrist).y as f64;

        MetricVector {
            elbow: Metric::Elbow.clamp(elbow_raw + ELBOW_OFFSET),
            knee: Metric::Knee.clamp(knee_raw + KNEE_OFFSET),
            x_factor: Metric::XFactor.clamp((shoulder_line - hip_line).abs()),
            contact_height: Metric::ContactHeight
                .clamp(CONTACT_BASE_CM + (1.0 - wrist_y) * CONTACT_SCALE_CM),
            follow_through: Metric::FollowThrough.clamp(self.follow_through.estimate(pose)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::{mirrored, reference_pose};
    use crate::scoring::TargetProfile;

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-3, "{actual} != {expected}");
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn reference_pose_hits_target_profile() {
        let target = TargetProfile::default();
        let mut extractor = MetricExtractor::new(DominantSide::Right);
        let v = extractor.extract(&reference_pose(), ms(0)).unwrap();
        assert_close(v.elbow, target.elbow);
        assert_close(v.knee, target.knee);
        assert_close(v.x_factor, target.x_factor);
        assert_close(v.contact_height, target.contact_height);
        assert_close(v.follow_through, target.follow_through);
    }

    #[test]
    fn left_handed_reads_left_limbs() {
        let target = TargetProfile::default();
        let mut extractor = MetricExtractor::new(DominantSide::Left);
        let v = extractor.extract(&mirrored(&reference_pose()), ms(0)).unwrap();
        assert_close(v.elbow, target.elbow);
        assert_close(v.knee, target.knee);
        assert_close(v.x_factor, target.x_factor);
        assert_close(v.contact_height, target.contact_height);
    }

    #[test]
    fn throttles_to_one_extraction_per_interval() {
        let mut extractor = MetricExtractor::new(DominantSide::Right);
        let pose = reference_pose();
        assert!(extractor.extract(&pose, ms(0)).is_some());
        assert!(extractor.extract(&pose, ms(50)).is_none());
        assert!(extractor.extract(&pose, ms(99)).is_none());
        assert!(extractor.extract(&pose, ms(100)).is_some());
        assert!(extractor.extract(&pose, ms(150)).is_none());
    }

    #[test]
    fn partial_landmarks_skip_without_consuming_interval() {
        let mut extractor = MetricExtractor::new(DominantSide::Right);
        let short = vec![Landmark::new(0.5, 0.5); 20];
        assert!(extractor.extract_landmarks(&short, ms(0)).is_none());

        let full = reference_pose().landmarks().to_vec();
        assert!(extractor.extract_landmarks(&full, ms(1)).is_some());
    }

    #[test]
    fn output_is_clamped_for_degenerate_poses() {
        let mut extractor = MetricExtractor::new(DominantSide::Right);
        let corners = [
            Landmark::new(0.0, 0.0),
            Landmark::new(1.0, 1.0),
            Landmark::new(-3.0, 5.0),
            Landmark::new(0.5, 0.5),
        ];

        for (i, seed) in corners.iter().enumerate() {
            let mut lm = [*seed; LandmarkIndex::COUNT];
            for (j, landmark) in lm.iter_mut().enumerate() {
                landmark.x += (j % 5) as f32 * 0.3 * (i as f32 - 1.5);
                landmark.y -= (j % 7) as f32 * 0.2;
            }
            let pose = PoseSample::new(lm).unwrap();
            let v = extractor.extract(&pose, ms(i as u64 * 200)).unwrap();
            for metric in Metric::ALL {
                let (lo, hi) = metric.range();
                let value = v.get(metric);
                assert!(value >= lo && value <= hi, "{metric:?}={value}");
            }
        }
    }

    #[test]
    fn extract_into_appends_history() {
        let mut extractor = MetricExtractor::new(DominantSide::Right);
        let mut history = MetricsHistory::new();
        let pose = reference_pose();
        extractor.extract_into(&pose, ms(0), &mut history);
        extractor.extract_into(&pose, ms(10), &mut history);
        extractor.extract_into(&pose, ms(120), &mut history);
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn custom_follow_through_is_clamped() {
        struct Wild;
        impl FollowThroughEstimator for Wild {
            fn estimate(&mut self, _pose: &PoseSample) -> f64 {
                99.0
            }
        }
        let mut extractor =
            MetricExtractor::new(DominantSide::Right).with_follow_through(Box::new(Wild));
        let v = extractor.extract(&reference_pose(), ms(0)).unwrap();
        assert_eq!(v.follow_through, 25.0);
    }
}
