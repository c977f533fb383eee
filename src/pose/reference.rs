//! Reference serve geometry.
//!
//! Builds a pose whose extracted metrics land exactly on the target profile:
//! raw elbow 50 deg (remapped 150), raw knee 120 deg (remapped 140), shoulders
//! rotated 45 deg against level hips and the hitting wrist at y = 0.6
//! (contact height 220 cm). Joints are placed by walking from a parent joint
//! at a fixed heading so the angles hold by construction.

use super::{Landmark, LandmarkIndex, PoseSample};

const RAW_ELBOW_DEG: f32 = 50.0;
const RAW_KNEE_DEG: f32 = 120.0;
const SHOULDER_TILT_DEG: f32 = 45.0;
const WRIST_Y: f32 = 0.6;

fn offset(from: Landmark, heading_rad: f32, length: f32) -> Landmark {
    Landmark::new(
        from.x + heading_rad.cos() * length,
        from.y + heading_rad.sin() * length,
    )
}

fn heading(from: Landmark, to: Landmark) -> f32 {
    (to.y - from.y).atan2(to.x - from.x)
}

/// Reference pose for a right-handed player.
pub fn reference_pose() -> PoseSample {
    use LandmarkIndex::*;

    let mut lm = [Landmark::default(); LandmarkIndex::COUNT];

    let left_hip = Landmark::new(0.42, 0.58);
    let right_hip = Landmark::new(0.54, 0.58);
    let left_shoulder = Landmark::new(0.42, 0.32);
    let right_shoulder = offset(left_shoulder, SHOULDER_TILT_DEG.to_radians(), 0.14);

    // Hitting arm: wrist sits on the ray that makes the raw elbow angle with
    // the upper arm, cut where it crosses the contact row.
    let right_elbow = Landmark::new(0.60, 0.72);
    let forearm = heading(right_elbow, right_shoulder) + RAW_ELBOW_DEG.to_radians();
    let reach = (WRIST_Y - right_elbow.y) / forearm.sin();
    let right_wrist = offset(right_elbow, forearm, reach);

    let right_knee = Landmark::new(0.56, 0.74);
    let shin = heading(right_knee, right_hip) + RAW_KNEE_DEG.to_radians();
    let right_ankle = offset(right_knee, shin, 0.16);

    lm[LeftHip as usize] = left_hip;
    lm[RightHip as usize] = right_hip;
    lm[LeftShoulder as usize] = left_shoulder;
    lm[RightShoulder as usize] = right_shoulder;
    lm[RightElbow as usize] = right_elbow;
    lm[RightWrist as usize] = right_wrist;
    lm[RightKnee as usize] = right_knee;
    lm[RightAnkle as usize] = right_ankle;

    lm[LeftElbow as usize] = Landmark::new(0.36, 0.44);
    lm[LeftWrist as usize] = Landmark::new(0.34, 0.30);
    lm[LeftKnee as usize] = Landmark::new(0.40, 0.74);
    lm[LeftAnkle as usize] = Landmark::new(0.39, 0.90);

    let head = Landmark::new(0.47, 0.22);
    lm[Nose as usize] = head;
    for (index, dx, dy) in [
        (LeftEyeInner, -0.008, -0.015),
        (LeftEye, -0.015, -0.016),
        (LeftEyeOuter, -0.022, -0.015),
        (RightEyeInner, 0.008, -0.015),
        (RightEye, 0.015, -0.016),
        (RightEyeOuter, 0.022, -0.015),
        (LeftEar, -0.035, -0.005),
        (RightEar, 0.035, -0.005),
        (MouthLeft, -0.012, 0.018),
        (MouthRight, 0.012, 0.018),
    ] {
        lm[index as usize] = Landmark::new(head.x + dx, head.y + dy);
    }

    for (index, wrist, dx, dy) in [
        (LeftPinky, lm[LeftWrist as usize], -0.01, -0.02),
        (LeftIndex, lm[LeftWrist as usize], 0.0, -0.025),
        (LeftThumb, lm[LeftWrist as usize], 0.01, -0.015),
        (RightPinky, right_wrist, 0.01, -0.02),
        (RightIndex, right_wrist, 0.0, -0.025),
        (RightThumb, right_wrist, -0.01, -0.015),
    ] {
        lm[index as usize] = Landmark::new(wrist.x + dx, wrist.y + dy);
    }

    for (index, ankle, dx, dy) in [
        (LeftHeel, lm[LeftAnkle as usize], -0.01, 0.02),
        (LeftFootIndex, lm[LeftAnkle as usize], 0.03, 0.03),
        (RightHeel, right_ankle, -0.01, 0.02),
        (RightFootIndex, right_ankle, 0.03, 0.03),
    ] {
        lm[index as usize] = Landmark::new(ankle.x + dx, ankle.y + dy);
    }

    // Every coordinate above is finite by construction.
    PoseSample::from_finite(lm)
}

/// Mirror image of [`reference_pose`] for left-handed players.
pub fn mirrored(pose: &PoseSample) -> PoseSample {
    use LandmarkIndex::*;

    const PAIRS: [(LandmarkIndex, LandmarkIndex); 16] = [
        (LeftEyeInner, RightEyeInner),
        (LeftEye, RightEye),
        (LeftEyeOuter, RightEyeOuter),
        (LeftEar, RightEar),
        (MouthLeft, MouthRight),
        (LeftShoulder, RightShoulder),
        (LeftElbow, RightElbow),
        (LeftWrist, RightWrist),
        (LeftPinky, RightPinky),
        (LeftIndex, RightIndex),
        (LeftThumb, RightThumb),
        (LeftHip, RightHip),
        (LeftKnee, RightKnee),
        (LeftAnkle, RightAnkle),
        (LeftHeel, RightHeel),
        (LeftFootIndex, RightFootIndex),
    ];

    let mut lm = [Landmark::default(); LandmarkIndex::COUNT];
    for (i, landmark) in pose.landmarks().iter().enumerate() {
        lm[i] = Landmark {
            x: 1.0 - landmark.x,
            ..*landmark
        };
    }
    for (left, right) in PAIRS {
        lm.swap(left as usize, right as usize);
    }
    PoseSample::from_finite(lm)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_pose_stays_in_frame() {
        let pose = reference_pose();
        for (i, landmark) in pose.landmarks().iter().enumerate() {
            assert!(landmark.in_frame(), "landmark {i} out of frame: {landmark:?}");
        }
    }

    #[test]
    fn reference_and_mirror_pass_validation() {
        let pose = reference_pose();
        assert_eq!(PoseSample::new(lm_array(&pose)).unwrap(), pose);
        let mirror = mirrored(&pose);
        assert_eq!(PoseSample::new(lm_array(&mirror)).unwrap(), mirror);
    }

    fn lm_array(pose: &PoseSample) -> [Landmark; LandmarkIndex::COUNT] {
        let mut lm = [Landmark::default(); LandmarkIndex::COUNT];
        lm.copy_from_slice(pose.landmarks());
        lm
    }

    #[test]
    fn wrist_sits_on_contact_row() {
        let pose = reference_pose();
        assert!((pose.get(LandmarkIndex::RightWrist).y - WRIST_Y).abs() < 1e-5);
    }

    #[test]
    fn mirroring_swaps_sides() {
        let pose = reference_pose();
        let mirror = mirrored(&pose);
        let original = pose.get(LandmarkIndex::RightWrist);
        let swapped = mirror.get(LandmarkIndex::LeftWrist);
        assert!((swapped.x - (1.0 - original.x)).abs() < 1e-6);
        assert_eq!(swapped.y, original.y);
    }
}
