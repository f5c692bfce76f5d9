//! Synthetic sequences shared by the scenario tests

#![allow(dead_code)]

use fencing_web::pose::{Landmark, LANDMARK_COUNT};
use fencing_web::synthetic::FencerPose;

pub const FRAME_MS: u64 = 33;

/// Six still en garde frames, enough history for every detector
pub fn lead_in() -> Vec<FencerPose> {
    vec![FencerPose::en_garde(0.40); 6]
}

/// Arm-first lunge: arm extends with the hips still, then the body drives and lands
pub fn lunge() -> Vec<FencerPose> {
    let base = FencerPose::en_garde(0.40);
    let extended = base.with_arm_extension(0.35);
    let mut poses = lead_in();
    for extension in [0.21, 0.26, 0.30, 0.35] {
        poses.push(base.with_arm_extension(extension));
    }
    poses.push(extended.with_hip_x(0.42).with_knees(100.0, 145.0));
    poses.push(extended.with_hip_x(0.44).with_knees(95.0, 160.0));
    poses.push(extended.with_hip_x(0.445).with_knees(92.0, 168.0));
    poses
}

/// Balestra jump of `height`, landing, then the same lunge as [`lunge`]
pub fn balestra_lunge(height: f32) -> Vec<FencerPose> {
    let base = FencerPose::en_garde(0.40);
    let mut poses = lead_in();
    poses.extend([
        base.raised(height / 2.0),
        base.raised(height),
        base.raised(height * 0.6),
        base,
    ]);
    poses.extend(lunge().into_iter().skip(6));
    poses
}

/// Two-part advance with the arm half out, then a lunge off the back foot
pub fn advance_lunge() -> Vec<FencerPose> {
    let base = FencerPose::en_garde(0.40).with_arm_extension(0.15);
    let step1 = base.with_hip_x(0.41).with_front_ankle_x(0.63);
    let step2 = step1.with_hip_x(0.42).with_back_ankle_x(0.28);
    let step3 = step2.with_hip_x(0.425);
    let strike = step3.with_arm_extension(0.27).with_knees(100.0, 145.0);
    let land = strike.with_arm_extension(0.36).with_knees(95.0, 168.0);
    let mut poses = vec![base; 6];
    poses.extend([step1, step2, step3, strike, land]);
    poses
}

/// Explosive arm launch, then the back foot crosses in front
pub fn flunge_crossover() -> Vec<FencerPose> {
    let base = FencerPose::en_garde(0.40);
    let mut poses = lead_in();
    poses.push(base.with_arm_extension(0.30));
    poses.push(
        base.with_arm_extension(0.38)
            .with_knees(95.0, 168.0)
            .with_back_ankle_x(0.65),
    );
    poses
}

/// Front foot steps, back foot follows, body settles; `sign` -1 mirrors into a retreat
pub fn step(sign: f32) -> Vec<FencerPose> {
    let mut pose = FencerPose::en_garde(0.40);
    let mut poses = lead_in();
    let deltas = [
        (0.01, 0.03, 0.0),
        (0.01, 0.02, 0.0),
        (0.01, 0.0, 0.03),
        (0.005, 0.0, 0.02),
        (0.0, 0.0, 0.0),
    ];
    for (hip, front, back) in deltas {
        pose = pose
            .with_hip_x(pose.hip.0 + sign * hip)
            .with_front_ankle_x(pose.front_ankle.0 + sign * front)
            .with_back_ankle_x(pose.back_ankle.0 + sign * back);
        poses.push(pose);
    }
    poses
}

/// High parry held briefly, then a fast forward riposte
pub fn parry_riposte() -> Vec<FencerPose> {
    let base = FencerPose::en_garde(0.40).with_arm_extension(0.15);
    let parried = base.with_wrist_elevation(30.0);
    let mut poses = vec![base; 6];
    poses.extend([
        parried,
        parried,
        base.with_arm_extension(0.27).with_wrist_elevation(16.0),
        base.with_arm_extension(0.30).with_wrist_elevation(14.4),
    ]);
    poses
}

/// Landmark sets with timestamps starting at `start_ms`
pub fn timed(poses: &[FencerPose], start_ms: u64) -> Vec<(Vec<Landmark>, u64)> {
    poses
        .iter()
        .enumerate()
        .map(|(i, p)| (p.landmarks(), start_ms + i as u64 * FRAME_MS))
        .collect()
}

/// Mirror a right-handed fencer facing +x into a left-handed one facing -x
pub fn mirror_to_left_handed(landmarks: &[Landmark]) -> Vec<Landmark> {
    (0..LANDMARK_COUNT)
        .map(|i| {
            let source = landmarks[opposite_index(i)];
            Landmark::new(1.0 - source.x, source.y)
        })
        .collect()
}

/// Index of the same landmark on the other side of the body
fn opposite_index(index: usize) -> usize {
    match index {
        0 => 0,
        1..=3 => index + 3,
        4..=6 => index - 3,
        odd if odd % 2 == 1 => odd + 1,
        even => even - 1,
    }
}
