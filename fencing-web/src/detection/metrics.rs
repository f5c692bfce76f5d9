//! Body metrics shared by all detectors
//!
//! Raw landmarks are turned into stance-relative quantities (forward
//! coordinates, knee angles, arm extension). [`Motion`] pairs the current
//! frame with the previous one under a single [`Stance`], so velocities are
//! never computed across a change of lead side.

use crate::physics::{distance, knee_angle, midpoint, safe_ratio, torso_lean, velocity, Stance};
use crate::pose::{
    PoseFrame, LEFT_ANKLE, LEFT_HIP, LEFT_SHOULDER, NOSE, RIGHT_ANKLE, RIGHT_HIP, RIGHT_SHOULDER,
};

/// History frames every detector needs before it will look at a frame
pub const MIN_DETECTOR_HISTORY: usize = 3;

/// Most recent history frame, if the history is deep enough to detect on
pub fn previous_frame(history: &[PoseFrame]) -> Option<&PoseFrame> {
    if history.len() < MIN_DETECTOR_HISTORY {
        return None;
    }
    history.last()
}

/// Stance-relative measurements of one frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyMetrics {
    pub hip_center: (f32, f32),
    /// Hip center along the facing direction
    pub hip_forward: f32,
    /// Nose to mid-ankle distance
    pub body_height: f32,
    pub wrist_forward: f32,
    /// Front wrist height above the front shoulder (image y grows downward)
    pub wrist_lift: f32,
    /// Front wrist relative to front shoulder, along the facing direction
    pub wrist_reach: f32,
    pub front_ankle_forward: f32,
    pub back_ankle_forward: f32,
    pub front_knee_angle: f32,
    pub back_knee_angle: f32,
    /// Front wrist to front shoulder distance over body height
    pub arm_extension: f32,
    pub torso_lean: f32,
}

impl BodyMetrics {
    pub fn measure(frame: &PoseFrame, stance: &Stance) -> Self {
        let facing = stance.facing;
        let front = stance.front_leg;
        let back = stance.back_leg();
        let arm = stance.front_arm;

        let hip_center = midpoint(frame.point(LEFT_HIP), frame.point(RIGHT_HIP));
        let shoulder_center = midpoint(frame.point(LEFT_SHOULDER), frame.point(RIGHT_SHOULDER));
        let ankle_center = midpoint(frame.point(LEFT_ANKLE), frame.point(RIGHT_ANKLE));
        let body_height = distance(frame.point(NOSE), ankle_center);

        let front_wrist = frame.point(arm.wrist());
        let front_shoulder = frame.point(arm.shoulder());

        Self {
            hip_center,
            hip_forward: facing.forward(hip_center),
            body_height,
            wrist_forward: facing.forward(front_wrist),
            wrist_lift: front_shoulder.1 - front_wrist.1,
            wrist_reach: facing.forward(front_wrist) - facing.forward(front_shoulder),
            front_ankle_forward: facing.forward(frame.point(front.ankle())),
            back_ankle_forward: facing.forward(frame.point(back.ankle())),
            front_knee_angle: knee_angle(
                frame.point(front.hip()),
                frame.point(front.knee()),
                frame.point(front.ankle()),
            ),
            back_knee_angle: knee_angle(
                frame.point(back.hip()),
                frame.point(back.knee()),
                frame.point(back.ankle()),
            ),
            arm_extension: safe_ratio(distance(front_wrist, front_shoulder), body_height),
            torso_lean: torso_lean(shoulder_center, hip_center),
        }
    }
}

/// Current and previous metrics under one stance, with the time between them
#[derive(Clone, Copy, Debug)]
pub struct Motion {
    pub current: BodyMetrics,
    pub previous: BodyMetrics,
    pub dt_ms: i64,
}

impl Motion {
    pub fn between(previous: &PoseFrame, current: &PoseFrame, stance: &Stance) -> Self {
        Self {
            current: BodyMetrics::measure(current, stance),
            previous: BodyMetrics::measure(previous, stance),
            dt_ms: current.elapsed_since(previous),
        }
    }

    /// Hip velocity along the facing direction
    pub fn hip_velocity(&self) -> f32 {
        velocity(self.previous.hip_forward, self.current.hip_forward, self.dt_ms)
    }

    /// Upward hip velocity (image y grows downward)
    pub fn hip_rise_velocity(&self) -> f32 {
        -velocity(self.previous.hip_center.1, self.current.hip_center.1, self.dt_ms)
    }

    /// Front wrist velocity along the facing direction
    pub fn wrist_velocity(&self) -> f32 {
        velocity(self.previous.wrist_forward, self.current.wrist_forward, self.dt_ms)
    }

    /// Upward front wrist velocity relative to its shoulder, so a jump carrying
    /// the whole body reads as zero
    pub fn wrist_rise_velocity(&self) -> f32 {
        velocity(self.previous.wrist_lift, self.current.wrist_lift, self.dt_ms)
    }

    /// Front wrist velocity relative to its shoulder along the facing axis
    pub fn wrist_sweep_velocity(&self) -> f32 {
        velocity(self.previous.wrist_reach, self.current.wrist_reach, self.dt_ms)
    }

    pub fn back_ankle_velocity(&self) -> f32 {
        velocity(self.previous.back_ankle_forward, self.current.back_ankle_forward, self.dt_ms)
    }

    /// Rate of change of the arm extension ratio, per second
    pub fn extension_rate(&self) -> f32 {
        velocity(self.previous.arm_extension, self.current.arm_extension, self.dt_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::Handedness;
    use crate::synthetic::FencerPose;

    #[test]
    fn test_previous_frame_requires_history() {
        let guard = |n: u64| -> Vec<PoseFrame> {
            (0..n).map(|i| FencerPose::en_garde(0.4).frame(i * 33)).collect()
        };
        let frames = guard(2);
        assert!(previous_frame(&frames).is_none());
        let frames = guard(3);
        assert_eq!(previous_frame(&frames).unwrap().timestamp_ms(), 66);
    }

    #[test]
    fn test_metrics_match_synthetic_pose() {
        let pose = FencerPose::en_garde(0.4).with_arm_extension(0.25).with_knees(100.0, 130.0);
        let frame = pose.frame(0);
        let stance = Stance::detect(&frame, Handedness::Right);
        let metrics = BodyMetrics::measure(&frame, &stance);
        assert!((metrics.arm_extension - 0.25).abs() < 1e-3);
        assert!((metrics.front_knee_angle - 100.0).abs() < 0.5);
        assert!((metrics.back_knee_angle - 130.0).abs() < 0.5);
        assert!(metrics.torso_lean < 0.5);
        assert!(metrics.front_ankle_forward > metrics.back_ankle_forward);
    }

    #[test]
    fn test_motion_velocities() {
        let stance_pose = FencerPose::en_garde(0.4);
        let a = stance_pose.frame(0);
        let b = stance_pose.shifted(0.033).frame(33);
        let stance = Stance::detect(&a, Handedness::Right);
        let motion = Motion::between(&a, &b, &stance);
        assert!((motion.hip_velocity() - 1.0).abs() < 1e-3);
        assert!((motion.wrist_velocity() - 1.0).abs() < 1e-3);
        assert!(motion.wrist_sweep_velocity().abs() < 1e-3);
        assert!(motion.hip_rise_velocity().abs() < 1e-3);
    }

    #[test]
    fn test_wrist_rise_ignores_whole_body_jump() {
        let guard = FencerPose::en_garde(0.4).with_arm_extension(0.15);
        let a = guard.frame(0);
        let stance = Stance::detect(&a, Handedness::Right);

        let jump = Motion::between(&a, &guard.raised(0.033).frame(33), &stance);
        assert!((jump.hip_rise_velocity() - 1.0).abs() < 1e-3);
        assert!(jump.wrist_rise_velocity().abs() < 1e-3);

        let lift = Motion::between(&a, &guard.with_wrist_elevation(30.0).frame(33), &stance);
        assert!(lift.wrist_rise_velocity() > 0.5);
        assert!(lift.hip_rise_velocity().abs() < 1e-3);
    }

    #[test]
    fn test_zero_body_height_gives_zero_extension() {
        let frame = PoseFrame::new(&[crate::pose::Landmark::new(0.5, 0.5); 33], 0).unwrap();
        let stance = Stance::detect(&frame, Handedness::Right);
        let metrics = BodyMetrics::measure(&frame, &stance);
        assert_eq!(metrics.arm_extension, 0.0);
    }
}
