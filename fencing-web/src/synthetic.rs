//! Synthetic fencer poses
//!
//! Builds complete 33-landmark poses for a right-handed fencer facing +x
//! from a handful of biomechanical parameters (hip position, ankle
//! positions, knee angles, arm extension). Knees are placed so the
//! requested joint angle is exact, and the wrist so the extension ratio is
//! exact. Used for detector calibration and scenario tests.

use crate::physics::{distance, midpoint};
use crate::pose::*;

/// Parametric side-on fencer
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FencerPose {
    /// Hip center
    pub hip: (f32, f32),
    pub front_ankle: (f32, f32),
    pub back_ankle: (f32, f32),
    /// Knee angles in degrees
    pub front_knee: f32,
    pub back_knee: f32,
    /// Front wrist to shoulder distance over body height
    pub arm_extension: f32,
    /// Sword arm elevation above horizontal, degrees
    pub wrist_elevation: f32,
    /// Forward torso lean, degrees
    pub torso_lean: f32,
    /// Nose height above the shoulder line
    pub head_height: f32,
}

const TORSO_LENGTH: f32 = 0.25;
const HALF_SHOULDER: f32 = 0.02;
const HALF_HIP: f32 = 0.02;

impl FencerPose {
    /// Balanced en garde with the hip centered at `x`
    pub fn en_garde(x: f32) -> Self {
        Self {
            hip: (x, 0.55),
            front_ankle: (x + 0.20, 0.90),
            back_ankle: (x - 0.15, 0.90),
            front_knee: 100.0,
            back_knee: 130.0,
            arm_extension: 0.08,
            wrist_elevation: 0.0,
            torso_lean: 0.0,
            head_height: 0.15,
        }
    }

    pub fn with_arm_extension(mut self, ratio: f32) -> Self {
        self.arm_extension = ratio;
        self
    }

    pub fn with_wrist_elevation(mut self, degrees: f32) -> Self {
        self.wrist_elevation = degrees;
        self
    }

    pub fn with_knees(mut self, front: f32, back: f32) -> Self {
        self.front_knee = front;
        self.back_knee = back;
        self
    }

    pub fn with_torso_lean(mut self, degrees: f32) -> Self {
        self.torso_lean = degrees;
        self
    }

    pub fn with_head_height(mut self, height: f32) -> Self {
        self.head_height = height;
        self
    }

    /// Move the hip horizontally, leaving the feet planted
    pub fn with_hip_x(mut self, x: f32) -> Self {
        self.hip.0 = x;
        self
    }

    pub fn with_front_ankle_x(mut self, x: f32) -> Self {
        self.front_ankle.0 = x;
        self
    }

    pub fn with_back_ankle_x(mut self, x: f32) -> Self {
        self.back_ankle.0 = x;
        self
    }

    /// Translate the whole body horizontally
    pub fn shifted(mut self, dx: f32) -> Self {
        self.hip.0 += dx;
        self.front_ankle.0 += dx;
        self.back_ankle.0 += dx;
        self
    }

    /// Translate the whole body upward (jump)
    pub fn raised(mut self, dy: f32) -> Self {
        self.hip.1 -= dy;
        self.front_ankle.1 -= dy;
        self.back_ankle.1 -= dy;
        self
    }

    pub fn landmarks(&self) -> Vec<Landmark> {
        let (sin_lean, cos_lean) = self.torso_lean.to_radians().sin_cos();
        let shoulder_mid = (
            self.hip.0 + TORSO_LENGTH * sin_lean,
            self.hip.1 - TORSO_LENGTH * cos_lean,
        );
        let right_shoulder = (shoulder_mid.0 + HALF_SHOULDER, shoulder_mid.1);
        let left_shoulder = (shoulder_mid.0 - HALF_SHOULDER, shoulder_mid.1);
        let nose = (shoulder_mid.0 + 0.03, shoulder_mid.1 - self.head_height);

        let right_hip = (self.hip.0 + HALF_HIP, self.hip.1);
        let left_hip = (self.hip.0 - HALF_HIP, self.hip.1);

        let body_height = distance(nose, midpoint(self.front_ankle, self.back_ankle));
        let reach = self.arm_extension * body_height;
        let (sin_el, cos_el) = self.wrist_elevation.to_radians().sin_cos();
        let right_wrist = (right_shoulder.0 + reach * cos_el, right_shoulder.1 - reach * sin_el);
        let right_elbow = {
            let m = midpoint(right_shoulder, right_wrist);
            (m.0, m.1 + 0.02)
        };
        let left_wrist = (left_shoulder.0 - 0.06, left_shoulder.1 - 0.06);
        let left_elbow = midpoint(left_shoulder, left_wrist);

        let right_knee = knee_apex(right_hip, self.front_ankle, self.front_knee);
        let left_knee = knee_apex(left_hip, self.back_ankle, self.back_knee);

        let mut points = [(0.0f32, 0.0f32); LANDMARK_COUNT];
        points[NOSE] = nose;
        points[LEFT_EYE_INNER] = (nose.0 - 0.005, nose.1 - 0.01);
        points[LEFT_EYE] = (nose.0 - 0.01, nose.1 - 0.01);
        points[LEFT_EYE_OUTER] = (nose.0 - 0.015, nose.1 - 0.01);
        points[RIGHT_EYE_INNER] = (nose.0 + 0.005, nose.1 - 0.01);
        points[RIGHT_EYE] = (nose.0 + 0.01, nose.1 - 0.01);
        points[RIGHT_EYE_OUTER] = (nose.0 + 0.015, nose.1 - 0.01);
        points[LEFT_EAR] = (nose.0 - 0.03, nose.1);
        points[RIGHT_EAR] = (nose.0 - 0.01, nose.1);
        points[MOUTH_LEFT] = (nose.0 - 0.005, nose.1 + 0.02);
        points[MOUTH_RIGHT] = (nose.0 + 0.005, nose.1 + 0.02);
        points[LEFT_SHOULDER] = left_shoulder;
        points[RIGHT_SHOULDER] = right_shoulder;
        points[LEFT_ELBOW] = left_elbow;
        points[RIGHT_ELBOW] = right_elbow;
        points[LEFT_WRIST] = left_wrist;
        points[RIGHT_WRIST] = right_wrist;
        for idx in [LEFT_PINKY, LEFT_INDEX, LEFT_THUMB] {
            points[idx] = left_wrist;
        }
        for idx in [RIGHT_PINKY, RIGHT_INDEX, RIGHT_THUMB] {
            points[idx] = right_wrist;
        }
        points[LEFT_HIP] = left_hip;
        points[RIGHT_HIP] = right_hip;
        points[LEFT_KNEE] = left_knee;
        points[RIGHT_KNEE] = right_knee;
        points[LEFT_ANKLE] = self.back_ankle;
        points[RIGHT_ANKLE] = self.front_ankle;
        points[LEFT_HEEL] = (self.back_ankle.0 - 0.02, self.back_ankle.1 + 0.01);
        points[RIGHT_HEEL] = (self.front_ankle.0 - 0.02, self.front_ankle.1 + 0.01);
        points[LEFT_FOOT_INDEX] = (self.back_ankle.0 + 0.04, self.back_ankle.1 + 0.02);
        points[RIGHT_FOOT_INDEX] = (self.front_ankle.0 + 0.04, self.front_ankle.1 + 0.02);

        points.iter().map(|&(x, y)| Landmark::new(x, y)).collect()
    }

    pub fn frame(&self, timestamp_ms: u64) -> PoseFrame {
        PoseFrame::new(&self.landmarks(), timestamp_ms)
            .unwrap_or_else(|| unreachable!("synthetic pose always has {LANDMARK_COUNT} landmarks"))
    }

    /// Flat `[x, y, z, ...]` payload as delivered by the browser host
    pub fn flat(&self) -> Vec<f32> {
        self.landmarks().iter().flat_map(|lm| [lm.x, lm.y, lm.z]).collect()
    }
}

/// Knee position giving exactly `angle_deg` between hip and ankle, bent forward (+x)
fn knee_apex(hip: (f32, f32), ankle: (f32, f32), angle_deg: f32) -> (f32, f32) {
    let mid = midpoint(hip, ankle);
    let chord = (ankle.0 - hip.0, ankle.1 - hip.1);
    let len = distance(hip, ankle);
    if len < 1e-6 || angle_deg >= 179.9 {
        return mid;
    }
    let mut normal = (-chord.1 / len, chord.0 / len);
    if normal.0 < 0.0 {
        normal = (-normal.0, -normal.1);
    }
    let half = angle_deg.clamp(1.0, 179.9).to_radians() / 2.0;
    let apex = (len / 2.0) / half.tan();
    (mid.0 + normal.0 * apex, mid.1 + normal.1 * apex)
}
