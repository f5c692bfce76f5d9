//! Continuous posture evaluation
//!
//! Runs on every tracked frame, independent of discrete action detection,
//! and drives the skeleton overlay color. Rules are checked in a fixed
//! priority order and the first violation wins:
//!
//! 1. front knee angle
//! 2. back leg straightness (lunging only)
//! 3. stance width (not while lunging)
//! 4. torso lean
//! 5. head drop

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::state::SessionState;
use crate::config::FormConfig;
use crate::detection::BodyMetrics;
use crate::physics::{midpoint, safe_ratio, Handedness, Stance};
use crate::pose::{PoseFrame, LEFT_HIP, LEFT_SHOULDER, NOSE, RIGHT_HIP, RIGHT_SHOULDER};

/// Joints the overlay can highlight
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Joint {
    FrontKnee,
    BackKnee,
    FrontAnkle,
    BackAnkle,
    Torso,
    Head,
}

impl Joint {
    /// Landmark indices drawn for this joint under the given stance
    pub fn landmarks(&self, stance: &Stance) -> Vec<usize> {
        match self {
            Joint::FrontKnee => vec![stance.front_leg.knee()],
            Joint::BackKnee => vec![stance.back_leg().knee()],
            Joint::FrontAnkle => vec![stance.front_leg.ankle()],
            Joint::BackAnkle => vec![stance.back_leg().ankle()],
            Joint::Torso => vec![LEFT_SHOULDER, RIGHT_SHOULDER, LEFT_HIP, RIGHT_HIP],
            Joint::Head => vec![NOSE],
        }
    }
}

/// How urgently a correction should be delivered
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

/// Per-frame posture verdict
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FormFeedback {
    pub is_good_form: bool,
    pub message: Option<String>,
    pub severity: Option<Severity>,
    pub highlighted_joints: BTreeSet<Joint>,
    /// Landmark indices of the highlighted joints
    pub highlighted_landmarks: BTreeSet<usize>,
}

impl FormFeedback {
    pub fn good() -> Self {
        Self {
            is_good_form: true,
            ..Self::default()
        }
    }

    /// Nothing to judge: no pose in view
    pub fn no_pose() -> Self {
        Self::default()
    }
}

struct Violation {
    message: &'static str,
    severity: Severity,
    joints: &'static [Joint],
}

pub struct FormEvaluator {
    config: FormConfig,
    handedness: Handedness,
}

impl FormEvaluator {
    pub fn new(config: &FormConfig, handedness: Handedness) -> Self {
        Self {
            config: config.clone(),
            handedness,
        }
    }

    pub fn evaluate(&self, frame: &PoseFrame, state: SessionState) -> FormFeedback {
        let stance = Stance::detect(frame, self.handedness);
        let metrics = BodyMetrics::measure(frame, &stance);

        let Some(violation) = self.first_violation(frame, &metrics, state) else {
            return FormFeedback::good();
        };
        let highlighted_landmarks = violation
            .joints
            .iter()
            .flat_map(|joint| joint.landmarks(&stance))
            .collect();
        FormFeedback {
            is_good_form: false,
            message: Some(violation.message.to_string()),
            severity: Some(violation.severity),
            highlighted_joints: violation.joints.iter().copied().collect(),
            highlighted_landmarks,
        }
    }

    fn first_violation(
        &self,
        frame: &PoseFrame,
        metrics: &BodyMetrics,
        state: SessionState,
    ) -> Option<Violation> {
        let cfg = &self.config;
        let lunging = state == SessionState::Lunging;

        if metrics.front_knee_angle < cfg.front_knee_min {
            return Some(Violation {
                message: "Front knee is past your toes",
                severity: Severity::Critical,
                joints: &[Joint::FrontKnee],
            });
        }
        if metrics.front_knee_angle > cfg.front_knee_max {
            return Some(Violation {
                message: "Bend your front knee",
                severity: Severity::Warning,
                joints: &[Joint::FrontKnee],
            });
        }

        if lunging && metrics.back_knee_angle < cfg.back_knee_straight {
            return Some(Violation {
                message: "Straighten your back leg",
                severity: Severity::Warning,
                joints: &[Joint::BackKnee],
            });
        }

        if !lunging {
            let width = safe_ratio(
                (metrics.front_ankle_forward - metrics.back_ankle_forward).abs(),
                metrics.body_height,
            );
            if width < cfg.stance_width_min {
                return Some(Violation {
                    message: "Widen your stance",
                    severity: Severity::Warning,
                    joints: &[Joint::FrontAnkle, Joint::BackAnkle],
                });
            }
            if width > cfg.stance_width_max {
                return Some(Violation {
                    message: "Narrow your stance",
                    severity: Severity::Info,
                    joints: &[Joint::FrontAnkle, Joint::BackAnkle],
                });
            }
        }

        if metrics.torso_lean > cfg.torso_lean_max {
            return Some(Violation {
                message: "Keep your torso upright",
                severity: Severity::Warning,
                joints: &[Joint::Torso],
            });
        }

        let shoulder_mid = midpoint(frame.point(LEFT_SHOULDER), frame.point(RIGHT_SHOULDER));
        let head_height = safe_ratio(shoulder_mid.1 - frame.point(NOSE).1, metrics.body_height);
        if head_height < cfg.head_height_min {
            return Some(Violation {
                message: "Keep your head up",
                severity: Severity::Info,
                joints: &[Joint::Head],
            });
        }

        None
    }
}
