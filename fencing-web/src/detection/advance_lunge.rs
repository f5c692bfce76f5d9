//! Advance-lunge detection
//!
//! An advance with the arm partly extended, immediately followed by a lunge.
//! The back foot must actually step during the advance; otherwise the
//! motion is a plain lunge and belongs to the lunge detector.

use tracing::debug;

use super::metrics::{previous_frame, Motion};
use super::types::{Action, ActionQuality, ActionResult};
use crate::config::{AdvanceLungeConfig, EngineConfig};
use crate::physics::{Handedness, Stance};
use crate::pose::PoseFrame;

#[derive(Clone, Copy, Debug, PartialEq)]
enum AdvanceLungePhase {
    Idle,
    Advancing {
        started_ms: u64,
        stance: Stance,
        start_back_ankle: f32,
        back_foot_followed: bool,
    },
    Lunging {
        attack_start_ms: u64,
        lunge_start_ms: u64,
        stance: Stance,
    },
}

/// Advance-lunge detector state
pub struct AdvanceLungeState {
    config: AdvanceLungeConfig,
    handedness: Handedness,
    phase: AdvanceLungePhase,
}

impl AdvanceLungeState {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            config: config.advance_lunge.clone(),
            handedness: config.handedness,
            phase: AdvanceLungePhase::Idle,
        }
    }

    pub fn detect(&mut self, current: &PoseFrame, history: &[PoseFrame]) -> ActionResult {
        let Some(previous) = previous_frame(history) else {
            return ActionResult::None;
        };
        let (next, result) = self.transition(current, previous);
        if next != self.phase {
            debug!(detector = "advance_lunge", from = ?self.phase, to = ?next, "phase change");
        }
        self.phase = next;
        result
    }

    pub fn reset(&mut self) {
        self.phase = AdvanceLungePhase::Idle;
    }

    pub fn is_idle(&self) -> bool {
        self.phase == AdvanceLungePhase::Idle
    }

    fn transition(
        &self,
        current: &PoseFrame,
        previous: &PoseFrame,
    ) -> (AdvanceLungePhase, ActionResult) {
        let cfg = &self.config;
        let now = current.timestamp_ms();

        match self.phase {
            AdvanceLungePhase::Idle => {
                let stance = Stance::detect(current, self.handedness);
                let motion = Motion::between(previous, current, &stance);
                let extension = motion.current.arm_extension;
                let partial_arm =
                    extension > cfg.early_extension_min && extension < cfg.early_extension_max;
                if motion.hip_velocity() > cfg.advance_velocity && partial_arm {
                    let next = AdvanceLungePhase::Advancing {
                        started_ms: now,
                        stance,
                        start_back_ankle: motion.previous.back_ankle_forward,
                        back_foot_followed: false,
                    };
                    return (next, ActionResult::in_progress(Action::AdvanceLunge, 0.35));
                }
                (AdvanceLungePhase::Idle, ActionResult::None)
            }

            AdvanceLungePhase::Advancing {
                started_ms,
                stance,
                start_back_ankle,
                back_foot_followed,
            } => {
                if current.ms_since(started_ms) > cfg.advance_max_ms {
                    return (AdvanceLungePhase::Idle, ActionResult::None);
                }
                let motion = Motion::between(previous, current, &stance);
                if motion.hip_velocity() < -cfg.advance_velocity {
                    return (AdvanceLungePhase::Idle, ActionResult::None);
                }
                let followed = back_foot_followed
                    || motion.current.back_ankle_forward - start_back_ankle >= cfg.follow_travel;

                let lunge_starts = motion.wrist_velocity() > cfg.lunge_wrist_velocity
                    && motion.current.arm_extension > cfg.lunge_extension;
                if followed && lunge_starts {
                    let next = AdvanceLungePhase::Lunging {
                        attack_start_ms: started_ms,
                        lunge_start_ms: now,
                        stance,
                    };
                    return (next, ActionResult::in_progress(Action::AdvanceLunge, 0.7));
                }
                let next = AdvanceLungePhase::Advancing {
                    started_ms,
                    stance,
                    start_back_ankle,
                    back_foot_followed: followed,
                };
                (next, ActionResult::in_progress(Action::AdvanceLunge, 0.35))
            }

            AdvanceLungePhase::Lunging { attack_start_ms, lunge_start_ms, stance } => {
                if current.ms_since(lunge_start_ms) > cfg.lunge_max_ms {
                    return (AdvanceLungePhase::Idle, ActionResult::None);
                }
                let motion = Motion::between(previous, current, &stance);
                if motion.wrist_velocity() < -cfg.lunge_wrist_velocity {
                    return (AdvanceLungePhase::Idle, ActionResult::None);
                }
                let metrics = &motion.current;
                if metrics.arm_extension >= cfg.full_extension
                    && metrics.back_knee_angle >= cfg.back_knee_straight
                {
                    let (quality, feedback) =
                        self.score(metrics.arm_extension, metrics.back_knee_angle);
                    let duration = now.saturating_sub(attack_start_ms);
                    return (
                        AdvanceLungePhase::Idle,
                        ActionResult::completed(Action::AdvanceLunge, quality, feedback, duration),
                    );
                }
                (self.phase, ActionResult::in_progress(Action::AdvanceLunge, 0.7))
            }
        }
    }

    /// Arm and back knee each rate Good or Perfect; the lower rating wins
    fn score(&self, extension: f32, back_knee: f32) -> (ActionQuality, Option<String>) {
        let cfg = &self.config;
        let arm = if extension >= cfg.perfect_extension {
            ActionQuality::Perfect
        } else {
            ActionQuality::Good
        };
        let leg = if back_knee >= cfg.back_knee_perfect {
            ActionQuality::Perfect
        } else {
            ActionQuality::Good
        };
        let feedback = if arm < ActionQuality::Perfect {
            Some("Reach further with the sword arm".to_string())
        } else if leg < ActionQuality::Perfect {
            Some("Drive off a straighter back leg".to_string())
        } else {
            None
        };
        (arm.min(leg), feedback)
    }
}
