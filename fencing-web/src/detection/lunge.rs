//! Lunge detection
//!
//! Enforces the arm-first principle: the sword arm must start extending
//! before the hips drive forward.
//!
//! ```text
//! Idle ──arm extends, hips still──▶ ArmExtending ──hips drive──▶ Lunging ──hips decelerate──▶ Landing ──structure ok──▶ Completed
//! ```

use tracing::debug;

use super::metrics::{previous_frame, BodyMetrics, Motion};
use super::types::{Action, ActionQuality, ActionResult};
use crate::config::{EngineConfig, LungeConfig};
use crate::physics::{Handedness, Stance};
use crate::pose::PoseFrame;

#[derive(Clone, Copy, Debug, PartialEq)]
enum LungePhase {
    Idle,
    ArmExtending {
        started_ms: u64,
        stance: Stance,
    },
    Lunging {
        attack_start_ms: u64,
        stance: Stance,
        peak_hip_velocity: f32,
    },
    Landing {
        attack_start_ms: u64,
        landing_start_ms: u64,
        stance: Stance,
        peak_hip_velocity: f32,
    },
}

/// Lunge detector state
pub struct LungeState {
    config: LungeConfig,
    handedness: Handedness,
    phase: LungePhase,
}

impl LungeState {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            config: config.lunge.clone(),
            handedness: config.handedness,
            phase: LungePhase::Idle,
        }
    }

    pub fn detect(&mut self, current: &PoseFrame, history: &[PoseFrame]) -> ActionResult {
        let Some(previous) = previous_frame(history) else {
            return ActionResult::None;
        };
        let (next, result) = self.transition(current, previous);
        if next != self.phase {
            debug!(detector = "lunge", from = ?self.phase, to = ?next, "phase change");
        }
        self.phase = next;
        result
    }

    pub fn reset(&mut self) {
        self.phase = LungePhase::Idle;
    }

    pub fn is_idle(&self) -> bool {
        self.phase == LungePhase::Idle
    }

    fn transition(&self, current: &PoseFrame, previous: &PoseFrame) -> (LungePhase, ActionResult) {
        let cfg = &self.config;
        let now = current.timestamp_ms();

        match self.phase {
            LungePhase::Idle => {
                let stance = Stance::detect(current, self.handedness);
                let motion = Motion::between(previous, current, &stance);
                if arm_starts(&motion, cfg) && motion.hip_velocity() < cfg.body_velocity {
                    let next = LungePhase::ArmExtending { started_ms: now, stance };
                    return (next, ActionResult::in_progress(Action::Lunge, 0.3));
                }
                (LungePhase::Idle, ActionResult::None)
            }

            LungePhase::ArmExtending { started_ms, stance } => {
                if current.ms_since(started_ms) > cfg.arm_phase_max_ms {
                    return (LungePhase::Idle, ActionResult::None);
                }
                let motion = Motion::between(previous, current, &stance);
                if motion.wrist_velocity() < -cfg.arm_start_velocity {
                    return (LungePhase::Idle, ActionResult::None);
                }
                let hip_v = motion.hip_velocity();
                if hip_v > cfg.body_velocity {
                    let next = LungePhase::Lunging {
                        attack_start_ms: started_ms,
                        stance,
                        peak_hip_velocity: hip_v,
                    };
                    return (next, ActionResult::in_progress(Action::Lunge, 0.6));
                }
                (self.phase, ActionResult::in_progress(Action::Lunge, 0.3))
            }

            LungePhase::Lunging { attack_start_ms, stance, peak_hip_velocity } => {
                if current.ms_since(attack_start_ms) > cfg.max_duration_ms {
                    return (LungePhase::Idle, ActionResult::None);
                }
                let motion = Motion::between(previous, current, &stance);
                let hip_v = motion.hip_velocity();
                if hip_v < -cfg.body_velocity {
                    return (LungePhase::Idle, ActionResult::None);
                }
                let peak = peak_hip_velocity.max(hip_v);
                if hip_v >= peak * cfg.decel_fraction {
                    let next = LungePhase::Lunging {
                        attack_start_ms,
                        stance,
                        peak_hip_velocity: peak,
                    };
                    return (next, ActionResult::in_progress(Action::Lunge, 0.6));
                }

                let landing = LungePhase::Landing {
                    attack_start_ms,
                    landing_start_ms: now,
                    stance,
                    peak_hip_velocity: peak,
                };
                self.land(landing, &motion, now.saturating_sub(attack_start_ms))
            }

            LungePhase::Landing {
                attack_start_ms,
                landing_start_ms,
                stance,
                peak_hip_velocity,
            } => {
                if current.ms_since(landing_start_ms) > cfg.landing_max_ms
                    || current.ms_since(attack_start_ms) > cfg.max_duration_ms
                {
                    return (LungePhase::Idle, ActionResult::None);
                }
                let motion = Motion::between(previous, current, &stance);
                if motion.hip_velocity() >= peak_hip_velocity * cfg.decel_fraction {
                    return (self.phase, ActionResult::in_progress(Action::Lunge, 0.8));
                }
                self.land(self.phase, &motion, now.saturating_sub(attack_start_ms))
            }
        }
    }

    /// Complete if the landing posture is structurally sound, otherwise keep landing
    fn land(
        &self,
        landing: LungePhase,
        motion: &Motion,
        duration_ms: u64,
    ) -> (LungePhase, ActionResult) {
        if !landing_is_sound(&motion.current, &self.config) {
            return (landing, ActionResult::in_progress(Action::Lunge, 0.8));
        }
        let (quality, feedback) = score_lunge(&motion.current, duration_ms, &self.config);
        (
            LungePhase::Idle,
            ActionResult::completed(Action::Lunge, quality, feedback, duration_ms),
        )
    }
}

/// Arm-first entry: fast forward wrist with the arm already partly extended
pub(crate) fn arm_starts(motion: &Motion, cfg: &LungeConfig) -> bool {
    motion.wrist_velocity() > cfg.arm_start_velocity
        && motion.current.arm_extension > cfg.start_extension
}

/// Full extension, straight back leg, bent front knee
pub(crate) fn landing_is_sound(metrics: &BodyMetrics, cfg: &LungeConfig) -> bool {
    metrics.arm_extension >= cfg.full_extension
        && metrics.back_knee_angle >= cfg.back_knee_straight
        && metrics.front_knee_angle <= cfg.front_knee_max
}

/// Weighted lunge score over the landing posture and total duration
///
/// The weakest component provides the coaching message.
pub(crate) fn score_lunge(
    metrics: &BodyMetrics,
    duration_ms: u64,
    cfg: &LungeConfig,
) -> (ActionQuality, Option<String>) {
    let extension = ramp(metrics.arm_extension, cfg.full_extension, cfg.ideal_extension);
    let back_knee = ramp(metrics.back_knee_angle, cfg.back_knee_straight, cfg.back_knee_ideal);
    let front_knee = if metrics.front_knee_angle < cfg.front_knee_ideal_min {
        ramp(metrics.front_knee_angle, cfg.front_knee_ideal_min - 20.0, cfg.front_knee_ideal_min)
    } else {
        1.0 - ramp(metrics.front_knee_angle, cfg.front_knee_ideal_max, cfg.front_knee_max)
    };
    let torso = 1.0 - ramp(metrics.torso_lean, cfg.torso_lean_ideal, cfg.torso_lean_max);
    let tempo = if (cfg.ideal_duration_min_ms..=cfg.ideal_duration_max_ms).contains(&duration_ms) {
        1.0
    } else {
        0.5
    };

    let components = [
        (0.25, extension, "Extend your sword arm fully"),
        (0.25, back_knee, "Straighten your back leg"),
        (0.20, front_knee, "Keep the front knee over the ankle"),
        (0.15, torso, "Keep your torso upright"),
        (0.15, tempo, "Work on the tempo of the lunge"),
    ];
    let score: f32 = components.iter().map(|(w, v, _)| w * v).sum();
    let quality = ActionQuality::from_score(score);

    let feedback = if quality == ActionQuality::Perfect {
        None
    } else {
        components
            .iter()
            .filter(|(_, v, _)| *v < 1.0)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(_, _, msg)| msg.to_string())
    };
    (quality, feedback)
}

/// 0 at or below `low`, 1 at or above `high`, linear between
fn ramp(value: f32, low: f32, high: f32) -> f32 {
    if high <= low {
        return if value >= high { 1.0 } else { 0.0 };
    }
    ((value - low) / (high - low)).clamp(0.0, 1.0)
}
