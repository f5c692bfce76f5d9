//! Balestra-lunge detection
//!
//! A short forward jump landing on both feet, then a lunge. The jump is
//! gated on a minimum hip rise so that normal bouncing in en garde does not
//! count. The lunge half reuses the lunge entry, landing and scoring rules.

use tracing::debug;

use super::lunge::{arm_starts, landing_is_sound, score_lunge};
use super::metrics::{previous_frame, Motion};
use super::types::{Action, ActionResult};
use crate::config::{BalestraConfig, EngineConfig, LungeConfig};
use crate::physics::{Handedness, Stance};
use crate::pose::PoseFrame;

#[derive(Clone, Copy, Debug, PartialEq)]
enum BalestraPhase {
    Idle,
    Jumping {
        started_ms: u64,
        stance: Stance,
        /// Hip height (image y) at take-off
        start_hip_y: f32,
        /// Highest point reached so far (smallest image y)
        peak_hip_y: f32,
    },
    Landing {
        jump_start_ms: u64,
        landed_ms: u64,
        stance: Stance,
    },
    Lunging {
        jump_start_ms: u64,
        lunge_start_ms: u64,
        stance: Stance,
        peak_hip_velocity: f32,
    },
}

/// Balestra-lunge detector state
pub struct BalestraState {
    config: BalestraConfig,
    lunge: LungeConfig,
    handedness: Handedness,
    phase: BalestraPhase,
}

impl BalestraState {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            config: config.balestra.clone(),
            lunge: config.lunge.clone(),
            handedness: config.handedness,
            phase: BalestraPhase::Idle,
        }
    }

    pub fn detect(&mut self, current: &PoseFrame, history: &[PoseFrame]) -> ActionResult {
        let Some(previous) = previous_frame(history) else {
            return ActionResult::None;
        };
        let (next, result) = self.transition(current, previous);
        if next != self.phase {
            debug!(detector = "balestra_lunge", from = ?self.phase, to = ?next, "phase change");
        }
        self.phase = next;
        result
    }

    pub fn reset(&mut self) {
        self.phase = BalestraPhase::Idle;
    }

    pub fn is_idle(&self) -> bool {
        self.phase == BalestraPhase::Idle
    }

    fn transition(
        &self,
        current: &PoseFrame,
        previous: &PoseFrame,
    ) -> (BalestraPhase, ActionResult) {
        let cfg = &self.config;
        let now = current.timestamp_ms();

        match self.phase {
            BalestraPhase::Idle => {
                let stance = Stance::detect(current, self.handedness);
                let motion = Motion::between(previous, current, &stance);
                if motion.hip_rise_velocity() > cfg.jump_velocity {
                    let next = BalestraPhase::Jumping {
                        started_ms: now,
                        stance,
                        start_hip_y: motion.previous.hip_center.1,
                        peak_hip_y: motion.current.hip_center.1,
                    };
                    return (next, ActionResult::in_progress(Action::BalestraLunge, 0.25));
                }
                (BalestraPhase::Idle, ActionResult::None)
            }

            BalestraPhase::Jumping { started_ms, stance, start_hip_y, peak_hip_y } => {
                if current.ms_since(started_ms) > cfg.jump_max_ms {
                    return (BalestraPhase::Idle, ActionResult::None);
                }
                let motion = Motion::between(previous, current, &stance);
                let hip_y = motion.current.hip_center.1;
                let peak_hip_y = peak_hip_y.min(hip_y);
                let descending = motion.hip_rise_velocity() < 0.0;
                let back_near_start = hip_y >= start_hip_y - cfg.landing_tolerance;

                if descending && back_near_start {
                    if start_hip_y - peak_hip_y < cfg.min_jump_height {
                        return (BalestraPhase::Idle, ActionResult::None);
                    }
                    let next = BalestraPhase::Landing {
                        jump_start_ms: started_ms,
                        landed_ms: now,
                        stance,
                    };
                    return (next, ActionResult::in_progress(Action::BalestraLunge, 0.5));
                }
                let next = BalestraPhase::Jumping { started_ms, stance, start_hip_y, peak_hip_y };
                (next, ActionResult::in_progress(Action::BalestraLunge, 0.25))
            }

            BalestraPhase::Landing { jump_start_ms, landed_ms, stance } => {
                if current.ms_since(landed_ms) > cfg.landing_window_ms {
                    return (BalestraPhase::Idle, ActionResult::None);
                }
                let motion = Motion::between(previous, current, &stance);
                if arm_starts(&motion, &self.lunge) {
                    let next = BalestraPhase::Lunging {
                        jump_start_ms,
                        lunge_start_ms: now,
                        stance,
                        peak_hip_velocity: motion.hip_velocity().max(0.0),
                    };
                    return (next, ActionResult::in_progress(Action::BalestraLunge, 0.7));
                }
                (self.phase, ActionResult::in_progress(Action::BalestraLunge, 0.5))
            }

            BalestraPhase::Lunging { jump_start_ms, lunge_start_ms, stance, peak_hip_velocity } => {
                if current.ms_since(lunge_start_ms) > cfg.lunge_max_ms {
                    return (BalestraPhase::Idle, ActionResult::None);
                }
                let motion = Motion::between(previous, current, &stance);
                let hip_v = motion.hip_velocity();
                if hip_v < -self.lunge.body_velocity {
                    return (BalestraPhase::Idle, ActionResult::None);
                }
                let peak = peak_hip_velocity.max(hip_v);
                let drove = peak >= self.lunge.body_velocity;
                let decelerating = hip_v < peak * self.lunge.decel_fraction;

                if drove && decelerating && landing_is_sound(&motion.current, &self.lunge) {
                    let duration = now.saturating_sub(jump_start_ms);
                    let (quality, feedback) = score_lunge(&motion.current, duration, &self.lunge);
                    return (
                        BalestraPhase::Idle,
                        ActionResult::completed(Action::BalestraLunge, quality, feedback, duration),
                    );
                }
                let next = BalestraPhase::Lunging {
                    jump_start_ms,
                    lunge_start_ms,
                    stance,
                    peak_hip_velocity: peak,
                };
                (next, ActionResult::in_progress(Action::BalestraLunge, 0.7))
            }
        }
    }
}
