//! Flunge (flying lunge) detection
//!
//! One active phase. The blade arm launches faster than in a plain lunge and
//! the back foot must never pass the front foot; crossing is reported as a
//! completed Poor flunge with the rule named, instead of vanishing.

use tracing::{debug, info};

use super::metrics::{previous_frame, Motion};
use super::types::{Action, ActionQuality, ActionResult};
use crate::config::{EngineConfig, FlungeConfig};
use crate::physics::{Handedness, Stance};
use crate::pose::PoseFrame;

pub const CROSSOVER_MESSAGE: &str = "Back foot passed the front foot: crossing over is not allowed";

#[derive(Clone, Copy, Debug, PartialEq)]
enum FlungePhase {
    Idle,
    Flunging {
        started_ms: u64,
        stance: Stance,
        peak_wrist_velocity: f32,
    },
}

/// Flunge detector state
pub struct FlungeState {
    config: FlungeConfig,
    handedness: Handedness,
    phase: FlungePhase,
}

impl FlungeState {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            config: config.flunge.clone(),
            handedness: config.handedness,
            phase: FlungePhase::Idle,
        }
    }

    pub fn detect(&mut self, current: &PoseFrame, history: &[PoseFrame]) -> ActionResult {
        let Some(previous) = previous_frame(history) else {
            return ActionResult::None;
        };
        let (next, result) = self.transition(current, previous);
        if next != self.phase {
            debug!(detector = "flunge", from = ?self.phase, to = ?next, "phase change");
        }
        self.phase = next;
        result
    }

    pub fn reset(&mut self) {
        self.phase = FlungePhase::Idle;
    }

    pub fn is_idle(&self) -> bool {
        self.phase == FlungePhase::Idle
    }

    fn transition(&self, current: &PoseFrame, previous: &PoseFrame) -> (FlungePhase, ActionResult) {
        let cfg = &self.config;
        let now = current.timestamp_ms();

        match self.phase {
            FlungePhase::Idle => {
                let stance = Stance::detect(current, self.handedness);
                let motion = Motion::between(previous, current, &stance);
                let wrist_v = motion.wrist_velocity();
                if wrist_v > cfg.wrist_velocity
                    && motion.current.arm_extension > cfg.start_extension
                {
                    let next = FlungePhase::Flunging {
                        started_ms: now,
                        stance,
                        peak_wrist_velocity: wrist_v,
                    };
                    return (next, ActionResult::in_progress(Action::Flunge, 0.6));
                }
                (FlungePhase::Idle, ActionResult::None)
            }

            FlungePhase::Flunging { started_ms, stance, peak_wrist_velocity } => {
                let motion = Motion::between(previous, current, &stance);
                let metrics = &motion.current;
                let duration = now.saturating_sub(started_ms);

                // Checked before anything else, including the timeout
                if metrics.back_ankle_forward > metrics.front_ankle_forward {
                    info!(duration_ms = duration, "flunge crossover");
                    return (
                        FlungePhase::Idle,
                        ActionResult::completed(
                            Action::Flunge,
                            ActionQuality::Poor,
                            Some(CROSSOVER_MESSAGE.to_string()),
                            duration,
                        ),
                    );
                }

                if duration > cfg.max_duration_ms {
                    return (FlungePhase::Idle, ActionResult::None);
                }

                let wrist_v = motion.wrist_velocity();
                let peak = peak_wrist_velocity.max(wrist_v);
                let decelerated = wrist_v < peak * cfg.decel_fraction;
                if decelerated
                    && metrics.arm_extension >= cfg.full_extension
                    && metrics.back_knee_angle >= cfg.back_knee_straight
                {
                    let (quality, feedback) =
                        self.score(peak, metrics.arm_extension, metrics.back_knee_angle);
                    return (
                        FlungePhase::Idle,
                        ActionResult::completed(Action::Flunge, quality, feedback, duration),
                    );
                }

                let next = FlungePhase::Flunging {
                    started_ms,
                    stance,
                    peak_wrist_velocity: peak,
                };
                (next, ActionResult::in_progress(Action::Flunge, 0.8))
            }
        }
    }

    fn score(
        &self,
        peak_velocity: f32,
        extension: f32,
        back_knee: f32,
    ) -> (ActionQuality, Option<String>) {
        let cfg = &self.config;
        let explosive = peak_velocity >= cfg.perfect_velocity;
        let reach = extension >= cfg.ideal_extension;
        let back_leg = back_knee >= cfg.back_knee_ideal;

        let points = [explosive, reach, back_leg].iter().filter(|ok| **ok).count() as u8;
        let feedback = if !explosive {
            Some("Launch the arm more explosively".to_string())
        } else if !reach {
            Some("Reach further with the point".to_string())
        } else if !back_leg {
            Some("Push off a straight back leg".to_string())
        } else {
            None
        };
        (ActionQuality::from_points(points), feedback)
    }
}
