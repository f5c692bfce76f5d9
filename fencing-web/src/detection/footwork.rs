//! Advance and retreat detection
//!
//! Both steps are the same machine run in opposite directions:
//!
//! ```text
//! Idle ──hip moves──▶ FrontFootMoving ──back foot follows──▶ BackFootFollowing ──settles──▶ Completed
//! ```
//!
//! All velocities are multiplied by the travel direction, so a retreat is
//! an advance with every forward delta negated.

use tracing::debug;

use super::metrics::{previous_frame, Motion};
use super::types::{Action, ActionQuality, ActionResult};
use crate::config::{EngineConfig, FootworkConfig};
use crate::physics::{Handedness, Stance};
use crate::pose::PoseFrame;

/// Travel direction of a step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepDirection {
    Forward,
    Backward,
}

impl StepDirection {
    fn sign(self) -> f32 {
        match self {
            StepDirection::Forward => 1.0,
            StepDirection::Backward => -1.0,
        }
    }

    fn action(self) -> Action {
        match self {
            StepDirection::Forward => Action::Advance,
            StepDirection::Backward => Action::Retreat,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum FootworkPhase {
    Idle,
    FrontFootMoving {
        started_ms: u64,
        stance: Stance,
        start_hip_forward: f32,
    },
    BackFootFollowing {
        started_ms: u64,
        stance: Stance,
        start_hip_forward: f32,
    },
}

/// Advance or retreat detector state
pub struct FootworkState {
    direction: StepDirection,
    config: FootworkConfig,
    handedness: Handedness,
    phase: FootworkPhase,
}

impl FootworkState {
    pub fn advance(config: &EngineConfig) -> Self {
        Self::new(StepDirection::Forward, config)
    }

    pub fn retreat(config: &EngineConfig) -> Self {
        Self::new(StepDirection::Backward, config)
    }

    fn new(direction: StepDirection, config: &EngineConfig) -> Self {
        Self {
            direction,
            config: config.footwork.clone(),
            handedness: config.handedness,
            phase: FootworkPhase::Idle,
        }
    }

    pub fn detect(&mut self, current: &PoseFrame, history: &[PoseFrame]) -> ActionResult {
        let Some(previous) = previous_frame(history) else {
            return ActionResult::None;
        };
        let (next, result) = self.transition(current, previous);
        if next != self.phase {
            debug!(
                detector = self.direction.action().name(),
                from = ?self.phase,
                to = ?next,
                "footwork phase change"
            );
        }
        self.phase = next;
        result
    }

    pub fn reset(&mut self) {
        self.phase = FootworkPhase::Idle;
    }

    pub fn is_idle(&self) -> bool {
        self.phase == FootworkPhase::Idle
    }

    fn transition(
        &self,
        current: &PoseFrame,
        previous: &PoseFrame,
    ) -> (FootworkPhase, ActionResult) {
        let cfg = &self.config;
        let sign = self.direction.sign();
        let action = self.direction.action();
        let now = current.timestamp_ms();

        match self.phase {
            FootworkPhase::Idle => {
                let stance = Stance::detect(current, self.handedness);
                let motion = Motion::between(previous, current, &stance);
                let hip_v = sign * motion.hip_velocity();
                let knee = motion.current.front_knee_angle;

                if hip_v > cfg.movement_velocity && (cfg.knee_min..=cfg.knee_max).contains(&knee) {
                    let next = FootworkPhase::FrontFootMoving {
                        started_ms: now,
                        stance,
                        start_hip_forward: motion.previous.hip_forward,
                    };
                    return (next, ActionResult::in_progress(action, 0.4));
                }
                (FootworkPhase::Idle, ActionResult::None)
            }

            FootworkPhase::FrontFootMoving { started_ms, stance, start_hip_forward } => {
                if current.ms_since(started_ms) > cfg.follow_timeout_ms {
                    return (FootworkPhase::Idle, ActionResult::None);
                }
                let motion = Motion::between(previous, current, &stance);
                if sign * motion.hip_velocity() < -cfg.movement_velocity {
                    return (FootworkPhase::Idle, ActionResult::None);
                }
                if sign * motion.back_ankle_velocity() > cfg.follow_velocity {
                    let next = FootworkPhase::BackFootFollowing {
                        started_ms,
                        stance,
                        start_hip_forward,
                    };
                    return (next, ActionResult::in_progress(action, 0.7));
                }
                (self.phase, ActionResult::in_progress(action, 0.4))
            }

            FootworkPhase::BackFootFollowing { started_ms, stance, start_hip_forward } => {
                let elapsed = current.ms_since(started_ms);
                if elapsed > cfg.max_duration_ms {
                    return (FootworkPhase::Idle, ActionResult::None);
                }
                let motion = Motion::between(previous, current, &stance);
                let back_v = sign * motion.back_ankle_velocity();
                if back_v < -cfg.follow_velocity {
                    return (FootworkPhase::Idle, ActionResult::None);
                }

                let settled = motion.hip_velocity().abs() < cfg.settle_velocity
                    && back_v.abs() < cfg.settle_velocity;
                if !settled {
                    return (self.phase, ActionResult::in_progress(action, 0.7));
                }

                let travel = sign * (motion.current.hip_forward - start_hip_forward);
                if travel < cfg.min_travel {
                    return (FootworkPhase::Idle, ActionResult::None);
                }

                let (quality, feedback) =
                    self.score(motion.current.front_knee_angle, travel, elapsed);
                (
                    FootworkPhase::Idle,
                    ActionResult::completed(action, quality, feedback, elapsed),
                )
            }
        }
    }

    fn score(
        &self,
        front_knee: f32,
        travel: f32,
        elapsed_ms: u64,
    ) -> (ActionQuality, Option<String>) {
        let cfg = &self.config;
        let knee_ok = (cfg.ideal_knee_min..=cfg.ideal_knee_max).contains(&front_knee);
        let travel_ok = travel >= cfg.good_travel;
        let tempo_ok = elapsed_ms <= cfg.ideal_duration_ms;

        let points = [knee_ok, travel_ok, tempo_ok].iter().filter(|ok| **ok).count() as u8;
        let feedback = if !knee_ok {
            Some("Keep your knees bent through the step".to_string())
        } else if !travel_ok {
            Some("Take a fuller step".to_string())
        } else if !tempo_ok {
            Some("Bring the back foot in faster".to_string())
        } else {
            None
        };
        (ActionQuality::from_points(points), feedback)
    }
}
