//! Parry and riposte detection
//!
//! ```text
//! Idle ──defensive sweep──▶ Parrying ──forward thrust──▶ Riposting ──passes parry point──▶ Riposte
//!                              │
//!                              └──held without follow-up──▶ Parry
//! ```
//!
//! A parry is a fast wrist sweep with the arm still bent. It is classified
//! high when the wrist mostly rises, otherwise inside or outside by the
//! sign of the sweep along the facing axis and the side of the blade arm.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::metrics::{previous_frame, Motion};
use super::types::{Action, ActionQuality, ActionResult};
use crate::config::{EngineConfig, ParryConfig};
use crate::physics::{Handedness, Side, Stance};
use crate::pose::PoseFrame;

/// Parry line
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParryDirection {
    Outside,
    Inside,
    High,
}

impl ParryDirection {
    pub fn name(&self) -> &'static str {
        match self {
            ParryDirection::Outside => "outside",
            ParryDirection::Inside => "inside",
            ParryDirection::High => "high",
        }
    }

    /// `sweep` is the wrist velocity along the facing axis relative to the shoulder
    fn classify(sweep: f32, rise: f32, arm: Side) -> Self {
        if rise >= sweep.abs() {
            return ParryDirection::High;
        }
        let arm_sign = match arm {
            Side::Right => 1.0,
            Side::Left => -1.0,
        };
        if sweep * arm_sign > 0.0 {
            ParryDirection::Outside
        } else {
            ParryDirection::Inside
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum ParryPhase {
    Idle,
    Parrying {
        started_ms: u64,
        stance: Stance,
        direction: ParryDirection,
        parry_wrist_forward: f32,
        peak_velocity: f32,
    },
    Riposting {
        riposte_start_ms: u64,
        stance: Stance,
        parry_wrist_forward: f32,
    },
}

/// Parry-riposte detector state
pub struct ParryRiposteState {
    config: ParryConfig,
    handedness: Handedness,
    phase: ParryPhase,
}

impl ParryRiposteState {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            config: config.parry.clone(),
            handedness: config.handedness,
            phase: ParryPhase::Idle,
        }
    }

    pub fn detect(&mut self, current: &PoseFrame, history: &[PoseFrame]) -> ActionResult {
        let Some(previous) = previous_frame(history) else {
            return ActionResult::None;
        };
        let (next, result) = self.transition(current, previous);
        if next != self.phase {
            debug!(detector = "parry_riposte", from = ?self.phase, to = ?next, "phase change");
        }
        self.phase = next;
        result
    }

    pub fn reset(&mut self) {
        self.phase = ParryPhase::Idle;
    }

    pub fn is_idle(&self) -> bool {
        self.phase == ParryPhase::Idle
    }

    fn transition(&self, current: &PoseFrame, previous: &PoseFrame) -> (ParryPhase, ActionResult) {
        let cfg = &self.config;
        let now = current.timestamp_ms();

        match self.phase {
            ParryPhase::Idle => {
                let stance = Stance::detect(current, self.handedness);
                let motion = Motion::between(previous, current, &stance);
                let sweep = motion.wrist_sweep_velocity();
                let rise = motion.wrist_rise_velocity();
                let defensive_speed = sweep.abs().max(rise);

                let arm_bent = motion.current.arm_extension < cfg.max_extension
                    && motion.extension_rate() <= cfg.max_extension_rate;
                if arm_bent && defensive_speed > cfg.parry_velocity {
                    let next = ParryPhase::Parrying {
                        started_ms: now,
                        stance,
                        direction: ParryDirection::classify(sweep, rise, stance.front_arm),
                        parry_wrist_forward: motion.current.wrist_forward,
                        peak_velocity: defensive_speed,
                    };
                    return (next, ActionResult::in_progress(Action::Parry, 0.5));
                }
                (ParryPhase::Idle, ActionResult::None)
            }

            ParryPhase::Parrying {
                started_ms,
                stance,
                direction,
                parry_wrist_forward,
                peak_velocity,
            } => {
                let motion = Motion::between(previous, current, &stance);
                if motion.wrist_velocity() > cfg.riposte_velocity
                    && motion.wrist_rise_velocity().abs() < cfg.riposte_max_vertical
                {
                    let next = ParryPhase::Riposting {
                        riposte_start_ms: now,
                        stance,
                        parry_wrist_forward,
                    };
                    return (next, ActionResult::in_progress(Action::Riposte, 0.6));
                }

                let elapsed = current.ms_since(started_ms);
                if elapsed > cfg.parry_hold_ms {
                    let quality = if peak_velocity >= cfg.strong_parry_velocity {
                        ActionQuality::Good
                    } else {
                        ActionQuality::Acceptable
                    };
                    let feedback =
                        format!("{} parry, follow with a riposte", capitalize(direction.name()));
                    return (
                        ParryPhase::Idle,
                        ActionResult::completed(Action::Parry, quality, Some(feedback), elapsed),
                    );
                }

                let speed = motion.wrist_sweep_velocity().abs().max(motion.wrist_rise_velocity());
                let next = ParryPhase::Parrying {
                    started_ms,
                    stance,
                    direction,
                    parry_wrist_forward,
                    peak_velocity: peak_velocity.max(speed),
                };
                (next, ActionResult::in_progress(Action::Parry, 0.5))
            }

            ParryPhase::Riposting { riposte_start_ms, stance, parry_wrist_forward } => {
                let elapsed = current.ms_since(riposte_start_ms);
                if elapsed > cfg.riposte_max_ms {
                    return (ParryPhase::Idle, ActionResult::None);
                }
                let motion = Motion::between(previous, current, &stance);
                if motion.wrist_velocity() < -cfg.riposte_velocity {
                    return (ParryPhase::Idle, ActionResult::None);
                }
                if motion.current.wrist_forward - parry_wrist_forward >= cfg.riposte_min_travel {
                    let (quality, feedback) = self.score_riposte(elapsed);
                    return (
                        ParryPhase::Idle,
                        ActionResult::completed(Action::Riposte, quality, feedback, elapsed),
                    );
                }
                (self.phase, ActionResult::in_progress(Action::Riposte, 0.7))
            }
        }
    }

    /// Faster ripostes score higher
    fn score_riposte(&self, elapsed_ms: u64) -> (ActionQuality, Option<String>) {
        let cfg = &self.config;
        if elapsed_ms < cfg.riposte_perfect_ms {
            (ActionQuality::Perfect, None)
        } else if elapsed_ms < cfg.riposte_good_ms {
            (ActionQuality::Good, Some("Riposte sooner after the parry".to_string()))
        } else if elapsed_ms < cfg.riposte_acceptable_ms {
            (ActionQuality::Acceptable, Some("Riposte sooner after the parry".to_string()))
        } else {
            (ActionQuality::Poor, Some("Riposte too slow, the line has closed".to_string()))
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::FencerPose;

    fn frames_from(poses: &[FencerPose]) -> Vec<PoseFrame> {
        poses
            .iter()
            .enumerate()
            .map(|(i, p)| p.frame(4000 + i as u64 * 33))
            .collect()
    }

    fn run(detector: &mut ParryRiposteState, frames: &[PoseFrame]) -> Vec<ActionResult> {
        (0..frames.len())
            .map(|i| detector.detect(&frames[i], &frames[..i]))
            .collect()
    }

    fn guard() -> FencerPose {
        FencerPose::en_garde(0.40).with_arm_extension(0.15)
    }

    #[test]
    fn test_parry_then_riposte() {
        let base = guard();
        let parried = base.with_wrist_elevation(30.0);
        let mut poses = vec![base; 6];
        poses.extend([
            parried,
            parried,
            base.with_arm_extension(0.27).with_wrist_elevation(16.0),
            base.with_arm_extension(0.30).with_wrist_elevation(14.4),
        ]);

        let mut detector = ParryRiposteState::new(&EngineConfig::default());
        let results = run(&mut detector, &frames_from(&poses));

        assert_eq!(results[6].action(), Some(Action::Parry));
        assert!(results[6].is_in_progress());
        assert_eq!(results[8].action(), Some(Action::Riposte));
        let last = results.last().unwrap();
        assert_eq!(last.action(), Some(Action::Riposte));
        assert_eq!(last.quality(), Some(ActionQuality::Perfect));
        assert!(detector.is_idle());
    }

    #[test]
    fn test_unanswered_parry_completes_alone() {
        let base = guard();
        let parried = base.with_wrist_elevation(30.0);
        let mut poses = vec![base; 6];
        poses.extend(std::iter::repeat(parried).take(17));

        let mut detector = ParryRiposteState::new(&EngineConfig::default());
        let results = run(&mut detector, &frames_from(&poses));
        let completed: Vec<&ActionResult> = results.iter().filter(|r| r.is_completed()).collect();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].action(), Some(Action::Parry));
        assert_eq!(completed[0].quality(), Some(ActionQuality::Good));
        assert_eq!(completed[0].feedback(), Some("High parry, follow with a riposte"));
    }

    #[test]
    fn test_extended_arm_is_not_a_parry() {
        let base = FencerPose::en_garde(0.40).with_arm_extension(0.32);
        let mut poses = vec![base; 6];
        poses.push(base.with_wrist_elevation(30.0));
        let mut detector = ParryRiposteState::new(&EngineConfig::default());
        let results = run(&mut detector, &frames_from(&poses));
        assert!(results.iter().all(ActionResult::is_none));
    }

    #[test]
    fn test_jump_with_bent_arm_is_not_a_parry() {
        let base = guard();
        let mut poses = vec![base; 6];
        poses.extend([base.raised(0.03), base.raised(0.06), base.raised(0.036), base, base]);
        let mut detector = ParryRiposteState::new(&EngineConfig::default());
        let results = run(&mut detector, &frames_from(&poses));
        assert!(results.iter().all(ActionResult::is_none));
        assert!(detector.is_idle());
    }

    #[test]
    fn test_direction_classification() {
        assert_eq!(ParryDirection::classify(0.2, 1.0, Side::Right), ParryDirection::High);
        assert_eq!(ParryDirection::classify(1.0, 0.0, Side::Right), ParryDirection::Outside);
        assert_eq!(ParryDirection::classify(-1.0, 0.0, Side::Right), ParryDirection::Inside);
        assert_eq!(ParryDirection::classify(1.0, 0.0, Side::Left), ParryDirection::Inside);
    }

    #[test]
    fn test_riposte_tempo_buckets() {
        let detector = ParryRiposteState::new(&EngineConfig::default());
        assert_eq!(detector.score_riposte(100).0, ActionQuality::Perfect);
        assert_eq!(detector.score_riposte(200).0, ActionQuality::Good);
        assert_eq!(detector.score_riposte(400).0, ActionQuality::Acceptable);
        assert_eq!(detector.score_riposte(500).0, ActionQuality::Poor);
    }
}
