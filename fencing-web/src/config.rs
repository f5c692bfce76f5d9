//! Engine configuration
//!
//! Every threshold used by the detectors and the session engine lives here.
//! Absolute values are calibration; the relative orderings checked in
//! [`EngineConfig::validate`] are required for detection to behave.
//!
//! Velocities are in normalized units per second, extensions are
//! wrist-to-shoulder distance over body height, angles are degrees.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::physics::Handedness;

/// One Euro smoothing applied to landmarks before buffering
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SmoothingConfig {
    pub min_cutoff: f32,
    pub beta: f32,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            min_cutoff: 1.2,
            beta: 0.2,
        }
    }
}

/// Advance and retreat thresholds
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FootworkConfig {
    /// Hip velocity along the travel direction that starts a step
    pub movement_velocity: f32,
    /// Back ankle velocity that counts as the back foot following
    pub follow_velocity: f32,
    /// Hip and back ankle speed below which the step has settled
    pub settle_velocity: f32,
    /// Front knee range in which a step is accepted as footwork
    pub knee_min: f32,
    pub knee_max: f32,
    /// Front knee band scoring a quality point
    pub ideal_knee_min: f32,
    pub ideal_knee_max: f32,
    /// Hip travel below which a settled step is discarded as jitter
    pub min_travel: f32,
    /// Hip travel scoring a quality point
    pub good_travel: f32,
    /// Max time for the back foot to start following
    pub follow_timeout_ms: u64,
    /// Max time for the whole step
    pub max_duration_ms: u64,
    /// Steps completed within this time score a quality point
    pub ideal_duration_ms: u64,
}

impl Default for FootworkConfig {
    fn default() -> Self {
        Self {
            movement_velocity: 0.15,
            follow_velocity: 0.10,
            settle_velocity: 0.05,
            knee_min: 85.0,
            knee_max: 165.0,
            ideal_knee_min: 95.0,
            ideal_knee_max: 140.0,
            min_travel: 0.02,
            good_travel: 0.05,
            follow_timeout_ms: 600,
            max_duration_ms: 1200,
            ideal_duration_ms: 700,
        }
    }
}

/// Lunge thresholds (also used for the lunge part of a balestra)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LungeConfig {
    /// Forward wrist velocity that starts the arm extension
    pub arm_start_velocity: f32,
    /// Extension ratio required when the arm starts
    pub start_extension: f32,
    /// Hip velocity at which the body is considered to be driving forward
    pub body_velocity: f32,
    /// Hip velocity below `peak * decel_fraction` counts as decelerating
    pub decel_fraction: f32,
    /// Extension ratio required to complete
    pub full_extension: f32,
    /// Extension ratio scoring full marks
    pub ideal_extension: f32,
    /// Back knee angle required to complete
    pub back_knee_straight: f32,
    /// Back knee angle scoring full marks
    pub back_knee_ideal: f32,
    /// Front knee must be bent below this to complete
    pub front_knee_max: f32,
    /// Front knee band scoring full marks
    pub front_knee_ideal_min: f32,
    pub front_knee_ideal_max: f32,
    /// Torso lean scoring full marks / scoring zero
    pub torso_lean_ideal: f32,
    pub torso_lean_max: f32,
    /// Max time between arm start and body drive
    pub arm_phase_max_ms: u64,
    /// Max time from arm start to landing
    pub max_duration_ms: u64,
    /// Max time spent landing before the attempt is dropped
    pub landing_max_ms: u64,
    /// Total duration window scoring full marks
    pub ideal_duration_min_ms: u64,
    pub ideal_duration_max_ms: u64,
}

impl Default for LungeConfig {
    fn default() -> Self {
        Self {
            arm_start_velocity: 0.5,
            start_extension: 0.20,
            body_velocity: 0.3,
            decel_fraction: 0.5,
            full_extension: 0.30,
            ideal_extension: 0.38,
            back_knee_straight: 150.0,
            back_knee_ideal: 165.0,
            front_knee_max: 120.0,
            front_knee_ideal_min: 80.0,
            front_knee_ideal_max: 110.0,
            torso_lean_ideal: 15.0,
            torso_lean_max: 30.0,
            arm_phase_max_ms: 400,
            max_duration_ms: 1500,
            landing_max_ms: 500,
            ideal_duration_min_ms: 150,
            ideal_duration_max_ms: 900,
        }
    }
}

/// Advance-lunge thresholds
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvanceLungeConfig {
    /// Hip velocity that starts the advance
    pub advance_velocity: f32,
    /// Partial extension band expected while advancing
    pub early_extension_min: f32,
    pub early_extension_max: f32,
    /// Back ankle travel proving the advance was a real step
    pub follow_travel: f32,
    pub advance_max_ms: u64,
    /// Wrist velocity that starts the lunge out of the advance
    pub lunge_wrist_velocity: f32,
    /// Extension required when the lunge starts
    pub lunge_extension: f32,
    pub full_extension: f32,
    pub perfect_extension: f32,
    pub back_knee_straight: f32,
    pub back_knee_perfect: f32,
    pub lunge_max_ms: u64,
}

impl Default for AdvanceLungeConfig {
    fn default() -> Self {
        Self {
            advance_velocity: 0.15,
            early_extension_min: 0.10,
            early_extension_max: 0.20,
            follow_travel: 0.02,
            advance_max_ms: 1000,
            lunge_wrist_velocity: 0.5,
            lunge_extension: 0.25,
            full_extension: 0.30,
            perfect_extension: 0.38,
            back_knee_straight: 150.0,
            back_knee_perfect: 165.0,
            lunge_max_ms: 800,
        }
    }
}

/// Balestra (jump) thresholds; the lunge after landing uses [`LungeConfig`]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalestraConfig {
    /// Upward hip velocity that starts the jump
    pub jump_velocity: f32,
    /// Minimum rise of the hip above its take-off height
    pub min_jump_height: f32,
    /// Hip within this distance of take-off height counts as landed
    pub landing_tolerance: f32,
    pub jump_max_ms: u64,
    /// Window after landing in which the lunge must start
    pub landing_window_ms: u64,
    pub lunge_max_ms: u64,
}

impl Default for BalestraConfig {
    fn default() -> Self {
        Self {
            jump_velocity: 0.25,
            min_jump_height: 0.03,
            landing_tolerance: 0.02,
            jump_max_ms: 700,
            landing_window_ms: 500,
            lunge_max_ms: 1200,
        }
    }
}

/// Flunge thresholds
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlungeConfig {
    /// Wrist velocity that starts a flunge; must exceed the lunge arm-start velocity
    pub wrist_velocity: f32,
    pub start_extension: f32,
    /// Wrist velocity below `peak * decel_fraction` counts as finished
    pub decel_fraction: f32,
    pub full_extension: f32,
    pub back_knee_straight: f32,
    /// Scoring gates
    pub perfect_velocity: f32,
    pub ideal_extension: f32,
    pub back_knee_ideal: f32,
    pub max_duration_ms: u64,
}

impl Default for FlungeConfig {
    fn default() -> Self {
        Self {
            wrist_velocity: 1.2,
            start_extension: 0.25,
            decel_fraction: 0.3,
            full_extension: 0.30,
            back_knee_straight: 150.0,
            perfect_velocity: 1.8,
            ideal_extension: 0.38,
            back_knee_ideal: 165.0,
            max_duration_ms: 800,
        }
    }
}

/// Parry and riposte thresholds
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParryConfig {
    /// Lateral or vertical wrist velocity that starts a parry
    pub parry_velocity: f32,
    /// Parries are made with a bent arm: extension must stay below this
    pub max_extension: f32,
    /// Extension growth rate (per second) above which the motion is an attack
    pub max_extension_rate: f32,
    /// Parry velocity scoring a crisp standalone parry
    pub strong_parry_velocity: f32,
    /// Parry dwell after which it completes on its own
    pub parry_hold_ms: u64,
    /// Forward wrist velocity that starts the riposte
    pub riposte_velocity: f32,
    /// Vertical wrist velocity allowed during the riposte
    pub riposte_max_vertical: f32,
    /// Forward travel past the parry position that completes the riposte
    pub riposte_min_travel: f32,
    pub riposte_max_ms: u64,
    /// Riposte duration buckets
    pub riposte_perfect_ms: u64,
    pub riposte_good_ms: u64,
    pub riposte_acceptable_ms: u64,
}

impl Default for ParryConfig {
    fn default() -> Self {
        Self {
            parry_velocity: 0.6,
            max_extension: 0.28,
            max_extension_rate: 0.3,
            strong_parry_velocity: 1.2,
            parry_hold_ms: 450,
            riposte_velocity: 0.8,
            riposte_max_vertical: 0.4,
            riposte_min_travel: 0.08,
            riposte_max_ms: 600,
            riposte_perfect_ms: 150,
            riposte_good_ms: 300,
            riposte_acceptable_ms: 450,
        }
    }
}

/// Session state machine timings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Front knee band accepted as en garde
    pub stance_knee_min: f32,
    pub stance_knee_max: f32,
    /// Wrist speed below which the sword arm is considered still
    pub stance_wrist_velocity: f32,
    /// Time the stance must hold before it counts
    pub stabilization_ms: u64,
    /// Lunging falls back to recovery after this long without a completion
    pub lunging_timeout_ms: u64,
    /// Recovery falls back to idle after this long without a stance
    pub recovery_timeout_ms: u64,
    /// Minimum gap between repeated coaching messages
    pub feedback_cooldown_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            stance_knee_min: 90.0,
            stance_knee_max: 150.0,
            stance_wrist_velocity: 0.15,
            stabilization_ms: 300,
            lunging_timeout_ms: 2500,
            recovery_timeout_ms: 3000,
            feedback_cooldown_ms: 1500,
        }
    }
}

/// Posture rule thresholds
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Front knee bent further than this is over the toes
    pub front_knee_min: f32,
    /// Front knee straighter than this is not a fencing stance
    pub front_knee_max: f32,
    /// Back knee required while lunging
    pub back_knee_straight: f32,
    /// Ankle spread over body height
    pub stance_width_min: f32,
    pub stance_width_max: f32,
    pub torso_lean_max: f32,
    /// Nose height above the shoulders over body height
    pub head_height_min: f32,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            front_knee_min: 70.0,
            front_knee_max: 160.0,
            back_knee_straight: 150.0,
            stance_width_min: 0.25,
            stance_width_max: 0.65,
            torso_lean_max: 25.0,
            head_height_min: 0.08,
        }
    }
}

/// Complete engine configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub handedness: Handedness,
    /// Frames retained by the pose buffer
    pub history_capacity: usize,
    /// History frames required before detectors run
    pub min_history: usize,
    /// Landmark smoothing; disabled when absent
    pub smoothing: Option<SmoothingConfig>,
    pub footwork: FootworkConfig,
    pub lunge: LungeConfig,
    pub advance_lunge: AdvanceLungeConfig,
    pub balestra: BalestraConfig,
    pub flunge: FlungeConfig,
    pub parry: ParryConfig,
    pub session: SessionConfig,
    pub form: FormConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            handedness: Handedness::Right,
            history_capacity: 30,
            min_history: 4,
            smoothing: None,
            footwork: FootworkConfig::default(),
            lunge: LungeConfig::default(),
            advance_lunge: AdvanceLungeConfig::default(),
            balestra: BalestraConfig::default(),
            flunge: FlungeConfig::default(),
            parry: ParryConfig::default(),
            session: SessionConfig::default(),
            form: FormConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parse a (possibly partial) JSON document and validate it
    ///
    /// Missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the ordering invariants detection relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_history == 0 || self.history_capacity <= self.min_history {
            return Err(ConfigError::HistoryCapacity {
                capacity: self.history_capacity,
                min_history: self.min_history,
            });
        }

        ordered(
            "lunge.arm_start_velocity",
            self.lunge.arm_start_velocity,
            "flunge.wrist_velocity",
            self.flunge.wrist_velocity,
        )?;
        ordered(
            "lunge.start_extension",
            self.lunge.start_extension,
            "lunge.full_extension",
            self.lunge.full_extension,
        )?;
        ordered(
            "lunge.full_extension",
            self.lunge.full_extension,
            "lunge.ideal_extension",
            self.lunge.ideal_extension,
        )?;
        ordered(
            "lunge.front_knee_max",
            self.lunge.front_knee_max,
            "lunge.back_knee_straight",
            self.lunge.back_knee_straight,
        )?;
        ordered(
            "advance_lunge.early_extension_max",
            self.advance_lunge.early_extension_max,
            "advance_lunge.lunge_extension",
            self.advance_lunge.lunge_extension,
        )?;
        ordered(
            "advance_lunge.lunge_extension",
            self.advance_lunge.lunge_extension,
            "advance_lunge.full_extension",
            self.advance_lunge.full_extension,
        )?;
        ordered(
            "flunge.full_extension",
            self.flunge.full_extension,
            "flunge.ideal_extension",
            self.flunge.ideal_extension,
        )?;
        ordered(
            "footwork.settle_velocity",
            self.footwork.settle_velocity,
            "footwork.movement_velocity",
            self.footwork.movement_velocity,
        )?;
        ordered(
            "footwork.knee_min",
            self.footwork.knee_min,
            "footwork.knee_max",
            self.footwork.knee_max,
        )?;
        ordered(
            "session.stance_knee_min",
            self.session.stance_knee_min,
            "session.stance_knee_max",
            self.session.stance_knee_max,
        )?;
        ordered(
            "form.stance_width_min",
            self.form.stance_width_min,
            "form.stance_width_max",
            self.form.stance_width_max,
        )?;
        ordered(
            "parry.riposte_perfect_ms",
            self.parry.riposte_perfect_ms as f32,
            "parry.riposte_good_ms",
            self.parry.riposte_good_ms as f32,
        )?;
        ordered(
            "parry.riposte_good_ms",
            self.parry.riposte_good_ms as f32,
            "parry.riposte_acceptable_ms",
            self.parry.riposte_acceptable_ms as f32,
        )?;

        for (field, value) in [
            ("footwork.max_duration_ms", self.footwork.max_duration_ms),
            ("lunge.max_duration_ms", self.lunge.max_duration_ms),
            ("advance_lunge.lunge_max_ms", self.advance_lunge.lunge_max_ms),
            ("balestra.jump_max_ms", self.balestra.jump_max_ms),
            ("flunge.max_duration_ms", self.flunge.max_duration_ms),
            ("parry.parry_hold_ms", self.parry.parry_hold_ms),
            ("session.stabilization_ms", self.session.stabilization_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::NotPositive { field, value: 0.0 });
            }
        }

        for (field, value) in [
            ("lunge.decel_fraction", self.lunge.decel_fraction),
            ("flunge.decel_fraction", self.flunge.decel_fraction),
        ] {
            if !(value > 0.0 && value < 1.0) {
                return Err(ConfigError::Fraction { field, value });
            }
        }

        Ok(())
    }
}

fn ordered(
    lower: &'static str,
    lower_value: f32,
    upper: &'static str,
    upper_value: f32,
) -> Result<(), ConfigError> {
    if lower_value < upper_value {
        Ok(())
    } else {
        Err(ConfigError::Ordering {
            lower,
            lower_value,
            upper,
            upper_value,
        })
    }
}
