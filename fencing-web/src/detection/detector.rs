//! Closed detector set
//!
//! The seven detectors are fixed at compile time, so they are a plain enum
//! dispatched by `match` and stored inline in the manager.

use super::advance_lunge::AdvanceLungeState;
use super::balestra::BalestraState;
use super::flunge::FlungeState;
use super::footwork::FootworkState;
use super::lunge::LungeState;
use super::parry_riposte::ParryRiposteState;
use super::types::{Action, ActionResult};
use crate::config::EngineConfig;
use crate::pose::PoseFrame;

/// Number of registered detectors
pub const DETECTOR_COUNT: usize = 7;

pub enum Detector {
    Advance(FootworkState),
    Retreat(FootworkState),
    Lunge(LungeState),
    AdvanceLunge(AdvanceLungeState),
    BalestraLunge(BalestraState),
    Flunge(FlungeState),
    ParryRiposte(ParryRiposteState),
}

impl Detector {
    /// All detectors in registration order. Earlier wins ties, so compound
    /// attacks sit ahead of the plain lunge they contain.
    pub fn registry(config: &EngineConfig) -> [Detector; DETECTOR_COUNT] {
        [
            Detector::AdvanceLunge(AdvanceLungeState::new(config)),
            Detector::BalestraLunge(BalestraState::new(config)),
            Detector::Flunge(FlungeState::new(config)),
            Detector::Lunge(LungeState::new(config)),
            Detector::Advance(FootworkState::advance(config)),
            Detector::Retreat(FootworkState::retreat(config)),
            Detector::ParryRiposte(ParryRiposteState::new(config)),
        ]
    }

    pub fn detect(&mut self, current: &PoseFrame, history: &[PoseFrame]) -> ActionResult {
        match self {
            Detector::Advance(state) | Detector::Retreat(state) => state.detect(current, history),
            Detector::Lunge(state) => state.detect(current, history),
            Detector::AdvanceLunge(state) => state.detect(current, history),
            Detector::BalestraLunge(state) => state.detect(current, history),
            Detector::Flunge(state) => state.detect(current, history),
            Detector::ParryRiposte(state) => state.detect(current, history),
        }
    }

    pub fn reset(&mut self) {
        match self {
            Detector::Advance(state) | Detector::Retreat(state) => state.reset(),
            Detector::Lunge(state) => state.reset(),
            Detector::AdvanceLunge(state) => state.reset(),
            Detector::BalestraLunge(state) => state.reset(),
            Detector::Flunge(state) => state.reset(),
            Detector::ParryRiposte(state) => state.reset(),
        }
    }

    pub fn is_idle(&self) -> bool {
        match self {
            Detector::Advance(state) | Detector::Retreat(state) => state.is_idle(),
            Detector::Lunge(state) => state.is_idle(),
            Detector::AdvanceLunge(state) => state.is_idle(),
            Detector::BalestraLunge(state) => state.is_idle(),
            Detector::Flunge(state) => state.is_idle(),
            Detector::ParryRiposte(state) => state.is_idle(),
        }
    }

    /// Actions this detector can report
    pub fn actions(&self) -> &'static [Action] {
        match self {
            Detector::Advance(_) => &[Action::Advance],
            Detector::Retreat(_) => &[Action::Retreat],
            Detector::Lunge(_) => &[Action::Lunge],
            Detector::AdvanceLunge(_) => &[Action::AdvanceLunge],
            Detector::BalestraLunge(_) => &[Action::BalestraLunge],
            Detector::Flunge(_) => &[Action::Flunge],
            Detector::ParryRiposte(_) => &[Action::Parry, Action::Riposte],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Detector::Advance(_) => "advance",
            Detector::Retreat(_) => "retreat",
            Detector::Lunge(_) => "lunge",
            Detector::AdvanceLunge(_) => "advance_lunge",
            Detector::BalestraLunge(_) => "balestra_lunge",
            Detector::Flunge(_) => "flunge",
            Detector::ParryRiposte(_) => "parry_riposte",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_order_and_names() {
        let detectors = Detector::registry(&EngineConfig::default());
        let names: Vec<&str> = detectors.iter().map(Detector::name).collect();
        assert_eq!(
            names,
            [
                "advance_lunge",
                "balestra_lunge",
                "flunge",
                "lunge",
                "advance",
                "retreat",
                "parry_riposte"
            ]
        );
        assert!(detectors.iter().all(Detector::is_idle));
    }

    #[test]
    fn test_actions_cover_eight_recognized_actions() {
        let detectors = Detector::registry(&EngineConfig::default());
        let count: usize = detectors.iter().map(|d| d.actions().len()).sum();
        assert_eq!(count, 8);
    }
}
