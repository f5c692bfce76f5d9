//! Detection module - per-action phase machines and the manager that runs them
//!
//! Re-exports only. All logic in submodules.

mod advance_lunge;
mod balestra;
mod detector;
mod flunge;
mod footwork;
mod lunge;
mod manager;
mod metrics;
mod parry_riposte;
mod types;

pub use advance_lunge::AdvanceLungeState;
pub use balestra::BalestraState;
pub use detector::{Detector, DETECTOR_COUNT};
pub use flunge::{FlungeState, CROSSOVER_MESSAGE};
pub use footwork::{FootworkState, StepDirection};
pub use lunge::LungeState;
pub use manager::{resolve, DetectorManager};
pub use metrics::{previous_frame, BodyMetrics, Motion, MIN_DETECTOR_HISTORY};
pub use parry_riposte::{ParryDirection, ParryRiposteState};
pub use types::{Action, ActionQuality, ActionResult};
