//! Session module - coarse session state, posture feedback, events and recording
//!
//! Re-exports only. All logic in submodules.

mod engine;
mod events;
mod form;
mod recorder;
mod state;

pub use engine::{FrameOutput, SessionEngine};
pub use events::SessionEvent;
pub use form::{FormEvaluator, FormFeedback, Joint, Severity};
pub use recorder::{RecorderCommand, RecordingGate};
pub use state::SessionState;
