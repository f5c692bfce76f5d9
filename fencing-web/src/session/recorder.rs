//! Recording gate
//!
//! Turns session state changes into commands for an external video
//! recorder: start when an attack begins, keep the clip once the fencer is
//! back en garde, throw it away if the session drops to idle.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::state::SessionState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecorderCommand {
    Start,
    Stop,
    Discard,
}

#[derive(Debug, Default)]
pub struct RecordingGate {
    recording: bool,
}

impl RecordingGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn on_transition(
        &mut self,
        from: SessionState,
        to: SessionState,
    ) -> Option<RecorderCommand> {
        let command = match (self.recording, to) {
            (false, SessionState::Lunging) => Some(RecorderCommand::Start),
            (true, SessionState::EnGarde) => Some(RecorderCommand::Stop),
            (true, SessionState::Idle) => Some(RecorderCommand::Discard),
            _ => None,
        };
        if let Some(command) = command {
            self.recording = command == RecorderCommand::Start;
            debug!(?from, ?to, ?command, "recorder command");
        }
        command
    }

    pub fn reset(&mut self) {
        self.recording = false;
    }
}
