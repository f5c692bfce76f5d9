//! Coarse session state shown to the UI and audio layers

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Idle,
    EnGarde,
    Lunging,
    Recovery,
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "IDLE",
            SessionState::EnGarde => "EN GARDE",
            SessionState::Lunging => "LUNGING",
            SessionState::Recovery => "RECOVERY",
        }
    }

    /// States in which the fencer is actively working
    pub fn is_active(&self) -> bool {
        *self != SessionState::Idle
    }
}
