//! Session events for the display, audio and recorder collaborators

use serde::{Deserialize, Serialize};

use super::form::Severity;
use super::state::SessionState;
use crate::detection::{Action, ActionQuality};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    StateChanged {
        from: SessionState,
        to: SessionState,
    },
    /// A repetition finished; `good` follows the quality tier, `good_form`
    /// the posture rules on the completing frame
    ActionCompleted {
        action: Action,
        quality: ActionQuality,
        good: bool,
        good_form: bool,
        duration_ms: u64,
        feedback: Option<String>,
    },
    ContinuousFeedback {
        message: String,
        severity: Severity,
    },
}

impl SessionEvent {
    /// Plain text for the audio collaborator, if the event should be spoken
    pub fn spoken_text(&self) -> Option<String> {
        match self {
            SessionEvent::StateChanged { to: SessionState::EnGarde, .. } => {
                Some("En garde".to_string())
            }
            SessionEvent::StateChanged { .. } => None,
            SessionEvent::ActionCompleted { action, quality, feedback, .. } => {
                let praise = match quality {
                    ActionQuality::Perfect => "Perfect",
                    ActionQuality::Good => "Good",
                    ActionQuality::Acceptable => "Okay",
                    ActionQuality::Poor => "Poor",
                };
                let mut text = format!("{praise} {}", action.name().to_lowercase());
                if let Some(feedback) = feedback {
                    text.push_str(". ");
                    text.push_str(feedback);
                }
                Some(text)
            }
            SessionEvent::ContinuousFeedback { message, .. } => Some(message.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spoken_completion() {
        let event = SessionEvent::ActionCompleted {
            action: Action::AdvanceLunge,
            quality: ActionQuality::Good,
            good: true,
            good_form: true,
            duration_ms: 500,
            feedback: Some("Reach further with the sword arm".to_string()),
        };
        assert_eq!(
            event.spoken_text().as_deref(),
            Some("Good advance lunge. Reach further with the sword arm")
        );
    }

    #[test]
    fn test_only_en_garde_transition_is_spoken() {
        let to_guard = SessionEvent::StateChanged {
            from: SessionState::Idle,
            to: SessionState::EnGarde,
        };
        let to_recovery = SessionEvent::StateChanged {
            from: SessionState::Lunging,
            to: SessionState::Recovery,
        };
        assert_eq!(to_guard.spoken_text().as_deref(), Some("En garde"));
        assert_eq!(to_recovery.spoken_text(), None);
    }

    #[test]
    fn test_event_json_shape() {
        let event = SessionEvent::ContinuousFeedback {
            message: "Keep your head up".to_string(),
            severity: Severity::Info,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "continuous_feedback");
        assert_eq!(json["severity"], "info");
    }
}
