//! Detection result types

use serde::{Deserialize, Serialize};

/// Recognizable fencing actions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Advance,
    Retreat,
    Lunge,
    AdvanceLunge,
    BalestraLunge,
    Flunge,
    Parry,
    Riposte,
    Recovery,
    EnGarde,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Advance => "ADVANCE",
            Action::Retreat => "RETREAT",
            Action::Lunge => "LUNGE",
            Action::AdvanceLunge => "ADVANCE LUNGE",
            Action::BalestraLunge => "BALESTRA LUNGE",
            Action::Flunge => "FLUNGE",
            Action::Parry => "PARRY",
            Action::Riposte => "RIPOSTE",
            Action::Recovery => "RECOVERY",
            Action::EnGarde => "EN GARDE",
        }
    }

    /// Attacks drive the session into the lunging state
    pub fn is_attack(&self) -> bool {
        matches!(
            self,
            Action::Lunge | Action::AdvanceLunge | Action::BalestraLunge | Action::Flunge
        )
    }
}

/// Execution quality of a completed action (ordered worst to best)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionQuality {
    Poor,
    Acceptable,
    Good,
    Perfect,
}

impl ActionQuality {
    /// Map a 0-3 checklist score onto a tier
    pub fn from_points(points: u8) -> Self {
        match points {
            0 => ActionQuality::Poor,
            1 => ActionQuality::Acceptable,
            2 => ActionQuality::Good,
            _ => ActionQuality::Perfect,
        }
    }

    /// Map a weighted 0-1 score onto a tier
    pub fn from_score(score: f32) -> Self {
        if score >= 0.85 {
            ActionQuality::Perfect
        } else if score >= 0.65 {
            ActionQuality::Good
        } else if score >= 0.4 {
            ActionQuality::Acceptable
        } else {
            ActionQuality::Poor
        }
    }

    /// Good and Perfect count as a good repetition
    pub fn is_good(&self) -> bool {
        *self >= ActionQuality::Good
    }
}

/// Per-detector, per-frame outcome
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionResult {
    #[default]
    None,
    InProgress {
        action: Action,
        confidence: f32,
        feedback: Option<String>,
    },
    Completed {
        action: Action,
        quality: ActionQuality,
        feedback: Option<String>,
        duration_ms: u64,
    },
}

impl ActionResult {
    pub fn in_progress(action: Action, confidence: f32) -> Self {
        ActionResult::InProgress {
            action,
            confidence: confidence.clamp(0.0, 1.0),
            feedback: None,
        }
    }

    pub fn completed(
        action: Action,
        quality: ActionQuality,
        feedback: Option<String>,
        duration_ms: u64,
    ) -> Self {
        ActionResult::Completed {
            action,
            quality,
            feedback,
            duration_ms,
        }
    }

    pub fn action(&self) -> Option<Action> {
        match self {
            ActionResult::None => None,
            ActionResult::InProgress { action, .. } | ActionResult::Completed { action, .. } => {
                Some(*action)
            }
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, ActionResult::None)
    }

    pub fn is_in_progress(&self) -> bool {
        matches!(self, ActionResult::InProgress { .. })
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, ActionResult::Completed { .. })
    }

    /// In-progress confidence; a completion counts as certain
    pub fn confidence(&self) -> f32 {
        match self {
            ActionResult::None => 0.0,
            ActionResult::InProgress { confidence, .. } => *confidence,
            ActionResult::Completed { .. } => 1.0,
        }
    }

    pub fn quality(&self) -> Option<ActionQuality> {
        match self {
            ActionResult::Completed { quality, .. } => Some(*quality),
            _ => None,
        }
    }

    pub fn feedback(&self) -> Option<&str> {
        match self {
            ActionResult::InProgress { feedback, .. }
            | ActionResult::Completed { feedback, .. } => feedback.as_deref(),
            ActionResult::None => None,
        }
    }
}
