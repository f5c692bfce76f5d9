//! Session state engine
//!
//! Sits on top of the detector manager and turns its per-frame results into
//! the four-state session view, continuous form feedback, events for the
//! audio layer and commands for the video recorder.
//!
//! ```text
//! Idle ──stance held──▶ EnGarde ──attack starts──▶ Lunging ──attack completes / timeout──▶ Recovery
//!  ▲                       ▲                                                                 │
//!  │                       └──────────────────────stance held────────────────────────────────┤
//!  └──────────────────────────────────────────────timeout────────────────────────────────────┘
//! ```
//!
//! Losing the pose drops any state to Idle and resets every detector.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::events::SessionEvent;
use super::form::{FormEvaluator, FormFeedback};
use super::recorder::{RecorderCommand, RecordingGate};
use super::state::SessionState;
use crate::config::EngineConfig;
use crate::detection::{Action, ActionResult, BodyMetrics, DetectorManager};
use crate::physics::{speed, velocity_2d, Stance};
use crate::pose::{Landmark, PoseFrame, LANDMARK_COUNT};

/// Everything produced for one input frame
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameOutput {
    pub state: SessionState,
    pub result: ActionResult,
    pub form: FormFeedback,
    pub events: Vec<SessionEvent>,
    pub recorder: Vec<RecorderCommand>,
}

pub struct SessionEngine {
    config: EngineConfig,
    manager: DetectorManager,
    form: FormEvaluator,
    recorder: RecordingGate,
    state: SessionState,
    state_since_ms: u64,
    /// Start of the current unbroken run of ready-stance frames
    stance_since_ms: Option<u64>,
    previous_frame: Option<PoseFrame>,
    /// Posture verdict on the frame of the most recent completed action
    last_attempt_form_ok: bool,
    last_feedback: Option<(String, u64)>,
}

impl SessionEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            manager: DetectorManager::new(&config),
            form: FormEvaluator::new(&config.form, config.handedness),
            recorder: RecordingGate::new(),
            state: SessionState::Idle,
            state_since_ms: 0,
            stance_since_ms: None,
            previous_frame: None,
            last_attempt_form_ok: false,
            last_feedback: None,
            config,
        }
    }

    /// Replace the configuration; all in-flight state is dropped
    pub fn reconfigure(&mut self, config: EngineConfig) {
        *self = Self::new(config);
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn last_attempt_form_ok(&self) -> bool {
        self.last_attempt_form_ok
    }

    pub fn manager(&self) -> &DetectorManager {
        &self.manager
    }

    pub fn supported_actions(&self) -> Vec<Action> {
        self.manager.supported_actions()
    }

    pub fn in_progress_actions(&self) -> Vec<ActionResult> {
        self.manager.get_in_progress_actions()
    }

    pub fn is_recording(&self) -> bool {
        self.recorder.is_recording()
    }

    pub fn reset(&mut self) {
        self.manager.reset();
        self.recorder.reset();
        self.state = SessionState::Idle;
        self.state_since_ms = 0;
        self.stance_since_ms = None;
        self.previous_frame = None;
        self.last_attempt_form_ok = false;
        self.last_feedback = None;
    }

    pub fn process_frame(&mut self, landmarks: &[Landmark], timestamp_ms: u64) -> FrameOutput {
        let result = self.manager.process_frame(landmarks, timestamp_ms);
        let mut out = FrameOutput {
            result,
            ..FrameOutput::default()
        };

        let tracked = if landmarks.len() >= LANDMARK_COUNT {
            self.manager.latest_frame().cloned()
        } else {
            None
        };
        let Some(frame) = tracked else {
            if self.state != SessionState::Idle {
                self.transition(SessionState::Idle, timestamp_ms, &mut out);
            }
            self.stance_since_ms = None;
            self.previous_frame = None;
            self.last_feedback = None;
            self.last_attempt_form_ok = false;
            out.state = self.state;
            out.form = FormFeedback::no_pose();
            return out;
        };

        let stance_held = self.update_stance(&frame);
        let attacking = out.result.action().is_some_and(|a| a.is_attack());
        let posture_state = if attacking { SessionState::Lunging } else { self.state };
        out.form = self.form.evaluate(&frame, posture_state);

        if let Some(next) = self.next_state(&out.result, stance_held, timestamp_ms) {
            self.transition(next, timestamp_ms, &mut out);
            // An attack can start and finish on the same frame
            if next == SessionState::Lunging && attack_finished(&out.result) {
                self.transition(SessionState::Recovery, timestamp_ms, &mut out);
            }
        }

        if let ActionResult::Completed { action, quality, feedback, duration_ms } = &out.result {
            self.last_attempt_form_ok = out.form.is_good_form;
            out.events.push(SessionEvent::ActionCompleted {
                action: *action,
                quality: *quality,
                good: quality.is_good(),
                good_form: out.form.is_good_form,
                duration_ms: *duration_ms,
                feedback: feedback.clone(),
            });
        }

        if self.state.is_active() {
            if let Some(event) = self.coaching(&out.form, timestamp_ms) {
                out.events.push(event);
            }
        }

        self.previous_frame = Some(frame);
        out.state = self.state;
        out
    }

    fn next_state(
        &self,
        result: &ActionResult,
        stance_held: bool,
        now: u64,
    ) -> Option<SessionState> {
        let cfg = &self.config.session;
        let in_state = now.saturating_sub(self.state_since_ms);
        match self.state {
            SessionState::Idle => stance_held.then_some(SessionState::EnGarde),
            SessionState::EnGarde => {
                let attack = result.action().is_some_and(|a| a.is_attack());
                attack.then_some(SessionState::Lunging)
            }
            SessionState::Lunging => {
                let done = attack_finished(result) || in_state > cfg.lunging_timeout_ms;
                done.then_some(SessionState::Recovery)
            }
            SessionState::Recovery => {
                if stance_held {
                    Some(SessionState::EnGarde)
                } else if in_state > cfg.recovery_timeout_ms {
                    Some(SessionState::Idle)
                } else {
                    None
                }
            }
        }
    }

    fn transition(&mut self, to: SessionState, now: u64, out: &mut FrameOutput) {
        let from = self.state;
        info!(from = from.name(), to = to.name(), "session state change");
        self.state = to;
        self.state_since_ms = now;
        if to == SessionState::Recovery {
            // the stance has to be re-established after the attack
            self.stance_since_ms = None;
        }
        out.events.push(SessionEvent::StateChanged { from, to });
        if let Some(command) = self.recorder.on_transition(from, to) {
            out.recorder.push(command);
        }
    }

    /// Track the ready-stance run; true once it has lasted the stabilization window
    fn update_stance(&mut self, frame: &PoseFrame) -> bool {
        let now = frame.timestamp_ms();
        if !self.stance_ready(frame) {
            self.stance_since_ms = None;
            return false;
        }
        let since = *self.stance_since_ms.get_or_insert(now);
        now.saturating_sub(since) >= self.config.session.stabilization_ms
    }

    /// Front knee in the en garde band and a still sword arm
    fn stance_ready(&self, frame: &PoseFrame) -> bool {
        let cfg = &self.config.session;
        let Some(previous) = self.previous_frame.as_ref() else {
            return false;
        };
        let stance = Stance::detect(frame, self.config.handedness);
        let knee = BodyMetrics::measure(frame, &stance).front_knee_angle;
        let wrist = stance.front_arm.wrist();
        let wrist_speed = speed(velocity_2d(
            previous.point(wrist),
            frame.point(wrist),
            frame.elapsed_since(previous),
        ));
        (cfg.stance_knee_min..=cfg.stance_knee_max).contains(&knee)
            && wrist_speed < cfg.stance_wrist_velocity
    }

    /// Continuous correction, repeated only when it changes or the cooldown has passed
    fn coaching(&mut self, form: &FormFeedback, now: u64) -> Option<SessionEvent> {
        let (Some(message), Some(severity)) = (form.message.as_ref(), form.severity) else {
            self.last_feedback = None;
            return None;
        };
        if let Some((last, at)) = &self.last_feedback {
            let cooldown = self.config.session.feedback_cooldown_ms;
            if last == message && now.saturating_sub(*at) < cooldown {
                return None;
            }
        }
        self.last_feedback = Some((message.clone(), now));
        Some(SessionEvent::ContinuousFeedback {
            message: message.clone(),
            severity,
        })
    }
}

impl Default for SessionEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

/// Completed attack, or an explicit recovery signal
fn attack_finished(result: &ActionResult) -> bool {
    match result {
        ActionResult::Completed { action, .. } => action.is_attack(),
        ActionResult::InProgress { action, .. } => *action == Action::Recovery,
        ActionResult::None => false,
    }
}
