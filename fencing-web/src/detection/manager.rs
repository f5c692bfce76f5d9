//! Detector manager
//!
//! Owns the frame buffer and the detector set. Every frame is fed to all
//! seven detectors with the same (current, history) view, and their results
//! are resolved to one:
//!
//! 1. highest-quality `Completed`
//! 2. otherwise highest-confidence `InProgress`
//! 3. otherwise `None`
//!
//! Ties go to the earlier detector in registration order.

use tracing::{info, warn};

use super::detector::{Detector, DETECTOR_COUNT};
use super::types::{Action, ActionResult};
use crate::config::EngineConfig;
use crate::physics::LandmarkSmoother;
use crate::pose::{FrameBuffer, Landmark, PoseFrame, LANDMARK_COUNT};

pub struct DetectorManager {
    buffer: FrameBuffer,
    detectors: [Detector; DETECTOR_COUNT],
    smoother: Option<LandmarkSmoother>,
    min_history: usize,
    last_results: [ActionResult; DETECTOR_COUNT],
}

impl DetectorManager {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            buffer: FrameBuffer::with_capacity(config.history_capacity),
            detectors: Detector::registry(config),
            smoother: config
                .smoothing
                .as_ref()
                .map(|s| LandmarkSmoother::new(s.min_cutoff, s.beta)),
            min_history: config.min_history,
            last_results: Default::default(),
        }
    }

    /// Buffer one frame and run every detector on it
    ///
    /// Fewer than 33 landmarks means tracking was lost: everything resets
    /// and the result is `None`.
    pub fn process_frame(&mut self, landmarks: &[Landmark], timestamp_ms: u64) -> ActionResult {
        if landmarks.len() < LANDMARK_COUNT {
            if !self.buffer.is_empty() {
                warn!(landmarks = landmarks.len(), "pose tracking lost, resetting detectors");
            }
            self.reset();
            return ActionResult::None;
        }

        let smoothed;
        let landmarks = match self.smoother.as_mut() {
            Some(smoother) => {
                smoothed = smoother.smooth(timestamp_ms, landmarks);
                &smoothed[..]
            }
            None => landmarks,
        };
        let Some(frame) = PoseFrame::new(landmarks, timestamp_ms) else {
            self.reset();
            return ActionResult::None;
        };
        self.buffer.push(frame);

        if self.buffer.history_len() < self.min_history {
            self.last_results = Default::default();
            return ActionResult::None;
        }

        let Self { buffer, detectors, last_results, .. } = self;
        let Some((current, history)) = buffer.snapshot() else {
            return ActionResult::None;
        };
        for (slot, detector) in last_results.iter_mut().zip(detectors.iter_mut()) {
            *slot = detector.detect(current, history);
        }

        let best = resolve(&last_results[..]);
        if let ActionResult::Completed { action, quality, duration_ms, .. } = &best {
            info!(action = action.name(), ?quality, duration_ms, "action completed");
        }
        best
    }

    /// Clear the buffer and return every detector to Idle
    pub fn reset(&mut self) {
        self.buffer.clear();
        for detector in self.detectors.iter_mut() {
            detector.reset();
        }
        if let Some(smoother) = self.smoother.as_mut() {
            smoother.reset();
        }
        self.last_results = Default::default();
    }

    /// In-progress results from the last processed frame
    pub fn get_in_progress_actions(&self) -> Vec<ActionResult> {
        self.last_results
            .iter()
            .filter(|r| r.is_in_progress())
            .cloned()
            .collect()
    }

    /// Every action the detector set can report, in registration order
    pub fn supported_actions(&self) -> Vec<Action> {
        self.detectors
            .iter()
            .flat_map(|d| d.actions().iter().copied())
            .collect()
    }

    pub fn all_idle(&self) -> bool {
        self.detectors.iter().all(Detector::is_idle)
    }

    pub fn latest_frame(&self) -> Option<&PoseFrame> {
        self.buffer.latest()
    }

    pub fn history_len(&self) -> usize {
        self.buffer.history_len()
    }
}

/// Pick the single result surfaced for a frame
pub fn resolve(results: &[ActionResult]) -> ActionResult {
    let best_completed = results
        .iter()
        .filter(|r| r.is_completed())
        .fold(None::<&ActionResult>, |best, r| match best {
            Some(b) if b.quality() >= r.quality() => Some(b),
            _ => Some(r),
        });
    if let Some(result) = best_completed {
        return result.clone();
    }

    results
        .iter()
        .filter(|r| r.is_in_progress())
        .fold(None::<&ActionResult>, |best, r| match best {
            Some(b) if b.confidence() >= r.confidence() => Some(b),
            _ => Some(r),
        })
        .cloned()
        .unwrap_or_default()
}
