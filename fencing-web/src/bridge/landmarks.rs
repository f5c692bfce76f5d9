//! Landmark intake from JavaScript
//!
//! Receives MediaPipe pose landmarks as a flat Float32Array, runs them
//! through the session engine and hands back the frame output as JSON.

use wasm_bindgen::prelude::*;

use super::session::with_session;
use crate::error::EngineError;
use crate::pose::{landmarks_from_flat, LANDMARK_COUNT};

/// Floats per landmark in the payload (x, y, z)
pub const FLOATS_PER_LANDMARK: usize = 3;

/// Length of a full-pose payload
pub const POSE_PAYLOAD_LEN: usize = LANDMARK_COUNT * FLOATS_PER_LANDMARK;

// ============================================================================
// WASM-BINDGEN ENTRY POINTS
// ============================================================================

/// Called from JavaScript with a flat Float32Array of 99 values
/// (33 landmarks × 3 coordinates: x, y, z) and the frame time in ms.
///
/// An empty array means the estimator found no pose this frame.
#[wasm_bindgen]
pub fn update_landmarks(data: &[f32], timestamp_ms: f64) -> Result<String, JsValue> {
    if !data.is_empty() && data.len() != POSE_PAYLOAD_LEN {
        web_sys::console::warn_1(
            &format!(
                "Invalid landmark data length: {} (expected {POSE_PAYLOAD_LEN}), treating as no pose",
                data.len()
            )
            .into(),
        );
    }
    Ok(process_payload(data, timestamp_ms)?)
}

// ============================================================================
// INTERNAL API (no wasm_bindgen)
// ============================================================================

/// Feed one payload to the shared engine and serialize the frame output
pub(crate) fn process_payload(data: &[f32], timestamp_ms: f64) -> Result<String, EngineError> {
    let landmarks = landmarks_from_flat(data);
    let timestamp = host_timestamp(timestamp_ms);
    let output = with_session(|engine| engine.process_frame(&landmarks, timestamp));
    Ok(serde_json::to_string(&output)?)
}

/// JS clocks are f64 milliseconds; negative and NaN clamp to zero
fn host_timestamp(timestamp_ms: f64) -> u64 {
    if timestamp_ms.is_finite() && timestamp_ms > 0.0 {
        timestamp_ms as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{FrameOutput, SessionState};
    use crate::synthetic::FencerPose;

    #[test]
    fn test_payload_round_trip() {
        let payload = FencerPose::en_garde(0.4).flat();
        assert_eq!(payload.len(), POSE_PAYLOAD_LEN);
        let json = process_payload(&payload, 16.7).unwrap();
        let output: FrameOutput = serde_json::from_str(&json).unwrap();
        assert_eq!(output.state, SessionState::Idle);
        assert!(output.form.is_good_form);
    }

    #[test]
    fn test_en_garde_over_the_bridge() {
        let payload = FencerPose::en_garde(0.4).flat();
        let mut last = FrameOutput::default();
        for i in 0..15 {
            let json = process_payload(&payload, i as f64 * 33.0).unwrap();
            last = serde_json::from_str(&json).unwrap();
        }
        assert_eq!(last.state, SessionState::EnGarde);
    }

    #[test]
    fn test_empty_payload_is_no_pose() {
        let json = process_payload(&[], 0.0).unwrap();
        let output: FrameOutput = serde_json::from_str(&json).unwrap();
        assert_eq!(output.state, SessionState::Idle);
        assert!(!output.form.is_good_form);
    }

    #[test]
    fn test_host_timestamp() {
        assert_eq!(host_timestamp(1234.9), 1234);
        assert_eq!(host_timestamp(-5.0), 0);
        assert_eq!(host_timestamp(f64::NAN), 0);
    }
}
