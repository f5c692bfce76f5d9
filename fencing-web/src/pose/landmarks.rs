//! Landmark layout shared with the pose estimator
//!
//! MediaPipe Pose emits 33 landmarks per frame. The indices below are the
//! only contract between the estimator and the detectors.

use serde::{Deserialize, Serialize};

/// Number of landmarks in a complete pose
pub const LANDMARK_COUNT: usize = 33;

// ============================================================================
// LANDMARK INDICES (MediaPipe Pose - 33 total)
// ============================================================================

pub const NOSE: usize = 0;
pub const LEFT_EYE_INNER: usize = 1;
pub const LEFT_EYE: usize = 2;
pub const LEFT_EYE_OUTER: usize = 3;
pub const RIGHT_EYE_INNER: usize = 4;
pub const RIGHT_EYE: usize = 5;
pub const RIGHT_EYE_OUTER: usize = 6;
pub const LEFT_EAR: usize = 7;
pub const RIGHT_EAR: usize = 8;
pub const MOUTH_LEFT: usize = 9;
pub const MOUTH_RIGHT: usize = 10;
pub const LEFT_SHOULDER: usize = 11;
pub const RIGHT_SHOULDER: usize = 12;
pub const LEFT_ELBOW: usize = 13;
pub const RIGHT_ELBOW: usize = 14;
pub const LEFT_WRIST: usize = 15;
pub const RIGHT_WRIST: usize = 16;
pub const LEFT_PINKY: usize = 17;
pub const RIGHT_PINKY: usize = 18;
pub const LEFT_INDEX: usize = 19;
pub const RIGHT_INDEX: usize = 20;
pub const LEFT_THUMB: usize = 21;
pub const RIGHT_THUMB: usize = 22;
pub const LEFT_HIP: usize = 23;
pub const RIGHT_HIP: usize = 24;
pub const LEFT_KNEE: usize = 25;
pub const RIGHT_KNEE: usize = 26;
pub const LEFT_ANKLE: usize = 27;
pub const RIGHT_ANKLE: usize = 28;
pub const LEFT_HEEL: usize = 29;
pub const RIGHT_HEEL: usize = 30;
pub const LEFT_FOOT_INDEX: usize = 31;
pub const RIGHT_FOOT_INDEX: usize = 32;

// ============================================================================
// LANDMARK DATA STRUCTURE
// ============================================================================

/// A single landmark point (normalized coordinates)
///
/// `z` is carried for consumers that want relative depth; detection only
/// reads `x` and `y`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32, // 0-1 normalized
    pub y: f32, // 0-1 normalized
    #[serde(default)]
    pub z: f32, // Relative depth
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Planar position
    pub fn xy(&self) -> (f32, f32) {
        (self.x, self.y)
    }
}

/// Decode a flat `[x, y, z, x, y, z, ...]` payload into landmarks
///
/// A trailing partial triple is ignored, so a short payload yields fewer
/// than [`LANDMARK_COUNT`] landmarks and is treated downstream as "no pose".
pub fn landmarks_from_flat(data: &[f32]) -> Vec<Landmark> {
    data.chunks_exact(3)
        .map(|c| Landmark { x: c[0], y: c[1], z: c[2] })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_decode_full_pose() {
        let data: Vec<f32> = (0..LANDMARK_COUNT * 3).map(|i| i as f32).collect();
        let landmarks = landmarks_from_flat(&data);
        assert_eq!(landmarks.len(), LANDMARK_COUNT);
        assert_eq!(landmarks[RIGHT_WRIST], Landmark { x: 48.0, y: 49.0, z: 50.0 });
    }

    #[test]
    fn test_flat_decode_drops_partial_triple() {
        let landmarks = landmarks_from_flat(&[0.1, 0.2, 0.0, 0.3, 0.4]);
        assert_eq!(landmarks.len(), 1);
    }
}
