//! One timestamped pose snapshot

use super::landmarks::{Landmark, LANDMARK_COUNT};

/// Immutable pose snapshot: all 33 landmarks plus a monotonic timestamp (ms)
#[derive(Clone, Debug, PartialEq)]
pub struct PoseFrame {
    landmarks: [Landmark; LANDMARK_COUNT],
    timestamp_ms: u64,
}

impl PoseFrame {
    /// Build a frame from estimator output
    ///
    /// Returns `None` when fewer than 33 landmarks are supplied (tracking lost).
    /// Extra landmarks beyond the 33rd are ignored.
    pub fn new(landmarks: &[Landmark], timestamp_ms: u64) -> Option<Self> {
        if landmarks.len() < LANDMARK_COUNT {
            return None;
        }
        let mut store = [Landmark::default(); LANDMARK_COUNT];
        store.copy_from_slice(&landmarks[..LANDMARK_COUNT]);
        Some(Self {
            landmarks: store,
            timestamp_ms,
        })
    }

    pub fn timestamp_ms(&self) -> u64 {
        self.timestamp_ms
    }

    pub fn landmarks(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.landmarks
    }

    /// Planar position of a landmark by index
    pub fn point(&self, index: usize) -> (f32, f32) {
        self.landmarks[index].xy()
    }

    /// Signed milliseconds from `earlier` to this frame
    pub fn elapsed_since(&self, earlier: &PoseFrame) -> i64 {
        self.timestamp_ms as i64 - earlier.timestamp_ms as i64
    }

    /// Milliseconds since an absolute timestamp, saturating at zero
    pub fn ms_since(&self, timestamp_ms: u64) -> u64 {
        self.timestamp_ms.saturating_sub(timestamp_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_incomplete_pose() {
        let landmarks = vec![Landmark::default(); LANDMARK_COUNT - 1];
        assert!(PoseFrame::new(&landmarks, 0).is_none());
    }

    #[test]
    fn test_elapsed() {
        let landmarks = vec![Landmark::default(); LANDMARK_COUNT];
        let a = PoseFrame::new(&landmarks, 100).unwrap();
        let b = PoseFrame::new(&landmarks, 133).unwrap();
        assert_eq!(b.elapsed_since(&a), 33);
        assert_eq!(a.elapsed_since(&b), -33);
        assert_eq!(a.ms_since(200), 0);
    }
}
