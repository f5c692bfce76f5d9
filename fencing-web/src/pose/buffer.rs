//! Rolling pose buffer
//!
//! Keeps the last ~1s of frames (30 at 30 fps) in chronological order.
//! The newest frame is "current"; everything before it is the history
//! handed to detectors.

use std::collections::VecDeque;

use super::frame::PoseFrame;

/// Default number of frames retained
pub const BUFFER_SIZE: usize = 30;

/// Bounded FIFO of recent pose frames
pub struct FrameBuffer {
    frames: VecDeque<PoseFrame>,
    capacity: usize,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::with_capacity(BUFFER_SIZE)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            frames: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append a frame, evicting the oldest once capacity is exceeded
    pub fn push(&mut self, frame: PoseFrame) {
        self.frames.push_back(frame);
        while self.frames.len() > self.capacity {
            self.frames.pop_front();
        }
    }

    /// Current frame plus the trailing history (oldest first, current excluded)
    pub fn snapshot(&mut self) -> Option<(&PoseFrame, &[PoseFrame])> {
        self.frames.make_contiguous().split_last()
    }

    /// Number of history frames available to detectors
    pub fn history_len(&self) -> usize {
        self.frames.len().saturating_sub(1)
    }

    /// Most recent frame
    pub fn latest(&self) -> Option<&PoseFrame> {
        self.frames.back()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every frame (tracking lost)
    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}
