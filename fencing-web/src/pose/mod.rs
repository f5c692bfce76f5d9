//! Pose module - landmark layout, frames and the rolling frame buffer
//!
//! Re-exports only. All logic in submodules.

mod buffer;
mod frame;
mod landmarks;

pub use buffer::{FrameBuffer, BUFFER_SIZE};
pub use frame::PoseFrame;
pub use landmarks::*;
