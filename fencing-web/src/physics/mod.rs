//! Physics module - geometry, joint angles, velocity and stance resolution
//!
//! Re-exports only. All logic in submodules.

mod angles;
mod geometry;
mod one_euro;
mod stance;
mod velocity;

pub use angles::{angle_at_vertex, knee_angle, torso_lean};
pub use geometry::{distance, midpoint, safe_ratio};
pub use one_euro::{LandmarkSmoother, OneEuroFilter};
pub use stance::{Facing, Handedness, Side, Stance};
pub use velocity::{speed, velocity, velocity_2d, DEAD_ZONE};
