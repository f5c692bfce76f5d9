//! Velocity between timestamped samples
//!
//! Detectors compare the current frame with the most recent history frame,
//! so velocity is always a two-sample difference scaled to units/second.

/// Velocity magnitudes below this are treated as zero (filters landmark jitter)
pub const DEAD_ZONE: f32 = 0.02;

/// Signed rate of change of one coordinate, in normalized units per second
///
/// Returns 0 when `delta_t_ms <= 0` (duplicate or out-of-order frames).
pub fn velocity(prev: f32, curr: f32, delta_t_ms: i64) -> f32 {
    if delta_t_ms <= 0 {
        return 0.0;
    }
    (curr - prev) * 1000.0 / delta_t_ms as f32
}

/// Per-axis velocity of a point, in normalized units per second
pub fn velocity_2d(prev: (f32, f32), curr: (f32, f32), delta_t_ms: i64) -> (f32, f32) {
    (
        velocity(prev.0, curr.0, delta_t_ms),
        velocity(prev.1, curr.1, delta_t_ms),
    )
}

/// Speed (magnitude of a 2D velocity) with dead zone applied
pub fn speed(v: (f32, f32)) -> f32 {
    let raw = (v.0 * v.0 + v.1 * v.1).sqrt();
    if raw < DEAD_ZONE {
        0.0
    } else {
        raw
    }
}
