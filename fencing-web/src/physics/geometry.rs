//! Point geometry in normalized landmark space
//!
//! Points are `(x, y)` tuples with both axes in 0-1 and y growing downward,
//! matching the pose estimator's output.

/// Euclidean distance between two points
pub fn distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    let dx = b.0 - a.0;
    let dy = b.1 - a.1;
    (dx * dx + dy * dy).sqrt()
}

/// Arithmetic mean of two points
pub fn midpoint(a: (f32, f32), b: (f32, f32)) -> (f32, f32) {
    ((a.0 + b.0) * 0.5, (a.1 + b.1) * 0.5)
}

/// Ratio guarded against a vanishing denominator
///
/// Used for every body-height normalisation: a collapsed skeleton reports 0
/// instead of an infinite or NaN ratio.
pub fn safe_ratio(numerator: f32, denominator: f32) -> f32 {
    if denominator.abs() < 1e-4 {
        0.0
    } else {
        numerator / denominator
    }
}
