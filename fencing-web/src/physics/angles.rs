//! Joint angle calculation
//!
//! Every joint angle goes through [`angle_at_vertex`], which uses
//! `atan2(|cross|, dot)` of the two rays leaving the joint. This stays
//! accurate near 0° and 180° where the `acos` form loses precision.

/// Unsigned angle at `vertex` between rays vertex→p1 and vertex→p2, in degrees
///
/// Returns a value in [0, 180]:
/// - 90° = limb bent at a right angle
/// - 180° = fully straight
///
/// A zero-length ray is treated as straight.
pub fn angle_at_vertex(p1: (f32, f32), vertex: (f32, f32), p2: (f32, f32)) -> f32 {
    let v1 = (p1.0 - vertex.0, p1.1 - vertex.1);
    let v2 = (p2.0 - vertex.0, p2.1 - vertex.1);

    let mag1 = (v1.0 * v1.0 + v1.1 * v1.1).sqrt();
    let mag2 = (v2.0 * v2.0 + v2.1 * v2.1).sqrt();
    if mag1 < 0.0001 || mag2 < 0.0001 {
        return 180.0;
    }

    let cross = v1.0 * v2.1 - v1.1 * v2.0;
    let dot = v1.0 * v2.0 + v1.1 * v2.1;

    cross.abs().atan2(dot).to_degrees().clamp(0.0, 180.0)
}

/// Knee angle from hip, knee and ankle
pub fn knee_angle(hip: (f32, f32), knee: (f32, f32), ankle: (f32, f32)) -> f32 {
    angle_at_vertex(hip, knee, ankle)
}

/// Lean of the segment hip→shoulder away from vertical, in degrees (0 = upright)
pub fn torso_lean(shoulder_mid: (f32, f32), hip_mid: (f32, f32)) -> f32 {
    let dx = shoulder_mid.0 - hip_mid.0;
    // y grows downward, so an upright torso has the shoulders above the hips
    let dy = hip_mid.1 - shoulder_mid.1;
    if dx.abs() < 0.0001 && dy.abs() < 0.0001 {
        return 0.0;
    }
    dx.abs().atan2(dy).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_straight_leg() {
        let hip = (0.0, 0.0);
        let knee = (0.0, 0.5);
        let ankle = (0.0, 1.0);
        let angle = knee_angle(hip, knee, ankle);
        assert!((angle - 180.0).abs() < 1.0);
    }

    #[test]
    fn test_right_angle_knee() {
        let hip = (0.0, 0.0);
        let knee = (0.0, 0.5);
        let ankle = (0.5, 0.5);
        let angle = knee_angle(hip, knee, ankle);
        assert!((angle - 90.0).abs() < 1.0);
    }

    #[test]
    fn test_degenerate_ray_is_straight() {
        assert_eq!(angle_at_vertex((0.5, 0.5), (0.5, 0.5), (0.9, 0.1)), 180.0);
    }

    #[test]
    fn test_torso_lean() {
        assert!(torso_lean((0.5, 0.3), (0.5, 0.6)).abs() < 0.01);
        let lean = torso_lean((0.6, 0.4), (0.5, 0.5));
        assert!((lean - 45.0).abs() < 0.5);
    }

    proptest! {
        #[test]
        fn angle_is_bounded_and_deterministic(
            ax in 0.0f32..1.0, ay in 0.0f32..1.0,
            vx in 0.0f32..1.0, vy in 0.0f32..1.0,
            bx in 0.0f32..1.0, by in 0.0f32..1.0,
        ) {
            let first = angle_at_vertex((ax, ay), (vx, vy), (bx, by));
            let second = angle_at_vertex((ax, ay), (vx, vy), (bx, by));
            prop_assert!((0.0..=180.0).contains(&first));
            prop_assert_eq!(first.to_bits(), second.to_bits());
        }

        #[test]
        fn angle_is_symmetric_in_rays(
            ax in 0.0f32..1.0, ay in 0.0f32..1.0,
            vx in 0.0f32..1.0, vy in 0.0f32..1.0,
            bx in 0.0f32..1.0, by in 0.0f32..1.0,
        ) {
            let forward = angle_at_vertex((ax, ay), (vx, vy), (bx, by));
            let reversed = angle_at_vertex((bx, by), (vx, vy), (ax, ay));
            prop_assert!((forward - reversed).abs() < 1e-3);
        }
    }
}
