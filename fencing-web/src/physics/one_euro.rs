//! One Euro Filter - adaptive low-pass filter for landmark jitter
//!
//! Smooth when slow (stable en garde readings), responsive when fast
//! (lunges and ripostes). Optional pre-processing before frames are buffered.

use std::f32::consts::PI;

use crate::pose::{Landmark, LANDMARK_COUNT};

/// Adaptive low-pass filter: smooth at rest, responsive during motion
#[derive(Clone, Debug)]
pub struct OneEuroFilter {
    /// Minimum cutoff frequency (Hz) - lower = smoother at rest
    min_cutoff: f32,
    /// Speed coefficient - higher = less lag during fast motion
    beta: f32,
    /// Derivative cutoff frequency (Hz)
    d_cutoff: f32,

    // State
    x_prev: f32,
    dx_prev: f32,
    t_prev: f64,
    initialized: bool,
}

impl OneEuroFilter {
    pub fn new(min_cutoff: f32, beta: f32) -> Self {
        Self {
            min_cutoff,
            beta,
            d_cutoff: 1.0,
            x_prev: 0.0,
            dx_prev: 0.0,
            t_prev: 0.0,
            initialized: false,
        }
    }

    /// Fencing-tuned preset: blade-arm extensions are fast, footwork is slow
    pub fn for_fencing() -> Self {
        Self::new(1.2, 0.2)
    }

    fn smoothing_factor(t_e: f32, cutoff: f32) -> f32 {
        let r = 2.0 * PI * cutoff * t_e;
        r / (r + 1.0)
    }

    /// Filter a single value
    ///
    /// - `t`: timestamp in seconds
    /// - `x`: raw input value
    pub fn filter(&mut self, t: f64, x: f32) -> f32 {
        if !self.initialized {
            self.x_prev = x;
            self.t_prev = t;
            self.initialized = true;
            return x;
        }

        let t_e = (t - self.t_prev) as f32;
        if t_e <= 0.0 {
            return self.x_prev;
        }

        // 1. Estimate derivative (velocity)
        let a_d = Self::smoothing_factor(t_e, self.d_cutoff);
        let dx = (x - self.x_prev) / t_e;
        let dx_hat = a_d * dx + (1.0 - a_d) * self.dx_prev;

        // 2. Adaptive cutoff: more smoothing when slow, less when fast
        let cutoff = self.min_cutoff + self.beta * dx_hat.abs();
        let a = Self::smoothing_factor(t_e, cutoff);

        // 3. Apply filter
        let x_hat = a * x + (1.0 - a) * self.x_prev;

        self.x_prev = x_hat;
        self.dx_prev = dx_hat;
        self.t_prev = t;

        x_hat
    }

    pub fn reset(&mut self) {
        self.initialized = false;
        self.dx_prev = 0.0;
    }
}

impl Default for OneEuroFilter {
    fn default() -> Self {
        Self::for_fencing()
    }
}

/// One filter pair per landmark, applied to whole poses
pub struct LandmarkSmoother {
    filters: Vec<(OneEuroFilter, OneEuroFilter)>,
}

impl LandmarkSmoother {
    pub fn new(min_cutoff: f32, beta: f32) -> Self {
        let pair = (
            OneEuroFilter::new(min_cutoff, beta),
            OneEuroFilter::new(min_cutoff, beta),
        );
        Self {
            filters: vec![pair; LANDMARK_COUNT],
        }
    }

    /// Smooth x/y of each landmark; depth passes through untouched
    pub fn smooth(&mut self, timestamp_ms: u64, landmarks: &[Landmark]) -> Vec<Landmark> {
        let t = timestamp_ms as f64 / 1000.0;
        landmarks
            .iter()
            .zip(self.filters.iter_mut())
            .map(|(lm, (fx, fy))| Landmark {
                x: fx.filter(t, lm.x),
                y: fy.filter(t, lm.y),
                z: lm.z,
            })
            .collect()
    }

    pub fn reset(&mut self) {
        for (fx, fy) in self.filters.iter_mut() {
            fx.reset();
            fy.reset();
        }
    }
}
