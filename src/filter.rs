//! Adaptive landmark smoothing
//!
//! One-euro low-pass filtering applied independently to every scalar channel
//! (x, y and z of each landmark). The cutoff frequency rises with the
//! estimated signal speed: smooth at rest, responsive during fast motion.

use crate::config::FilterConfig;
use crate::error::MotionError;
use crate::types::{Axis, LandmarkSample, PoseFrame};
use std::collections::HashMap;
use std::f64::consts::PI;

/// alpha = 1 / (1 + tau/dt), tau = 1/(2*pi*cutoff)
fn smoothing_factor(dt: f64, cutoff: f64) -> f64 {
    let r = 2.0 * PI * cutoff * dt;
    r / (r + 1.0)
}

/// Filter state for one scalar channel
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OneEuroChannel {
    x_prev: f64,
    dx_prev: f64,
    /// Time of the last accepted sample (seconds); `None` until the first sample
    t_prev: Option<f64>,
}

impl OneEuroChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter one sample taken at `t` seconds.
    ///
    /// The first sample passes through unchanged. A sample whose timestamp is
    /// not after the previous one returns the previous output and leaves the
    /// state untouched.
    pub fn filter(&mut self, t: f64, x: f64, config: &FilterConfig) -> f64 {
        let Some(t_prev) = self.t_prev else {
            self.x_prev = x;
            self.dx_prev = 0.0;
            self.t_prev = Some(t);
            return x;
        };

        let dt = t - t_prev;
        if dt <= 0.0 {
            return self.x_prev;
        }

        // Derivative estimate
        let a_d = smoothing_factor(dt, config.derivative_cutoff);
        let dx = (x - self.x_prev) / dt;
        let dx_hat = a_d * dx + (1.0 - a_d) * self.dx_prev;

        // Adaptive cutoff
        let cutoff = config.min_cutoff + config.beta * dx_hat.abs();
        let a = smoothing_factor(dt, cutoff);
        let x_hat = a * x + (1.0 - a) * self.x_prev;

        self.x_prev = x_hat;
        self.dx_prev = dx_hat;
        self.t_prev = Some(t);

        x_hat
    }

    /// Last filtered value, if any sample has been seen
    pub fn value(&self) -> Option<f64> {
        self.t_prev.map(|_| self.x_prev)
    }
}

/// Session-scoped smoother for whole pose frames.
///
/// Owns one [`OneEuroChannel`] per `(landmark id, axis)`; channels are created
/// lazily and never shared.
#[derive(Debug, Clone)]
pub struct AdaptiveLandmarkFilter {
    config: FilterConfig,
    channels: HashMap<(u8, Axis), OneEuroChannel>,
}

impl Default for AdaptiveLandmarkFilter {
    fn default() -> Self {
        Self::new(FilterConfig::default())
    }
}

impl AdaptiveLandmarkFilter {
    pub fn new(config: FilterConfig) -> Self {
        Self {
            config,
            channels: HashMap::new(),
        }
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Filter a single scalar channel
    pub fn filter_value(&mut self, landmark_id: u8, axis: Axis, t: f64, x: f64) -> f64 {
        if !self.config.enabled {
            return x;
        }
        self.channels
            .entry((landmark_id, axis))
            .or_default()
            .filter(t, x, &self.config)
    }

    /// Smooth every landmark of `frame`, timed by its capture clock.
    ///
    /// Confidence values pass through unchanged.
    pub fn filter_frame(&mut self, frame: &PoseFrame) -> Result<PoseFrame, MotionError> {
        if !self.config.enabled {
            return Ok(frame.clone());
        }

        let t = frame.capture_time_micros() as f64 / 1_000_000.0;
        let landmarks: Vec<LandmarkSample> = frame
            .landmarks()
            .iter()
            .map(|l| LandmarkSample {
                x: self.filter_value(l.id, Axis::X, t, l.x),
                y: self.filter_value(l.id, Axis::Y, t, l.y),
                z: self.filter_value(l.id, Axis::Z, t, l.z),
                ..*l
            })
            .collect();

        frame.with_landmarks(landmarks)
    }

    /// Number of live channels
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn reset(&mut self) {
        self.channels.clear();
    }
}
