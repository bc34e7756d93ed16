//! Landmark velocity estimation
//!
//! Finite differences between consecutive filtered frames, blended
//! exponentially with the previous estimate to suppress jitter. Positions are
//! aspect-corrected, so speeds are in image heights per second.

use crate::types::{BodyLandmark, PoseFrame};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Coarse speed bucket for display; never used in computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedCategory {
    Stationary,
    Slow,
    Moderate,
    Fast,
}

impl SpeedCategory {
    pub fn from_speed(speed: f64) -> Self {
        if speed < 0.05 {
            SpeedCategory::Stationary
        } else if speed < 0.3 {
            SpeedCategory::Slow
        } else if speed < 1.0 {
            SpeedCategory::Moderate
        } else {
            SpeedCategory::Fast
        }
    }
}

/// Velocity of one landmark
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VelocitySample {
    pub landmark: BodyLandmark,
    pub vx: f64,
    pub vy: f64,
    pub speed: f64,
    /// atan2(vy, vx) in [0, 360)
    pub direction_degrees: f64,
    pub confidence: f64,
    pub timestamp_micros: i64,
}

impl VelocitySample {
    pub fn category(&self) -> SpeedCategory {
        SpeedCategory::from_speed(self.speed)
    }
}

/// Per-landmark velocity with exponential smoothing
#[derive(Debug, Clone)]
pub struct VelocityEngine {
    /// Weight of the previous velocity (0 = raw, 1 = frozen)
    smoothing: f64,
    previous: HashMap<BodyLandmark, (f64, f64)>,
}

impl Default for VelocityEngine {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl VelocityEngine {
    pub fn new(smoothing: f64) -> Self {
        Self {
            smoothing: smoothing.clamp(0.0, 1.0),
            previous: HashMap::new(),
        }
    }

    /// Velocity of `landmark` between `previous` and `current`.
    ///
    /// Returns `None` when the frames are not strictly ordered in time; the
    /// smoothing state is then left untouched.
    pub fn compute(
        &mut self,
        current: &PoseFrame,
        previous: &PoseFrame,
        landmark: BodyLandmark,
    ) -> Option<VelocitySample> {
        let dt_micros = current.capture_time_micros() - previous.capture_time_micros();
        if dt_micros <= 0 {
            return None;
        }
        let dt = dt_micros as f64 / 1_000_000.0;

        let displacement = current.planar(landmark) - previous.planar(landmark);
        let raw = (displacement.x / dt, displacement.y / dt);

        let (vx, vy) = match self.previous.get(&landmark) {
            Some(&(px, py)) => (
                self.smoothing * px + (1.0 - self.smoothing) * raw.0,
                self.smoothing * py + (1.0 - self.smoothing) * raw.1,
            ),
            None => raw,
        };
        self.previous.insert(landmark, (vx, vy));

        Some(VelocitySample {
            landmark,
            vx,
            vy,
            speed: vx.hypot(vy),
            direction_degrees: vy.atan2(vx).to_degrees().rem_euclid(360.0),
            confidence: current.confidence(landmark).min(previous.confidence(landmark)),
            timestamp_micros: current.capture_time_micros(),
        })
    }

    /// Velocities of `landmarks`; empty without a previous frame
    pub fn compute_all(
        &mut self,
        current: &PoseFrame,
        previous: Option<&PoseFrame>,
        landmarks: &[BodyLandmark],
    ) -> BTreeMap<BodyLandmark, VelocitySample> {
        let Some(previous) = previous else {
            return BTreeMap::new();
        };
        landmarks
            .iter()
            .filter_map(|&lm| self.compute(current, previous, lm).map(|s| (lm, s)))
            .collect()
    }

    pub fn reset(&mut self) {
        self.previous.clear();
    }
}
