//! Pluggable exercise analyzers
//!
//! Exercise-specific logic consumes [`MotionSnapshot`]s produced by the core
//! and keeps its own state; the core never reads anything back.

use crate::motion::analyzer::MotionSnapshot;
use crate::types::JointId;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// An external consumer of motion snapshots
pub trait ExerciseAnalyzer: Send {
    /// Stable identifier used as the key in session summaries
    fn name(&self) -> &str;

    fn observe(&mut self, snapshot: &MotionSnapshot);

    fn summary(&self) -> serde_json::Value;

    fn reset(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepetitionPhase {
    /// No confident extended sample seen yet
    Unknown,
    Extended,
    Flexed,
}

/// Counts flex/extend cycles of a single joint with hysteresis.
///
/// A repetition is an extended → flexed → extended cycle. Angles between the
/// two thresholds never change the phase, which keeps jitter around a single
/// threshold from producing phantom repetitions.
#[derive(Debug, Clone)]
pub struct RepetitionCounter {
    name: String,
    joint: JointId,
    /// At or below this angle the joint counts as flexed
    flexed_below: f64,
    /// At or above this angle the joint counts as extended
    extended_above: f64,
    min_confidence: f64,
    phase: RepetitionPhase,
    repetitions: u32,
    deepest_degrees: Option<f64>,
    current_deepest: Option<f64>,
}

impl RepetitionCounter {
    pub fn new(
        name: impl Into<String>,
        joint: JointId,
        flexed_below: f64,
        extended_above: f64,
    ) -> Self {
        Self {
            name: name.into(),
            joint,
            flexed_below,
            extended_above,
            min_confidence: 0.5,
            phase: RepetitionPhase::Unknown,
            repetitions: 0,
            deepest_degrees: None,
            current_deepest: None,
        }
    }

    /// Knee-driven squat counter
    pub fn squat() -> Self {
        Self::new("squat", JointId::LeftKnee, 100.0, 160.0)
    }

    /// Elbow-driven curl counter
    pub fn bicep_curl() -> Self {
        Self::new("bicep_curl", JointId::RightElbow, 60.0, 150.0)
    }

    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    pub fn repetitions(&self) -> u32 {
        self.repetitions
    }

    pub fn phase(&self) -> RepetitionPhase {
        self.phase
    }
}

impl ExerciseAnalyzer for RepetitionCounter {
    fn name(&self) -> &str {
        &self.name
    }

    fn observe(&mut self, snapshot: &MotionSnapshot) {
        let Some(sample) = snapshot.angles.get(&self.joint) else {
            return;
        };
        if sample.confidence < self.min_confidence {
            return;
        }

        let degrees = sample.degrees;
        if self.phase == RepetitionPhase::Flexed {
            self.current_deepest = Some(self.current_deepest.map_or(degrees, |d| d.min(degrees)));
        }

        // A cycle only starts from a confirmed extension
        if degrees <= self.flexed_below && self.phase == RepetitionPhase::Extended {
            self.phase = RepetitionPhase::Flexed;
            self.current_deepest = Some(degrees);
        } else if degrees >= self.extended_above {
            if self.phase == RepetitionPhase::Flexed {
                self.repetitions += 1;
                self.deepest_degrees = self.current_deepest.take();
            }
            self.phase = RepetitionPhase::Extended;
        }
    }

    fn summary(&self) -> serde_json::Value {
        json!({
            "joint": self.joint,
            "repetitions": self.repetitions,
            "phase": self.phase,
            "last_deepest_degrees": self.deepest_degrees,
        })
    }

    fn reset(&mut self) {
        self.phase = RepetitionPhase::Unknown;
        self.repetitions = 0;
        self.deepest_degrees = None;
        self.current_deepest = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::angles::JointAngleSample;
    use crate::types::fixtures::standing_frame;
    use std::collections::BTreeMap;

    fn snapshot(degrees: f64, confidence: f64) -> MotionSnapshot {
        let mut angles = BTreeMap::new();
        angles.insert(
            JointId::LeftKnee,
            JointAngleSample {
                joint: JointId::LeftKnee,
                degrees,
                confidence,
                timestamp_micros: 0,
            },
        );
        MotionSnapshot {
            filtered_frame: standing_frame(0, 0),
            angles,
            velocities: BTreeMap::new(),
            range_of_motion: BTreeMap::new(),
        }
    }

    #[test]
    fn test_counts_full_cycles() {
        let mut counter = RepetitionCounter::squat();
        for degrees in [170.0, 130.0, 90.0, 80.0, 120.0, 165.0, 95.0, 170.0] {
            counter.observe(&snapshot(degrees, 0.9));
        }
        assert_eq!(counter.repetitions(), 2);
        assert_eq!(counter.phase(), RepetitionPhase::Extended);
        assert_eq!(counter.summary()["last_deepest_degrees"], 95.0);
    }

    #[test]
    fn test_starting_flexed_does_not_count() {
        let mut counter = RepetitionCounter::squat();
        counter.observe(&snapshot(80.0, 0.9));
        assert_eq!(counter.phase(), RepetitionPhase::Unknown);
        counter.observe(&snapshot(170.0, 0.9));
        assert_eq!(counter.repetitions(), 0);
        assert_eq!(counter.phase(), RepetitionPhase::Extended);

        counter.observe(&snapshot(80.0, 0.9));
        counter.observe(&snapshot(170.0, 0.9));
        assert_eq!(counter.repetitions(), 1);
    }

    #[test]
    fn test_jitter_between_thresholds_is_ignored() {
        let mut counter = RepetitionCounter::squat();
        for degrees in [170.0, 150.0, 140.0, 155.0, 120.0, 159.0, 170.0] {
            counter.observe(&snapshot(degrees, 0.9));
        }
        assert_eq!(counter.repetitions(), 0);
    }

    #[test]
    fn test_low_confidence_samples_are_ignored() {
        let mut counter = RepetitionCounter::squat();
        counter.observe(&snapshot(170.0, 0.9));
        counter.observe(&snapshot(80.0, 0.2));
        counter.observe(&snapshot(170.0, 0.9));
        assert_eq!(counter.repetitions(), 0);
    }

    #[test]
    fn test_reset() {
        let mut counter = RepetitionCounter::squat();
        for degrees in [170.0, 80.0, 170.0] {
            counter.observe(&snapshot(degrees, 0.9));
        }
        assert_eq!(counter.repetitions(), 1);
        counter.reset();
        assert_eq!(counter.repetitions(), 0);
        assert_eq!(counter.phase(), RepetitionPhase::Unknown);
        assert_eq!(counter.name(), "squat");
    }
}
