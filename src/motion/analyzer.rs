//! Motion analysis facade
//!
//! Keeps a rolling window of filtered frames and runs the angle, velocity and
//! range-of-motion engines against it for each new frame.

use crate::config::MotionConfig;
use crate::motion::angles::{JointAngleEngine, JointAngleSample};
use crate::motion::range::{RangeOfMotionRecord, RangeOfMotionTracker};
use crate::motion::velocity::{VelocityEngine, VelocitySample};
use crate::types::{BodyLandmark, JointId, PoseFrame};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

/// Motion signals derived from one accepted frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionSnapshot {
    pub filtered_frame: PoseFrame,
    pub angles: BTreeMap<JointId, JointAngleSample>,
    pub velocities: BTreeMap<BodyLandmark, VelocitySample>,
    /// Session-to-date range of motion, including this frame
    pub range_of_motion: BTreeMap<JointId, RangeOfMotionRecord>,
}

/// Stateful motion analyzer for one session
#[derive(Debug, Clone)]
pub struct MotionAnalyzer {
    config: MotionConfig,
    angles: JointAngleEngine,
    velocity: VelocityEngine,
    range: RangeOfMotionTracker,
    history: VecDeque<PoseFrame>,
}

impl Default for MotionAnalyzer {
    fn default() -> Self {
        Self::new(MotionConfig::default())
    }
}

impl MotionAnalyzer {
    pub fn new(config: MotionConfig) -> Self {
        Self {
            angles: JointAngleEngine::new(config.use_3d_angles),
            velocity: VelocityEngine::new(config.velocity_smoothing),
            range: RangeOfMotionTracker::new(config.rom_min_confidence),
            history: VecDeque::with_capacity(config.history_size),
            config,
        }
    }

    /// Analyze a filtered frame and append it to the history
    pub fn analyze(&mut self, filtered: PoseFrame) -> MotionSnapshot {
        let angles = self.angles.compute_all(&filtered, &self.config.joints);
        self.range.update_all(angles.values());

        let velocities = self.velocity.compute_all(
            &filtered,
            self.history.back(),
            &self.config.velocity_landmarks,
        );

        self.history.push_back(filtered.clone());
        while self.history.len() > self.config.history_size {
            self.history.pop_front();
        }

        MotionSnapshot {
            filtered_frame: filtered,
            angles,
            velocities,
            range_of_motion: self.range.records().clone(),
        }
    }

    /// Filtered frames, oldest first
    pub fn history(&self) -> &VecDeque<PoseFrame> {
        &self.history
    }

    pub fn range_of_motion(&self) -> &BTreeMap<JointId, RangeOfMotionRecord> {
        self.range.records()
    }

    pub fn reset(&mut self) {
        self.velocity.reset();
        self.range.reset();
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::fixtures::{shifted_frame, standing_frame};

    #[test]
    fn test_first_frame_has_angles_but_no_velocity() {
        let mut analyzer = MotionAnalyzer::default();
        let snapshot = analyzer.analyze(standing_frame(0, 0));
        assert_eq!(snapshot.angles.len(), JointId::ALL.len());
        assert!(snapshot.velocities.is_empty());
        assert_eq!(snapshot.range_of_motion.len(), JointId::ALL.len());
    }

    #[test]
    fn test_velocity_uses_previous_frame() {
        let mut analyzer = MotionAnalyzer::default();
        analyzer.analyze(standing_frame(0, 0));
        let snapshot = analyzer.analyze(shifted_frame(1, 100_000, 0.02, 0.0));

        assert_eq!(snapshot.velocities.len(), 33);
        let nose = &snapshot.velocities[&BodyLandmark::Nose];
        assert!((nose.vx - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut analyzer = MotionAnalyzer::new(MotionConfig {
            history_size: 4,
            ..MotionConfig::default()
        });
        for i in 0..10 {
            analyzer.analyze(standing_frame(i, i as i64 * 33_333));
        }
        assert_eq!(analyzer.history().len(), 4);
        assert_eq!(analyzer.history().front().map(|f| f.frame_index()), Some(6));
    }

    #[test]
    fn test_selected_joints_only() {
        let mut analyzer = MotionAnalyzer::new(MotionConfig {
            joints: vec![JointId::LeftKnee],
            velocity_landmarks: vec![BodyLandmark::LeftKnee],
            ..MotionConfig::default()
        });
        analyzer.analyze(standing_frame(0, 0));
        let snapshot = analyzer.analyze(standing_frame(1, 33_333));
        assert_eq!(snapshot.angles.keys().copied().collect::<Vec<_>>(), vec![JointId::LeftKnee]);
        assert_eq!(snapshot.velocities.len(), 1);
    }

    #[test]
    fn test_reset() {
        let mut analyzer = MotionAnalyzer::default();
        analyzer.analyze(standing_frame(0, 0));
        analyzer.reset();
        assert!(analyzer.history().is_empty());
        assert!(analyzer.range_of_motion().is_empty());
        assert!(analyzer.analyze(standing_frame(1, 33_333)).velocities.is_empty());
    }
}
