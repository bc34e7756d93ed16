//! Joint angle calculation using the dot product
//!
//! The angle at a vertex landmark B formed by neighbours A and C:
//! cos(θ) = (BA · BC) / (|BA| × |BC|)

use crate::types::{JointId, PoseFrame, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Angle reported when a segment has no length
pub const DEGENERATE_ANGLE_DEGREES: f64 = 180.0;

const MIN_SEGMENT_LENGTH: f64 = 1e-9;

/// Angle at `vertex` in degrees (0-180).
///
/// Returns 180° (straight) when `a` or `c` coincides with the vertex.
pub fn angle_between(a: Vec3, vertex: Vec3, c: Vec3) -> f64 {
    let ba = a - vertex;
    let bc = c - vertex;

    let mag_a = ba.norm();
    let mag_c = bc.norm();
    if mag_a < MIN_SEGMENT_LENGTH || mag_c < MIN_SEGMENT_LENGTH {
        return DEGENERATE_ANGLE_DEGREES;
    }

    let cos_angle = (ba.dot(bc) / (mag_a * mag_c)).clamp(-1.0, 1.0);
    cos_angle.acos().to_degrees()
}

/// One joint angle measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointAngleSample {
    pub joint: JointId,
    /// 0-180
    pub degrees: f64,
    /// Weakest of the three contributing landmark confidences
    pub confidence: f64,
    pub timestamp_micros: i64,
}

/// Computes joint angles from a (filtered) frame
#[derive(Debug, Clone, Copy, Default)]
pub struct JointAngleEngine {
    use_3d: bool,
}

impl JointAngleEngine {
    pub fn new(use_3d: bool) -> Self {
        Self { use_3d }
    }

    pub fn compute(&self, frame: &PoseFrame, joint: JointId) -> JointAngleSample {
        let (a, vertex, c) = joint.landmarks();
        let position = |lm| {
            if self.use_3d {
                frame.spatial(lm)
            } else {
                frame.planar(lm)
            }
        };

        JointAngleSample {
            joint,
            degrees: angle_between(position(a), position(vertex), position(c)),
            confidence: frame
                .confidence(a)
                .min(frame.confidence(vertex))
                .min(frame.confidence(c)),
            timestamp_micros: frame.capture_time_micros(),
        }
    }

    pub fn compute_all(
        &self,
        frame: &PoseFrame,
        joints: &[JointId],
    ) -> BTreeMap<JointId, JointAngleSample> {
        joints
            .iter()
            .map(|&joint| (joint, self.compute(frame, joint)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::fixtures::{standing_frame, with_confidence};
    use crate::types::BodyLandmark;

    #[test]
    fn test_right_angle() {
        let angle = angle_between(
            Vec3::planar(1.0, 0.0),
            Vec3::planar(0.0, 0.0),
            Vec3::planar(0.0, 1.0),
        );
        assert!((angle - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_colinear_points() {
        // Straight: neighbours on opposite sides of the vertex
        let straight = angle_between(
            Vec3::planar(0.0, 0.0),
            Vec3::planar(0.5, 0.0),
            Vec3::planar(1.0, 0.0),
        );
        assert!((straight - 180.0).abs() < 1e-9);

        // Folded: both neighbours on the same side
        let folded = angle_between(
            Vec3::planar(1.0, 0.0),
            Vec3::planar(0.0, 0.0),
            Vec3::planar(2.0, 0.0),
        );
        assert!(folded.abs() < 1e-9);
    }

    #[test]
    fn test_coincident_points_are_straight() {
        let b = Vec3::planar(0.3, 0.3);
        assert_eq!(angle_between(b, b, Vec3::planar(1.0, 1.0)), 180.0);
        assert_eq!(angle_between(Vec3::planar(1.0, 1.0), b, b), 180.0);
        assert_eq!(angle_between(b, b, b), 180.0);
    }

    #[test]
    fn test_three_dimensional_angle() {
        let angle = angle_between(
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
        );
        assert!((angle - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_standing_knees_are_nearly_straight() {
        let engine = JointAngleEngine::default();
        let frame = standing_frame(0, 1_000);
        let knee = engine.compute(&frame, JointId::LeftKnee);
        assert!(knee.degrees > 175.0, "{}", knee.degrees);
        assert_eq!(knee.timestamp_micros, 1_000);
    }

    #[test]
    fn test_confidence_is_weakest_link() {
        let engine = JointAngleEngine::default();
        let frame = with_confidence(&standing_frame(0, 0), &[BodyLandmark::LeftWrist], 0.3);
        assert_eq!(engine.compute(&frame, JointId::LeftElbow).confidence, 0.3);
        assert_eq!(engine.compute(&frame, JointId::RightElbow).confidence, 0.95);
    }

    #[test]
    fn test_compute_all_selected_joints() {
        let engine = JointAngleEngine::new(true);
        let angles = engine.compute_all(
            &standing_frame(0, 0),
            &[JointId::LeftHip, JointId::RightShoulder],
        );
        assert_eq!(angles.len(), 2);
        assert!(angles.contains_key(&JointId::LeftHip));
        assert!(angles.values().all(|s| (0.0..=180.0).contains(&s.degrees)));
    }
}
