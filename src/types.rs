//! Core types for the Synheart Motion pipeline
//!
//! This module defines the data structures that flow through each stage of the
//! pipeline: landmark samples, pose frames, joint definitions and the small
//! vector type used by the geometry code.

use crate::error::MotionError;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// Number of landmarks in a body pose frame
pub const LANDMARK_COUNT: usize = 33;

/// Body landmark topology produced by the pose-detection model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum BodyLandmark {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl BodyLandmark {
    /// All landmarks, ordered by id
    pub const ALL: [BodyLandmark; LANDMARK_COUNT] = [
        BodyLandmark::Nose,
        BodyLandmark::LeftEyeInner,
        BodyLandmark::LeftEye,
        BodyLandmark::LeftEyeOuter,
        BodyLandmark::RightEyeInner,
        BodyLandmark::RightEye,
        BodyLandmark::RightEyeOuter,
        BodyLandmark::LeftEar,
        BodyLandmark::RightEar,
        BodyLandmark::MouthLeft,
        BodyLandmark::MouthRight,
        BodyLandmark::LeftShoulder,
        BodyLandmark::RightShoulder,
        BodyLandmark::LeftElbow,
        BodyLandmark::RightElbow,
        BodyLandmark::LeftWrist,
        BodyLandmark::RightWrist,
        BodyLandmark::LeftPinky,
        BodyLandmark::RightPinky,
        BodyLandmark::LeftIndex,
        BodyLandmark::RightIndex,
        BodyLandmark::LeftThumb,
        BodyLandmark::RightThumb,
        BodyLandmark::LeftHip,
        BodyLandmark::RightHip,
        BodyLandmark::LeftKnee,
        BodyLandmark::RightKnee,
        BodyLandmark::LeftAnkle,
        BodyLandmark::RightAnkle,
        BodyLandmark::LeftHeel,
        BodyLandmark::RightHeel,
        BodyLandmark::LeftFootIndex,
        BodyLandmark::RightFootIndex,
    ];

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    /// The same landmark on the opposite body side; the nose mirrors to itself
    pub fn mirror(self) -> BodyLandmark {
        use BodyLandmark::*;
        match self {
            Nose => Nose,
            LeftEyeInner => RightEyeInner,
            LeftEye => RightEye,
            LeftEyeOuter => RightEyeOuter,
            RightEyeInner => LeftEyeInner,
            RightEye => LeftEye,
            RightEyeOuter => LeftEyeOuter,
            LeftEar => RightEar,
            RightEar => LeftEar,
            MouthLeft => MouthRight,
            MouthRight => MouthLeft,
            LeftShoulder => RightShoulder,
            RightShoulder => LeftShoulder,
            LeftElbow => RightElbow,
            RightElbow => LeftElbow,
            LeftWrist => RightWrist,
            RightWrist => LeftWrist,
            LeftPinky => RightPinky,
            RightPinky => LeftPinky,
            LeftIndex => RightIndex,
            RightIndex => LeftIndex,
            LeftThumb => RightThumb,
            RightThumb => LeftThumb,
            LeftHip => RightHip,
            RightHip => LeftHip,
            LeftKnee => RightKnee,
            RightKnee => LeftKnee,
            LeftAnkle => RightAnkle,
            RightAnkle => LeftAnkle,
            LeftHeel => RightHeel,
            RightHeel => LeftHeel,
            LeftFootIndex => RightFootIndex,
            RightFootIndex => LeftFootIndex,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BodyLandmark::Nose => "nose",
            BodyLandmark::LeftEyeInner => "left_eye_inner",
            BodyLandmark::LeftEye => "left_eye",
            BodyLandmark::LeftEyeOuter => "left_eye_outer",
            BodyLandmark::RightEyeInner => "right_eye_inner",
            BodyLandmark::RightEye => "right_eye",
            BodyLandmark::RightEyeOuter => "right_eye_outer",
            BodyLandmark::LeftEar => "left_ear",
            BodyLandmark::RightEar => "right_ear",
            BodyLandmark::MouthLeft => "mouth_left",
            BodyLandmark::MouthRight => "mouth_right",
            BodyLandmark::LeftShoulder => "left_shoulder",
            BodyLandmark::RightShoulder => "right_shoulder",
            BodyLandmark::LeftElbow => "left_elbow",
            BodyLandmark::RightElbow => "right_elbow",
            BodyLandmark::LeftWrist => "left_wrist",
            BodyLandmark::RightWrist => "right_wrist",
            BodyLandmark::LeftPinky => "left_pinky",
            BodyLandmark::RightPinky => "right_pinky",
            BodyLandmark::LeftIndex => "left_index",
            BodyLandmark::RightIndex => "right_index",
            BodyLandmark::LeftThumb => "left_thumb",
            BodyLandmark::RightThumb => "right_thumb",
            BodyLandmark::LeftHip => "left_hip",
            BodyLandmark::RightHip => "right_hip",
            BodyLandmark::LeftKnee => "left_knee",
            BodyLandmark::RightKnee => "right_knee",
            BodyLandmark::LeftAnkle => "left_ankle",
            BodyLandmark::RightAnkle => "right_ankle",
            BodyLandmark::LeftHeel => "left_heel",
            BodyLandmark::RightHeel => "right_heel",
            BodyLandmark::LeftFootIndex => "left_foot_index",
            BodyLandmark::RightFootIndex => "right_foot_index",
        }
    }
}

/// Scalar channel of a landmark position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];
}

/// Coordinate space of landmark x/y values
///
/// `z` is a relative, unit-less depth estimate in both spaces and is never rescaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateSpace {
    /// x/y in source image pixels
    Pixel,
    /// x/y in 0-1, resolution independent
    #[default]
    Normalized,
}

/// A single landmark detection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandmarkSample {
    /// Landmark id (0-32)
    pub id: u8,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Detection confidence (0-1)
    pub confidence: f64,
}

impl LandmarkSample {
    pub fn new(id: u8, x: f64, y: f64, z: f64, confidence: f64) -> Self {
        Self {
            id,
            x,
            y,
            z,
            confidence,
        }
    }

    /// Whether the landmark confidence reaches `threshold`
    pub fn is_visible(&self, threshold: f64) -> bool {
        self.confidence >= threshold
    }

    pub fn axis(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.z.is_finite()
            && self.confidence.is_finite()
    }
}

/// Minimal 3-component vector used by the geometry code.
///
/// Planar computations use `z = 0`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub const fn planar(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    pub fn dot(self, other: Vec3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn norm(self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn distance(self, other: Vec3) -> f64 {
        (self - other).norm()
    }

    pub fn midpoint(self, other: Vec3) -> Vec3 {
        (self + other) * 0.5
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: f64) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// An immutable, fixed-size set of landmarks captured at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PoseFrameFields")]
pub struct PoseFrame {
    frame_index: u64,
    capture_time_micros: i64,
    delta_time_micros: Option<i64>,
    image_width: u32,
    image_height: u32,
    coordinate_space: CoordinateSpace,
    landmarks: Vec<LandmarkSample>,
}

#[derive(Deserialize)]
struct PoseFrameFields {
    frame_index: u64,
    capture_time_micros: i64,
    delta_time_micros: Option<i64>,
    image_width: u32,
    image_height: u32,
    #[serde(default)]
    coordinate_space: CoordinateSpace,
    landmarks: Vec<LandmarkSample>,
}

impl TryFrom<PoseFrameFields> for PoseFrame {
    type Error = MotionError;

    fn try_from(fields: PoseFrameFields) -> Result<Self, Self::Error> {
        PoseFrame::new(
            fields.frame_index,
            fields.capture_time_micros,
            fields.delta_time_micros,
            (fields.image_width, fields.image_height),
            fields.coordinate_space,
            fields.landmarks,
        )
    }
}

impl PoseFrame {
    /// Build a frame, ordering landmarks by id.
    ///
    /// Fails unless exactly one finite sample exists for every id in `0..33`
    /// and both image dimensions are positive.
    pub fn new(
        frame_index: u64,
        capture_time_micros: i64,
        delta_time_micros: Option<i64>,
        image_size: (u32, u32),
        coordinate_space: CoordinateSpace,
        mut landmarks: Vec<LandmarkSample>,
    ) -> Result<Self, MotionError> {
        let (image_width, image_height) = image_size;
        if image_width == 0 || image_height == 0 {
            return Err(MotionError::InvalidFrame(format!(
                "image dimensions must be positive, got {image_width}x{image_height}"
            )));
        }
        if landmarks.len() != LANDMARK_COUNT {
            return Err(MotionError::InvalidFrame(format!(
                "expected {LANDMARK_COUNT} landmarks, got {}",
                landmarks.len()
            )));
        }

        landmarks.sort_by_key(|l| l.id);
        for (expected, sample) in landmarks.iter().enumerate() {
            if sample.id as usize != expected {
                return Err(MotionError::InvalidFrame(format!(
                    "landmark ids must cover 0..{LANDMARK_COUNT} exactly once (missing or duplicate id near {expected})"
                )));
            }
            if !sample.is_finite() {
                return Err(MotionError::InvalidFrame(format!(
                    "landmark {} has a non-finite value",
                    sample.id
                )));
            }
        }

        Ok(Self {
            frame_index,
            capture_time_micros,
            delta_time_micros,
            image_width,
            image_height,
            coordinate_space,
            landmarks,
        })
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    pub fn capture_time_micros(&self) -> i64 {
        self.capture_time_micros
    }

    /// Time since the previous frame of the session; `None` only for the first frame
    pub fn delta_time_micros(&self) -> Option<i64> {
        self.delta_time_micros
    }

    pub fn image_size(&self) -> (u32, u32) {
        (self.image_width, self.image_height)
    }

    pub fn coordinate_space(&self) -> CoordinateSpace {
        self.coordinate_space
    }

    pub fn landmarks(&self) -> &[LandmarkSample] {
        &self.landmarks
    }

    pub fn landmark(&self, landmark: BodyLandmark) -> &LandmarkSample {
        &self.landmarks[landmark as usize]
    }

    pub fn confidence(&self, landmark: BodyLandmark) -> f64 {
        self.landmark(landmark).confidence
    }

    /// Width divided by height of the source image
    pub fn aspect_ratio(&self) -> f64 {
        self.image_width as f64 / self.image_height as f64
    }

    /// Mean confidence over all landmarks
    pub fn mean_confidence(&self) -> f64 {
        self.landmarks.iter().map(|l| l.confidence).sum::<f64>() / LANDMARK_COUNT as f64
    }

    /// Aspect-corrected planar position, in units of image height
    pub fn planar(&self, landmark: BodyLandmark) -> Vec3 {
        let sample = self.landmark(landmark);
        match self.coordinate_space {
            CoordinateSpace::Normalized => Vec3::planar(sample.x * self.aspect_ratio(), sample.y),
            CoordinateSpace::Pixel => {
                let h = self.image_height as f64;
                Vec3::planar(sample.x / h, sample.y / h)
            }
        }
    }

    /// Aspect-corrected position with the untouched depth estimate
    pub fn spatial(&self, landmark: BodyLandmark) -> Vec3 {
        let planar = self.planar(landmark);
        Vec3::new(planar.x, planar.y, self.landmark(landmark).z)
    }

    /// Convert to normalized coordinates. `z` is copied as-is.
    pub fn to_normalized(&self) -> PoseFrame {
        match self.coordinate_space {
            CoordinateSpace::Normalized => self.clone(),
            CoordinateSpace::Pixel => {
                let w = self.image_width as f64;
                let h = self.image_height as f64;
                let landmarks = self
                    .landmarks
                    .iter()
                    .map(|l| LandmarkSample {
                        x: l.x / w,
                        y: l.y / h,
                        ..*l
                    })
                    .collect();
                PoseFrame {
                    coordinate_space: CoordinateSpace::Normalized,
                    landmarks,
                    ..self.clone()
                }
            }
        }
    }

    /// Copy of this frame carrying replacement landmark samples
    pub fn with_landmarks(&self, landmarks: Vec<LandmarkSample>) -> Result<PoseFrame, MotionError> {
        PoseFrame::new(
            self.frame_index,
            self.capture_time_micros,
            self.delta_time_micros,
            self.image_size(),
            self.coordinate_space,
            landmarks,
        )
    }
}

/// Anatomical joints whose angle is measured at a vertex landmark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JointId {
    LeftElbow,
    RightElbow,
    LeftShoulder,
    RightShoulder,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl JointId {
    pub const ALL: [JointId; 10] = [
        JointId::LeftElbow,
        JointId::RightElbow,
        JointId::LeftShoulder,
        JointId::RightShoulder,
        JointId::LeftHip,
        JointId::RightHip,
        JointId::LeftKnee,
        JointId::RightKnee,
        JointId::LeftAnkle,
        JointId::RightAnkle,
    ];

    /// `(a, vertex, c)` landmarks forming the joint angle
    pub fn landmarks(&self) -> (BodyLandmark, BodyLandmark, BodyLandmark) {
        use BodyLandmark::*;
        match self {
            JointId::LeftElbow => (LeftShoulder, LeftElbow, LeftWrist),
            JointId::RightElbow => (RightShoulder, RightElbow, RightWrist),
            JointId::LeftShoulder => (LeftElbow, LeftShoulder, LeftHip),
            JointId::RightShoulder => (RightElbow, RightShoulder, RightHip),
            JointId::LeftHip => (LeftShoulder, LeftHip, LeftKnee),
            JointId::RightHip => (RightShoulder, RightHip, RightKnee),
            JointId::LeftKnee => (LeftHip, LeftKnee, LeftAnkle),
            JointId::RightKnee => (RightHip, RightKnee, RightAnkle),
            JointId::LeftAnkle => (LeftKnee, LeftAnkle, LeftFootIndex),
            JointId::RightAnkle => (RightKnee, RightAnkle, RightFootIndex),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JointId::LeftElbow => "left_elbow",
            JointId::RightElbow => "right_elbow",
            JointId::LeftShoulder => "left_shoulder",
            JointId::RightShoulder => "right_shoulder",
            JointId::LeftHip => "left_hip",
            JointId::RightHip => "right_hip",
            JointId::LeftKnee => "left_knee",
            JointId::RightKnee => "right_knee",
            JointId::LeftAnkle => "left_ankle",
            JointId::RightAnkle => "right_ankle",
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Canonical standing-human frame shared by the module tests.

    use super::*;

    /// Normalized `(x, y)` of a person standing facing the camera, indexed by landmark id
    pub const STANDING_POSE: [(f64, f64); LANDMARK_COUNT] = [
        (0.50, 0.15), // nose
        (0.51, 0.14),
        (0.52, 0.14),
        (0.53, 0.14),
        (0.49, 0.14),
        (0.48, 0.14),
        (0.47, 0.14),
        (0.54, 0.15), // left ear
        (0.46, 0.15),
        (0.51, 0.17), // mouth
        (0.49, 0.17),
        (0.58, 0.25), // left shoulder
        (0.42, 0.25),
        (0.60, 0.38), // left elbow
        (0.40, 0.38),
        (0.61, 0.49), // left wrist
        (0.39, 0.49),
        (0.61, 0.52), // left pinky
        (0.39, 0.52),
        (0.61, 0.53),
        (0.39, 0.53),
        (0.60, 0.51),
        (0.40, 0.51),
        (0.55, 0.52), // left hip
        (0.45, 0.52),
        (0.55, 0.70), // left knee
        (0.45, 0.70),
        (0.55, 0.88), // left ankle
        (0.45, 0.88),
        (0.55, 0.90), // left heel
        (0.45, 0.90),
        (0.56, 0.91), // left foot index
        (0.44, 0.91),
    ];

    pub fn standing_landmarks(confidence: f64) -> Vec<LandmarkSample> {
        STANDING_POSE
            .iter()
            .enumerate()
            .map(|(id, &(x, y))| LandmarkSample::new(id as u8, x, y, 0.0, confidence))
            .collect()
    }

    pub fn standing_frame(frame_index: u64, capture_time_micros: i64) -> PoseFrame {
        frame_from(standing_landmarks(0.95), frame_index, capture_time_micros)
    }

    pub fn frame_from(
        landmarks: Vec<LandmarkSample>,
        frame_index: u64,
        capture_time_micros: i64,
    ) -> PoseFrame {
        let delta = if frame_index == 0 { None } else { Some(33_333) };
        PoseFrame::new(
            frame_index,
            capture_time_micros,
            delta,
            (1000, 1000),
            CoordinateSpace::Normalized,
            landmarks,
        )
        .unwrap()
    }

    /// Standing frame with every landmark shifted by `(dx, dy)`
    pub fn shifted_frame(
        frame_index: u64,
        capture_time_micros: i64,
        dx: f64,
        dy: f64,
    ) -> PoseFrame {
        let landmarks = standing_landmarks(0.95)
            .into_iter()
            .map(|l| LandmarkSample {
                x: l.x + dx,
                y: l.y + dy,
                ..l
            })
            .collect();
        frame_from(landmarks, frame_index, capture_time_micros)
    }

    /// Standing frame with selected landmarks forced to a confidence
    pub fn with_confidence(
        frame: &PoseFrame,
        landmarks: &[BodyLandmark],
        confidence: f64,
    ) -> PoseFrame {
        let samples = frame
            .landmarks()
            .iter()
            .map(|l| {
                if landmarks.iter().any(|lm| lm.id() == l.id) {
                    LandmarkSample { confidence, ..*l }
                } else {
                    *l
                }
            })
            .collect();
        frame.with_landmarks(samples).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_landmark_ids_round_trip() {
        for (i, landmark) in BodyLandmark::ALL.iter().enumerate() {
            assert_eq!(landmark.id() as usize, i);
            assert_eq!(BodyLandmark::from_id(i as u8), Some(*landmark));
        }
        assert_eq!(BodyLandmark::from_id(33), None);
    }

    #[test]
    fn test_mirror_is_an_involution() {
        for landmark in BodyLandmark::ALL {
            assert_eq!(landmark.mirror().mirror(), landmark);
        }
        assert_eq!(BodyLandmark::LeftKnee.mirror(), BodyLandmark::RightKnee);
        assert_eq!(BodyLandmark::Nose.mirror(), BodyLandmark::Nose);
    }

    #[test]
    fn test_frame_sorts_landmarks_by_id() {
        let mut landmarks = standing_landmarks(0.9);
        landmarks.reverse();
        let frame = PoseFrame::new(
            0,
            0,
            None,
            (640, 480),
            CoordinateSpace::Normalized,
            landmarks,
        )
        .unwrap();
        assert_eq!(frame.landmark(BodyLandmark::Nose).id, 0);
        assert_eq!(frame.landmark(BodyLandmark::RightFootIndex).id, 32);
    }

    #[test]
    fn test_frame_rejects_wrong_landmark_count() {
        let mut landmarks = standing_landmarks(0.9);
        landmarks.pop();
        let result = PoseFrame::new(0, 0, None, (640, 480), CoordinateSpace::Normalized, landmarks);
        assert!(matches!(result, Err(MotionError::InvalidFrame(_))));
    }

    #[test]
    fn test_frame_rejects_duplicate_ids() {
        let mut landmarks = standing_landmarks(0.9);
        landmarks[5].id = 4;
        let result = PoseFrame::new(0, 0, None, (640, 480), CoordinateSpace::Normalized, landmarks);
        assert!(result.is_err());
    }

    #[test]
    fn test_frame_rejects_non_finite_values() {
        let mut landmarks = standing_landmarks(0.9);
        landmarks[11].x = f64::NAN;
        let result = PoseFrame::new(0, 0, None, (640, 480), CoordinateSpace::Normalized, landmarks);
        assert!(result.is_err());
    }

    #[test]
    fn test_normalization_preserves_depth() {
        let landmarks = standing_landmarks(0.9)
            .into_iter()
            .map(|l| LandmarkSample {
                x: l.x * 640.0,
                y: l.y * 480.0,
                z: -0.25,
                ..l
            })
            .collect();
        let pixel = PoseFrame::new(
            3,
            100,
            Some(33_000),
            (640, 480),
            CoordinateSpace::Pixel,
            landmarks,
        )
        .unwrap();
        let normalized = pixel.to_normalized();

        assert_eq!(normalized.coordinate_space(), CoordinateSpace::Normalized);
        let nose = normalized.landmark(BodyLandmark::Nose);
        assert!((nose.x - 0.50).abs() < 1e-9);
        assert!((nose.y - 0.15).abs() < 1e-9);
        assert_eq!(nose.z, -0.25);
        assert_eq!(normalized.frame_index(), 3);
        assert_eq!(normalized.delta_time_micros(), Some(33_000));
    }

    #[test]
    fn test_planar_is_identical_across_spaces() {
        let landmarks = standing_landmarks(0.9)
            .into_iter()
            .map(|l| LandmarkSample {
                x: l.x * 640.0,
                y: l.y * 480.0,
                ..l
            })
            .collect();
        let pixel =
            PoseFrame::new(0, 0, None, (640, 480), CoordinateSpace::Pixel, landmarks).unwrap();
        let normalized = pixel.to_normalized();

        let a = pixel.planar(BodyLandmark::LeftWrist);
        let b = normalized.planar(BodyLandmark::LeftWrist);
        assert!((a.x - b.x).abs() < 1e-9);
        assert!((a.y - b.y).abs() < 1e-9);
    }

    #[test]
    fn test_frame_deserialization_validates() {
        let frame = standing_frame(1, 33_333);
        let json = serde_json::to_string(&frame).unwrap();
        let parsed: PoseFrame = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, frame);

        let broken = json.replacen("\"id\":0", "\"id\":1", 1);
        assert!(serde_json::from_str::<PoseFrame>(&broken).is_err());
    }
}
