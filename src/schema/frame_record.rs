//! pose.frame_record.v1 schema definition
//!
//! One record per camera frame, as returned by the external pose-detection
//! model: landmark array, sensor capture time and source image size. A record
//! with an empty landmark array means the model found no body in the frame.

use crate::types::{CoordinateSpace, LandmarkSample, LANDMARK_COUNT};
use serde::{Deserialize, Serialize};

/// Current schema version
pub const SCHEMA_VERSION: &str = "pose.frame_record.v1";

fn default_schema_version() -> String {
    SCHEMA_VERSION.to_string()
}

/// A raw detection record for one camera frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    /// Schema version (always "pose.frame_record.v1")
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    /// Monotonic frame counter from the camera
    pub frame_index: u64,
    /// Capture time from the sensor clock (microseconds)
    pub capture_time_micros: i64,
    /// Capture time of the previous camera frame, when the producer tracks it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_capture_time_micros: Option<i64>,
    /// Source image width in pixels
    pub image_width: u32,
    /// Source image height in pixels
    pub image_height: u32,
    /// Coordinate space of landmark x/y
    #[serde(default)]
    pub coordinate_space: CoordinateSpace,
    /// Detected landmarks (empty when no body was detected)
    #[serde(default)]
    pub landmarks: Vec<LandmarkSample>,
}

impl FrameRecord {
    /// Create a record for a detected pose in normalized coordinates
    pub fn new(
        frame_index: u64,
        capture_time_micros: i64,
        image_size: (u32, u32),
        landmarks: Vec<LandmarkSample>,
    ) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            frame_index,
            capture_time_micros,
            previous_capture_time_micros: None,
            image_width: image_size.0,
            image_height: image_size.1,
            coordinate_space: CoordinateSpace::Normalized,
            landmarks,
        }
    }

    /// Create a record for a frame in which no body was detected
    pub fn empty(frame_index: u64, capture_time_micros: i64, image_size: (u32, u32)) -> Self {
        Self::new(frame_index, capture_time_micros, image_size, Vec::new())
    }

    pub fn with_previous_capture_time(mut self, previous: i64) -> Self {
        self.previous_capture_time_micros = Some(previous);
        self
    }

    pub fn with_coordinate_space(mut self, space: CoordinateSpace) -> Self {
        self.coordinate_space = space;
        self
    }

    /// Whether the model detected a body in this frame
    pub fn has_detection(&self) -> bool {
        !self.landmarks.is_empty()
    }

    /// Validate the record schema
    pub fn validate(&self) -> Result<(), RecordError> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(RecordError::InvalidSchemaVersion {
                expected: SCHEMA_VERSION.to_string(),
                actual: self.schema_version.clone(),
            });
        }

        if self.image_width == 0 || self.image_height == 0 {
            return Err(RecordError::InvalidImageSize {
                width: self.image_width,
                height: self.image_height,
            });
        }

        if let Some(previous) = self.previous_capture_time_micros {
            if previous > self.capture_time_micros {
                return Err(RecordError::PreviousAfterCurrent {
                    previous,
                    current: self.capture_time_micros,
                });
            }
        }

        if !self.has_detection() {
            return Ok(());
        }

        if self.landmarks.len() != LANDMARK_COUNT {
            return Err(RecordError::LandmarkCount {
                expected: LANDMARK_COUNT,
                actual: self.landmarks.len(),
            });
        }

        let mut seen = [false; LANDMARK_COUNT];
        for landmark in &self.landmarks {
            let slot = seen
                .get_mut(landmark.id as usize)
                .ok_or(RecordError::UnknownLandmark(landmark.id))?;
            if *slot {
                return Err(RecordError::DuplicateLandmark(landmark.id));
            }
            *slot = true;

            if !(landmark.x.is_finite() && landmark.y.is_finite() && landmark.z.is_finite()) {
                return Err(RecordError::NonFinite { id: landmark.id });
            }
            if !(0.0..=1.0).contains(&landmark.confidence) {
                return Err(RecordError::ConfidenceOutOfRange {
                    id: landmark.id,
                    confidence: landmark.confidence,
                });
            }
        }

        Ok(())
    }
}

/// Validation errors for frame records
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordError {
    #[error("Invalid schema version: expected {expected}, got {actual}")]
    InvalidSchemaVersion { expected: String, actual: String },

    #[error("Invalid image size {width}x{height}")]
    InvalidImageSize { width: u32, height: u32 },

    #[error("Expected {expected} landmarks, got {actual}")]
    LandmarkCount { expected: usize, actual: usize },

    #[error("Unknown landmark id {0}")]
    UnknownLandmark(u8),

    #[error("Duplicate landmark id {0}")]
    DuplicateLandmark(u8),

    #[error("Landmark {id} has a non-finite coordinate")]
    NonFinite { id: u8 },

    #[error("Landmark {id} confidence {confidence} outside [0, 1]")]
    ConfidenceOutOfRange { id: u8, confidence: f64 },

    #[error("Previous capture time {previous}us is after capture time {current}us")]
    PreviousAfterCurrent { previous: i64, current: i64 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::fixtures::standing_landmarks;

    #[test]
    fn test_deserialize_minimal_record() {
        let json = r#"{
            "frame_index": 7,
            "capture_time_micros": 1000000,
            "image_width": 1280,
            "image_height": 720
        }"#;

        let record: FrameRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.schema_version, SCHEMA_VERSION);
        assert_eq!(record.coordinate_space, CoordinateSpace::Normalized);
        assert!(!record.has_detection());
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let record = FrameRecord::new(0, 0, (1280, 720), standing_landmarks(0.9));
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_rejects_wrong_schema_version() {
        let mut record = FrameRecord::new(0, 0, (1280, 720), standing_landmarks(0.9));
        record.schema_version = "pose.frame_record.v0".to_string();
        assert!(matches!(
            record.validate(),
            Err(RecordError::InvalidSchemaVersion { .. })
        ));
    }

    #[test]
    fn test_rejects_partial_landmark_set() {
        let mut landmarks = standing_landmarks(0.9);
        landmarks.truncate(20);
        let record = FrameRecord::new(0, 0, (1280, 720), landmarks);
        assert_eq!(
            record.validate(),
            Err(RecordError::LandmarkCount {
                expected: 33,
                actual: 20
            })
        );
    }

    #[test]
    fn test_rejects_bad_landmarks() {
        let mut landmarks = standing_landmarks(0.9);
        landmarks[3].id = 40;
        let record = FrameRecord::new(0, 0, (1280, 720), landmarks);
        assert_eq!(record.validate(), Err(RecordError::UnknownLandmark(40)));

        let mut landmarks = standing_landmarks(0.9);
        landmarks[3].id = 2;
        let record = FrameRecord::new(0, 0, (1280, 720), landmarks);
        assert_eq!(record.validate(), Err(RecordError::DuplicateLandmark(2)));

        let mut landmarks = standing_landmarks(0.9);
        landmarks[12].confidence = 1.5;
        let record = FrameRecord::new(0, 0, (1280, 720), landmarks);
        assert!(matches!(
            record.validate(),
            Err(RecordError::ConfidenceOutOfRange { id: 12, .. })
        ));
    }

    #[test]
    fn test_rejects_previous_after_current() {
        let record = FrameRecord::empty(1, 1_000, (1280, 720)).with_previous_capture_time(2_000);
        assert!(matches!(
            record.validate(),
            Err(RecordError::PreviousAfterCurrent { .. })
        ));
    }
}
