//! Motion payload encoding
//!
//! Wraps frame outcomes into self-describing `motion.frame.v1` JSON payloads
//! carrying producer metadata and a compact quality summary.

use crate::error::MotionError;
use crate::pipeline::FrameOutcome;
use crate::{MOTION_VERSION, PRODUCER_NAME};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Current payload schema version
pub const PAYLOAD_SCHEMA_VERSION: &str = "motion.frame.v1";

/// Producer metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Quality summary of one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionQuality {
    pub detected: bool,
    pub is_valid: bool,
    pub validation_score: Option<f64>,
    pub mean_confidence: Option<f64>,
    /// Failing checks, highest priority first
    pub flags: Vec<String>,
}

/// Encoded output for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionPayload {
    pub schema_version: String,
    pub producer: MotionProducer,
    pub session_id: String,
    pub computed_at_utc: String,
    pub quality: MotionQuality,
    pub outcome: FrameOutcome,
}

/// Encoder for producing motion payloads
pub struct MotionEncoder {
    instance_id: String,
}

impl Default for MotionEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MotionEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    pub fn encode(&self, session_id: Uuid, outcome: &FrameOutcome) -> MotionPayload {
        let validation = outcome.validation.as_ref();
        let quality = MotionQuality {
            detected: outcome.is_detected(),
            is_valid: outcome.is_valid(),
            validation_score: validation.map(|v| v.weighted_score),
            mean_confidence: outcome.mean_confidence,
            flags: validation
                .map(|v| {
                    v.rejection_reasons
                        .iter()
                        .map(|r| r.check.as_str().to_string())
                        .collect()
                })
                .unwrap_or_default(),
        };

        MotionPayload {
            schema_version: PAYLOAD_SCHEMA_VERSION.to_string(),
            producer: MotionProducer {
                name: PRODUCER_NAME.to_string(),
                version: MOTION_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            session_id: session_id.to_string(),
            computed_at_utc: Utc::now().to_rfc3339(),
            quality,
            outcome: outcome.clone(),
        }
    }

    /// Encode to pretty-printed JSON
    pub fn encode_to_json(
        &self,
        session_id: Uuid,
        outcome: &FrameOutcome,
    ) -> Result<String, MotionError> {
        let payload = self.encode(session_id, outcome);
        serde_json::to_string_pretty(&payload)
            .map_err(|e| MotionError::EncodingError(e.to_string()))
    }

    /// Encode to a single JSON line for NDJSON output
    pub fn encode_to_line(
        &self,
        session_id: Uuid,
        outcome: &FrameOutcome,
    ) -> Result<String, MotionError> {
        let payload = self.encode(session_id, outcome);
        serde_json::to_string(&payload).map_err(|e| MotionError::EncodingError(e.to_string()))
    }
}
