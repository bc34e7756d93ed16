//! Synheart Motion - On-device engine for validated body-motion signals
//!
//! Motion turns a per-frame stream of noisy body-landmark detections into
//! trustworthy motion signals through a deterministic pipeline: record
//! adaptation → plausibility validation → adaptive smoothing → joint angles,
//! velocities and range of motion → payload encoding.
//!
//! ## Modules
//!
//! - **Validation**: Seven weighted checks decide whether a frame shows a real human body
//! - **Filtering**: One-euro smoothing per landmark axis
//! - **Motion**: Joint angles, velocities, range of motion and exercise analyzers
//! - **Session**: Bounded frame retention, failure circuit breaker and metrics
//! - **Stream**: Droppable single-worker admission for async hosts

pub mod buffer;
pub mod config;
pub mod encoder;
pub mod error;
pub mod failure;
pub mod filter;
pub mod motion;
pub mod pipeline;
pub mod schema;
pub mod session;
pub mod stream;
pub mod types;
pub mod validation;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use config::{ConfigProfile, PipelineConfig};
pub use error::MotionError;
pub use pipeline::{analyze_frames_json, validate_record, FrameOutcome, PoseProcessor};

// Schema exports
pub use schema::{FrameRecord, FrameRecordAdapter, SCHEMA_VERSION};

// Core component exports
pub use filter::AdaptiveLandmarkFilter;
pub use motion::{ExerciseAnalyzer, MotionAnalyzer, MotionSnapshot};
pub use session::SessionMetrics;
pub use types::{BodyLandmark, JointId, LandmarkSample, PoseFrame};
pub use validation::{HumanPlausibilityValidator, ValidationResult};

/// Motion version embedded in all payloads
pub const MOTION_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for motion payloads
pub const PRODUCER_NAME: &str = "synheart-motion";
