//! Pipeline orchestration
//!
//! This module provides the public processing API. A `PoseProcessor` owns all
//! session state and runs each frame through validation, smoothing, motion
//! analysis and retention, strictly one frame at a time.

use crate::buffer::BoundedFrameBuffer;
use crate::config::{ConfigProfile, PipelineConfig};
use crate::encoder::MotionEncoder;
use crate::error::MotionError;
use crate::failure::FailureTracker;
use crate::filter::AdaptiveLandmarkFilter;
use crate::motion::{ExerciseAnalyzer, MotionAnalyzer, MotionSnapshot};
use crate::schema::{FrameRecord, FrameRecordAdapter};
use crate::session::{SessionAccumulators, SessionContext, SessionMetrics};
use crate::types::PoseFrame;
use crate::validation::{HumanPlausibilityValidator, ValidationResult};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

/// Result of processing one camera frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameOutcome {
    pub frame_index: u64,
    pub capture_time_micros: i64,
    /// Mean landmark confidence; `None` when no body was detected
    pub mean_confidence: Option<f64>,
    /// `None` when no body was detected
    pub validation: Option<ValidationResult>,
    /// Present only for frames that passed validation
    pub motion: Option<MotionSnapshot>,
}

impl FrameOutcome {
    fn undetected(record: &FrameRecord) -> Self {
        Self {
            frame_index: record.frame_index,
            capture_time_micros: record.capture_time_micros,
            mean_confidence: None,
            validation: None,
            motion: None,
        }
    }

    pub fn is_detected(&self) -> bool {
        self.validation.is_some()
    }

    pub fn is_valid(&self) -> bool {
        self.validation.as_ref().is_some_and(|v| v.is_valid)
    }
}

/// Analyze an ordered batch of frame records and encode one payload per record.
///
/// Accepts a JSON array of `pose.frame_record.v1` records. Records that fail
/// processing are skipped; the batch only fails if the session turns fatal.
///
/// # Example
/// ```ignore
/// let payloads = analyze_frames_json(records_json, ConfigProfile::Default)?;
/// ```
pub fn analyze_frames_json(
    records_json: &str,
    profile: ConfigProfile,
) -> Result<Vec<String>, MotionError> {
    let records = FrameRecordAdapter::parse_array(records_json)?;
    if records.is_empty() {
        return Ok(Vec::new());
    }

    let mut processor = PoseProcessor::new(profile.config())?;
    let encoder = MotionEncoder::new();

    let mut payloads = Vec::with_capacity(records.len());
    for record in &records {
        match processor.process_record(record) {
            Ok(outcome) => {
                payloads.push(encoder.encode_to_json(processor.session_id(), &outcome)?)
            }
            Err(e @ MotionError::SessionFatal { .. }) => return Err(e),
            Err(_) => continue,
        }
    }

    Ok(payloads)
}

/// Run the plausibility checks on a single record, without session history.
///
/// With no accepted history the temporal check is skipped and the height
/// check runs without its deviation-from-rolling-mean sub-check.
pub fn validate_record(
    record: &FrameRecord,
    profile: ConfigProfile,
) -> Result<ValidationResult, MotionError> {
    let frame = FrameRecordAdapter::to_frame(record, None)?.to_normalized();
    let validator = HumanPlausibilityValidator::new(profile.config().validator);
    Ok(validator.evaluate(&frame))
}

/// Stateful single-worker processor for one session.
///
/// Frames must be fed in capture order. The processor is not `Sync`-shared:
/// one owner calls it for one frame at a time.
pub struct PoseProcessor {
    config: PipelineConfig,
    filter: AdaptiveLandmarkFilter,
    validator: HumanPlausibilityValidator,
    analyzer: MotionAnalyzer,
    buffer: BoundedFrameBuffer<PoseFrame>,
    failures: FailureTracker,
    session: SessionAccumulators,
    exercises: Vec<Box<dyn ExerciseAnalyzer>>,
    last_capture_time_micros: Option<i64>,
}

impl std::fmt::Debug for PoseProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoseProcessor")
            .field("session_id", &self.session.session_id())
            .field("buffered_frames", &self.buffer.len())
            .field("fatal", &self.failures.is_fatal())
            .finish_non_exhaustive()
    }
}

impl PoseProcessor {
    /// Create a processor from an explicit configuration
    pub fn new(config: PipelineConfig) -> Result<Self, MotionError> {
        config.validate()?;
        let session = SessionAccumulators::new();
        info!(session_id = %session.session_id(), "Motion session started");

        Ok(Self {
            filter: AdaptiveLandmarkFilter::new(config.filter.clone()),
            validator: HumanPlausibilityValidator::new(config.validator.clone()),
            analyzer: MotionAnalyzer::new(config.motion.clone()),
            buffer: BoundedFrameBuffer::new(config.buffer.capacity),
            failures: FailureTracker::new(config.failure.max_consecutive_errors),
            session,
            exercises: Vec::new(),
            last_capture_time_micros: None,
            config,
        })
    }

    /// Create a processor from a named profile
    pub fn from_profile(profile: ConfigProfile) -> Result<Self, MotionError> {
        Self::new(profile.config())
    }

    /// Register an exercise analyzer fed with every accepted frame
    pub fn with_analyzer(mut self, analyzer: Box<dyn ExerciseAnalyzer>) -> Self {
        self.exercises.push(analyzer);
        self
    }

    pub fn add_analyzer(&mut self, analyzer: Box<dyn ExerciseAnalyzer>) {
        self.exercises.push(analyzer);
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn session_id(&self) -> Uuid {
        self.session.session_id()
    }

    pub fn is_fatal(&self) -> bool {
        self.failures.is_fatal()
    }

    /// Validated, filtered frames retained for the session
    pub fn buffer(&self) -> &BoundedFrameBuffer<PoseFrame> {
        &self.buffer
    }

    pub fn validator(&self) -> &HumanPlausibilityValidator {
        &self.validator
    }

    /// Process one raw detection record
    pub fn process_record(&mut self, record: &FrameRecord) -> Result<FrameOutcome, MotionError> {
        self.track(|processor| processor.run_record(record))
    }

    /// Process a frame that was already converted from a record
    pub fn process_frame(&mut self, frame: PoseFrame) -> Result<FrameOutcome, MotionError> {
        self.track(|processor| {
            processor.last_capture_time_micros = Some(frame.capture_time_micros());
            processor.run_frame(frame.to_normalized())
        })
    }

    /// Count frames shed before reaching the processor
    pub fn record_dropped(&mut self, count: u64) {
        if count > 0 {
            warn!(count, "Frames dropped under back-pressure");
            self.session.record_dropped(count);
        }
    }

    pub fn metrics(&self) -> SessionMetrics {
        self.session.snapshot(SessionContext {
            buffered_frames: self.buffer.len(),
            buffer_capacity: self.buffer.capacity(),
            consecutive_errors: self.failures.consecutive_errors(),
            fatal: self.failures.is_fatal(),
            range_of_motion: self.analyzer.range_of_motion().clone(),
            exercises: self
                .exercises
                .iter()
                .map(|e| (e.name().to_string(), e.summary()))
                .collect(),
        })
    }

    /// Start a fresh session. This is the only way out of the fatal state.
    pub fn reset(&mut self) {
        self.filter.reset();
        self.validator.reset();
        self.analyzer.reset();
        self.buffer.clear();
        self.failures.reset();
        self.session = SessionAccumulators::new();
        self.last_capture_time_micros = None;
        for exercise in &mut self.exercises {
            exercise.reset();
        }
        info!(session_id = %self.session.session_id(), "Motion session reset");
    }

    /// Run one unit of work under the circuit breaker
    fn track<F>(&mut self, work: F) -> Result<FrameOutcome, MotionError>
    where
        F: FnOnce(&mut Self) -> Result<FrameOutcome, MotionError>,
    {
        if self.failures.is_fatal() {
            return Err(MotionError::SessionFatal {
                consecutive_errors: self.failures.consecutive_errors(),
            });
        }

        self.session.record_received();
        let started = Instant::now();

        match work(self) {
            Ok(outcome) => {
                self.failures.record_success();
                self.session.record_processed(started.elapsed());
                Ok(outcome)
            }
            Err(e) => {
                warn!(error = %e, "Frame processing failed");
                self.session.record_failure();
                if self.failures.record_error() {
                    return Err(MotionError::SessionFatal {
                        consecutive_errors: self.failures.consecutive_errors(),
                    });
                }
                Err(e)
            }
        }
    }

    fn run_record(&mut self, record: &FrameRecord) -> Result<FrameOutcome, MotionError> {
        if !record.has_detection() {
            record.validate()?;
            self.last_capture_time_micros = Some(record.capture_time_micros);
            return Ok(FrameOutcome::undetected(record));
        }

        let frame = FrameRecordAdapter::to_frame(record, self.last_capture_time_micros)?;
        self.last_capture_time_micros = Some(record.capture_time_micros);
        self.run_frame(frame.to_normalized())
    }

    fn run_frame(&mut self, frame: PoseFrame) -> Result<FrameOutcome, MotionError> {
        let mean_confidence = frame.mean_confidence();
        self.session.record_detection(mean_confidence);

        let validation = self.validator.validate(&frame);
        self.session.record_validation(&validation);

        let motion = if validation.is_valid {
            let filtered = self.filter.filter_frame(&frame)?;
            let snapshot = self.analyzer.analyze(filtered.clone());
            self.buffer.append(filtered);
            for exercise in &mut self.exercises {
                exercise.observe(&snapshot);
            }
            Some(snapshot)
        } else {
            None
        };

        Ok(FrameOutcome {
            frame_index: frame.frame_index(),
            capture_time_micros: frame.capture_time_micros(),
            mean_confidence: Some(mean_confidence),
            validation: Some(validation),
            motion,
        })
    }
}
