//! Session accumulators and metrics snapshots
//!
//! Counters and running sums are updated in O(1) per frame; averages are
//! derived on demand.

use crate::motion::RangeOfMotionRecord;
use crate::types::JointId;
use crate::validation::ValidationResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use uuid::Uuid;

/// Running sum for an O(1) average
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct RunningMean {
    sum: f64,
    count: u64,
}

impl RunningMean {
    fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Mutable per-session counters
#[derive(Debug, Clone)]
pub struct SessionAccumulators {
    session_id: Uuid,
    started_at: DateTime<Utc>,
    frames_received: u64,
    frames_processed: u64,
    frames_dropped: u64,
    frames_detected: u64,
    frames_validated: u64,
    frames_rejected: u64,
    frames_failed: u64,
    latency_micros: RunningMean,
    landmark_confidence: RunningMean,
    validation_score: RunningMean,
}

impl Default for SessionAccumulators {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionAccumulators {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            started_at: Utc::now(),
            frames_received: 0,
            frames_processed: 0,
            frames_dropped: 0,
            frames_detected: 0,
            frames_validated: 0,
            frames_rejected: 0,
            frames_failed: 0,
            latency_micros: RunningMean::default(),
            landmark_confidence: RunningMean::default(),
            validation_score: RunningMean::default(),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn record_received(&mut self) {
        self.frames_received += 1;
    }

    /// Frames shed by back-pressure before reaching the processor
    pub fn record_dropped(&mut self, count: u64) {
        self.frames_dropped += count;
    }

    /// A frame in which the model found a body
    pub fn record_detection(&mut self, mean_confidence: f64) {
        self.frames_detected += 1;
        self.landmark_confidence.add(mean_confidence);
    }

    pub fn record_validation(&mut self, result: &ValidationResult) {
        self.validation_score.add(result.weighted_score);
        if result.is_valid {
            self.frames_validated += 1;
        } else {
            self.frames_rejected += 1;
        }
    }

    /// A frame that completed processing, accepted or not
    pub fn record_processed(&mut self, latency: Duration) {
        self.frames_processed += 1;
        self.latency_micros.add(latency.as_secs_f64() * 1_000_000.0);
    }

    pub fn record_failure(&mut self) {
        self.frames_failed += 1;
    }

    pub fn frames_received(&self) -> u64 {
        self.frames_received
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    pub fn frames_dropped(&self) -> u64 {
        self.frames_dropped
    }

    pub fn frames_validated(&self) -> u64 {
        self.frames_validated
    }

    pub fn frames_rejected(&self) -> u64 {
        self.frames_rejected
    }

    pub fn frames_failed(&self) -> u64 {
        self.frames_failed
    }

    /// Immutable snapshot for reporting
    pub fn snapshot(&self, context: SessionContext) -> SessionMetrics {
        SessionMetrics {
            session_id: self.session_id,
            started_at_utc: self.started_at,
            frames_received: self.frames_received,
            frames_processed: self.frames_processed,
            frames_dropped: self.frames_dropped,
            frames_detected: self.frames_detected,
            frames_validated: self.frames_validated,
            frames_rejected: self.frames_rejected,
            frames_failed: self.frames_failed,
            validation_rate: (self.frames_detected > 0)
                .then(|| self.frames_validated as f64 / self.frames_detected as f64),
            avg_latency_micros: self.latency_micros.mean(),
            avg_landmark_confidence: self.landmark_confidence.mean(),
            avg_validation_score: self.validation_score.mean(),
            buffered_frames: context.buffered_frames,
            buffer_capacity: context.buffer_capacity,
            consecutive_errors: context.consecutive_errors,
            fatal: context.fatal,
            range_of_motion: context.range_of_motion,
            exercises: context.exercises,
        }
    }
}

/// State owned by other pipeline components, folded into a snapshot
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    pub buffered_frames: usize,
    pub buffer_capacity: usize,
    pub consecutive_errors: u32,
    pub fatal: bool,
    pub range_of_motion: BTreeMap<JointId, RangeOfMotionRecord>,
    pub exercises: BTreeMap<String, serde_json::Value>,
}

/// Point-in-time session report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMetrics {
    pub session_id: Uuid,
    pub started_at_utc: DateTime<Utc>,
    pub frames_received: u64,
    pub frames_processed: u64,
    pub frames_dropped: u64,
    pub frames_detected: u64,
    pub frames_validated: u64,
    pub frames_rejected: u64,
    pub frames_failed: u64,
    /// Validated over detected frames
    pub validation_rate: Option<f64>,
    pub avg_latency_micros: Option<f64>,
    pub avg_landmark_confidence: Option<f64>,
    pub avg_validation_score: Option<f64>,
    pub buffered_frames: usize,
    pub buffer_capacity: usize,
    pub consecutive_errors: u32,
    pub fatal: bool,
    pub range_of_motion: BTreeMap<JointId, RangeOfMotionRecord>,
    /// Summaries of registered exercise analyzers, keyed by analyzer name
    pub exercises: BTreeMap<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::fixtures::standing_frame;
    use crate::validation::HumanPlausibilityValidator;

    #[test]
    fn test_counters_and_averages() {
        let mut session = SessionAccumulators::new();
        let result = HumanPlausibilityValidator::default().evaluate(&standing_frame(0, 0));

        session.record_received();
        session.record_detection(0.9);
        session.record_validation(&result);
        session.record_processed(Duration::from_micros(400));

        session.record_received();
        session.record_detection(0.7);
        let mut rejected = result.clone();
        rejected.is_valid = false;
        rejected.weighted_score = 0.5;
        session.record_validation(&rejected);
        session.record_processed(Duration::from_micros(600));

        session.record_received();
        session.record_failure();
        session.record_dropped(2);

        let metrics = session.snapshot(SessionContext::default());
        assert_eq!(metrics.frames_received, 3);
        assert_eq!(metrics.frames_processed, 2);
        assert_eq!(metrics.frames_detected, 2);
        assert_eq!(metrics.frames_validated, 1);
        assert_eq!(metrics.frames_rejected, 1);
        assert_eq!(metrics.frames_failed, 1);
        assert_eq!(metrics.frames_dropped, 2);
        assert_eq!(metrics.validation_rate, Some(0.5));
        assert!((metrics.avg_latency_micros.unwrap() - 500.0).abs() < 1e-6);
        assert!((metrics.avg_landmark_confidence.unwrap() - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_empty_session_has_no_averages() {
        let metrics = SessionAccumulators::new().snapshot(SessionContext::default());
        assert_eq!(metrics.avg_latency_micros, None);
        assert_eq!(metrics.validation_rate, None);
    }

    #[test]
    fn test_sessions_have_distinct_ids() {
        assert_ne!(
            SessionAccumulators::new().session_id(),
            SessionAccumulators::new().session_id()
        );
    }

    #[test]
    fn test_metrics_serialize() {
        let metrics = SessionAccumulators::new().snapshot(SessionContext::default());
        let json = serde_json::to_value(&metrics).unwrap();
        assert_eq!(json["frames_received"], 0);
        assert!(json["session_id"].is_string());
    }
}
