//! Human plausibility validator
//!
//! Runs the seven checks over a raw frame, aggregates their weighted score
//! and, for accepted frames only, advances the temporal baselines.

use crate::config::ValidatorConfig;
use crate::types::PoseFrame;
use crate::validation::baseline::ValidationBaseline;
use crate::validation::checks::estimate_body_height;
use crate::validation::types::{CheckKind, RejectionReason, ValidationResult};
use tracing::debug;

/// Stateful validator for one session
#[derive(Debug, Clone)]
pub struct HumanPlausibilityValidator {
    config: ValidatorConfig,
    baseline: ValidationBaseline,
}

impl Default for HumanPlausibilityValidator {
    fn default() -> Self {
        Self::new(ValidatorConfig::default())
    }
}

impl HumanPlausibilityValidator {
    pub fn new(config: ValidatorConfig) -> Self {
        Self {
            baseline: ValidationBaseline::new(config.temporal_window_size),
            config,
        }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    pub fn baseline(&self) -> &ValidationBaseline {
        &self.baseline
    }

    /// Validate a frame and, if it is accepted, record it as the new baseline
    pub fn validate(&mut self, frame: &PoseFrame) -> ValidationResult {
        let result = self.evaluate(frame);

        if result.is_valid {
            let height = estimate_body_height(frame, &self.config.body_height_consistency)
                .map(|estimate| estimate.total());
            self.baseline.record_accepted(frame, height);
        } else if let Some(reason) = result.primary_rejection() {
            debug!(
                frame_index = frame.frame_index(),
                score = result.weighted_score,
                check = reason.check.as_str(),
                "Frame rejected"
            );
        }

        result
    }

    /// Validate a frame without touching the baselines
    pub fn evaluate(&self, frame: &PoseFrame) -> ValidationResult {
        let run = |kind: CheckKind| kind.run(frame, &self.baseline, &self.config);

        let mut result = ValidationResult {
            landmark_confidence: run(CheckKind::LandmarkConfidence),
            core_body_presence: run(CheckKind::CoreBodyPresence),
            body_proportions: run(CheckKind::BodyProportions),
            skeletal_connectivity: run(CheckKind::SkeletalConnectivity),
            spatial_coherence: run(CheckKind::SpatialCoherence),
            temporal_consistency: run(CheckKind::TemporalConsistency),
            body_height_consistency: run(CheckKind::BodyHeightConsistency),
            weighted_score: 0.0,
            is_valid: false,
            rejection_reasons: Vec::new(),
        };

        result.weighted_score = self.weighted_score(&result);

        let gate_failed = self
            .config
            .hard_gates
            .iter()
            .any(|&kind| !result.check(kind).passed);
        result.is_valid = result.weighted_score >= self.config.validation_threshold && !gate_failed;

        if !result.is_valid {
            result.rejection_reasons = self.rejection_reasons(&result);
        }
        result
    }

    /// Weighted mean over the checks that ran
    fn weighted_score(&self, result: &ValidationResult) -> f64 {
        let mut sum = 0.0;
        let mut total_weight = 0.0;
        for kind in CheckKind::PRIORITY {
            let check = result.check(kind);
            let weight = self.config.weights.weight(kind);
            sum += check.weighted(weight);
            if !check.skipped {
                total_weight += weight;
            }
        }

        if total_weight > 0.0 {
            (sum / total_weight).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Failing checks in priority order.
    ///
    /// A frame can fall below the threshold without any individual check
    /// failing; the lowest-scoring check is then reported.
    fn rejection_reasons(&self, result: &ValidationResult) -> Vec<RejectionReason> {
        let reason = |kind: CheckKind| RejectionReason {
            check: kind,
            message: kind.rejection_message().to_string(),
        };

        let failing: Vec<RejectionReason> = CheckKind::PRIORITY
            .iter()
            .filter(|&&kind| !result.check(kind).passed)
            .map(|&kind| reason(kind))
            .collect();
        if !failing.is_empty() {
            return failing;
        }

        CheckKind::PRIORITY
            .iter()
            .map(|&kind| (kind, result.check(kind)))
            .filter(|(_, check)| !check.skipped)
            .min_by(|(_, a), (_, b)| a.score.total_cmp(&b.score))
            .map(|(kind, _)| vec![reason(kind)])
            .unwrap_or_default()
    }

    /// Forget all accepted-frame history
    pub fn reset(&mut self) {
        self.baseline.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::fixtures::{
        frame_from, shifted_frame, standing_frame, standing_landmarks, with_confidence,
    };
    use crate::types::BodyLandmark;
    use crate::validation::types::CheckResult;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_standing_human_is_valid() {
        let mut validator = HumanPlausibilityValidator::default();
        let result = validator.validate(&standing_frame(0, 0));

        assert!(result.is_valid);
        assert!(result.weighted_score >= 0.8, "{}", result.weighted_score);
        assert!(result.temporal_consistency.skipped);
        assert!(result.rejection_reasons.is_empty());
        assert_eq!(validator.baseline().pose_count(), 1);
        assert_eq!(validator.baseline().height_count(), 1);
    }

    /// Standing pose where only the nose, shoulders and hips were detected
    fn core_only_frame(hip_confidence: f64) -> PoseFrame {
        let frame = with_confidence(
            &frame_from(standing_landmarks(0.0), 0, 0),
            &[
                BodyLandmark::Nose,
                BodyLandmark::LeftShoulder,
                BodyLandmark::RightShoulder,
            ],
            0.95,
        );
        with_confidence(
            &frame,
            &[BodyLandmark::LeftHip, BodyLandmark::RightHip],
            hip_confidence,
        )
    }

    #[test]
    fn test_confident_core_alone_is_valid() {
        let mut validator = HumanPlausibilityValidator::default();
        let result = validator.validate(&core_only_frame(0.95));

        assert!(result.is_valid, "{:?}", result.rejection_reasons);
        assert!(result.weighted_score >= 0.8, "{}", result.weighted_score);
        assert!(result.core_body_presence.passed);
        assert!(!result.landmark_confidence.passed);
        assert!(result.rejection_reasons.is_empty());
    }

    #[test]
    fn test_confident_core_with_weak_hips_is_rejected() {
        let mut validator = HumanPlausibilityValidator::default();
        let result = validator.validate(&core_only_frame(0.1));

        assert!(!result.is_valid);
        assert!(!result.core_body_presence.passed);
        assert_eq!(
            result.primary_rejection().map(|r| r.check),
            Some(CheckKind::CoreBodyPresence)
        );
        assert_eq!(validator.baseline().pose_count(), 0);
    }

    #[test]
    fn test_hidden_hips_fail_core_presence_first() {
        let mut validator = HumanPlausibilityValidator::default();
        let frame = with_confidence(
            &standing_frame(0, 0),
            &[BodyLandmark::LeftHip, BodyLandmark::RightHip],
            0.1,
        );
        let result = validator.validate(&frame);

        assert!(!result.core_body_presence.passed);
        assert!(!result.is_valid);
        assert_eq!(
            result.primary_rejection().map(|r| r.check),
            Some(CheckKind::CoreBodyPresence)
        );
        assert_eq!(validator.baseline().pose_count(), 0);
    }

    #[test]
    fn test_identical_input_gives_identical_verdict() {
        let validator = HumanPlausibilityValidator::default();
        let frame = standing_frame(0, 0);
        let first = validator.evaluate(&frame);
        let second = validator.evaluate(&frame);
        assert_eq!(first, second);

        let mut a = HumanPlausibilityValidator::default();
        let mut b = HumanPlausibilityValidator::default();
        let ra = a.validate(&frame);
        let rb = b.validate(&frame);
        assert_eq!(ra.weighted_score, rb.weighted_score);
        assert_eq!(ra.is_valid, rb.is_valid);
    }

    #[test]
    fn test_rejected_frame_leaves_baseline_untouched() {
        let mut validator = HumanPlausibilityValidator::default();
        assert!(validator.validate(&standing_frame(0, 0)).is_valid);
        let before = validator.baseline().clone();

        // Large jump with hidden hips: rejected
        let jumped = with_confidence(
            &shifted_frame(1, 33_333, 0.3, 0.0),
            &[BodyLandmark::LeftHip, BodyLandmark::RightHip],
            0.1,
        );
        assert!(!validator.validate(&jumped).is_valid);
        assert_eq!(validator.baseline(), &before);

        // Compared against frame 0, not the rejected jump
        let replay = validator.validate(&standing_frame(2, 66_666));
        assert_eq!(replay.temporal_consistency.score, 1.0);
        assert!(replay.temporal_consistency.details.contains("since frame 0"));
        assert!(replay.is_valid);
    }

    #[test]
    fn test_low_score_without_failing_check_still_reports_reason() {
        let config = ValidatorConfig {
            validation_threshold: 1.0,
            ..ValidatorConfig::default()
        };
        let mut validator = HumanPlausibilityValidator::new(config);
        let result = validator.validate(&standing_frame(0, 0));
        assert!(!result.is_valid);
        assert_eq!(
            result.primary_rejection().map(|r| r.check),
            Some(CheckKind::LandmarkConfidence)
        );
    }

    #[test]
    fn test_strict_gates_on_landmark_confidence() {
        let frame = with_confidence(
            &standing_frame(0, 0),
            &[
                BodyLandmark::LeftWrist,
                BodyLandmark::RightWrist,
                BodyLandmark::LeftElbow,
                BodyLandmark::RightElbow,
            ],
            0.2,
        );
        let mut strict = HumanPlausibilityValidator::new(ValidatorConfig::strict());
        let mut lenient = HumanPlausibilityValidator::new(ValidatorConfig::lenient());

        let strict_result = strict.validate(&frame);
        assert!(!strict_result.landmark_confidence.passed);
        assert!(!strict_result.is_valid);
        assert!(lenient.validate(&frame).is_valid);
    }

    #[test]
    fn test_skipped_checks_do_not_count() {
        let skipped = CheckResult::skipped("n/a");
        assert_eq!(skipped.weighted(0.5), 0.0);
        assert_eq!(CheckResult::new(true, 0.5, "").weighted(0.5), 0.25);
    }

    #[test]
    fn test_reset_clears_baseline() {
        let mut validator = HumanPlausibilityValidator::default();
        validator.validate(&standing_frame(0, 0));
        validator.reset();
        assert!(validator.baseline().last_pose().is_none());
        assert!(validator.validate(&standing_frame(1, 33_333)).temporal_consistency.skipped);
    }
}
