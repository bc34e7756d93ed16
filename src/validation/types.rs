//! Validation result types

use serde::{Deserialize, Serialize};

/// The seven plausibility checks, in rejection-priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    CoreBodyPresence,
    LandmarkConfidence,
    BodyProportions,
    BodyHeightConsistency,
    SpatialCoherence,
    SkeletalConnectivity,
    TemporalConsistency,
}

impl CheckKind {
    /// Order in which failing checks are reported
    pub const PRIORITY: [CheckKind; 7] = [
        CheckKind::CoreBodyPresence,
        CheckKind::LandmarkConfidence,
        CheckKind::BodyProportions,
        CheckKind::BodyHeightConsistency,
        CheckKind::SpatialCoherence,
        CheckKind::SkeletalConnectivity,
        CheckKind::TemporalConsistency,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckKind::CoreBodyPresence => "core_body_presence",
            CheckKind::LandmarkConfidence => "landmark_confidence",
            CheckKind::BodyProportions => "body_proportions",
            CheckKind::BodyHeightConsistency => "body_height_consistency",
            CheckKind::SpatialCoherence => "spatial_coherence",
            CheckKind::SkeletalConnectivity => "skeletal_connectivity",
            CheckKind::TemporalConsistency => "temporal_consistency",
        }
    }

    /// Human-readable rejection message shown to the user
    pub fn rejection_message(&self) -> &'static str {
        match self {
            CheckKind::CoreBodyPresence => "Shoulders and hips must be visible",
            CheckKind::LandmarkConfidence => "Body landmarks are not detected clearly",
            CheckKind::BodyProportions => "Detected body proportions are not plausible",
            CheckKind::BodyHeightConsistency => "Body size is implausible or changed abruptly",
            CheckKind::SpatialCoherence => "Body parts are not in a plausible arrangement",
            CheckKind::SkeletalConnectivity => "Skeleton segments are disconnected or stretched",
            CheckKind::TemporalConsistency => "Body moved implausibly far since the last frame",
        }
    }
}

/// Outcome of one check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub passed: bool,
    /// 0-1, higher is more plausible
    pub score: f64,
    /// True when the check could not run and is excluded from aggregation
    #[serde(default)]
    pub skipped: bool,
    pub details: String,
}

impl CheckResult {
    pub fn new(passed: bool, score: f64, details: impl Into<String>) -> Self {
        Self {
            passed,
            score: score.clamp(0.0, 1.0),
            skipped: false,
            details: details.into(),
        }
    }

    pub fn skipped(details: impl Into<String>) -> Self {
        Self {
            passed: true,
            score: 1.0,
            skipped: true,
            details: details.into(),
        }
    }

    /// Contribution to the weighted aggregate; zero when skipped
    pub fn weighted(&self, weight: f64) -> f64 {
        if self.skipped {
            0.0
        } else {
            weight * self.score
        }
    }
}

/// A failing check surfaced to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectionReason {
    pub check: CheckKind,
    pub message: String,
}

/// Aggregate plausibility verdict for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub landmark_confidence: CheckResult,
    pub core_body_presence: CheckResult,
    pub body_proportions: CheckResult,
    pub skeletal_connectivity: CheckResult,
    pub spatial_coherence: CheckResult,
    pub temporal_consistency: CheckResult,
    pub body_height_consistency: CheckResult,
    pub weighted_score: f64,
    pub is_valid: bool,
    /// Failing checks in priority order; callers surface only the first
    pub rejection_reasons: Vec<RejectionReason>,
}

impl ValidationResult {
    pub fn check(&self, kind: CheckKind) -> &CheckResult {
        match kind {
            CheckKind::LandmarkConfidence => &self.landmark_confidence,
            CheckKind::CoreBodyPresence => &self.core_body_presence,
            CheckKind::BodyProportions => &self.body_proportions,
            CheckKind::SkeletalConnectivity => &self.skeletal_connectivity,
            CheckKind::SpatialCoherence => &self.spatial_coherence,
            CheckKind::TemporalConsistency => &self.temporal_consistency,
            CheckKind::BodyHeightConsistency => &self.body_height_consistency,
        }
    }

    /// The reason a UI should display, if the frame was rejected
    pub fn primary_rejection(&self) -> Option<&RejectionReason> {
        self.rejection_reasons.first()
    }
}
