//! Pipeline configuration
//!
//! Every stage takes its configuration by value at construction time. Named
//! profiles (`default`, `strict`, `lenient`, `raw`) are parameter bundles; no
//! stage branches on the profile name.

use crate::error::MotionError;
use crate::types::{BodyLandmark, JointId};
use crate::validation::CheckKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Adaptive low-pass filter parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Minimum cutoff frequency (Hz); lower = smoother at rest
    pub min_cutoff: f64,
    /// Speed coefficient; higher = less lag during fast motion
    pub beta: f64,
    /// Cutoff frequency for the derivative estimate (Hz)
    pub derivative_cutoff: f64,
    /// When false the filter passes samples through untouched
    pub enabled: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_cutoff: 1.0,
            beta: 2.0,
            derivative_cutoff: 1.0,
            enabled: true,
        }
    }
}

/// Motion analysis parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Joints whose angles are computed every frame
    pub joints: Vec<JointId>,
    /// Landmarks whose velocity is tracked
    pub velocity_landmarks: Vec<BodyLandmark>,
    /// Use x/y/z vectors for joint angles instead of x/y
    pub use_3d_angles: bool,
    /// Weight of the previous velocity in the exponential blend (0-1)
    pub velocity_smoothing: f64,
    /// Minimum joint confidence for a sample to widen range of motion
    pub rom_min_confidence: f64,
    /// Number of filtered frames kept in the rolling history
    pub history_size: usize,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            joints: JointId::ALL.to_vec(),
            velocity_landmarks: BodyLandmark::ALL.to_vec(),
            use_3d_angles: false,
            velocity_smoothing: 0.5,
            rom_min_confidence: 0.5,
            history_size: 30,
        }
    }
}

/// Inclusive `(min, max)` range for ratios and fractions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Landmark confidence check parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandmarkConfidenceConfig {
    /// High-priority landmarks counted for visibility
    pub key_landmarks: Vec<BodyLandmark>,
    /// Confidence floor for a key landmark to count as visible
    pub min_confidence: f64,
    /// Minimum number of visible key landmarks
    pub min_visible: usize,
    /// Minimum average confidence over all landmarks
    pub min_average: f64,
}

/// Core-body presence check parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorePresenceConfig {
    pub min_confidence: f64,
    /// Required torso corners out of four
    pub min_visible: usize,
    /// Score bonus when the head is visible
    pub head_bonus: f64,
}

/// Body proportion check parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProportionConfig {
    pub min_confidence: f64,
    pub shoulder_hip_ratio: ValueRange,
    pub upper_arm_forearm_ratio: ValueRange,
    pub thigh_shin_ratio: ValueRange,
    /// Left upper arm over right upper arm
    pub arm_symmetry_ratio: ValueRange,
    pub pass_fraction: f64,
}

/// Skeletal connectivity check parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectivityConfig {
    pub min_confidence: f64,
    /// Shorter bones are treated as collapsed
    pub min_bone_length: f64,
    /// Multiplier applied to every per-bone maximum length
    pub bone_length_scale: f64,
    pub pass_fraction: f64,
}

/// Spatial coherence check parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoherenceConfig {
    pub min_confidence: f64,
    pub head_tolerance: f64,
    /// Allows forward bending
    pub torso_tolerance: f64,
    pub hip_knee_tolerance: f64,
    pub knee_ankle_tolerance: f64,
    pub min_shoulder_separation: f64,
    pub pass_fraction: f64,
}

/// Temporal consistency check parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemporalConfig {
    pub min_confidence: f64,
    /// Landmarks whose displacement is averaged
    pub key_landmarks: Vec<BodyLandmark>,
    /// Average displacement budget per frame (units of image height)
    pub max_movement_per_frame: f64,
    pub pass_score: f64,
}

/// Body-height consistency check parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightConfig {
    pub min_confidence: f64,
    pub head_fraction: ValueRange,
    pub torso_fraction: ValueRange,
    pub leg_fraction: ValueRange,
    /// Minimum bounding-box area of the visible body (fraction of height squared)
    pub min_body_area: f64,
    /// Maximum relative deviation from the rolling mean height
    pub max_height_deviation: f64,
    pub pass_score: f64,
}

/// Per-check weights for the aggregate score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckWeights {
    pub landmark_confidence: f64,
    pub core_body_presence: f64,
    pub body_proportions: f64,
    pub skeletal_connectivity: f64,
    pub spatial_coherence: f64,
    pub temporal_consistency: f64,
    pub body_height_consistency: f64,
}

impl CheckWeights {
    pub fn weight(&self, kind: CheckKind) -> f64 {
        match kind {
            CheckKind::LandmarkConfidence => self.landmark_confidence,
            CheckKind::CoreBodyPresence => self.core_body_presence,
            CheckKind::BodyProportions => self.body_proportions,
            CheckKind::SkeletalConnectivity => self.skeletal_connectivity,
            CheckKind::SpatialCoherence => self.spatial_coherence,
            CheckKind::TemporalConsistency => self.temporal_consistency,
            CheckKind::BodyHeightConsistency => self.body_height_consistency,
        }
    }

    fn all(&self) -> [f64; 7] {
        [
            self.landmark_confidence,
            self.core_body_presence,
            self.body_proportions,
            self.skeletal_connectivity,
            self.spatial_coherence,
            self.temporal_consistency,
            self.body_height_consistency,
        ]
    }
}

impl Default for CheckWeights {
    fn default() -> Self {
        Self {
            landmark_confidence: 0.25,
            core_body_presence: 0.25,
            body_proportions: 0.12,
            skeletal_connectivity: 0.10,
            spatial_coherence: 0.10,
            temporal_consistency: 0.10,
            body_height_consistency: 0.08,
        }
    }
}

/// Human plausibility validator parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    pub landmark_confidence: LandmarkConfidenceConfig,
    pub core_body_presence: CorePresenceConfig,
    pub body_proportions: ProportionConfig,
    pub skeletal_connectivity: ConnectivityConfig,
    pub spatial_coherence: CoherenceConfig,
    pub temporal_consistency: TemporalConfig,
    pub body_height_consistency: HeightConfig,
    pub weights: CheckWeights,
    /// Minimum weighted score for a valid frame
    pub validation_threshold: f64,
    /// Checks whose failure rejects the frame regardless of score
    pub hard_gates: Vec<CheckKind>,
    /// Accepted frames / heights kept as temporal baselines
    pub temporal_window_size: usize,
}

const KEY_LANDMARKS: [BodyLandmark; 13] = [
    BodyLandmark::Nose,
    BodyLandmark::LeftShoulder,
    BodyLandmark::RightShoulder,
    BodyLandmark::LeftElbow,
    BodyLandmark::RightElbow,
    BodyLandmark::LeftWrist,
    BodyLandmark::RightWrist,
    BodyLandmark::LeftHip,
    BodyLandmark::RightHip,
    BodyLandmark::LeftKnee,
    BodyLandmark::RightKnee,
    BodyLandmark::LeftAnkle,
    BodyLandmark::RightAnkle,
];

const TEMPORAL_LANDMARKS: [BodyLandmark; 9] = [
    BodyLandmark::Nose,
    BodyLandmark::LeftShoulder,
    BodyLandmark::RightShoulder,
    BodyLandmark::LeftElbow,
    BodyLandmark::RightElbow,
    BodyLandmark::LeftHip,
    BodyLandmark::RightHip,
    BodyLandmark::LeftKnee,
    BodyLandmark::RightKnee,
];

impl Default for LandmarkConfidenceConfig {
    fn default() -> Self {
        Self {
            key_landmarks: KEY_LANDMARKS.to_vec(),
            min_confidence: 0.5,
            min_visible: 8,
            min_average: 0.5,
        }
    }
}

impl Default for CorePresenceConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.5,
            min_visible: 3,
            head_bonus: 0.1,
        }
    }
}

impl Default for ProportionConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.5,
            shoulder_hip_ratio: ValueRange::new(0.9, 2.5),
            upper_arm_forearm_ratio: ValueRange::new(0.6, 1.8),
            thigh_shin_ratio: ValueRange::new(0.6, 1.8),
            arm_symmetry_ratio: ValueRange::new(0.65, 1.55),
            pass_fraction: 0.6,
        }
    }
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.5,
            min_bone_length: 0.01,
            bone_length_scale: 1.0,
            pass_fraction: 0.65,
        }
    }
}

impl Default for CoherenceConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.5,
            head_tolerance: 0.02,
            torso_tolerance: 0.10,
            hip_knee_tolerance: 0.05,
            knee_ankle_tolerance: 0.05,
            min_shoulder_separation: 0.03,
            pass_fraction: 0.6,
        }
    }
}

impl Default for TemporalConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.5,
            key_landmarks: TEMPORAL_LANDMARKS.to_vec(),
            max_movement_per_frame: 0.08,
            pass_score: 0.5,
        }
    }
}

impl Default for HeightConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.5,
            head_fraction: ValueRange::new(0.05, 0.30),
            torso_fraction: ValueRange::new(0.20, 0.45),
            leg_fraction: ValueRange::new(0.35, 0.65),
            min_body_area: 0.01,
            max_height_deviation: 0.35,
            pass_score: 0.6,
        }
    }
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            landmark_confidence: LandmarkConfidenceConfig::default(),
            core_body_presence: CorePresenceConfig::default(),
            body_proportions: ProportionConfig::default(),
            skeletal_connectivity: ConnectivityConfig::default(),
            spatial_coherence: CoherenceConfig::default(),
            temporal_consistency: TemporalConfig::default(),
            body_height_consistency: HeightConfig::default(),
            weights: CheckWeights::default(),
            validation_threshold: 0.70,
            hard_gates: vec![CheckKind::CoreBodyPresence],
            temporal_window_size: 30,
        }
    }
}

impl ValidatorConfig {
    /// Tighter thresholds; more false rejections, fewer false positives
    pub fn strict() -> Self {
        let mut config = Self::default();

        config.landmark_confidence.min_confidence = 0.6;
        config.landmark_confidence.min_visible = 10;
        config.landmark_confidence.min_average = 0.6;

        config.core_body_presence.min_confidence = 0.6;
        config.core_body_presence.min_visible = 4;

        config.body_proportions.min_confidence = 0.6;
        config.body_proportions.shoulder_hip_ratio = ValueRange::new(1.0, 2.2);
        config.body_proportions.upper_arm_forearm_ratio = ValueRange::new(0.7, 1.6);
        config.body_proportions.thigh_shin_ratio = ValueRange::new(0.7, 1.6);
        config.body_proportions.arm_symmetry_ratio = ValueRange::new(0.75, 1.35);
        config.body_proportions.pass_fraction = 0.75;

        config.skeletal_connectivity.min_confidence = 0.6;
        config.skeletal_connectivity.bone_length_scale = 0.85;
        config.skeletal_connectivity.pass_fraction = 0.75;

        config.spatial_coherence.min_confidence = 0.6;
        config.spatial_coherence.head_tolerance = 0.0;
        config.spatial_coherence.torso_tolerance = 0.05;
        config.spatial_coherence.min_shoulder_separation = 0.05;
        config.spatial_coherence.pass_fraction = 0.75;

        config.temporal_consistency.min_confidence = 0.6;
        config.temporal_consistency.max_movement_per_frame = 0.05;

        config.body_height_consistency.min_confidence = 0.6;
        config.body_height_consistency.min_body_area = 0.02;
        config.body_height_consistency.max_height_deviation = 0.25;

        config.validation_threshold = 0.80;
        config.hard_gates = vec![
            CheckKind::CoreBodyPresence,
            CheckKind::LandmarkConfidence,
            CheckKind::SkeletalConnectivity,
        ];
        config
    }

    /// Looser thresholds for poor lighting or partial framing
    pub fn lenient() -> Self {
        let mut config = Self::default();

        config.landmark_confidence.min_confidence = 0.3;
        config.landmark_confidence.min_visible = 6;
        config.landmark_confidence.min_average = 0.3;

        config.core_body_presence.min_confidence = 0.3;

        config.body_proportions.min_confidence = 0.3;
        config.body_proportions.shoulder_hip_ratio = ValueRange::new(0.7, 3.0);
        config.body_proportions.upper_arm_forearm_ratio = ValueRange::new(0.5, 2.2);
        config.body_proportions.thigh_shin_ratio = ValueRange::new(0.5, 2.2);
        config.body_proportions.arm_symmetry_ratio = ValueRange::new(0.5, 2.0);
        config.body_proportions.pass_fraction = 0.5;

        config.skeletal_connectivity.min_confidence = 0.3;
        config.skeletal_connectivity.bone_length_scale = 1.25;
        config.skeletal_connectivity.pass_fraction = 0.5;

        config.spatial_coherence.min_confidence = 0.3;
        config.spatial_coherence.head_tolerance = 0.05;
        config.spatial_coherence.torso_tolerance = 0.20;
        config.spatial_coherence.pass_fraction = 0.5;

        config.temporal_consistency.min_confidence = 0.3;
        config.temporal_consistency.max_movement_per_frame = 0.15;

        config.body_height_consistency.min_confidence = 0.3;
        config.body_height_consistency.min_body_area = 0.005;
        config.body_height_consistency.max_height_deviation = 0.5;
        config.body_height_consistency.pass_score = 0.5;

        config.validation_threshold = 0.55;
        config
    }
}

/// Frame retention parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferConfig {
    /// Maximum retained validated frames (~30s at 30fps by default)
    pub capacity: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self { capacity: 900 }
    }
}

/// Circuit breaker parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FailureConfig {
    pub max_consecutive_errors: u32,
}

impl Default for FailureConfig {
    fn default() -> Self {
        Self {
            max_consecutive_errors: 5,
        }
    }
}

/// Complete configuration for a processing session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PipelineConfig {
    pub filter: FilterConfig,
    pub motion: MotionConfig,
    pub validator: ValidatorConfig,
    pub buffer: BufferConfig,
    pub failure: FailureConfig,
}

impl PipelineConfig {
    /// Load configuration from JSON; any missing section or field takes its default
    pub fn from_json(json: &str) -> Result<Self, MotionError> {
        let config: PipelineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, MotionError> {
        serde_json::to_string_pretty(self).map_err(MotionError::JsonError)
    }

    /// Reject parameter combinations the pipeline cannot run with
    pub fn validate(&self) -> Result<(), MotionError> {
        let filter = &self.filter;
        for (name, value) in [
            ("filter.min_cutoff", filter.min_cutoff),
            ("filter.beta", filter.beta),
            ("filter.derivative_cutoff", filter.derivative_cutoff),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(MotionError::InvalidConfig(format!(
                    "{name} must be strictly positive, got {value}"
                )));
            }
        }

        if !(0.0..=1.0).contains(&self.motion.velocity_smoothing) {
            return Err(MotionError::InvalidConfig(format!(
                "motion.velocity_smoothing must be within [0, 1], got {}",
                self.motion.velocity_smoothing
            )));
        }
        if self.motion.history_size == 0 {
            return Err(MotionError::InvalidConfig(
                "motion.history_size must be positive".to_string(),
            ));
        }

        let validator = &self.validator;
        if !(0.0..=1.0).contains(&validator.validation_threshold) {
            return Err(MotionError::InvalidConfig(format!(
                "validator.validation_threshold must be within [0, 1], got {}",
                validator.validation_threshold
            )));
        }
        let weights = validator.weights.all();
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(MotionError::InvalidConfig(
                "validator.weights must be non-negative".to_string(),
            ));
        }
        if weights.iter().sum::<f64>() <= 0.0 {
            return Err(MotionError::InvalidConfig(
                "validator.weights must not all be zero".to_string(),
            ));
        }
        if validator.temporal_window_size == 0 {
            return Err(MotionError::InvalidConfig(
                "validator.temporal_window_size must be positive".to_string(),
            ));
        }
        if validator.temporal_consistency.max_movement_per_frame <= 0.0 {
            return Err(MotionError::InvalidConfig(
                "validator.temporal_consistency.max_movement_per_frame must be positive"
                    .to_string(),
            ));
        }

        if self.buffer.capacity == 0 {
            return Err(MotionError::InvalidConfig(
                "buffer.capacity must be positive".to_string(),
            ));
        }
        if self.failure.max_consecutive_errors == 0 {
            return Err(MotionError::InvalidConfig(
                "failure.max_consecutive_errors must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

/// Named configuration bundles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConfigProfile {
    #[default]
    Default,
    Strict,
    Lenient,
    /// Default validation with smoothing disabled, for raw-data inspection
    Raw,
}

impl ConfigProfile {
    pub const ALL: [ConfigProfile; 4] = [
        ConfigProfile::Default,
        ConfigProfile::Strict,
        ConfigProfile::Lenient,
        ConfigProfile::Raw,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigProfile::Default => "default",
            ConfigProfile::Strict => "strict",
            ConfigProfile::Lenient => "lenient",
            ConfigProfile::Raw => "raw",
        }
    }

    pub fn config(&self) -> PipelineConfig {
        match self {
            ConfigProfile::Default => PipelineConfig::default(),
            ConfigProfile::Strict => PipelineConfig {
                validator: ValidatorConfig::strict(),
                ..PipelineConfig::default()
            },
            ConfigProfile::Lenient => PipelineConfig {
                validator: ValidatorConfig::lenient(),
                ..PipelineConfig::default()
            },
            ConfigProfile::Raw => PipelineConfig {
                filter: FilterConfig {
                    enabled: false,
                    ..FilterConfig::default()
                },
                ..PipelineConfig::default()
            },
        }
    }
}

impl fmt::Display for ConfigProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigProfile {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" | "" => Ok(ConfigProfile::Default),
            "strict" => Ok(ConfigProfile::Strict),
            "lenient" => Ok(ConfigProfile::Lenient),
            "raw" => Ok(ConfigProfile::Raw),
            other => Err(MotionError::InvalidConfig(format!(
                "unknown profile '{other}' (expected default, strict, lenient or raw)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_profiles_are_valid() {
        for profile in ConfigProfile::ALL {
            assert!(profile.config().validate().is_ok(), "{profile}");
        }
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        let sum: f64 = CheckWeights::default().all().iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_strict_is_tighter_than_lenient() {
        let strict = ValidatorConfig::strict();
        let lenient = ValidatorConfig::lenient();
        assert!(strict.validation_threshold > lenient.validation_threshold);
        assert!(
            strict.temporal_consistency.max_movement_per_frame
                < lenient.temporal_consistency.max_movement_per_frame
        );
        assert!(strict.hard_gates.len() > lenient.hard_gates.len());
    }

    #[test]
    fn test_profile_parsing() {
        assert_eq!("Strict".parse::<ConfigProfile>().unwrap(), ConfigProfile::Strict);
        assert_eq!("raw".parse::<ConfigProfile>().unwrap(), ConfigProfile::Raw);
        assert!("turbo".parse::<ConfigProfile>().is_err());
        assert!(!ConfigProfile::Raw.config().filter.enabled);
    }

    #[test]
    fn test_json_overrides_use_defaults_for_missing_sections() {
        let json = r#"{ "buffer": { "capacity": 120 } }"#;
        let config = PipelineConfig::from_json(json).unwrap();
        assert_eq!(config.buffer.capacity, 120);
        assert_eq!(config.validator, ValidatorConfig::default());
    }

    #[test]
    fn test_json_overrides_single_fields() {
        let config =
            PipelineConfig::from_json(r#"{"validator":{"validation_threshold":0.6}}"#).unwrap();
        assert_eq!(config.validator.validation_threshold, 0.6);
        assert_eq!(
            config,
            PipelineConfig {
                validator: ValidatorConfig {
                    validation_threshold: 0.6,
                    ..ValidatorConfig::default()
                },
                ..PipelineConfig::default()
            }
        );

        let config = PipelineConfig::from_json(r#"{"filter":{"beta":0.5}}"#).unwrap();
        assert_eq!(
            config.filter,
            FilterConfig {
                beta: 0.5,
                ..FilterConfig::default()
            }
        );

        let json = r#"{"validator":{"spatial_coherence":{"torso_tolerance":0.2}}}"#;
        let config = PipelineConfig::from_json(json).unwrap();
        assert_eq!(config.validator.spatial_coherence.torso_tolerance, 0.2);
        assert_eq!(
            config.validator.spatial_coherence.head_tolerance,
            CoherenceConfig::default().head_tolerance
        );
        assert_eq!(config.validator.weights, CheckWeights::default());
    }

    #[test]
    fn test_json_round_trip() {
        let config = ConfigProfile::Strict.config();
        let json = config.to_json().unwrap();
        assert_eq!(PipelineConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_rejects_invalid_parameters() {
        let mut config = PipelineConfig::default();
        config.filter.beta = 0.0;
        assert!(matches!(config.validate(), Err(MotionError::InvalidConfig(_))));

        let mut config = PipelineConfig::default();
        config.buffer.capacity = 0;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.failure.max_consecutive_errors = 0;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.motion.velocity_smoothing = 1.5;
        assert!(config.validate().is_err());
    }
}
