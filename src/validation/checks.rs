//! The seven plausibility checks
//!
//! Every check is a pure function of the frame, the accepted-frame baseline
//! and the validator configuration. Geometry uses aspect-corrected planar
//! positions (units of image height, y pointing down).

use crate::config::{
    CoherenceConfig, ConnectivityConfig, CorePresenceConfig, HeightConfig,
    LandmarkConfidenceConfig, ProportionConfig, TemporalConfig, ValidatorConfig, ValueRange,
};
use crate::types::{BodyLandmark, PoseFrame, Vec3};
use crate::validation::baseline::ValidationBaseline;
use crate::validation::types::{CheckKind, CheckResult};

use BodyLandmark::*;

const EPSILON: f64 = 1e-9;

/// Anatomically connected landmark pairs with their maximum plausible length
const SKELETAL_BONES: [(BodyLandmark, BodyLandmark, f64); 14] = [
    (LeftShoulder, RightShoulder, 0.45),
    (LeftHip, RightHip, 0.35),
    (LeftShoulder, LeftHip, 0.60),
    (RightShoulder, RightHip, 0.60),
    (LeftShoulder, LeftElbow, 0.35),
    (LeftElbow, LeftWrist, 0.35),
    (RightShoulder, RightElbow, 0.35),
    (RightElbow, RightWrist, 0.35),
    (LeftHip, LeftKnee, 0.45),
    (LeftKnee, LeftAnkle, 0.45),
    (RightHip, RightKnee, 0.45),
    (RightKnee, RightAnkle, 0.45),
    (Nose, LeftShoulder, 0.35),
    (Nose, RightShoulder, 0.35),
];

const TORSO_CORNERS: [BodyLandmark; 4] = [LeftShoulder, RightShoulder, LeftHip, RightHip];

impl CheckKind {
    /// Run this check against `frame`
    pub fn run(
        self,
        frame: &PoseFrame,
        baseline: &ValidationBaseline,
        config: &ValidatorConfig,
    ) -> CheckResult {
        match self {
            CheckKind::LandmarkConfidence => {
                landmark_confidence(frame, &config.landmark_confidence)
            }
            CheckKind::CoreBodyPresence => core_body_presence(frame, &config.core_body_presence),
            CheckKind::BodyProportions => body_proportions(frame, &config.body_proportions),
            CheckKind::SkeletalConnectivity => {
                skeletal_connectivity(frame, &config.skeletal_connectivity)
            }
            CheckKind::SpatialCoherence => spatial_coherence(frame, &config.spatial_coherence),
            CheckKind::TemporalConsistency => {
                temporal_consistency(frame, baseline, &config.temporal_consistency)
            }
            CheckKind::BodyHeightConsistency => {
                body_height_consistency(frame, baseline, &config.body_height_consistency)
            }
        }
    }
}

fn visible(frame: &PoseFrame, landmark: BodyLandmark, threshold: f64) -> bool {
    frame.confidence(landmark) >= threshold
}

/// Planar position if the landmark reaches `threshold`
fn position(frame: &PoseFrame, landmark: BodyLandmark, threshold: f64) -> Option<Vec3> {
    visible(frame, landmark, threshold).then(|| frame.planar(landmark))
}

/// Distance between two landmarks if both are visible
fn segment(frame: &PoseFrame, a: BodyLandmark, b: BodyLandmark, threshold: f64) -> Option<f64> {
    Some(position(frame, a, threshold)?.distance(position(frame, b, threshold)?))
}

/// Midpoint of a left/right pair; falls back to whichever side is visible
fn pair_midpoint(
    frame: &PoseFrame,
    left: BodyLandmark,
    right: BodyLandmark,
    threshold: f64,
) -> Option<Vec3> {
    match (position(frame, left, threshold), position(frame, right, threshold)) {
        (Some(l), Some(r)) => Some(l.midpoint(r)),
        (Some(p), None) | (None, Some(p)) => Some(p),
        (None, None) => None,
    }
}

fn fraction_result(valid: usize, checkable: usize, pass_fraction: f64, what: &str) -> CheckResult {
    if checkable == 0 {
        return CheckResult::skipped(format!("no {what} could be measured"));
    }
    let score = valid as f64 / checkable as f64;
    CheckResult::new(
        score >= pass_fraction,
        score,
        format!("{valid}/{checkable} {what} plausible"),
    )
}

/// Visibility of high-priority landmarks blended 60/40 with overall confidence
pub fn landmark_confidence(frame: &PoseFrame, config: &LandmarkConfidenceConfig) -> CheckResult {
    let total = config.key_landmarks.len();
    let visible_count = config
        .key_landmarks
        .iter()
        .filter(|&&lm| visible(frame, lm, config.min_confidence))
        .count();
    let visible_fraction = if total == 0 {
        1.0
    } else {
        visible_count as f64 / total as f64
    };
    let average = frame.mean_confidence();

    CheckResult::new(
        visible_count >= config.min_visible && average >= config.min_average,
        0.6 * visible_fraction + 0.4 * average,
        format!("{visible_count}/{total} key landmarks visible, average confidence {average:.2}"),
    )
}

/// Both shoulders and both hips, with a bonus for a visible head
pub fn core_body_presence(frame: &PoseFrame, config: &CorePresenceConfig) -> CheckResult {
    let corners = TORSO_CORNERS
        .iter()
        .filter(|&&lm| visible(frame, lm, config.min_confidence))
        .count();
    let head = visible(frame, Nose, config.min_confidence);

    let score = (1.0 - config.head_bonus) * corners as f64 / TORSO_CORNERS.len() as f64
        + if head { config.head_bonus } else { 0.0 };

    CheckResult::new(
        corners >= config.min_visible,
        score,
        format!(
            "{corners}/4 torso corners visible, head {}",
            if head { "visible" } else { "not visible" }
        ),
    )
}

fn ratio_in_range(
    numerator: Option<f64>,
    denominator: Option<f64>,
    range: ValueRange,
) -> Option<bool> {
    let denominator = denominator.filter(|d| *d > EPSILON)?;
    Some(range.contains(numerator? / denominator))
}

/// Anatomical width and limb-segment ratios
pub fn body_proportions(frame: &PoseFrame, config: &ProportionConfig) -> CheckResult {
    let c = config.min_confidence;
    let bone = |a, b| segment(frame, a, b, c);

    let left_upper_arm = bone(LeftShoulder, LeftElbow);
    let right_upper_arm = bone(RightShoulder, RightElbow);

    let ratios = [
        ratio_in_range(
            bone(LeftShoulder, RightShoulder),
            bone(LeftHip, RightHip),
            config.shoulder_hip_ratio,
        ),
        ratio_in_range(
            left_upper_arm,
            bone(LeftElbow, LeftWrist),
            config.upper_arm_forearm_ratio,
        ),
        ratio_in_range(
            right_upper_arm,
            bone(RightElbow, RightWrist),
            config.upper_arm_forearm_ratio,
        ),
        ratio_in_range(
            bone(LeftHip, LeftKnee),
            bone(LeftKnee, LeftAnkle),
            config.thigh_shin_ratio,
        ),
        ratio_in_range(
            bone(RightHip, RightKnee),
            bone(RightKnee, RightAnkle),
            config.thigh_shin_ratio,
        ),
        ratio_in_range(left_upper_arm, right_upper_arm, config.arm_symmetry_ratio),
    ];

    let checkable = ratios.iter().flatten().count();
    let valid = ratios.iter().flatten().filter(|ok| **ok).count();
    fraction_result(valid, checkable, config.pass_fraction, "body ratios")
}

/// Connected landmark pairs must be neither collapsed nor stretched
pub fn skeletal_connectivity(frame: &PoseFrame, config: &ConnectivityConfig) -> CheckResult {
    let mut checkable = 0;
    let mut valid = 0;
    for (a, b, max_length) in SKELETAL_BONES {
        let Some(length) = segment(frame, a, b, config.min_confidence) else {
            continue;
        };
        checkable += 1;
        if length > config.min_bone_length && length <= max_length * config.bone_length_scale {
            valid += 1;
        }
    }
    fraction_result(valid, checkable, config.pass_fraction, "bones")
}

/// Vertical ordering of head, torso and legs plus shoulder separation
pub fn spatial_coherence(frame: &PoseFrame, config: &CoherenceConfig) -> CheckResult {
    let c = config.min_confidence;
    let y = |lm| position(frame, lm, c).map(|p| p.y);
    // `upper` must not be lower than `lower` by more than `tolerance`
    let above = |upper: Option<f64>, lower: Option<f64>, tolerance: f64| {
        Some(upper? < lower? + tolerance)
    };

    let shoulder_mid = pair_midpoint(frame, LeftShoulder, RightShoulder, c).map(|p| p.y);
    let hip_mid = pair_midpoint(frame, LeftHip, RightHip, c).map(|p| p.y);
    let shoulder_separation = match (
        position(frame, LeftShoulder, c),
        position(frame, RightShoulder, c),
    ) {
        (Some(l), Some(r)) => Some((l.x - r.x).abs() >= config.min_shoulder_separation),
        _ => None,
    };

    let checks = [
        above(y(Nose), shoulder_mid, config.head_tolerance),
        above(shoulder_mid, hip_mid, config.torso_tolerance),
        above(y(LeftHip), y(LeftKnee), config.hip_knee_tolerance),
        above(y(RightHip), y(RightKnee), config.hip_knee_tolerance),
        above(y(LeftKnee), y(LeftAnkle), config.knee_ankle_tolerance),
        above(y(RightKnee), y(RightAnkle), config.knee_ankle_tolerance),
        shoulder_separation,
    ];

    let checkable = checks.iter().flatten().count();
    let valid = checks.iter().flatten().filter(|ok| **ok).count();
    fraction_result(valid, checkable, config.pass_fraction, "spatial relations")
}

/// Mean key-landmark displacement against the last accepted frame
pub fn temporal_consistency(
    frame: &PoseFrame,
    baseline: &ValidationBaseline,
    config: &TemporalConfig,
) -> CheckResult {
    let Some(previous) = baseline.last_pose() else {
        return CheckResult::skipped("no accepted frame to compare against");
    };

    let displacements: Vec<f64> = config
        .key_landmarks
        .iter()
        .filter(|&&lm| {
            visible(frame, lm, config.min_confidence)
                && visible(previous, lm, config.min_confidence)
        })
        .map(|&lm| frame.planar(lm).distance(previous.planar(lm)))
        .collect();
    if displacements.is_empty() {
        return CheckResult::skipped("no key landmark visible in both frames");
    }

    let movement = displacements.iter().sum::<f64>() / displacements.len() as f64;
    let budget = config.max_movement_per_frame;
    let score = if movement <= budget {
        1.0
    } else {
        (1.0 - (movement - budget) / budget).max(0.0)
    };

    CheckResult::new(
        score >= config.pass_score,
        score,
        format!(
            "average movement {movement:.3} since frame {} (budget {budget:.3})",
            previous.frame_index()
        ),
    )
}

/// Head/torso/leg decomposition of the body height
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightEstimate {
    pub head: f64,
    pub torso: f64,
    pub legs: f64,
    /// Area of the bounding box around all visible landmarks
    pub body_area: f64,
}

impl HeightEstimate {
    pub fn total(&self) -> f64 {
        self.head + self.torso + self.legs
    }
}

/// Estimate body height from landmark y-coordinates.
///
/// Needs both shoulders and both hips. A hidden head or hidden legs are
/// estimated from the torso length.
pub fn estimate_body_height(frame: &PoseFrame, config: &HeightConfig) -> Option<HeightEstimate> {
    let c = config.min_confidence;
    if !TORSO_CORNERS.iter().all(|&lm| visible(frame, lm, c)) {
        return None;
    }

    let shoulder_y = frame.planar(LeftShoulder).midpoint(frame.planar(RightShoulder)).y;
    let hip_y = frame.planar(LeftHip).midpoint(frame.planar(RightHip)).y;
    let torso = hip_y - shoulder_y;

    let head = match position(frame, Nose, c) {
        Some(nose) => shoulder_y - nose.y,
        None => torso * 0.4,
    };

    let legs = if let Some(ankle) = pair_midpoint(frame, LeftAnkle, RightAnkle, c) {
        ankle.y - hip_y
    } else if let Some(knee) = pair_midpoint(frame, LeftKnee, RightKnee, c) {
        (knee.y - hip_y) * 2.0
    } else {
        torso * 1.6
    };

    let mut min = Vec3::planar(f64::INFINITY, f64::INFINITY);
    let mut max = Vec3::planar(f64::NEG_INFINITY, f64::NEG_INFINITY);
    for landmark in BodyLandmark::ALL {
        if let Some(p) = position(frame, landmark, c) {
            min = Vec3::planar(min.x.min(p.x), min.y.min(p.y));
            max = Vec3::planar(max.x.max(p.x), max.y.max(p.y));
        }
    }
    let body_area = (max.x - min.x) * (max.y - min.y);

    Some(HeightEstimate {
        head,
        torso,
        legs,
        body_area,
    })
}

/// Segment fractions, silhouette size and stability of the body height
pub fn body_height_consistency(
    frame: &PoseFrame,
    baseline: &ValidationBaseline,
    config: &HeightConfig,
) -> CheckResult {
    let Some(estimate) = estimate_body_height(frame, config) else {
        return CheckResult::skipped("torso landmarks not visible");
    };

    let total = estimate.total();
    if total <= EPSILON {
        return CheckResult::new(false, 0.0, format!("degenerate body height {total:.3}"));
    }

    let area_ok = estimate.body_area >= config.min_body_area;
    let mut sub_checks = vec![
        config.head_fraction.contains(estimate.head / total),
        config.torso_fraction.contains(estimate.torso / total),
        config.leg_fraction.contains(estimate.legs / total),
        area_ok,
    ];

    let deviation = baseline.mean_height().map(|mean| (total - mean).abs() / mean);
    if let Some(deviation) = deviation {
        sub_checks.push(deviation <= config.max_height_deviation);
    }

    let passed_count = sub_checks.iter().filter(|ok| **ok).count();
    let score = passed_count as f64 / sub_checks.len() as f64;

    let mut details = format!(
        "height {total:.3} (head {:.2}, torso {:.2}, legs {:.2}), area {:.3}",
        estimate.head / total,
        estimate.torso / total,
        estimate.legs / total,
        estimate.body_area
    );
    if let Some(deviation) = deviation {
        details.push_str(&format!(", deviation {deviation:.2}"));
    }

    CheckResult::new(area_ok && score >= config.pass_score, score, details)
}
