//! Range-of-motion accumulation
//!
//! Running min/max angle per joint over a session. Records only ever widen.

use crate::motion::angles::JointAngleSample;
use crate::types::JointId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Read-only classification of a joint's span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeCategory {
    Minimal,
    Limited,
    Moderate,
    Full,
}

impl RangeCategory {
    pub fn from_span(degrees: f64) -> Self {
        if degrees < 15.0 {
            RangeCategory::Minimal
        } else if degrees < 45.0 {
            RangeCategory::Limited
        } else if degrees < 90.0 {
            RangeCategory::Moderate
        } else {
            RangeCategory::Full
        }
    }
}

/// Accumulated range of motion for one joint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeOfMotionRecord {
    pub joint: JointId,
    pub min_degrees: f64,
    pub max_degrees: f64,
    pub sample_count: u64,
    pub running_avg_confidence: f64,
}

impl RangeOfMotionRecord {
    fn new(sample: &JointAngleSample) -> Self {
        Self {
            joint: sample.joint,
            min_degrees: sample.degrees,
            max_degrees: sample.degrees,
            sample_count: 1,
            running_avg_confidence: sample.confidence,
        }
    }

    pub fn span_degrees(&self) -> f64 {
        self.max_degrees - self.min_degrees
    }

    pub fn category(&self) -> RangeCategory {
        RangeCategory::from_span(self.span_degrees())
    }
}

/// Per-joint range-of-motion tracker
#[derive(Debug, Clone)]
pub struct RangeOfMotionTracker {
    min_confidence: f64,
    records: BTreeMap<JointId, RangeOfMotionRecord>,
}

impl Default for RangeOfMotionTracker {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl RangeOfMotionTracker {
    pub fn new(min_confidence: f64) -> Self {
        Self {
            min_confidence,
            records: BTreeMap::new(),
        }
    }

    /// Incorporate one sample. Returns false when it is below the confidence floor.
    pub fn update(&mut self, sample: &JointAngleSample) -> bool {
        if sample.confidence < self.min_confidence {
            return false;
        }

        match self.records.get_mut(&sample.joint) {
            Some(record) => {
                record.min_degrees = record.min_degrees.min(sample.degrees);
                record.max_degrees = record.max_degrees.max(sample.degrees);
                record.sample_count += 1;
                let delta = sample.confidence - record.running_avg_confidence;
                record.running_avg_confidence += delta / record.sample_count as f64;
            }
            None => {
                self.records
                    .insert(sample.joint, RangeOfMotionRecord::new(sample));
            }
        }
        true
    }

    pub fn update_all<'a>(&mut self, samples: impl IntoIterator<Item = &'a JointAngleSample>) {
        for sample in samples {
            self.update(sample);
        }
    }

    pub fn record(&self, joint: JointId) -> Option<&RangeOfMotionRecord> {
        self.records.get(&joint)
    }

    pub fn records(&self) -> &BTreeMap<JointId, RangeOfMotionRecord> {
        &self.records
    }

    pub fn reset(&mut self) {
        self.records.clear();
    }
}
