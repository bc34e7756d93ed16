//! Accepted-frame baselines
//!
//! Rolling windows of recently accepted poses and body heights, used by the
//! temporal-consistency and body-height checks. Only frames that passed
//! validation may be recorded here.

use crate::types::PoseFrame;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default number of accepted frames kept
pub const DEFAULT_TEMPORAL_WINDOW: usize = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationBaseline {
    /// Recently accepted raw frames, oldest first
    recent_poses: VecDeque<PoseFrame>,
    /// Body height estimates of recently accepted frames
    recent_heights: VecDeque<f64>,
    /// Maximum window size
    window_size: usize,
}

impl Default for ValidationBaseline {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPORAL_WINDOW)
    }
}

impl ValidationBaseline {
    pub fn new(window_size: usize) -> Self {
        let window_size = window_size.max(1);
        Self {
            recent_poses: VecDeque::with_capacity(window_size),
            recent_heights: VecDeque::with_capacity(window_size),
            window_size,
        }
    }

    /// Record a frame that passed validation, with its height estimate if one exists
    pub fn record_accepted(&mut self, frame: &PoseFrame, height: Option<f64>) {
        self.recent_poses.push_back(frame.clone());
        while self.recent_poses.len() > self.window_size {
            self.recent_poses.pop_front();
        }

        if let Some(height) = height.filter(|h| h.is_finite() && *h > 0.0) {
            self.recent_heights.push_back(height);
            while self.recent_heights.len() > self.window_size {
                self.recent_heights.pop_front();
            }
        }
    }

    /// Most recently accepted frame
    pub fn last_pose(&self) -> Option<&PoseFrame> {
        self.recent_poses.back()
    }

    /// Mean of the accepted height window
    pub fn mean_height(&self) -> Option<f64> {
        if self.recent_heights.is_empty() {
            return None;
        }
        let sum: f64 = self.recent_heights.iter().sum();
        Some(sum / self.recent_heights.len() as f64)
    }

    pub fn pose_count(&self) -> usize {
        self.recent_poses.len()
    }

    pub fn height_count(&self) -> usize {
        self.recent_heights.len()
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn clear(&mut self) {
        self.recent_poses.clear();
        self.recent_heights.clear();
    }
}
