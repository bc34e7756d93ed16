//! pose.frame_record.v1 input schema
//!
//! This module defines the record the pose-detection model hands to the
//! pipeline for every camera frame, and the adapter that turns those records
//! into immutable `PoseFrame`s.

mod adapter;
mod frame_record;

pub use adapter::*;
pub use frame_record::*;
