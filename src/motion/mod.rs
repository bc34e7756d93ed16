//! Motion analysis
//!
//! Joint angles, landmark velocities and range of motion computed from
//! filtered, validated frames, plus the plug-in point for exercise analyzers.

pub mod analyzer;
pub mod angles;
pub mod range;
pub mod repetition;
pub mod velocity;

pub use analyzer::{MotionAnalyzer, MotionSnapshot};
pub use angles::{angle_between, JointAngleEngine, JointAngleSample, DEGENERATE_ANGLE_DEGREES};
pub use range::{RangeCategory, RangeOfMotionRecord, RangeOfMotionTracker};
pub use repetition::{ExerciseAnalyzer, RepetitionCounter, RepetitionPhase};
pub use velocity::{SpeedCategory, VelocityEngine, VelocitySample};
