//! Human plausibility validation
//!
//! Decides whether a raw frame shows a real, single human body before any of
//! it is trusted downstream.

pub mod baseline;
pub mod checks;
pub mod types;
pub mod validator;

pub use baseline::ValidationBaseline;
pub use checks::{estimate_body_height, HeightEstimate};
pub use types::{CheckKind, CheckResult, RejectionReason, ValidationResult};
pub use validator::HumanPlausibilityValidator;
