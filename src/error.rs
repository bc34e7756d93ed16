//! Error types for Synheart Motion

use crate::schema::RecordError;
use thiserror::Error;

/// Errors that can occur while processing a landmark stream
#[derive(Debug, Error)]
pub enum MotionError {
    #[error("Failed to parse frame record: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid frame record: {0}")]
    InvalidRecord(#[from] RecordError),

    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Session halted after {consecutive_errors} consecutive processing errors; start a new session")]
    SessionFatal { consecutive_errors: u32 },

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),
}
