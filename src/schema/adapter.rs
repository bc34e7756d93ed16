//! Adapter for converting pose.frame_record.v1 records into `PoseFrame`s
//!
//! Handles JSON / NDJSON parsing, per-record validation and derivation of the
//! inter-frame delta time for records that do not carry one.

use crate::error::MotionError;
use crate::schema::frame_record::{FrameRecord, RecordError};
use crate::types::PoseFrame;

/// Adapter for converting frame records to pose frames
pub struct FrameRecordAdapter;

/// Validation outcome for one record in a batch
#[derive(Debug, Clone)]
pub struct RecordValidation {
    /// Position of the record in the input
    pub index: usize,
    pub frame_index: u64,
    pub result: Option<RecordError>,
}

impl FrameRecordAdapter {
    /// Parse a JSON string containing an array of FrameRecords
    pub fn parse_array(json: &str) -> Result<Vec<FrameRecord>, MotionError> {
        let records: Vec<FrameRecord> = serde_json::from_str(json)?;
        Ok(records)
    }

    /// Parse NDJSON (newline-delimited JSON) containing FrameRecords
    pub fn parse_ndjson(ndjson: &str) -> Result<Vec<FrameRecord>, MotionError> {
        let mut records = Vec::new();
        for (line_num, line) in ndjson.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<FrameRecord>(trimmed) {
                Ok(record) => records.push(record),
                Err(e) => {
                    return Err(MotionError::ParseError(format!(
                        "Failed to parse line {}: {}",
                        line_num + 1,
                        e
                    )));
                }
            }
        }
        Ok(records)
    }

    /// Validate every record, returning only the failures
    pub fn validate_records(records: &[FrameRecord]) -> Vec<RecordValidation> {
        records
            .iter()
            .enumerate()
            .filter_map(|(index, record)| {
                record.validate().err().map(|e| RecordValidation {
                    index,
                    frame_index: record.frame_index,
                    result: Some(e),
                })
            })
            .collect()
    }

    /// Convert one record into a frame.
    ///
    /// The delta time comes from the record's own previous capture time when
    /// present, otherwise from `last_capture_time_micros` (the previous record of
    /// the session). It is `None` only when neither exists. Records without a
    /// detection cannot become frames.
    pub fn to_frame(
        record: &FrameRecord,
        last_capture_time_micros: Option<i64>,
    ) -> Result<PoseFrame, MotionError> {
        record.validate()?;
        if !record.has_detection() {
            return Err(MotionError::InvalidFrame(format!(
                "frame {} has no detected landmarks",
                record.frame_index
            )));
        }

        let delta_time_micros = record
            .previous_capture_time_micros
            .or(last_capture_time_micros)
            .map(|previous| record.capture_time_micros - previous);

        PoseFrame::new(
            record.frame_index,
            record.capture_time_micros,
            delta_time_micros,
            (record.image_width, record.image_height),
            record.coordinate_space,
            record.landmarks.clone(),
        )
    }

    /// Convert an ordered batch of records, skipping records without a detection
    pub fn to_frames(records: &[FrameRecord]) -> Result<Vec<PoseFrame>, MotionError> {
        let mut frames = Vec::with_capacity(records.len());
        let mut last_capture = None;

        for record in records {
            if record.has_detection() {
                frames.push(Self::to_frame(record, last_capture)?);
            } else {
                record.validate()?;
            }
            last_capture = Some(record.capture_time_micros);
        }

        Ok(frames)
    }
}
