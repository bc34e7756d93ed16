//! FFI bindings for Synheart Motion
//!
//! This module provides C-compatible functions for calling the motion engine from
//! mobile and desktop hosts. All functions use C strings (null-terminated) and
//! return allocated memory that must be freed by the caller using
//! `motion_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::config::{ConfigProfile, PipelineConfig};
use crate::encoder::MotionEncoder;
use crate::error::MotionError;
use crate::pipeline::{analyze_frames_json, validate_record, PoseProcessor};
use crate::schema::FrameRecord;

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Set the last error message
fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

/// Clear the last error message
fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Helper to convert C string to Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Helper to convert Rust string to C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

/// Helper to convert a Vec<String> of JSON documents to a JSON array string
fn vec_to_json_array(vec: Vec<String>) -> String {
    let elements: Vec<&str> = vec.iter().map(|s| s.as_str()).collect();
    format!("[{}]", elements.join(","))
}

/// A NULL profile selects the default profile
unsafe fn profile_from_ptr(profile: *const c_char) -> Result<ConfigProfile, MotionError> {
    if profile.is_null() {
        return Ok(ConfigProfile::Default);
    }
    match cstr_to_string(profile) {
        Some(name) => name.parse(),
        None => Err(MotionError::InvalidConfig(
            "profile name is not valid UTF-8".to_string(),
        )),
    }
}

/// Report an error result to the caller and return NULL
fn fail<T>(e: impl std::fmt::Display) -> *mut T {
    set_last_error(&e.to_string());
    ptr::null_mut()
}

// ============================================================================
// Stateless API
// ============================================================================

/// Analyze a JSON array of frame records and return a JSON array of payloads.
///
/// # Safety
/// - `records_json` must be a valid null-terminated C string.
/// - `profile` must be a valid null-terminated C string or NULL for the default.
/// - Returns a newly allocated string that must be freed with `motion_free_string`.
/// - Returns NULL on error; call `motion_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn motion_analyze_frames(
    records_json: *const c_char,
    profile: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let json_str = match cstr_to_string(records_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return ptr::null_mut();
        }
    };

    let profile = match profile_from_ptr(profile) {
        Ok(p) => p,
        Err(e) => return fail(e),
    };

    match analyze_frames_json(&json_str, profile) {
        Ok(payloads) => string_to_cstr(&vec_to_json_array(payloads)),
        Err(e) => fail(e),
    }
}

/// Validate a single frame record and return the validation result as JSON.
///
/// The check runs without session history, so the temporal check is reported
/// as skipped and the height check omits its deviation sub-check.
///
/// # Safety
/// - `record_json` must be a valid null-terminated C string.
/// - `profile` must be a valid null-terminated C string or NULL for the default.
/// - Returns a newly allocated string that must be freed with `motion_free_string`.
/// - Returns NULL on error; call `motion_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn motion_validate_frame(
    record_json: *const c_char,
    profile: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let json_str = match cstr_to_string(record_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return ptr::null_mut();
        }
    };

    let profile = match profile_from_ptr(profile) {
        Ok(p) => p,
        Err(e) => return fail(e),
    };

    let result = serde_json::from_str::<FrameRecord>(&json_str)
        .map_err(MotionError::from)
        .and_then(|record| validate_record(&record, profile))
        .and_then(|validation| serde_json::to_string(&validation).map_err(MotionError::from));

    match result {
        Ok(json) => string_to_cstr(&json),
        Err(e) => fail(e),
    }
}

// ============================================================================
// Stateful Processor API
// ============================================================================

/// Opaque handle to a PoseProcessor
pub struct MotionProcessorHandle {
    processor: PoseProcessor,
    encoder: MotionEncoder,
}

impl MotionProcessorHandle {
    fn new(config: PipelineConfig) -> Result<Self, MotionError> {
        Ok(Self {
            processor: PoseProcessor::new(config)?,
            encoder: MotionEncoder::new(),
        })
    }
}

/// Create a new processor from a named profile (`default`, `strict`,
/// `lenient`, `raw`).
///
/// # Safety
/// - `profile` must be a valid null-terminated C string or NULL for the default.
/// - Returns a pointer to a newly allocated processor.
/// - Must be freed with `motion_processor_free`.
/// - Returns NULL on error; call `motion_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn motion_processor_new(
    profile: *const c_char,
) -> *mut MotionProcessorHandle {
    clear_last_error();

    let handle = profile_from_ptr(profile)
        .and_then(|profile| MotionProcessorHandle::new(profile.config()));

    match handle {
        Ok(handle) => Box::into_raw(Box::new(handle)),
        Err(e) => fail(e),
    }
}

/// Create a new processor from a full JSON pipeline configuration.
///
/// # Safety
/// - `config_json` must be a valid null-terminated C string.
/// - Returns a pointer to a newly allocated processor.
/// - Must be freed with `motion_processor_free`.
/// - Returns NULL on error; call `motion_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn motion_processor_new_with_config(
    config_json: *const c_char,
) -> *mut MotionProcessorHandle {
    clear_last_error();

    let json_str = match cstr_to_string(config_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return ptr::null_mut();
        }
    };

    match PipelineConfig::from_json(&json_str).and_then(MotionProcessorHandle::new) {
        Ok(handle) => Box::into_raw(Box::new(handle)),
        Err(e) => fail(e),
    }
}

/// Free a processor.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `motion_processor_new` or
///   `motion_processor_new_with_config`.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn motion_processor_free(processor: *mut MotionProcessorHandle) {
    if !processor.is_null() {
        drop(Box::from_raw(processor));
    }
}

/// Process one frame record and return the encoded motion payload.
///
/// Frames must be submitted in capture order, one at a time.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `motion_processor_new`.
/// - `record_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `motion_free_string`.
/// - Returns NULL on error; call `motion_last_error` to get the error message.
///   Once the session is fatal every call fails until `motion_processor_reset`.
#[no_mangle]
pub unsafe extern "C" fn motion_processor_process(
    processor: *mut MotionProcessorHandle,
    record_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    if processor.is_null() {
        set_last_error("Null processor pointer");
        return ptr::null_mut();
    }

    let handle = &mut *processor;

    let json_str = match cstr_to_string(record_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return ptr::null_mut();
        }
    };

    let record: FrameRecord = match serde_json::from_str(&json_str) {
        Ok(record) => record,
        Err(e) => return fail(MotionError::from(e)),
    };

    let encoded = handle.processor.process_record(&record).and_then(|outcome| {
        handle
            .encoder
            .encode_to_line(handle.processor.session_id(), &outcome)
    });

    match encoded {
        Ok(json) => string_to_cstr(&json),
        Err(e) => fail(e),
    }
}

/// Report frames the host discarded before submitting them.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `motion_processor_new`.
/// - Returns 0 on success, non-zero on error.
#[no_mangle]
pub unsafe extern "C" fn motion_processor_record_dropped(
    processor: *mut MotionProcessorHandle,
    count: u64,
) -> i32 {
    clear_last_error();

    if processor.is_null() {
        set_last_error("Null processor pointer");
        return -1;
    }

    (*processor).processor.record_dropped(count);
    0
}

/// Snapshot the session metrics as JSON.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `motion_processor_new`.
/// - Returns a newly allocated string that must be freed with `motion_free_string`.
/// - Returns NULL on error; call `motion_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn motion_processor_metrics(
    processor: *mut MotionProcessorHandle,
) -> *mut c_char {
    clear_last_error();

    if processor.is_null() {
        set_last_error("Null processor pointer");
        return ptr::null_mut();
    }

    let handle = &*processor;

    match serde_json::to_string(&handle.processor.metrics()) {
        Ok(json) => string_to_cstr(&json),
        Err(e) => fail(MotionError::EncodingError(e.to_string())),
    }
}

/// Start a fresh session, clearing all state including a fatal halt.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `motion_processor_new`.
/// - Returns 0 on success, non-zero on error.
#[no_mangle]
pub unsafe extern "C" fn motion_processor_reset(processor: *mut MotionProcessorHandle) -> i32 {
    clear_last_error();

    if processor.is_null() {
        set_last_error("Null processor pointer");
        return -1;
    }

    (*processor).processor.reset();
    0
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by motion functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a motion function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn motion_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to a thread-local error string.
/// - The returned pointer is valid until the next motion function call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn motion_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

// ============================================================================
// Version Information
// ============================================================================

/// Get the library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn motion_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
