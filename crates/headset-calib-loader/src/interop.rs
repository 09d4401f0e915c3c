//! C ABI boundary to the headset driver.
//!
//! The driver exposes a single call that writes a pointer to a
//! NUL-terminated JSON string into an out-parameter. The string is copied
//! into Rust-owned memory immediately and, if the driver provides a release
//! hook, handed back to it.

use std::ffi::{c_char, CStr};

use crate::CalibrationSource;

/// `bool get_json_data(const char** out_json)`
pub type FetchJsonFn = unsafe extern "C" fn(out_json: *mut *const c_char) -> bool;

/// `void release_json_data(const char* json)`
pub type ReleaseJsonFn = unsafe extern "C" fn(json: *const c_char);

/// Calibration source backed by the driver's C entry points.
#[derive(Clone, Copy, Debug)]
pub struct NativeCalibrationSource {
    fetch: FetchJsonFn,
    release: Option<ReleaseJsonFn>,
}

impl NativeCalibrationSource {
    /// Wrap the driver entry points.
    ///
    /// # Safety
    ///
    /// `fetch` must either leave `*out_json` untouched or store a pointer to a
    /// NUL-terminated string that stays valid until `release` is called on it
    /// (or for the life of the process when `release` is `None`). Both
    /// functions must be safe to call from the thread that calls
    /// [`CalibrationSource::fetch_calibration_json`].
    pub unsafe fn new(fetch: FetchJsonFn, release: Option<ReleaseJsonFn>) -> Self {
        Self { fetch, release }
    }
}

impl CalibrationSource for NativeCalibrationSource {
    fn fetch_calibration_json(&self) -> Option<String> {
        let mut ptr: *const c_char = std::ptr::null();
        // SAFETY: upheld by the contract of `NativeCalibrationSource::new`.
        let ok = unsafe { (self.fetch)(&mut ptr) };
        if ptr.is_null() {
            return None;
        }

        // SAFETY: non-null and NUL-terminated per the constructor contract.
        let json = unsafe { CStr::from_ptr(ptr) }
            .to_string_lossy()
            .into_owned();
        if let Some(release) = self.release {
            // SAFETY: `ptr` came from `fetch` and is released exactly once.
            unsafe { release(ptr) };
        }

        if !ok {
            log::debug!("driver reported no calibration data");
            return None;
        }
        Some(json)
    }
}
