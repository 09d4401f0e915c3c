//! Per-device camera calibration loading.
//!
//! The headset driver hands over calibration as a JSON array of
//! `{ "name", "relative_pose", "camera_model" }` objects. This crate turns
//! that payload into a [`CalibrationSet`](headset_calib_core::CalibrationSet):
//!
//! - an absent or empty payload, or one that is not a JSON array, yields no
//!   result at all;
//! - every array element is parsed independently and a malformed element is
//!   logged and skipped;
//! - a `relative_pose` shorter than 12 values is logged and replaced by a
//!   zero matrix, but the entry is kept.
//!
//! ```
//! use headset_calib_loader::{CalibrationParameterLoader, StaticCalibrationSource};
//!
//! let json = r#"[{"name":"cam0",
//!     "relative_pose":["1","0","0","0","0","1","0","0","0","0","1","0"],
//!     "camera_model":["500","500","320","240"]}]"#;
//! let loader = CalibrationParameterLoader::new(StaticCalibrationSource::new(json));
//! let profiles = loader.load().expect("calibration present");
//! assert_eq!(profiles["cam0"].camera_model().len(), 4);
//! ```

mod error;
mod interop;
mod loader;
mod params;
mod source;

pub use error::{CalibrationEntryError, CalibrationLoadError, EntryIdentity, LoadDiagnostic};
pub use interop::{FetchJsonFn, NativeCalibrationSource, ReleaseJsonFn};
pub use loader::{parse_calibration_json, CalibrationLoad, CalibrationParameterLoader};
pub use params::{CalibrationLoaderParams, ParamsIoError};
pub use source::{CalibrationSource, FileCalibrationSource, StaticCalibrationSource};
