//! Where raw calibration JSON comes from.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Synchronous provider of the raw calibration payload.
///
/// `None` means "no calibration available" and is not an error.
pub trait CalibrationSource {
    fn fetch_calibration_json(&self) -> Option<String>;
}

impl<F> CalibrationSource for F
where
    F: Fn() -> Option<String>,
{
    fn fetch_calibration_json(&self) -> Option<String> {
        self()
    }
}

/// A fixed payload, mostly for tests and replaying captured driver output.
#[derive(Clone, Debug, Default)]
pub struct StaticCalibrationSource {
    json: Option<String>,
}

impl StaticCalibrationSource {
    pub fn new(json: impl Into<String>) -> Self {
        Self {
            json: Some(json.into()),
        }
    }

    pub fn empty() -> Self {
        Self { json: None }
    }
}

impl CalibrationSource for StaticCalibrationSource {
    fn fetch_calibration_json(&self) -> Option<String> {
        self.json.clone()
    }
}

/// Reads the payload from a file on every fetch.
#[derive(Clone, Debug)]
pub struct FileCalibrationSource {
    path: PathBuf,
}

impl FileCalibrationSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CalibrationSource for FileCalibrationSource {
    fn fetch_calibration_json(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Some(raw),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log::debug!("no calibration file at {}", self.path.display());
                None
            }
            Err(err) => {
                log::warn!(
                    "failed to read calibration file {}: {err}",
                    self.path.display()
                );
                None
            }
        }
    }
}
