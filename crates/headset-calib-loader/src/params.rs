//! JSON configuration for the calibration loader.

use std::{fs, path::Path};

use headset_calib_core::PoseLayout;
use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
pub enum ParamsIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Loader settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalibrationLoaderParams {
    /// Flat layout of `relative_pose` as emitted by the driver.
    #[serde(default)]
    pub pose_layout: PoseLayout,
}

impl CalibrationLoaderParams {
    /// Load params from a JSON file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ParamsIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write params to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ParamsIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
