//! High-level facade crate for the `headset-calib-*` workspace.
//!
//! This crate provides:
//! - stable re-exports of the underlying crates
//! - [`localize_environment`], which looks up a stored environment profile
//!   and asks a [`SlamChecker`](slam::SlamChecker) to localize its map
//! - (feature `cli`) the `headset-calib` command-line tool
//!
//! ## Quickstart
//!
//! ```
//! use headset_calib::loader::{CalibrationParameterLoader, StaticCalibrationSource};
//!
//! let source = StaticCalibrationSource::new(
//!     r#"[{"name":"cam0","relative_pose":[1,0,0,0,0,1,0,0,0,0,1,0],"camera_model":[500,500,320,240]}]"#,
//! );
//! let profiles = CalibrationParameterLoader::new(source).load().expect("calibration present");
//! assert!(profiles.contains_key("cam0"));
//! ```
//!
//! ## API map
//! - `headset_calib::core`: calibration profiles, pose layouts, logger.
//! - `headset_calib::loader`: driver calibration JSON -> profiles.
//! - `headset_calib::env`: strict environment profile JSON codec.
//! - `headset_calib::slam`: one-shot SLAM map localization.

pub use headset_calib_core as core;
pub use headset_calib_env as env;
pub use headset_calib_loader as loader;
pub use headset_calib_slam as slam;

pub use headset_calib_core::{CalibrationProfile, CalibrationSet, PoseLayout};
pub use headset_calib_env::{EnvironmentProfile, EnvironmentProfileCollection};
pub use headset_calib_loader::CalibrationParameterLoader;
pub use headset_calib_slam::SlamChecker;

use headset_calib_slam::{LocalizationFuture, SlamCheckError};

/// Errors produced by the facade helpers.
#[derive(thiserror::Error, Debug)]
pub enum EnvironmentCheckError {
    #[error("no environment profile named '{0}'")]
    UnknownProfile(String),
    #[error(transparent)]
    Slam(#[from] SlamCheckError),
}

/// Start localizing against the SLAM map recorded for environment `name`.
pub fn localize_environment(
    checker: &SlamChecker,
    profiles: &EnvironmentProfileCollection,
    name: &str,
) -> Result<LocalizationFuture, EnvironmentCheckError> {
    let profile = profiles
        .get(name)
        .ok_or_else(|| EnvironmentCheckError::UnknownProfile(name.to_owned()))?;
    log::info!("localizing environment '{name}' ({})", profile.slam_map_path);
    Ok(checker.localize(&profile.slam_map_path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_environment_is_reported_by_name() {
        let checker = SlamChecker::without_localizer();
        let profiles = EnvironmentProfileCollection::new();
        let err = localize_environment(&checker, &profiles, "attic").expect_err("unknown");
        assert_eq!(err.to_string(), "no environment profile named 'attic'");
    }

    #[test]
    fn known_environment_starts_an_attempt() {
        let checker = SlamChecker::without_localizer();
        let mut profiles = EnvironmentProfileCollection::new();
        profiles.insert("lab", EnvironmentProfile::new("maps/lab.slam", 0));
        assert!(localize_environment(&checker, &profiles, "lab").is_ok());
    }
}
