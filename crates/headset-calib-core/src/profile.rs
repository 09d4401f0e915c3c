use std::collections::BTreeMap;

use nalgebra::Matrix4;
use serde::Serialize;

/// Extrinsic pose plus intrinsic camera model of one physical camera.
///
/// Profiles are built once by the calibration loader and are immutable
/// afterwards.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CalibrationProfile {
    name: String,
    relative_pose: Matrix4<f64>,
    camera_model: Vec<f64>,
}

impl CalibrationProfile {
    pub fn new(name: impl Into<String>, relative_pose: Matrix4<f64>, camera_model: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            relative_pose,
            camera_model,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Camera-to-reference transform.
    #[inline]
    pub fn relative_pose(&self) -> &Matrix4<f64> {
        &self.relative_pose
    }

    /// Driver-defined intrinsic parameters, in driver order.
    #[inline]
    pub fn camera_model(&self) -> &[f64] {
        &self.camera_model
    }

    /// True if the pose fell back to the all-zero matrix.
    pub fn has_zero_pose(&self) -> bool {
        self.relative_pose.iter().all(|v| *v == 0.0)
    }
}

/// Calibration profiles keyed by profile name.
pub type CalibrationSet = BTreeMap<String, CalibrationProfile>;
