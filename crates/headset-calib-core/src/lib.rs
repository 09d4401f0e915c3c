//! Core types for headset camera calibration.
//!
//! This crate holds the shared data model used by the loader, the
//! environment-profile codec and the SLAM checker. It knows nothing about
//! where calibration JSON comes from.

mod logger;
mod pose;
mod profile;

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_with_level, level_from_verbosity};
pub use pose::{pose_from_slice, pose_to_flat, PoseLayout, POSE_BLOCK_LEN};
pub use profile::{CalibrationProfile, CalibrationSet};
