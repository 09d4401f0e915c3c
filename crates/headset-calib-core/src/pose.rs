//! Flat pose layouts emitted by the headset driver.

use nalgebra::Matrix4;
use serde::{Deserialize, Serialize};

/// Number of values that make up the `[R | t]` block of a flat pose.
pub const POSE_BLOCK_LEN: usize = 12;

/// How the driver flattens the 3×4 `[R | t]` block into 12 values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoseLayout {
    /// Rows of `[R | t]`: `r00 r01 r02 tx  r10 r11 r12 ty  r20 r21 r22 tz`.
    #[default]
    #[serde(rename = "row_major_3x4")]
    RowMajor3x4,
    /// Columns of `[R | t]`: `r00 r10 r20  r01 r11 r21  r02 r12 r22  tx ty tz`.
    #[serde(rename = "column_major_4x3")]
    ColumnMajor4x3,
}

impl PoseLayout {
    /// Matrix coordinates `(row, col)` of the `k`-th flat value, `k < 12`.
    #[inline]
    fn cell(self, k: usize) -> (usize, usize) {
        match self {
            PoseLayout::RowMajor3x4 => (k / 4, k % 4),
            PoseLayout::ColumnMajor4x3 => (k % 3, k / 3),
        }
    }
}

/// Build a homogeneous 4×4 transform from the first 12 flat values.
///
/// Returns `None` when fewer than [`POSE_BLOCK_LEN`] values are given.
/// Values beyond the first 12 are ignored. The bottom row is `[0, 0, 0, 1]`.
pub fn pose_from_slice(values: &[f64], layout: PoseLayout) -> Option<Matrix4<f64>> {
    if values.len() < POSE_BLOCK_LEN {
        return None;
    }
    let mut m = Matrix4::identity();
    for (k, &v) in values.iter().take(POSE_BLOCK_LEN).enumerate() {
        let (r, c) = layout.cell(k);
        m[(r, c)] = v;
    }
    Some(m)
}

/// Flatten a transform back into the driver layout (first three rows only).
pub fn pose_to_flat(pose: &Matrix4<f64>, layout: PoseLayout) -> [f64; POSE_BLOCK_LEN] {
    let mut out = [0.0; POSE_BLOCK_LEN];
    for (k, slot) in out.iter_mut().enumerate() {
        let (r, c) = layout.cell(k);
        *slot = pose[(r, c)];
    }
    out
}
