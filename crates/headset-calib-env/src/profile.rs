//! Environment profile records.
//!
//! Every record type rejects unknown members; a payload written by a newer
//! spatial-mapping engine fails loudly instead of losing data on re-save.

use std::collections::btree_map::{self, BTreeMap};

use serde::{Deserialize, Serialize};

/// Axis-aligned extent of a mapped space, in map coordinates (meters).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvironmentBounds {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

/// A previously mapped physical space.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvironmentProfile {
    /// Persisted SLAM map the localizer should load for this space.
    pub slam_map_path: String,
    /// Row-major 4×4 transform from map frame to world anchor.
    pub origin_pose: [f64; 16],
    pub created_unix_ms: u64,
    /// Calibration profile the map was recorded with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calibration_profile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<EnvironmentBounds>,
}

impl EnvironmentProfile {
    /// Identity origin, no optional metadata.
    pub fn new(slam_map_path: impl Into<String>, created_unix_ms: u64) -> Self {
        Self {
            slam_map_path: slam_map_path.into(),
            origin_pose: IDENTITY_POSE,
            created_unix_ms,
            calibration_profile: None,
            description: None,
            bounds: None,
        }
    }

    /// First member holding a NaN or infinite value, if any. JSON has no
    /// spelling for those, so such a profile cannot be written.
    pub fn non_finite_field(&self) -> Option<&'static str> {
        let finite = |values: &[f64]| values.iter().all(|v| v.is_finite());
        if !finite(&self.origin_pose) {
            return Some("origin_pose");
        }
        match &self.bounds {
            Some(b) if !finite(&b.min) => Some("bounds.min"),
            Some(b) if !finite(&b.max) => Some("bounds.max"),
            _ => None,
        }
    }
}

const IDENTITY_POSE: [f64; 16] = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0,
];

/// Environment profiles keyed by profile name.
///
/// Serialized as a JSON object whose keys are the profile names.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnvironmentProfileCollection {
    profiles: BTreeMap<String, EnvironmentProfile>,
}

impl EnvironmentProfileCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a profile, returning the previous one.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        profile: EnvironmentProfile,
    ) -> Option<EnvironmentProfile> {
        self.profiles.insert(name.into(), profile)
    }

    pub fn get(&self, name: &str) -> Option<&EnvironmentProfile> {
        self.profiles.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<EnvironmentProfile> {
        self.profiles.remove(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Profiles in name order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, EnvironmentProfile> {
        self.profiles.iter()
    }
}

impl FromIterator<(String, EnvironmentProfile)> for EnvironmentProfileCollection {
    fn from_iter<I: IntoIterator<Item = (String, EnvironmentProfile)>>(iter: I) -> Self {
        Self {
            profiles: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a EnvironmentProfileCollection {
    type Item = (&'a String, &'a EnvironmentProfile);
    type IntoIter = btree_map::Iter<'a, String, EnvironmentProfile>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_replaces_by_name() {
        let mut c = EnvironmentProfileCollection::new();
        assert!(c.insert("office", EnvironmentProfile::new("a.map", 1)).is_none());
        let old = c.insert("office", EnvironmentProfile::new("b.map", 2));
        assert_eq!(old.map(|p| p.slam_map_path), Some("a.map".to_string()));
        assert_eq!(c.len(), 1);
        assert_eq!(c.get("office").map(|p| p.created_unix_ms), Some(2));
    }

    #[test]
    fn iteration_is_name_ordered() {
        let c: EnvironmentProfileCollection = [
            ("lab".to_string(), EnvironmentProfile::new("lab.map", 0)),
            ("attic".to_string(), EnvironmentProfile::new("attic.map", 0)),
        ]
        .into_iter()
        .collect();
        let names: Vec<&str> = c.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["attic", "lab"]);
    }
}
