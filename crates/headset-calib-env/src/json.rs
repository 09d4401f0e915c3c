//! Strict, round-trippable JSON codec for [`EnvironmentProfileCollection`].

use std::{fs, path::Path};

use crate::EnvironmentProfileCollection;

/// Errors returned by the environment profile codec.
#[derive(thiserror::Error, Debug)]
pub enum EnvironmentProfileError {
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error("environment profile schema violation: {0}")]
    SchemaViolation(#[source] serde_json::Error),
    #[error("environment profile '{profile}' has a non-finite value in {field}")]
    NonFiniteValue {
        profile: String,
        field: &'static str,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Decode a collection. `None` and `""` are rejected before parsing.
///
/// Invalid JSON, unknown members and missing or mistyped required members
/// all fail with [`EnvironmentProfileError::SchemaViolation`].
pub fn deserialize_environment_profiles(
    data: Option<&str>,
) -> Result<EnvironmentProfileCollection, EnvironmentProfileError> {
    let data = match data {
        None => return Err(EnvironmentProfileError::InvalidArgument("data is null")),
        Some("") => return Err(EnvironmentProfileError::InvalidArgument("data is empty")),
        Some(data) => data,
    };
    serde_json::from_str(data).map_err(EnvironmentProfileError::SchemaViolation)
}

/// Encode a collection as indented JSON with profiles in name order.
///
/// NaN and infinite coordinates fail with
/// [`EnvironmentProfileError::NonFiniteValue`] before anything is written.
pub fn serialize_environment_profiles(
    collection: Option<&EnvironmentProfileCollection>,
) -> Result<String, EnvironmentProfileError> {
    let collection =
        collection.ok_or(EnvironmentProfileError::InvalidArgument("collection is null"))?;
    for (name, profile) in collection.iter() {
        if let Some(field) = profile.non_finite_field() {
            return Err(EnvironmentProfileError::NonFiniteValue {
                profile: name.clone(),
                field,
            });
        }
    }
    serde_json::to_string_pretty(collection).map_err(EnvironmentProfileError::SchemaViolation)
}

impl EnvironmentProfileCollection {
    /// Parse from a JSON string.
    pub fn from_json_str(data: &str) -> Result<Self, EnvironmentProfileError> {
        deserialize_environment_profiles(Some(data))
    }

    /// Render as pretty JSON.
    pub fn to_json_string(&self) -> Result<String, EnvironmentProfileError> {
        serialize_environment_profiles(Some(self))
    }

    /// Load a collection from a JSON file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, EnvironmentProfileError> {
        let raw = fs::read_to_string(path.as_ref())?;
        let collection = Self::from_json_str(&raw)?;
        log::debug!(
            "read {} environment profile(s) from {}",
            collection.len(),
            path.as_ref().display()
        );
        Ok(collection)
    }

    /// Write this collection to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), EnvironmentProfileError> {
        let json = self.to_json_string()?;
        fs::write(path, json)?;
        Ok(())
    }
}
