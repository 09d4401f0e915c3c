//! Environment profiles: named, persisted spatial-mapping records.
//!
//! The codec is strict and all-or-nothing. Unknown members, missing
//! required members and type mismatches are errors, and a collection
//! survives `serialize -> deserialize` unchanged.
//!
//! ```
//! use headset_calib_env::{
//!     deserialize_environment_profiles, serialize_environment_profiles,
//!     EnvironmentProfile, EnvironmentProfileCollection,
//! };
//!
//! let mut profiles = EnvironmentProfileCollection::new();
//! profiles.insert("living_room", EnvironmentProfile::new("maps/living_room.map", 0));
//!
//! let json = serialize_environment_profiles(Some(&profiles)).unwrap();
//! let back = deserialize_environment_profiles(Some(&json)).unwrap();
//! assert_eq!(back, profiles);
//! ```

mod json;
mod profile;

pub use json::{
    deserialize_environment_profiles, serialize_environment_profiles, EnvironmentProfileError,
};
pub use profile::{EnvironmentBounds, EnvironmentProfile, EnvironmentProfileCollection};
