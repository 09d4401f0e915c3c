use std::fmt;

/// Batch-level outcomes of a calibration load that produce no profiles.
#[derive(thiserror::Error, Debug)]
pub enum CalibrationLoadError {
    #[error("calibration source yielded no data")]
    NoInteropData,
    #[error("calibration payload is not a JSON array: {0}")]
    UnparsableJson(#[from] serde_json::Error),
}

/// Why a single calibration entry was discarded.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CalibrationEntryError {
    #[error("entry is not a JSON object")]
    NotAnObject,
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("field `{field}` must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
    #[error("field `{field}` has a non-numeric value at position {index}")]
    NonNumeric { field: &'static str, index: usize },
    #[error("profile name already loaded by an earlier entry")]
    DuplicateName,
}

/// Best-available identity of an input entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EntryIdentity {
    Name(String),
    /// 0-based position in the input array; used when no name was read.
    Index(usize),
}

impl fmt::Display for EntryIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryIdentity::Name(name) => write!(f, "'{name}'"),
            EntryIdentity::Index(index) => write!(f, "#{index}"),
        }
    }
}

/// Per-entry diagnostic recorded while loading a batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadDiagnostic {
    /// `relative_pose` was shorter than 12 values; the pose fell back to zero.
    PoseTooShort { entry: EntryIdentity, len: usize },
    /// The entry was discarded.
    Rejected {
        entry: EntryIdentity,
        error: CalibrationEntryError,
    },
}

impl LoadDiagnostic {
    pub fn entry(&self) -> &EntryIdentity {
        match self {
            LoadDiagnostic::PoseTooShort { entry, .. } | LoadDiagnostic::Rejected { entry, .. } => {
                entry
            }
        }
    }

    #[inline]
    pub fn is_rejection(&self) -> bool {
        matches!(self, LoadDiagnostic::Rejected { .. })
    }
}

impl fmt::Display for LoadDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadDiagnostic::PoseTooShort { entry, len } => write!(
                f,
                "calibration entry {entry}: relative_pose array too short ({len} < 12), using zero pose"
            ),
            LoadDiagnostic::Rejected { entry, error } => {
                write!(f, "calibration entry {entry} discarded: {error}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_prefers_readable_labels() {
        assert_eq!(EntryIdentity::Name("cam1".into()).to_string(), "'cam1'");
        assert_eq!(EntryIdentity::Index(3).to_string(), "#3");
    }

    #[test]
    fn rejection_message_names_entry_and_cause() {
        let d = LoadDiagnostic::Rejected {
            entry: EntryIdentity::Name("cam1".into()),
            error: CalibrationEntryError::MissingField("camera_model"),
        };
        assert!(d.is_rejection());
        assert_eq!(
            d.to_string(),
            "calibration entry 'cam1' discarded: missing field `camera_model`"
        );
    }
}
