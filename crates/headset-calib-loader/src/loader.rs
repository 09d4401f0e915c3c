//! Calibration loading: raw driver JSON -> named calibration profiles.
//!
//! Loading is best-effort and entry-isolated. The payload must be a JSON
//! array; every element is parsed on its own and a bad element only costs
//! that element. Numeric values may be JSON numbers or numeric strings.

use headset_calib_core::{pose_from_slice, CalibrationProfile, CalibrationSet, PoseLayout};
use nalgebra::Matrix4;
use serde_json::{Map, Value};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    CalibrationEntryError, CalibrationLoadError, CalibrationLoaderParams, CalibrationSource,
    EntryIdentity, LoadDiagnostic,
};

const NAME: &str = "name";
const RELATIVE_POSE: &str = "relative_pose";
const CAMERA_MODEL: &str = "camera_model";

/// Profiles plus everything worth reporting about the entries.
#[derive(Clone, Debug, Default)]
pub struct CalibrationLoad {
    pub profiles: CalibrationSet,
    pub diagnostics: Vec<LoadDiagnostic>,
}

impl CalibrationLoad {
    /// Number of input entries that were discarded.
    pub fn rejected_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_rejection()).count()
    }
}

/// Pulls calibration JSON from a [`CalibrationSource`] and parses it.
#[derive(Clone, Debug)]
pub struct CalibrationParameterLoader<S> {
    source: S,
    params: CalibrationLoaderParams,
}

impl<S: CalibrationSource> CalibrationParameterLoader<S> {
    pub fn new(source: S) -> Self {
        Self::with_params(source, CalibrationLoaderParams::default())
    }

    pub fn with_params(source: S, params: CalibrationLoaderParams) -> Self {
        Self { source, params }
    }

    #[inline]
    pub fn params(&self) -> &CalibrationLoaderParams {
        &self.params
    }

    #[inline]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Load all well-formed profiles.
    ///
    /// Returns `None` when the source has no data or the payload is not a
    /// JSON array. Otherwise returns a (possibly empty) mapping.
    pub fn load(&self) -> Option<CalibrationSet> {
        match self.try_load() {
            Ok(load) => Some(load.profiles),
            Err(CalibrationLoadError::NoInteropData) => None,
            Err(err) => {
                log::error!("{err}");
                None
            }
        }
    }

    /// Like [`load`](Self::load) but keeps the diagnostics and the reason
    /// for an absent result.
    #[cfg_attr(feature = "tracing", instrument(level = "info", skip(self)))]
    pub fn try_load(&self) -> Result<CalibrationLoad, CalibrationLoadError> {
        let raw = self
            .source
            .fetch_calibration_json()
            .filter(|raw| !raw.is_empty())
            .ok_or(CalibrationLoadError::NoInteropData)?;
        parse_calibration_json(&raw, self.params.pose_layout)
    }
}

/// Parse a calibration payload.
///
/// Fails only when `raw` is not a JSON array; entry problems are reported
/// through [`CalibrationLoad::diagnostics`] and logged.
pub fn parse_calibration_json(
    raw: &str,
    layout: PoseLayout,
) -> Result<CalibrationLoad, CalibrationLoadError> {
    let nodes: Vec<Value> = serde_json::from_str(raw)?;
    let mut out = CalibrationLoad::default();

    for (index, node) in nodes.iter().enumerate() {
        let mut entry = EntryIdentity::Index(index);
        let parsed = parse_entry(node, layout, &mut entry, &mut out.diagnostics)
            .and_then(|profile| {
                if out.profiles.contains_key(profile.name()) {
                    Err(CalibrationEntryError::DuplicateName)
                } else {
                    Ok(profile)
                }
            });

        match parsed {
            Ok(profile) => {
                out.profiles.insert(profile.name().to_owned(), profile);
            }
            Err(error) => {
                let diag = LoadDiagnostic::Rejected { entry, error };
                log::error!("{diag}");
                out.diagnostics.push(diag);
            }
        }
    }

    log::info!(
        "loaded {} calibration profile(s), discarded {}",
        out.profiles.len(),
        out.rejected_count()
    );
    Ok(out)
}

/// Parse one array element. `entry` is upgraded to the profile name as soon
/// as the name has been read.
fn parse_entry(
    node: &Value,
    layout: PoseLayout,
    entry: &mut EntryIdentity,
    diagnostics: &mut Vec<LoadDiagnostic>,
) -> Result<CalibrationProfile, CalibrationEntryError> {
    let obj = node.as_object().ok_or(CalibrationEntryError::NotAnObject)?;

    let name = match obj.get(NAME) {
        None => return Err(CalibrationEntryError::MissingField(NAME)),
        Some(Value::String(name)) => name.clone(),
        Some(_) => {
            return Err(CalibrationEntryError::WrongType {
                field: NAME,
                expected: "a string",
            })
        }
    };
    *entry = EntryIdentity::Name(name.clone());

    let pose_values = numeric_array(obj, RELATIVE_POSE)?;
    let relative_pose = match pose_from_slice(&pose_values, layout) {
        Some(pose) => pose,
        None => {
            let diag = LoadDiagnostic::PoseTooShort {
                entry: entry.clone(),
                len: pose_values.len(),
            };
            log::error!("{diag}");
            diagnostics.push(diag);
            Matrix4::zeros()
        }
    };

    let camera_model = numeric_array(obj, CAMERA_MODEL)?;

    Ok(CalibrationProfile::new(name, relative_pose, camera_model))
}

fn numeric_array(
    obj: &Map<String, Value>,
    field: &'static str,
) -> Result<Vec<f64>, CalibrationEntryError> {
    let items = obj
        .get(field)
        .ok_or(CalibrationEntryError::MissingField(field))?
        .as_array()
        .ok_or(CalibrationEntryError::WrongType {
            field,
            expected: "an array",
        })?;

    items
        .iter()
        .enumerate()
        .map(|(index, v)| numeric_value(v).ok_or(CalibrationEntryError::NonNumeric { field, index }))
        .collect()
}

/// Accept `1.5` as well as `"1.5"`. `"NaN"` and `"inf"` are not numbers here.
fn numeric_value(v: &Value) -> Option<f64> {
    let value = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    value.filter(|x| x.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pose12() -> Value {
        Value::from(vec![0; 12])
    }

    fn parse(v: Value) -> CalibrationLoad {
        parse_calibration_json(&v.to_string(), PoseLayout::RowMajor3x4).expect("array payload")
    }

    #[test]
    fn numbers_and_numeric_strings_mix() {
        assert_eq!(numeric_value(&json!(2)), Some(2.0));
        assert_eq!(numeric_value(&json!(" -0.5 ")), Some(-0.5));
        assert_eq!(numeric_value(&json!("1e3")), Some(1000.0));
        assert_eq!(numeric_value(&json!("abc")), None);
        assert_eq!(numeric_value(&json!(true)), None);
        assert_eq!(numeric_value(&Value::Null), None);
        assert_eq!(numeric_value(&json!("NaN")), None);
        assert_eq!(numeric_value(&json!("inf")), None);
        assert_eq!(numeric_value(&json!("-infinity")), None);
        assert_eq!(numeric_value(&json!("1e400")), None);
    }

    #[test]
    fn non_finite_pose_string_rejects_the_entry() {
        let mut pose = vec![json!(0); 12];
        pose[5] = json!("NaN");
        let load = parse(json!([
            { "name": "cam0", "relative_pose": pose, "camera_model": [1] }
        ]));
        assert!(load.profiles.is_empty());
        assert_eq!(
            load.diagnostics,
            vec![LoadDiagnostic::Rejected {
                entry: EntryIdentity::Name("cam0".into()),
                error: CalibrationEntryError::NonNumeric {
                    field: RELATIVE_POSE,
                    index: 5
                },
            }]
        );
    }

    #[test]
    fn non_object_entry_is_identified_by_index() {
        let load = parse(json!([42]));
        assert!(load.profiles.is_empty());
        assert_eq!(
            load.diagnostics,
            vec![LoadDiagnostic::Rejected {
                entry: EntryIdentity::Index(0),
                error: CalibrationEntryError::NotAnObject,
            }]
        );
    }

    #[test]
    fn failure_after_name_is_identified_by_name() {
        let load = parse(json!([
            { "name": "cam0", "relative_pose": pose12(), "camera_model": ["x"] }
        ]));
        assert_eq!(
            load.diagnostics,
            vec![LoadDiagnostic::Rejected {
                entry: EntryIdentity::Name("cam0".into()),
                error: CalibrationEntryError::NonNumeric {
                    field: CAMERA_MODEL,
                    index: 0
                },
            }]
        );
    }

    #[test]
    fn non_string_name_is_a_type_error() {
        let load = parse(json!([
            { "name": 7, "relative_pose": pose12(), "camera_model": [] }
        ]));
        assert!(matches!(
            &load.diagnostics[0],
            LoadDiagnostic::Rejected {
                entry: EntryIdentity::Index(0),
                error: CalibrationEntryError::WrongType { field: NAME, .. },
            }
        ));
    }

    #[test]
    fn pose_must_be_an_array() {
        let load = parse(json!([
            { "name": "cam0", "relative_pose": "1 0 0", "camera_model": [] }
        ]));
        assert_eq!(load.rejected_count(), 1);
        assert!(load.profiles.is_empty());
    }

    #[test]
    fn duplicate_name_keeps_first_occurrence() {
        let load = parse(json!([
            { "name": "cam0", "relative_pose": pose12(), "camera_model": [1] },
            { "name": "cam0", "relative_pose": pose12(), "camera_model": [2] }
        ]));
        assert_eq!(load.profiles["cam0"].camera_model(), &[1.0]);
        assert_eq!(
            load.diagnostics,
            vec![LoadDiagnostic::Rejected {
                entry: EntryIdentity::Name("cam0".into()),
                error: CalibrationEntryError::DuplicateName,
            }]
        );
    }

    #[test]
    fn top_level_object_is_unparsable() {
        let err = parse_calibration_json("{\"name\":\"cam0\"}", PoseLayout::RowMajor3x4)
            .expect_err("not an array");
        assert!(matches!(err, CalibrationLoadError::UnparsableJson(_)));
    }
}
