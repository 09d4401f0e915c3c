use headset_calib_env::{
    deserialize_environment_profiles, serialize_environment_profiles, EnvironmentBounds,
    EnvironmentProfile, EnvironmentProfileCollection, EnvironmentProfileError,
};

fn sample_collection() -> EnvironmentProfileCollection {
    let mut office = EnvironmentProfile::new("maps/office.slam", 1_717_171_717_000);
    office.origin_pose = [
        0.0, -1.0, 0.0, 0.1, //
        1.0, 0.0, 0.0, -2.75, //
        0.0, 0.0, 1.0, 1.0 / 3.0, //
        0.0, 0.0, 0.0, 1.0,
    ];
    office.calibration_profile = Some("cam0".into());
    office.description = Some("third floor, \"quiet\" room".into());
    office.bounds = Some(EnvironmentBounds {
        min: [-4.2, -0.01, -3.0],
        max: [5.5, 2.9, 1e-9],
    });

    let garage = EnvironmentProfile::new("maps/garage.slam", 0);

    [("office".to_string(), office), ("garage".to_string(), garage)]
        .into_iter()
        .collect()
}

fn valid_payload() -> serde_json::Value {
    serde_json::json!({
        "hall": {
            "slam_map_path": "maps/hall.slam",
            "origin_pose": [1,0,0,0, 0,1,0,0, 0,0,1,0, 0,0,0,1],
            "created_unix_ms": 42
        }
    })
}

fn expect_schema_violation(payload: &str) {
    match deserialize_environment_profiles(Some(payload)) {
        Err(EnvironmentProfileError::SchemaViolation(_)) => {}
        other => panic!("expected schema violation, got {other:?}"),
    }
}

#[test]
fn round_trip_preserves_every_field() {
    let original = sample_collection();
    let json = serialize_environment_profiles(Some(&original)).expect("serialize");
    let back = deserialize_environment_profiles(Some(&json)).expect("deserialize");
    assert_eq!(back, original);

    let again = serialize_environment_profiles(Some(&back)).expect("serialize again");
    assert_eq!(again, json, "serialization must be stable");
}

#[test]
fn minimal_payload_is_accepted() {
    let payload = valid_payload().to_string();
    let c = deserialize_environment_profiles(Some(&payload)).expect("valid");
    let hall = c.get("hall").expect("hall");
    assert_eq!(hall.created_unix_ms, 42);
    assert!(hall.bounds.is_none());
}

#[test]
fn unknown_profile_field_is_rejected() {
    let mut v = valid_payload();
    v["hall"]["floor"] = serde_json::json!(3);
    expect_schema_violation(&v.to_string());
}

#[test]
fn unknown_nested_field_is_rejected() {
    let mut v = valid_payload();
    v["hall"]["bounds"] = serde_json::json!({ "min": [0, 0, 0], "max": [1, 1, 1], "unit": "m" });
    expect_schema_violation(&v.to_string());
}

#[test]
fn missing_required_field_is_rejected() {
    let mut v = valid_payload();
    v["hall"]
        .as_object_mut()
        .expect("object")
        .remove("slam_map_path");
    expect_schema_violation(&v.to_string());
}

#[test]
fn mistyped_fields_are_rejected() {
    let mut v = valid_payload();
    v["hall"]["created_unix_ms"] = serde_json::json!("yesterday");
    expect_schema_violation(&v.to_string());

    let mut v = valid_payload();
    v["hall"]["origin_pose"] = serde_json::json!([1, 0, 0]);
    expect_schema_violation(&v.to_string());
}

#[test]
fn non_finite_pose_is_refused_at_write_time() {
    let mut collection = sample_collection();
    let mut broken = EnvironmentProfile::new("maps/attic.slam", 7);
    broken.origin_pose[3] = f64::NAN;
    collection.insert("attic", broken);

    match serialize_environment_profiles(Some(&collection)) {
        Err(EnvironmentProfileError::NonFiniteValue { profile, field }) => {
            assert_eq!(profile, "attic");
            assert_eq!(field, "origin_pose");
        }
        other => panic!("expected non-finite error, got {other:?}"),
    }

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("environments.json");
    assert!(collection.write_json(&path).is_err());
    assert!(!path.exists());
}

#[test]
fn malformed_json_is_a_schema_violation() {
    expect_schema_violation("{\"hall\": ");
    expect_schema_violation("[]");
}

#[test]
fn collection_survives_a_file_round_trip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("environments.json");
    let original = sample_collection();
    original.write_json(&path).expect("write");
    assert_eq!(
        EnvironmentProfileCollection::load_json(&path).expect("load"),
        original
    );
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = EnvironmentProfileCollection::load_json(dir.path().join("none.json"))
        .expect_err("missing");
    assert!(matches!(err, EnvironmentProfileError::Io(_)));
}
