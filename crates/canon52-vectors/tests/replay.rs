use std::fs;
use std::path::PathBuf;

use canon52_vectors::{
    load_adjudication_pack, load_canon_pack, load_packs, parse_anchor_document, write_pack,
    AdjudicationPack, AdjudicationVector, AnchorName, AnchorSet, CanonPack, FailureReason,
    PackPaths, ReplayError, Suite, VectorRunner,
};
use serde_json::json;
use tempfile::TempDir;

fn shipped_paths() -> PackPaths {
    PackPaths::in_dir(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../vectors"))
}

#[test]
fn test_shipped_canon_pack_passes() {
    let pack = load_canon_pack(shipped_paths().canon).unwrap();
    assert_eq!(pack.vectors().len(), 27);

    let summary = VectorRunner::new().run_canon(pack.vectors());
    assert!(summary.failures.is_empty(), "{:?}", summary.failures);
    assert_eq!(summary.passed, 27);
    assert_eq!(summary.to_string(), "[CanonSelfTest] OK=27 FAIL=0");
}

#[test]
fn test_shipped_adjudication_pack_passes() {
    let pack = load_adjudication_pack(shipped_paths().adjud).unwrap();
    assert_eq!(pack.vectors().len(), 20);

    let summary = VectorRunner::new().run_adjudication(pack.vectors()).unwrap();
    assert!(summary.failures.is_empty(), "{:?}", summary.failures);
    assert_eq!(summary.suite, Suite::Adjudication);
    assert_eq!(summary.to_string(), "[AdjudTest] OK=20 FAIL=0");
}

#[test]
fn test_shipped_pack_anchors() {
    let (canon, adjud) = load_packs(&shipped_paths()).unwrap();
    let anchors = AnchorSet::compute(canon.document(), adjud.document()).unwrap();

    assert_eq!(
        anchors.get(AnchorName::CanonPack).unwrap().as_hex(),
        "8e43cc7043d42ea3c5abf5aaf1ffab5388225519bfe9d95fc4116b5c5f6523dd"
    );
    assert_eq!(
        anchors.get(AnchorName::AdjudPack).unwrap().as_hex(),
        "0dd040ffdaab16e6628a6e9203f331c48108b02d038129c6564e8970fa14168c"
    );
    assert_eq!(canon.digest().unwrap(), *anchors.get(AnchorName::CanonPack).unwrap());
}

#[test]
fn test_published_anchor_document_has_no_drift() {
    let (canon, adjud) = load_packs(&shipped_paths()).unwrap();
    let anchors = AnchorSet::compute(canon.document(), adjud.document()).unwrap();

    let doc_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../ANCHORS.md");
    let documented = parse_anchor_document(&fs::read_to_string(doc_path).unwrap()).unwrap();
    assert_eq!(documented.len(), 6);
    assert!(anchors.compare(&documented).is_empty());
}

#[test]
fn test_failures_do_not_stop_replay() {
    let pack = CanonPack::from_document(json!({
        "vectors": [
            {"id": "a", "kind": "text", "raw": "x", "expected": "hash", "expected_hash": "00"},
            {"id": "b", "kind": "text", "raw": "a\tb", "expected": "hash", "expected_hash": "00"},
            {"id": "c", "kind": "json", "raw": "[1.0]", "expected": "error", "expected_error": "FLOAT_FORBIDDEN"}
        ]
    }))
    .unwrap();

    let summary = VectorRunner::new().run_canon(pack.vectors());
    assert_eq!((summary.passed, summary.failed), (1, 2));
    assert!(!summary.is_success());
    assert!(matches!(
        summary.failures[0].reason,
        FailureReason::HashMismatch { .. }
    ));
    assert_eq!(
        summary.failures[1].reason,
        FailureReason::UnexpectedError("TAB_FORBIDDEN".into())
    );
    assert_eq!(summary.failures[1].to_string(), "[FAIL] b: TAB_FORBIDDEN");
}

#[test]
fn test_expected_record_mismatch_names_fields() {
    let pack = load_adjudication_pack(shipped_paths().adjud).unwrap();
    let mut vector: AdjudicationVector = pack.vectors()[0].clone();
    vector.expected["Route"] = json!("BLACKHOLE");
    vector.expected["AttackHard"] = json!(true);

    let summary = VectorRunner::new().run_adjudication(&[vector]).unwrap();
    assert_eq!(summary.failed, 1);
    match &summary.failures[0].reason {
        FailureReason::FieldMismatch(fields) => {
            let names: Vec<&str> = fields.iter().map(|m| m.field).collect();
            assert_eq!(names, vec!["Route", "AttackHard"]);
        }
        other => panic!("unexpected reason {other:?}"),
    }
}

#[test]
fn test_boolean_spelled_flags_compare_equal() {
    let pack = load_adjudication_pack(shipped_paths().adjud).unwrap();
    let mut vector = pack.vectors()[0].clone();
    let hard = vector.expected["AttackHard"].as_i64().unwrap();
    vector.expected["AttackHard"] = json!(hard == 1);

    let summary = VectorRunner::new().run_adjudication(&[vector]).unwrap();
    assert!(summary.is_success());
}

#[test]
fn test_dump_round_trip() {
    let (canon, adjud) = load_packs(&shipped_paths()).unwrap();
    let dir = TempDir::new().unwrap();
    let out = PackPaths::in_dir(dir.path().join("nested"));

    write_pack(&out.canon, canon.document()).unwrap();
    write_pack(&out.adjud, adjud.document()).unwrap();

    // Shipped packs are already in dump layout, so a rewrite is byte-identical.
    let original = shipped_paths();
    for (written, shipped) in [(&out.canon, &original.canon), (&out.adjud, &original.adjud)] {
        assert_eq!(
            fs::read_to_string(written).unwrap(),
            fs::read_to_string(shipped).unwrap()
        );
    }

    let (canon2, adjud2) = load_packs(&out).unwrap();
    assert_eq!(canon2.document(), canon.document());
    assert_eq!(adjud2.digest().unwrap(), adjud.digest().unwrap());
}

#[test]
fn test_missing_pack_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = load_canon_pack(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ReplayError::Io { .. }));
}

#[test]
fn test_unparsable_pack_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("adjud_vectors.json");
    fs::write(&path, "{ not json").unwrap();
    let err = load_adjudication_pack(&path).unwrap_err();
    assert!(matches!(err, ReplayError::JsonParse { .. }));
}

#[test]
fn test_vector_missing_required_field_is_malformed() {
    let err = AdjudicationPack::from_document(json!({"vectors": [{"id": "A"}]})).unwrap_err();
    assert!(matches!(err, ReplayError::MalformedPack(_)));
}
