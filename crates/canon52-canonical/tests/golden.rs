use std::collections::BTreeMap;

use canon52_canonical::{
    canon_json, canon_text, canon_then_hash, Canonicalizer, Digest, DigestAlg, HygieneReport,
    HygieneStatus, HygieneWarning, ProfileId,
};
use serde_json::{json, Value};

const CANON_PACK: &str = include_str!("../../../vectors/canon_vectors.json");

#[test]
fn digest_serializes_to_golden_json() {
    let digest = Digest::of_bytes(b"hello world");

    assert_eq!(
        serde_json::to_string(&digest).unwrap(),
        r#"{"alg":"sha-256","hex":"b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"}"#
    );
}

#[test]
fn hygiene_report_matches_expected_shape() {
    let report = HygieneReport {
        status: HygieneStatus::Ambiguous,
        warnings: vec![HygieneWarning::new("DuplicateKeys")],
        metrics: BTreeMap::from([("duplicate_keys".to_string(), 1)]),
        profile_id: ProfileId::canon_json(),
    };

    let serialized = serde_json::to_value(&report).unwrap();
    let expected = json!({
        "status": "Ambiguous",
        "warnings": ["DuplicateKeys"],
        "metrics": {"duplicate_keys": 1},
        "profile_id": "canon52_canonjson_v1"
    });

    assert_eq!(serialized, expected);
}

#[test]
fn canonicalizer_produces_ordered_bytes() {
    let canonicalizer = Canonicalizer::new(ProfileId::parse("profileid000000001").unwrap());
    let value = json!({"b": 1, "a": {"nested": [2, null]}});
    let result = canonicalizer.canonicalize(&value).unwrap();
    assert_eq!(result.bytes, br#"{"a":{"nested":[null,2]},"b":1}"#.to_vec());
    assert_eq!(result.report.status, HygieneStatus::Ambiguous);
}

#[test]
fn shipped_canon_vectors_reproduce() {
    let pack: Value = serde_json::from_str(CANON_PACK).unwrap();
    let vectors = pack["vectors"].as_array().unwrap();
    assert!(!vectors.is_empty());

    for v in vectors {
        let id = v["id"].as_str().unwrap();
        let kind = v["kind"].as_str().unwrap();
        let raw = v["raw"].as_str().unwrap();
        let got = canon_then_hash(kind, raw);
        match v["expected"].as_str().unwrap() {
            "hash" => {
                let expected = v["expected_hash"].as_str().unwrap();
                let digest = got.unwrap_or_else(|e| panic!("{id}: unexpected error {e}"));
                assert_eq!(digest.as_hex(), expected, "{id}");
            }
            "error" => {
                let err = got.expect_err(id);
                if let Some(code) = v.get("expected_error").and_then(Value::as_str) {
                    assert_eq!(err.code(), code, "{id}");
                }
            }
            other => panic!("{id}: unknown expectation {other}"),
        }
    }
}

#[test]
fn integer_edges_hash_like_shipped_vector() {
    // Same value as vector J012, spelled differently.
    let digest = canon_then_hash("json", "[0,-9223372036854775809,-0,18446744073709551616]").unwrap();
    assert_eq!(
        digest.as_hex(),
        "ab54f0aa13bffc6379f8e04e73ed906f2e279a2107c8e9cdf98c43dd5a4e212e"
    );
}

#[test]
fn non_finite_constant_fails_like_float() {
    let err = canon_then_hash("json", "[1, NaN]").unwrap_err();
    assert_eq!(err.code(), "FLOAT_FORBIDDEN");
}

#[test]
fn nfc_variants_hash_identically() {
    let composed = canon_then_hash("text", "caf\u{e9}").unwrap();
    let decomposed = canon_then_hash("text", "cafe\u{301}").unwrap();
    assert_eq!(composed, decomposed);
}

#[test]
fn tab_scenario() {
    assert_eq!(canon_text("col\tcol").unwrap_err().code(), "TAB_FORBIDDEN");
}

#[test]
fn float_scenario_fails_before_ordering() {
    assert_eq!(
        canon_json(r#"[3,"a",null,true,1.5]"#).unwrap_err().code(),
        "FLOAT_FORBIDDEN"
    );
}

#[test]
fn validated_digest_accepts_packed_hashes() {
    let pack: Value = serde_json::from_str(CANON_PACK).unwrap();
    for v in pack["vectors"].as_array().unwrap() {
        if let Some(hex) = v.get("expected_hash").and_then(Value::as_str) {
            assert!(Digest::new(DigestAlg::Sha256, hex).is_ok(), "{hex}");
        }
    }
}
