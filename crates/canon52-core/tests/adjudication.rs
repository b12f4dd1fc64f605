use std::num::NonZeroI64;

use canon52_core::{
    adjudicate, AdjudicationError, AdjudicationRequest, DecisionRecord, Justification,
    OutputClass, Plane, ReceiptKind, Route,
};
use serde_json::{json, Value};

const ADJUD_PACK: &str = include_str!("../../../vectors/adjud_vectors.json");

fn decide(req: Value) -> DecisionRecord {
    let req = AdjudicationRequest::from_value(&req).unwrap();
    adjudicate(&req).unwrap()
}

/// Builds a request from a bit mask over every boolean flag.
fn make_request(mask: u32, i_flow: i64, commit_unique: i64) -> AdjudicationRequest {
    let bit = |n: u32| mask & (1 << n) != 0;
    AdjudicationRequest {
        chi_harm: bit(0),
        chi_touch: bit(1),
        unsupervised_write: bit(2),
        fake_proof_seal: bit(3),
        novel_attack_flag: bit(4),
        bypass_flag: bit(5),
        chi_infect: bit(6),
        chi_spread: bit(7),
        chi_poison: bit(8),
        uncertainty_flag: bit(9),
        pending: bit(10),
        valid_id: bit(11),
        proof_present: bit(12),
        world_allow: bit(13),
        policy_allow: bit(14),
        rollback: bit(15),
        reference: bit(16),
        i_flow,
        commit_unique,
        delta_omega_req: NonZeroI64::new(7).unwrap(),
    }
}

fn for_every_request(mut check: impl FnMut(&AdjudicationRequest)) {
    for mask in 0..(1u32 << 17) {
        for i_flow in [0, 1] {
            for commit_unique in [0, 1] {
                check(&make_request(mask, i_flow, commit_unique));
            }
        }
    }
}

#[test]
fn test_hard_attack_scenario() {
    let record = decide(json!({"chi_harm": true}));
    assert_eq!(record.route, Route::Blackhole);
    assert_eq!(record.d_t, Justification::Quarantine);
    assert_eq!(record.delta_omega, 0);
    assert_eq!(record.out_allowed, vec![OutputClass::Ref]);
    assert_eq!(record.support_pack.receipt, ReceiptKind::Deny);
}

#[test]
fn test_pending_scenario() {
    let record = decide(json!({"pending": true}));
    assert_eq!(record.route, Route::Safe);
    assert_eq!(record.d_t, Justification::Pending);
    assert_eq!(record.delta_omega, 0);
    assert!(record.attack_soft);
}

#[test]
fn test_defaults_scenario() {
    let record = decide(json!({}));
    assert_eq!(record.route, Route::Fast);
    assert_eq!(record.d_t, Justification::EvidAllow);
    assert_eq!(record.commit_unique, 0);
    assert_eq!(record.delta_omega, 0);
    assert!(record.disable_planes.is_empty());
    assert_eq!(
        record.support_pack.reason_codes[0].as_str(),
        "REASON_EVID_ALLOW"
    );
}

#[test]
fn test_world_allow_scenario() {
    let record = decide(json!({"commit_unique": 1, "i_flow": 0, "world_allow": true}));
    assert_eq!(record.route, Route::Fast);
    assert_eq!(record.d_t, Justification::WorldAllow);
    assert_eq!(record.delta_omega, 1);
    assert!(record.support_pack.reason_codes.is_empty());
    assert_eq!(record.support_pack.receipt, ReceiptKind::Success);

    let scaled = decide(json!({"commit_unique": true, "delta_omega_req": -3}));
    assert_eq!(scaled.delta_omega, -3);
}

#[test]
fn test_safe_route_locks_planes() {
    let record = decide(json!({"valid_id": false}));
    assert_eq!(record.route, Route::Safe);
    assert_eq!(record.d_t, Justification::Deny);
    assert_eq!(record.disable_planes.len(), 9);
    assert!(record.disable_planes.contains(&Plane::WorldWrite));
    assert_eq!(
        record.out_allowed,
        vec![
            OutputClass::Explain,
            OutputClass::EvidencePlan,
            OutputClass::SimPlan,
            OutputClass::Ref,
            OutputClass::Uncert
        ]
    );
}

#[test]
fn test_integer_flags_and_null_are_accepted() {
    assert_eq!(decide(json!({"chi_poison": 1})).route, Route::Safe);
    assert_eq!(decide(json!({"proof_present": null})).route, Route::Safe);
    assert_eq!(decide(json!({"unknown_key": "ignored"})).route, Route::Fast);
}

#[test]
fn test_invalid_requests_are_rejected() {
    for bad in [
        json!({"delta_omega_req": 0}),
        json!({"pending": "yes"}),
        json!({"i_flow": 0.5}),
        json!([1, 2]),
    ] {
        let err = AdjudicationRequest::from_value(&bad).unwrap_err();
        assert!(matches!(err, AdjudicationError::InvalidRequest(_)), "{bad}");
        assert!(!err.is_fatal());
    }
}

#[test]
fn test_zero_magnitude_is_refused_at_decode() {
    let err = AdjudicationRequest::from_json_str(r#"{"commit_unique": 1, "delta_omega_req": 0}"#)
        .unwrap_err();
    assert!(matches!(err, AdjudicationError::InvalidRequest(_)));
    assert!(err.to_string().contains("delta_omega_req must be non-zero"));

    let request = AdjudicationRequest::from_json_str(r#"{"delta_omega_req": -3}"#).unwrap();
    assert_eq!(request.delta_omega_req.get(), -3);
}

#[test]
fn test_record_serializes_with_wire_names() {
    let record = decide(json!({"chi_touch": true}));
    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(value["Route"], "BLACKHOLE");
    assert_eq!(value["AttackHard"], 1);
    assert_eq!(value["AttackSoft"], 0);
    assert_eq!(value["SupportPack"]["Receipt_t"], "DenyPacket");
    assert_eq!(value["SupportPack"]["HookVector_t"]["Pre-Commit"], true);
    assert_eq!(value["SupportPack"]["Anchor_t"], "ANCHOR_BLACKHOLE");

    let back: DecisionRecord = serde_json::from_value(value).unwrap();
    assert_eq!(back, record);
}

#[test]
fn test_shipped_adjudication_vectors_reproduce() {
    let pack: Value = serde_json::from_str(ADJUD_PACK).unwrap();
    for v in pack["vectors"].as_array().unwrap() {
        let record = decide(v["req"].clone());
        assert_eq!(serde_json::to_value(&record).unwrap(), v["expected"], "{}", v["id"]);
    }
}

#[test]
fn test_world_effect_equation_holds_everywhere() {
    for_every_request(|req| {
        let record = adjudicate(req).unwrap();
        assert!(record.world_effect_consistent(), "{req:?}");
    });
}

#[test]
fn test_no_silent_denial_anywhere() {
    for_every_request(|req| {
        let record = adjudicate(req).unwrap();
        let pack = &record.support_pack;
        assert_eq!(pack.d_t, record.d_t);
        if record.d_t != Justification::WorldAllow {
            assert_eq!(pack.reason_codes.len(), 1, "{req:?}");
        } else {
            assert!(pack.reason_codes.is_empty());
        }
        assert_eq!(pack.writeback.tombstone_redacted, record.delta_omega == 0);
        assert!(record.support_ok);
    });
}

#[test]
fn test_commit_unique_only_survives_fast() {
    for_every_request(|req| {
        let record = adjudicate(req).unwrap();
        if record.route != Route::Fast {
            assert_eq!(record.commit_unique, 0);
        } else {
            assert_eq!(record.commit_unique, req.commit_unique);
        }
    });
}

#[test]
fn test_adjudication_is_deterministic() {
    for mask in (0..(1u32 << 17)).step_by(97) {
        let req = make_request(mask, 0, 1);
        let first = adjudicate(&req).unwrap();
        let second = adjudicate(&req).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.digest().unwrap(), second.digest().unwrap());
    }
}
