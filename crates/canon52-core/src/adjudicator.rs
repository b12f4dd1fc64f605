//! Fixed adjudication policy.
//!
//! Evaluation order is part of the contract: attack classification, route
//! selection (first match wins), commit-uniqueness finalization, `d_t`
//! binding, world-effect magnitude, capability gating, SupportPack.

use tracing::debug;

use crate::decision::{DecisionRecord, Justification, Route};
use crate::errors::AdjudicationError;
use crate::request::AdjudicationRequest;
use crate::support::{reasons_for, SupportPack};

/// Attack classification, independent of the route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackClass {
    /// Touch, harm, unsupervised write or forged seal.
    pub hard: bool,
    /// Novel/bypass/infect/spread/poison, uncertainty or pending evidence.
    pub soft: bool,
}

/// Classifies the request's attack flags.
pub fn classify_attack(req: &AdjudicationRequest) -> AttackClass {
    AttackClass {
        hard: req.chi_touch || req.chi_harm || req.unsupervised_write || req.fake_proof_seal,
        soft: req.novel_attack_flag
            || req.bypass_flag
            || req.chi_infect
            || req.chi_spread
            || req.chi_poison
            || req.uncertainty_flag
            || req.pending,
    }
}

/// Selects the route; the first matching rule wins.
pub fn select_route(req: &AdjudicationRequest, attack: AttackClass) -> Route {
    if attack.hard {
        return Route::Blackhole;
    }
    if req.uncertainty_flag || req.pending || !req.valid_id || !req.proof_present || attack.soft {
        return Route::Safe;
    }
    Route::Fast
}

/// Commit-uniqueness is honored on FAST only.
pub fn finalize_commit_unique(route: Route, requested: i64) -> i64 {
    if route == Route::Fast {
        requested
    } else {
        0
    }
}

/// Binds the justification code for the selected route.
pub fn bind_justification(
    route: Route,
    req: &AdjudicationRequest,
    attack: AttackClass,
    commit_unique: i64,
) -> Justification {
    match route {
        Route::Fast => {
            if req.world_allow && commit_unique == 1 && req.i_flow == 0 {
                Justification::WorldAllow
            } else if req.policy_allow {
                Justification::PolicyAllow
            } else {
                Justification::EvidAllow
            }
        }
        Route::Safe => {
            if req.pending {
                Justification::Pending
            } else if req.reference {
                Justification::Ref
            } else if req.rollback {
                Justification::Rollback
            } else {
                Justification::Deny
            }
        }
        Route::Blackhole => {
            if attack.hard {
                Justification::Quarantine
            } else if req.rollback {
                Justification::Rollback
            } else {
                Justification::Deny
            }
        }
    }
}

/// World-effect magnitude.
///
/// Re-derives the commit condition from the record fields instead of
/// trusting `d_t` alone; the two derivations must agree.
pub fn world_effect(
    route: Route,
    commit_unique: i64,
    i_flow: i64,
    d_t: Justification,
    requested: i64,
) -> i64 {
    if route == Route::Fast
        && commit_unique == 1
        && i_flow == 0
        && d_t == Justification::WorldAllow
    {
        requested
    } else {
        0
    }
}

/// Adjudicates one request.
///
/// Total over well-formed requests; the only error is
/// [`AdjudicationError::BypassDetected`], which signals a policy-table bug.
pub fn adjudicate(req: &AdjudicationRequest) -> Result<DecisionRecord, AdjudicationError> {
    let attack = classify_attack(req);
    let route = select_route(req, attack);
    let commit_unique = finalize_commit_unique(route, req.commit_unique);
    let d_t = bind_justification(route, req, attack, commit_unique);
    let delta_omega = world_effect(
        route,
        commit_unique,
        req.i_flow,
        d_t,
        req.delta_omega_req.get(),
    );

    let support_pack =
        SupportPack::assemble(route, d_t, req.i_flow, delta_omega, reasons_for(d_t))?;

    debug!(
        route = %route,
        d_t = %d_t,
        attack_hard = attack.hard,
        attack_soft = attack.soft,
        delta_omega,
        "adjudicated request"
    );

    Ok(DecisionRecord {
        route,
        d_t,
        attack_hard: attack.hard,
        attack_soft: attack.soft,
        i_flow: req.i_flow,
        commit_unique,
        delta_omega,
        out_allowed: route.out_allowed().to_vec(),
        disable_planes: route.disabled_planes().to_vec(),
        support_ok: true,
        support_pack,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::OutputClass;

    #[test]
    fn hard_attack_beats_everything() {
        let req = AdjudicationRequest {
            chi_harm: true,
            pending: true,
            commit_unique: 1,
            ..Default::default()
        };
        let record = adjudicate(&req).unwrap();
        assert_eq!(record.route, Route::Blackhole);
        assert_eq!(record.d_t, Justification::Quarantine);
        assert_eq!(record.commit_unique, 0);
        assert_eq!(record.out_allowed, vec![OutputClass::Ref]);
    }

    #[test]
    fn blackhole_fallbacks_follow_precedence() {
        let attack = AttackClass {
            hard: false,
            soft: false,
        };
        let rollback = AdjudicationRequest {
            rollback: true,
            ..Default::default()
        };
        assert_eq!(
            bind_justification(Route::Blackhole, &rollback, attack, 0),
            Justification::Rollback
        );
        assert_eq!(
            bind_justification(Route::Blackhole, &AdjudicationRequest::default(), attack, 0),
            Justification::Deny
        );
    }

    #[test]
    fn safe_precedence_is_pending_ref_rollback() {
        let req = AdjudicationRequest {
            valid_id: false,
            reference: true,
            rollback: true,
            ..Default::default()
        };
        assert_eq!(adjudicate(&req).unwrap().d_t, Justification::Ref);
    }

    #[test]
    fn commit_unique_above_one_does_not_commit() {
        let req = AdjudicationRequest {
            commit_unique: 2,
            ..Default::default()
        };
        let record = adjudicate(&req).unwrap();
        assert_eq!(record.route, Route::Fast);
        assert_eq!(record.commit_unique, 2);
        assert_eq!(record.d_t, Justification::EvidAllow);
        assert_eq!(record.delta_omega, 0);
    }

    #[test]
    fn world_effect_requires_every_condition() {
        assert_eq!(world_effect(Route::Fast, 1, 0, Justification::WorldAllow, 4), 4);
        assert_eq!(world_effect(Route::Safe, 1, 0, Justification::WorldAllow, 4), 0);
        assert_eq!(world_effect(Route::Fast, 0, 0, Justification::WorldAllow, 4), 0);
        assert_eq!(world_effect(Route::Fast, 1, 1, Justification::WorldAllow, 4), 0);
        assert_eq!(world_effect(Route::Fast, 1, 0, Justification::PolicyAllow, 4), 0);
    }
}
