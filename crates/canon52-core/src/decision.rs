use canon52_canonical::{pack_digest, CanonicalizationError, Digest};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::shared::bit;
use crate::support::SupportPack;

/// Top-level adjudication outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Route {
    /// Fast-path commit; the only route that may touch the world.
    Fast,
    /// Safe refusal: explanation and planning outputs only.
    Safe,
    /// Quarantine: reference output only.
    Blackhole,
}

/// Output categories a route may emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputClass {
    /// Irreversible world write.
    #[serde(rename = "WORLDWRITE")]
    WorldWrite,
    /// Publication.
    #[serde(rename = "PUBLISH")]
    Publish,
    /// Transaction.
    #[serde(rename = "TX")]
    Tx,
    /// Cross-system bridge.
    #[serde(rename = "BRIDGE")]
    Bridge,
    /// Tool invocation.
    #[serde(rename = "TOOL")]
    Tool,
    /// Explanation of the refusal.
    Explain,
    /// Plan for collecting evidence.
    EvidencePlan,
    /// Simulation plan.
    SimPlan,
    /// Reference answer.
    #[serde(rename = "REF")]
    Ref,
    /// Statement of uncertainty.
    #[serde(rename = "UNCERT")]
    Uncert,
}

/// Capability planes a route switches off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Plane {
    /// Making claims.
    Claim,
    /// Publication.
    Publish,
    /// Transactions.
    Tx,
    /// Bridges.
    Bridge,
    /// Tools.
    Tool,
    /// World writes.
    WorldWrite,
    /// Propagation.
    Prop,
    /// Rendering.
    Render,
    /// Interaction.
    Interact,
}

const FAST_OUTPUTS: &[OutputClass] = &[
    OutputClass::WorldWrite,
    OutputClass::Publish,
    OutputClass::Tx,
    OutputClass::Bridge,
    OutputClass::Tool,
];

const SAFE_OUTPUTS: &[OutputClass] = &[
    OutputClass::Explain,
    OutputClass::EvidencePlan,
    OutputClass::SimPlan,
    OutputClass::Ref,
    OutputClass::Uncert,
];

const BLACKHOLE_OUTPUTS: &[OutputClass] = &[OutputClass::Ref];

const LOCKED_PLANES: &[Plane] = &[
    Plane::Claim,
    Plane::Publish,
    Plane::Tx,
    Plane::Bridge,
    Plane::Tool,
    Plane::WorldWrite,
    Plane::Prop,
    Plane::Render,
    Plane::Interact,
];

impl Route {
    /// Wire name (`FAST`, `SAFE`, `BLACKHOLE`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Fast => "FAST",
            Route::Safe => "SAFE",
            Route::Blackhole => "BLACKHOLE",
        }
    }

    /// Output categories permitted on this route, in wire order.
    pub fn out_allowed(&self) -> &'static [OutputClass] {
        match self {
            Route::Fast => FAST_OUTPUTS,
            Route::Safe => SAFE_OUTPUTS,
            Route::Blackhole => BLACKHOLE_OUTPUTS,
        }
    }

    /// Planes disabled on this route; FAST disables none.
    pub fn disabled_planes(&self) -> &'static [Plane] {
        match self {
            Route::Fast => &[],
            Route::Safe | Route::Blackhole => LOCKED_PLANES,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Justification code `d_t` bound to a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Justification {
    /// FAST with a unique, isolated, world-allowed commit.
    WorldAllow,
    /// FAST, allowed by policy but without a world effect.
    PolicyAllow,
    /// FAST on evidence only.
    EvidAllow,
    /// Evidence pending.
    Pending,
    /// Reference answer.
    Ref,
    /// Rollback.
    Rollback,
    /// Plain denial.
    Deny,
    /// Hard attack quarantined.
    Quarantine,
}

impl Justification {
    /// Wire name, e.g. `WORLD_ALLOW`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Justification::WorldAllow => "WORLD_ALLOW",
            Justification::PolicyAllow => "POLICY_ALLOW",
            Justification::EvidAllow => "EVID_ALLOW",
            Justification::Pending => "PENDING",
            Justification::Ref => "REF",
            Justification::Rollback => "ROLLBACK",
            Justification::Deny => "DENY",
            Justification::Quarantine => "QUARANTINE",
        }
    }
}

impl fmt::Display for Justification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wire field names of a [`DecisionRecord`], in the order replays compare
/// them.
pub const RECORD_FIELDS: [&str; 11] = [
    "Route",
    "d_t",
    "AttackHard",
    "AttackSoft",
    "I_FLOW",
    "CommitUnique",
    "DeltaOmega",
    "OutAllowed",
    "disable_planes",
    "SupportOK",
    "SupportPack",
];

/// Outcome of one adjudication. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRecord {
    /// Selected route.
    #[serde(rename = "Route")]
    pub route: Route,
    /// Justification code.
    pub d_t: Justification,
    /// Hard attack indicator.
    #[serde(rename = "AttackHard", with = "bit")]
    pub attack_hard: bool,
    /// Soft attack indicator.
    #[serde(rename = "AttackSoft", with = "bit")]
    pub attack_soft: bool,
    /// Flow-isolation value as supplied.
    #[serde(rename = "I_FLOW")]
    pub i_flow: i64,
    /// Commit-uniqueness after finalization (0 off FAST).
    #[serde(rename = "CommitUnique")]
    pub commit_unique: i64,
    /// World-effect magnitude; non-zero only for a world-allowed commit.
    #[serde(rename = "DeltaOmega")]
    pub delta_omega: i64,
    /// Output categories permitted on the route.
    #[serde(rename = "OutAllowed")]
    pub out_allowed: Vec<OutputClass>,
    /// Planes disabled on the route.
    pub disable_planes: Vec<Plane>,
    /// Always true: the support pack passed its self-check.
    #[serde(rename = "SupportOK")]
    pub support_ok: bool,
    /// Machine-checkable justification.
    #[serde(rename = "SupportPack")]
    pub support_pack: SupportPack,
}

impl DecisionRecord {
    /// Whether `delta_omega != 0` exactly when the record is a FAST,
    /// commit-unique, flow-isolated, world-allowed commit.
    pub fn world_effect_consistent(&self) -> bool {
        let commits = self.route == Route::Fast
            && self.commit_unique == 1
            && self.i_flow == 0
            && self.d_t == Justification::WorldAllow;
        (self.delta_omega != 0) == commits
    }

    /// Stable digest of the serialized record, usable as a receipt id.
    pub fn digest(&self) -> Result<Digest, CanonicalizationError> {
        pack_digest(self)
    }
}
