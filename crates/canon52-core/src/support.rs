//! SupportPack: the justification attached to every decision.
//!
//! A pack for any justification other than `WORLD_ALLOW` must carry a reason
//! code; [`SupportPack::assemble`] refuses to build one that does not.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::decision::{Justification, Route};
use crate::errors::AdjudicationError;

/// Kind of receipt issued with a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReceiptKind {
    /// World-allowed commit.
    #[serde(rename = "ReceiptCard^FLOW")]
    Success,
    /// Quarantine on the BLACKHOLE route.
    #[serde(rename = "DenyPacket")]
    Deny,
    /// Any other non-committing outcome.
    #[serde(rename = "ReceiptCard^FAIL")]
    Failure,
}

impl ReceiptKind {
    fn for_decision(route: Route, d_t: Justification) -> Self {
        if d_t == Justification::WorldAllow {
            ReceiptKind::Success
        } else if route == Route::Blackhole {
            ReceiptKind::Deny
        } else {
            ReceiptKind::Failure
        }
    }
}

/// Reason code in the form `REASON_<d_t>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReasonCode(String);

impl ReasonCode {
    /// Reason derived from a justification.
    pub fn for_justification(d_t: Justification) -> Self {
        Self(format!("REASON_{}", d_t.as_str()))
    }

    /// Code text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Gate values recorded with the decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateVector {
    /// Flow-isolation value.
    #[serde(rename = "I_FLOW")]
    pub i_flow: i64,
    /// Core hex gate; always 0.
    #[serde(rename = "I_CORE_HEX")]
    pub i_core_hex: i64,
}

/// Hook markers; both hooks always run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookVector {
    /// Pre-action hook ran.
    #[serde(rename = "Pre-Action")]
    pub pre_action: bool,
    /// Pre-commit hook ran.
    #[serde(rename = "Pre-Commit")]
    pub pre_commit: bool,
}

/// Write-back bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WritebackVector {
    /// True when nothing reached the world (magnitude 0).
    pub tombstone_redacted: bool,
    /// Continuity counter; always 1.
    #[serde(rename = "ChainCont")]
    pub chain_cont: u32,
}

/// Structured justification payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportPack {
    /// Justification code, repeated from the record.
    pub d_t: Justification,
    /// Receipt kind.
    #[serde(rename = "Receipt_t")]
    pub receipt: ReceiptKind,
    /// Gate values.
    #[serde(rename = "GateVector_t")]
    pub gate: GateVector,
    /// Hook markers.
    #[serde(rename = "HookVector_t")]
    pub hooks: HookVector,
    /// Write-back bookkeeping.
    #[serde(rename = "WritebackVector_t")]
    pub writeback: WritebackVector,
    /// Reason codes; empty only for `WORLD_ALLOW`.
    #[serde(rename = "ReasonCode_t")]
    pub reason_codes: Vec<ReasonCode>,
    /// `ANCHOR_<route>`.
    #[serde(rename = "Anchor_t")]
    pub anchor: String,
}

/// Reason list for a justification: none for `WORLD_ALLOW`, exactly one
/// otherwise.
pub fn reasons_for(d_t: Justification) -> Vec<ReasonCode> {
    if d_t == Justification::WorldAllow {
        vec![]
    } else {
        vec![ReasonCode::for_justification(d_t)]
    }
}

/// Fails with `BypassDetected` when a non-committing justification has no
/// reason.
pub fn ensure_supported(
    d_t: Justification,
    reason_codes: &[ReasonCode],
) -> Result<(), AdjudicationError> {
    if d_t != Justification::WorldAllow && reason_codes.is_empty() {
        return Err(AdjudicationError::BypassDetected { d_t });
    }
    Ok(())
}

impl SupportPack {
    /// Builds the pack for a decision, checking the no-silent-denial rule.
    pub fn assemble(
        route: Route,
        d_t: Justification,
        i_flow: i64,
        delta_omega: i64,
        reason_codes: Vec<ReasonCode>,
    ) -> Result<Self, AdjudicationError> {
        ensure_supported(d_t, &reason_codes)?;
        Ok(Self {
            d_t,
            receipt: ReceiptKind::for_decision(route, d_t),
            gate: GateVector {
                i_flow,
                i_core_hex: 0,
            },
            hooks: HookVector {
                pre_action: true,
                pre_commit: true,
            },
            writeback: WritebackVector {
                tombstone_redacted: delta_omega == 0,
                chain_cont: 1,
            },
            reason_codes,
            anchor: format!("ANCHOR_{}", route.as_str()),
        })
    }
}
