use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::num::NonZeroI64;

use crate::errors::AdjudicationError;
use crate::shared::{flag, int, magnitude};

/// Magnitude granted when the caller does not request one.
pub const DEFAULT_DELTA_OMEGA: NonZeroI64 = match NonZeroI64::new(1) {
    Some(one) => one,
    None => panic!("1 is non-zero"),
};

/// Flags describing one candidate action.
///
/// Every field has an explicit default; `valid_id`, `proof_present` and
/// `world_allow` default to true, `delta_omega_req` to 1, everything else to
/// false/0. Unknown keys in the wire mapping are ignored.
///
/// `delta_omega_req: 0` is refused at decode time with
/// [`AdjudicationError::InvalidRequest`] instead of being carried into a
/// zero `DeltaOmega`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjudicationRequest {
    /// Direct harm to a protected subject.
    #[serde(deserialize_with = "flag::deserialize")]
    pub chi_harm: bool,
    /// Touching a protected subject.
    #[serde(deserialize_with = "flag::deserialize")]
    pub chi_touch: bool,
    /// Write attempted without supervision.
    #[serde(deserialize_with = "flag::deserialize")]
    pub unsupervised_write: bool,
    /// Proof seal known to be forged.
    #[serde(deserialize_with = "flag::deserialize")]
    pub fake_proof_seal: bool,
    /// Unclassified attack pattern.
    #[serde(deserialize_with = "flag::deserialize")]
    pub novel_attack_flag: bool,
    /// Gate bypass attempt.
    #[serde(deserialize_with = "flag::deserialize")]
    pub bypass_flag: bool,
    /// Infection vector present.
    #[serde(deserialize_with = "flag::deserialize")]
    pub chi_infect: bool,
    /// Spread vector present.
    #[serde(deserialize_with = "flag::deserialize")]
    pub chi_spread: bool,
    /// Poisoning vector present.
    #[serde(deserialize_with = "flag::deserialize")]
    pub chi_poison: bool,
    /// Caller is uncertain about the action.
    #[serde(deserialize_with = "flag::deserialize")]
    pub uncertainty_flag: bool,
    /// Evidence is still pending.
    #[serde(deserialize_with = "flag::deserialize")]
    pub pending: bool,
    /// Identity check passed.
    #[serde(deserialize_with = "flag::deserialize")]
    pub valid_id: bool,
    /// A proof accompanies the request (opaque; not verified here).
    #[serde(deserialize_with = "flag::deserialize")]
    pub proof_present: bool,
    /// World effect is allowed on the FAST route.
    #[serde(deserialize_with = "flag::deserialize")]
    pub world_allow: bool,
    /// Policy allows the action without a world effect.
    #[serde(deserialize_with = "flag::deserialize")]
    pub policy_allow: bool,
    /// Rollback is requested.
    #[serde(deserialize_with = "flag::deserialize")]
    pub rollback: bool,
    /// Caller asks for a reference answer only.
    #[serde(rename = "ref", deserialize_with = "flag::deserialize")]
    pub reference: bool,
    /// Cross-boundary information flow indicator; must be 0 to commit.
    #[serde(deserialize_with = "int::deserialize")]
    pub i_flow: i64,
    /// At-most-once assertion; honored on FAST only.
    #[serde(deserialize_with = "int::deserialize")]
    pub commit_unique: i64,
    /// Requested world-effect magnitude. Zero does not decode.
    #[serde(deserialize_with = "magnitude::deserialize")]
    pub delta_omega_req: NonZeroI64,
}

impl Default for AdjudicationRequest {
    fn default() -> Self {
        Self {
            chi_harm: false,
            chi_touch: false,
            unsupervised_write: false,
            fake_proof_seal: false,
            novel_attack_flag: false,
            bypass_flag: false,
            chi_infect: false,
            chi_spread: false,
            chi_poison: false,
            uncertainty_flag: false,
            pending: false,
            valid_id: true,
            proof_present: true,
            world_allow: true,
            policy_allow: false,
            rollback: false,
            reference: false,
            i_flow: 0,
            commit_unique: 0,
            delta_omega_req: DEFAULT_DELTA_OMEGA,
        }
    }
}

impl AdjudicationRequest {
    /// Decodes a request mapping.
    ///
    /// # Errors
    ///
    /// [`AdjudicationError::InvalidRequest`] when the value is not an object
    /// or a field has the wrong shape.
    pub fn from_value(value: &Value) -> Result<Self, AdjudicationError> {
        if !value.is_object() {
            return Err(AdjudicationError::InvalidRequest(format!(
                "request must be a JSON object, got {value}"
            )));
        }
        Self::deserialize(value).map_err(|e| AdjudicationError::InvalidRequest(e.to_string()))
    }

    /// Decodes a request from JSON text.
    pub fn from_json_str(raw: &str) -> Result<Self, AdjudicationError> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| AdjudicationError::InvalidRequest(e.to_string()))?;
        Self::from_value(&value)
    }
}
