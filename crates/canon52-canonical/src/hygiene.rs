use crate::identifiers::ProfileId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Hygiene status for canonicalization attempts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HygieneStatus {
    /// The input was already in canonical form.
    Ok,
    /// The input was accepted but normalization rewrote it.
    Ambiguous,
    /// The input was invalid and must be rejected.
    Invalid,
}

/// Stable warning code emitted by canonicalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HygieneWarning(String);

impl HygieneWarning {
    /// Creates a warning from a literal code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns the warning code.
    pub fn code(&self) -> &str {
        &self.0
    }
}

/// Hygiene reports produced during canonicalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HygieneReport {
    /// Overall hygiene status.
    pub status: HygieneStatus,
    /// Stable warning codes.
    pub warnings: Vec<HygieneWarning>,
    /// Metrics such as duplicate key counts.
    pub metrics: BTreeMap<String, u64>,
    /// Identifier of the canonicalization profile that produced the bytes.
    pub profile_id: ProfileId,
}

impl HygieneReport {
    /// Starts an empty report for `profile_id`.
    pub fn new(profile_id: ProfileId) -> Self {
        Self {
            status: HygieneStatus::Ok,
            warnings: vec![],
            metrics: BTreeMap::new(),
            profile_id,
        }
    }

    /// Records a rewrite: adds the warning once, bumps `metric` by `count`
    /// and downgrades an `Ok` status to `Ambiguous`.
    pub(crate) fn note(&mut self, warning: &str, metric: &str, count: u64) {
        if count == 0 {
            return;
        }
        if !self.warnings.iter().any(|w| w.code() == warning) {
            self.warnings.push(HygieneWarning::new(warning));
        }
        *self.metrics.entry(metric.to_string()).or_insert(0) += count;
        if self.status == HygieneStatus::Ok {
            self.status = HygieneStatus::Ambiguous;
        }
    }

    /// Returns true when the input needed no normalization.
    pub fn is_clean(&self) -> bool {
        self.status == HygieneStatus::Ok
    }
}
