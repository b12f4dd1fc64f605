//! Vector replay.
//!
//! Each vector is an independent call. Mismatches and per-vector errors are
//! recorded and replay continues; only [`AdjudicationError::BypassDetected`]
//! aborts a run.

use std::fmt;

use canon52_canonical::canon_then_hash;
use canon52_core::{adjudicate, AdjudicationError, AdjudicationRequest, RECORD_FIELDS};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::compare::loose_eq;
use crate::errors::ReplayError;
use crate::pack::{AdjudicationVector, CanonVector, Expectation};

/// Which suite a summary belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suite {
    /// Canonicalization + hashing vectors.
    Canon,
    /// Adjudication vectors.
    Adjudication,
}

impl Suite {
    /// Label printed in summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Suite::Canon => "CanonSelfTest",
            Suite::Adjudication => "AdjudTest",
        }
    }
}

/// One differing record field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMismatch {
    /// Wire field name.
    pub field: &'static str,
    /// Value in the vector (`null` when absent).
    pub expected: Value,
    /// Value produced (`null` when absent).
    pub actual: Value,
}

/// Why a vector failed.
#[derive(Debug, Clone, PartialEq)]
pub enum FailureReason {
    /// Digest differs from `expected_hash`.
    HashMismatch {
        /// Digest in the vector.
        expected: String,
        /// Digest computed.
        got: String,
    },
    /// A `hash` vector has no `expected_hash`.
    MissingExpectedHash {
        /// Digest computed.
        got: String,
    },
    /// An `error` vector canonicalized successfully.
    ExpectedErrorGotHash,
    /// Canonicalization failed with a different code.
    ErrorMismatch {
        /// Code in the vector.
        expected: String,
        /// Code produced.
        got: String,
    },
    /// A `hash` vector failed to canonicalize.
    UnexpectedError(String),
    /// `expected` is neither `hash` nor `error`.
    UnknownExpectation,
    /// The request mapping did not decode.
    InvalidRequest(String),
    /// One or more record fields differ.
    FieldMismatch(Vec<FieldMismatch>),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::HashMismatch { expected, got } => {
                write!(f, "HASH_MISMATCH expected={} got={}", expected, got)
            }
            FailureReason::MissingExpectedHash { got } => {
                write!(f, "HASH_MISMATCH expected=<missing> got={}", got)
            }
            FailureReason::ExpectedErrorGotHash => f.write_str("EXPECTED_ERROR_BUT_GOT_HASH"),
            FailureReason::ErrorMismatch { expected, got } => {
                write!(f, "expected_error={} got={}", expected, got)
            }
            FailureReason::UnexpectedError(code) => f.write_str(code),
            FailureReason::UnknownExpectation => f.write_str("UNKNOWN_EXPECTATION"),
            FailureReason::InvalidRequest(msg) => write!(f, "INVALID_REQUEST: {}", msg),
            FailureReason::FieldMismatch(fields) => {
                f.write_str("mismatch=[")?;
                for (i, m) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "({}, {}, {})", m.field, m.expected, m.actual)?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Outcome of one vector.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// Matched.
    Pass,
    /// Did not match.
    Fail(FailureReason),
}

impl Verdict {
    /// True for [`Verdict::Pass`].
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }
}

/// A failed vector and its reason.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorFailure {
    /// Vector id.
    pub id: String,
    /// Reason.
    pub reason: FailureReason,
}

impl fmt::Display for VectorFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[FAIL] {}: {}", self.id, self.reason)
    }
}

/// Aggregate result of a suite.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplaySummary {
    /// Suite replayed.
    pub suite: Suite,
    /// Vectors that matched.
    pub passed: usize,
    /// Vectors that did not.
    pub failed: usize,
    /// Failures in replay order.
    pub failures: Vec<VectorFailure>,
}

impl ReplaySummary {
    fn new(suite: Suite) -> Self {
        Self {
            suite,
            passed: 0,
            failed: 0,
            failures: Vec::new(),
        }
    }

    fn record(&mut self, id: &str, verdict: Verdict) {
        match verdict {
            Verdict::Pass => self.passed += 1,
            Verdict::Fail(reason) => {
                warn!(suite = self.suite.label(), id, %reason, "vector failed");
                self.failed += 1;
                self.failures.push(VectorFailure {
                    id: id.to_string(),
                    reason,
                });
            }
        }
    }

    /// False when any vector failed.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

impl fmt::Display for ReplaySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] OK={} FAIL={}",
            self.suite.label(),
            self.passed,
            self.failed
        )
    }
}

/// Replays vector lists through the canonicalizers and the adjudicator.
///
/// Vectors are passed in per call; the runner holds no pack state.
#[derive(Debug, Default, Clone, Copy)]
pub struct VectorRunner;

impl VectorRunner {
    /// Creates a runner.
    pub fn new() -> Self {
        Self
    }

    /// Checks one canonicalization vector.
    pub fn check_canon(&self, vector: &CanonVector) -> Verdict {
        let outcome = canon_then_hash(&vector.kind, &vector.raw);
        debug!(id = %vector.id, kind = %vector.kind, ok = outcome.is_ok(), "canon vector");
        match (vector.expected, outcome) {
            (Expectation::Hash, Ok(got)) => match vector.expected_hash.as_deref() {
                Some(expected) if got.matches_hex(expected) => Verdict::Pass,
                Some(expected) => Verdict::Fail(FailureReason::HashMismatch {
                    expected: expected.to_string(),
                    got: got.to_string(),
                }),
                None => Verdict::Fail(FailureReason::MissingExpectedHash {
                    got: got.to_string(),
                }),
            },
            (Expectation::Hash, Err(e)) => Verdict::Fail(FailureReason::UnexpectedError(e.code())),
            (Expectation::Error, Ok(_)) => Verdict::Fail(FailureReason::ExpectedErrorGotHash),
            (Expectation::Error, Err(e)) => match vector.expected_error.as_deref() {
                Some(expected) if !expected.is_empty() && expected != e.code() => {
                    Verdict::Fail(FailureReason::ErrorMismatch {
                        expected: expected.to_string(),
                        got: e.code(),
                    })
                }
                _ => Verdict::Pass,
            },
            (Expectation::Unrecognized, _) => Verdict::Fail(FailureReason::UnknownExpectation),
        }
    }

    /// Replays a canonicalization suite. Never aborts.
    pub fn run_canon(&self, vectors: &[CanonVector]) -> ReplaySummary {
        let mut summary = ReplaySummary::new(Suite::Canon);
        for vector in vectors {
            summary.record(&vector.id, self.check_canon(vector));
        }
        info!(passed = summary.passed, failed = summary.failed, "canon replay finished");
        summary
    }

    /// Checks one adjudication vector.
    ///
    /// # Errors
    ///
    /// Only a fatal adjudication error (or a record that fails to serialize);
    /// an undecodable request is a failed vector.
    pub fn check_adjudication(&self, vector: &AdjudicationVector) -> Result<Verdict, ReplayError> {
        let request = match AdjudicationRequest::from_value(&vector.req) {
            Ok(request) => request,
            Err(AdjudicationError::InvalidRequest(msg)) => {
                return Ok(Verdict::Fail(FailureReason::InvalidRequest(msg)))
            }
            Err(fatal) => return Err(fatal.into()),
        };
        let record = adjudicate(&request)?;
        let actual = serde_json::to_value(&record).map_err(ReplayError::Record)?;
        debug!(id = %vector.id, route = %record.route, d_t = %record.d_t, "adjudication vector");

        let mismatches: Vec<FieldMismatch> = RECORD_FIELDS
            .iter()
            .filter_map(|&field| {
                let expected = vector.expected.get(field).unwrap_or(&Value::Null);
                let got = actual.get(field).unwrap_or(&Value::Null);
                (!loose_eq(expected, got)).then(|| FieldMismatch {
                    field,
                    expected: expected.clone(),
                    actual: got.clone(),
                })
            })
            .collect();

        if mismatches.is_empty() {
            Ok(Verdict::Pass)
        } else {
            Ok(Verdict::Fail(FailureReason::FieldMismatch(mismatches)))
        }
    }

    /// Replays an adjudication suite.
    ///
    /// # Errors
    ///
    /// Aborts on `BypassDetected`; every other failure is recorded.
    pub fn run_adjudication(
        &self,
        vectors: &[AdjudicationVector],
    ) -> Result<ReplaySummary, ReplayError> {
        let mut summary = ReplaySummary::new(Suite::Adjudication);
        for vector in vectors {
            let verdict = self.check_adjudication(vector)?;
            summary.record(&vector.id, verdict);
        }
        info!(passed = summary.passed, failed = summary.failed, "adjudication replay finished");
        Ok(summary)
    }
}
