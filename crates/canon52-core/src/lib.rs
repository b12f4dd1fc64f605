//! Deterministic adjudication for canon52.
//!
//! This crate provides:
//! - A closed request type with explicit defaults
//! - The fixed routing policy (FAST / SAFE / BLACKHOLE)
//! - Decision records carrying a SupportPack
//!
//! Core invariants:
//! - `DeltaOmega != 0` iff `Route = FAST`, `CommitUnique = 1`, `I_FLOW = 0`
//!   and `d_t = WORLD_ALLOW`
//! - Every justification other than `WORLD_ALLOW` carries a reason code;
//!   building a pack without one is a fatal error
//! - Each call is pure and independent
//!
#![deny(missing_docs)]

/// Policy evaluation.
pub mod adjudicator;
/// Decision record, routes and justification codes.
pub mod decision;
/// Error types for adjudication.
pub mod errors;
/// Adjudication request.
pub mod request;
/// Serde helpers shared by requests and records.
mod shared;
/// SupportPack construction.
pub mod support;

pub use adjudicator::{adjudicate, classify_attack, select_route, AttackClass};
pub use decision::{DecisionRecord, Justification, OutputClass, Plane, Route, RECORD_FIELDS};
pub use errors::AdjudicationError;
pub use request::{AdjudicationRequest, DEFAULT_DELTA_OMEGA};
pub use support::{ReasonCode, ReceiptKind, SupportPack};
