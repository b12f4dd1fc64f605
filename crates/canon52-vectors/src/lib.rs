//! Vector packs, replay and drift anchors for canon52.
//!
//! This crate provides:
//! - Typed canonicalization and adjudication vector packs, read from and
//!   written to JSON files
//! - [`VectorRunner`], which replays vectors and aggregates pass/fail counts
//! - [`AnchorSet`], the six drift anchors over rule statements and packs
//!
//! Pack I/O completes before any vector is evaluated; the runner itself
//! receives vectors as arguments and never touches the filesystem.
//!
#![deny(missing_docs)]

/// Drift anchors.
pub mod anchors;
/// Loose field equality for record comparison.
pub mod compare;
/// Replay error type.
pub mod errors;
/// Pack model and file I/O.
pub mod pack;
/// Vector replay.
pub mod runner;

pub use anchors::{parse_anchor_document, AnchorDrift, AnchorName, AnchorSet};
pub use compare::loose_eq;
pub use errors::ReplayError;
pub use pack::{
    load_adjudication_pack, load_canon_pack, load_pack, load_packs, write_pack,
    AdjudicationPack, AdjudicationVector, CanonPack, CanonVector, Expectation, PackPaths,
    VectorPack,
};
pub use runner::{
    FailureReason, FieldMismatch, ReplaySummary, Suite, VectorFailure, VectorRunner, Verdict,
};
