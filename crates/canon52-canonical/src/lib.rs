//! Canonicalization and hashing primitives for the canon52 checker.
//!
//! Two canonical forms are defined here: CanonText (line endings, trailing
//! spaces, NFC, forbidden characters) and CanonJSON (floats rejected at parse
//! time, sorted keys, type-ranked arrays, ASCII-escaped compact output).
//! Every byte that is hashed for a vector or an anchor is produced by this
//! crate.
//!
#![deny(missing_docs)]

/// CanonJSON canonicalizer and the shared error type.
pub mod canonicalizer;
/// Digest primitives.
pub mod digest;
/// Compact ASCII JSON emitter.
pub mod emit;
/// Canonicalize-then-hash dispatch and pack digests.
pub mod hashing;
/// Hygiene report types emitted during canonicalization.
pub mod hygiene;
/// Canonicalization profile identifiers.
pub mod identifiers;
/// CanonText canonicalizer.
pub mod text;
/// Validation helpers used by canonical types.
pub mod validation;

pub use canonicalizer::{
    canon_json, CanonicalizationError, CanonicalizationResult, Canonicalizer,
};
pub use digest::{digest, Digest, DigestAlg};
pub use hashing::{canon_then_hash, pack_digest, CanonKind};
pub use hygiene::{HygieneReport, HygieneStatus, HygieneWarning};
pub use identifiers::ProfileId;
pub use text::{canon_text, CanonicalText, TextCanonicalization, TextCanonicalizer};
pub use validation::ValidationError;
