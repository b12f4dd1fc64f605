//! Canonicalize-then-hash entry points.
//!
//! Vector digests are `sha256(canonical_bytes)` with no domain separator, so
//! any conforming implementation reproduces the packed hashes byte for byte.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::canonicalizer::{canon_json, to_json_tree, CanonicalizationError};
use crate::digest::{digest, Digest};
use crate::emit::to_ascii_string;
use crate::text::canon_text;

/// Which canonicalizer a vector's `raw` input goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonKind {
    /// CanonText v1.
    Text,
    /// CanonJSON v1.
    Json,
}

impl CanonKind {
    /// Wire name used in vector packs.
    pub fn as_str(&self) -> &'static str {
        match self {
            CanonKind::Text => "text",
            CanonKind::Json => "json",
        }
    }

    /// Canonical bytes of `raw` under this kind.
    pub fn canonicalize(&self, raw: &str) -> Result<Vec<u8>, CanonicalizationError> {
        match self {
            CanonKind::Text => canon_text(raw).map(|text| text.into_string().into_bytes()),
            CanonKind::Json => canon_json(raw),
        }
    }
}

impl FromStr for CanonKind {
    type Err = CanonicalizationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(CanonKind::Text),
            "json" => Ok(CanonKind::Json),
            other => Err(CanonicalizationError::UnknownKind(other.to_string())),
        }
    }
}

impl fmt::Display for CanonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonicalizes `raw` as `kind` (`"text"` or `"json"`) and hashes the result.
///
/// # Errors
///
/// [`CanonicalizationError::UnknownKind`] for any other kind, otherwise
/// whatever the selected canonicalizer rejects.
pub fn canon_then_hash(kind: &str, raw: &str) -> Result<Digest, CanonicalizationError> {
    let kind: CanonKind = kind.parse()?;
    let bytes = kind.canonicalize(raw)?;
    Ok(digest(&bytes))
}

/// Digest of a whole structured object: sorted keys, compact separators,
/// ASCII escaping, arrays left in input order.
///
/// Used for pack-level anchors only; per-vector checks go through
/// [`canon_then_hash`].
pub fn pack_digest<T: Serialize>(value: &T) -> Result<Digest, CanonicalizationError> {
    let tree = to_json_tree(value)?;
    Ok(digest(to_ascii_string(&tree).as_bytes()))
}
