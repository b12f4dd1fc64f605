//! Drift anchors: digests of the rule statements and of both vector packs.
//!
//! The statements are hashed as UTF-8 bytes with no canonicalization; the
//! packs go through [`pack_digest`]. A published anchor document lists the
//! expected values, and [`AnchorSet::compare`] reports any that moved.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use canon52_canonical::{digest, pack_digest, Digest, DigestAlg};
use regex::Regex;
use serde_json::Value;

use crate::errors::ReplayError;

/// CanonText rule statement, hashed verbatim.
pub const CANON_TEXT_SPEC: &str = "CanonText v1: normalize newlines to LF; strip trailing spaces; NFC; forbid TAB, zero-width (ZWSP/ZWNJ/ZWJ/BOM), control chars (<0x20 except LF) and DEL.";

/// CanonJSON rule statement, hashed verbatim.
pub const CANON_JSON_SPEC: &str = "CanonJSON v1: parse JSON with floats forbidden; recursively sort object keys; sort lists by type-aware ordering (null<bool<int<str<json-string>); dump with separators (, :) and ensure_ascii.";

/// World-effect equivalence, hashed verbatim.
pub const WORLD_EFFECT_EQ: &str = "DeltaOmega!=0 <=> Route=FAST AND CommitUnique=1 AND I_FLOW=0 AND d_t=WORLD_ALLOW (SUPxANNO).";

/// Routing funnel diagram. Must match the mermaid block in `ANCHORS.md`
/// byte for byte, including the trailing newline.
pub const MERMAID_FUNNEL: &str = r#"flowchart TD
  subgraph Space[State Space and Inputs]
    Input[Candidate Trajectory Gamma]
    Virus[Unknown Virus / Side Channel]
  end

  subgraph L52[Layer 1: Law52 Constitutional Immunity]
    Checks["Harm/Touch Checks (Law52.1-52.6)"]
  end

  subgraph L51[Layer 2: Law51 Purification Routing]
    Route["Route Decision (Lemma 1 and 2)"]
  end

  subgraph L8[Layer 3: Law8 Needle's Eye]
    Commit["Needle-Eye Gate (Lemma 3)"]
  end

  World((World Effect: DeltaOmega != 0))
  SafeState["SAFE / REF / NOOP: DeltaOmega = 0"]
  BlackHole["BLACKHOLE / TOMBSTONE: DeltaOmega = 0"]

  Input --> Checks
  Checks -- "chi_harm / chi_touch" --> SafeState
  Checks -- "Pass" --> Route
  Route -- "AttackHard" --> BlackHole
  Route -- "AttackSoft / UNCERT / Pending" --> SafeState
  Route -- "FAST and Valid" --> Commit
  Commit -- "FAST AND I_FLOW=0 AND d_t=WORLD_ALLOW AND CommitUnique=1" --> World
  Commit -- "else" --> SafeState
  Virus -.->|Bypass attempt| Commit
"#;

/// Named anchors, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AnchorName {
    /// Digest of [`CANON_TEXT_SPEC`].
    CanonTextSpec,
    /// Digest of [`CANON_JSON_SPEC`].
    CanonJsonSpec,
    /// Digest of [`WORLD_EFFECT_EQ`].
    WorldEffectEq,
    /// Digest of [`MERMAID_FUNNEL`].
    MermaidFunnel,
    /// Pack digest of the canonicalization pack.
    CanonPack,
    /// Pack digest of the adjudication pack.
    AdjudPack,
}

impl AnchorName {
    /// Every anchor, in report order.
    pub const ALL: [AnchorName; 6] = [
        AnchorName::CanonTextSpec,
        AnchorName::CanonJsonSpec,
        AnchorName::WorldEffectEq,
        AnchorName::MermaidFunnel,
        AnchorName::CanonPack,
        AnchorName::AdjudPack,
    ];

    /// Label used in reports and anchor documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            AnchorName::CanonTextSpec => "CanonTextSpecHash",
            AnchorName::CanonJsonSpec => "CanonJSONSpecHash",
            AnchorName::WorldEffectEq => "WorldEffectEqHash",
            AnchorName::MermaidFunnel => "MermaidFunnelHash",
            AnchorName::CanonPack => "CanonPackHash",
            AnchorName::AdjudPack => "AdjudPackHash",
        }
    }
}

impl FromStr for AnchorName {
    type Err = ReplayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AnchorName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| ReplayError::InvalidAnchor(format!("unknown anchor '{}'", s)))
    }
}

impl fmt::Display for AnchorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Computed anchors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorSet {
    anchors: Vec<(AnchorName, Digest)>,
}

/// An anchor whose documented value is missing or differs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorDrift {
    /// Anchor.
    pub name: AnchorName,
    /// Freshly computed digest.
    pub computed: Digest,
    /// Digest found in the document, if any.
    pub documented: Option<Digest>,
}

impl fmt::Display for AnchorDrift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.documented {
            Some(documented) => write!(
                f,
                "[DRIFT] {}: documented={} computed={}",
                self.name, documented, self.computed
            ),
            None => write!(f, "[DRIFT] {}: missing, computed={}", self.name, self.computed),
        }
    }
}

impl AnchorSet {
    /// Computes all six anchors from the two pack documents.
    pub fn compute(canon_pack: &Value, adjud_pack: &Value) -> Result<Self, ReplayError> {
        let anchors = vec![
            (AnchorName::CanonTextSpec, digest(CANON_TEXT_SPEC.as_bytes())),
            (AnchorName::CanonJsonSpec, digest(CANON_JSON_SPEC.as_bytes())),
            (AnchorName::WorldEffectEq, digest(WORLD_EFFECT_EQ.as_bytes())),
            (AnchorName::MermaidFunnel, digest(MERMAID_FUNNEL.as_bytes())),
            (AnchorName::CanonPack, pack_digest(canon_pack)?),
            (AnchorName::AdjudPack, pack_digest(adjud_pack)?),
        ];
        Ok(Self { anchors })
    }

    /// Digest for `name`.
    pub fn get(&self, name: AnchorName) -> Option<&Digest> {
        self.anchors
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, d)| d)
    }

    /// Anchors in report order.
    pub fn iter(&self) -> impl Iterator<Item = (AnchorName, &Digest)> {
        self.anchors.iter().map(|(n, d)| (*n, d))
    }

    /// Anchors whose documented digest is missing or different.
    pub fn compare(&self, documented: &BTreeMap<AnchorName, Digest>) -> Vec<AnchorDrift> {
        self.iter()
            .filter(|(name, computed)| documented.get(name) != Some(*computed))
            .map(|(name, computed)| AnchorDrift {
                name,
                computed: computed.clone(),
                documented: documented.get(&name).cloned(),
            })
            .collect()
    }

    /// Report block with header and footer rules.
    pub fn render(&self) -> String {
        format!(
            "=== SPEC ANCHORS (computed) ===\n{}================================\n",
            self
        )
    }
}

impl fmt::Display for AnchorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, digest) in self.iter() {
            writeln!(f, "{}: {}", name, digest)?;
        }
        Ok(())
    }
}

/// Extracts `Name: <hex>` anchors from a document such as `ANCHORS.md`.
///
/// Markdown decoration between the name and the digest (`**`, backticks,
/// list markers) is tolerated. The first occurrence of a name wins; names
/// not listed are simply absent from the result.
pub fn parse_anchor_document(text: &str) -> Result<BTreeMap<AnchorName, Digest>, ReplayError> {
    let pattern = Regex::new(
        r"\b(CanonTextSpecHash|CanonJSONSpecHash|WorldEffectEqHash|MermaidFunnelHash|CanonPackHash|AdjudPackHash)\b[^0-9A-Za-z\n]*([0-9a-fA-F]{64})\b",
    )
    .map_err(|e| ReplayError::InvalidAnchor(format!("anchor pattern: {}", e)))?;

    let mut found = BTreeMap::new();
    for caps in pattern.captures_iter(text) {
        let name: AnchorName = caps[1].parse()?;
        let digest = Digest::new(DigestAlg::Sha256, caps[2].to_ascii_lowercase())
            .map_err(|e| ReplayError::InvalidAnchor(format!("{}: {}", name, e)))?;
        found.entry(name).or_insert(digest);
    }
    Ok(found)
}
