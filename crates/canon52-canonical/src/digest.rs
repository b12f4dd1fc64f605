use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest as Sha2Digest, Sha256};
use std::fmt;

use crate::validation::ValidationError;

/// Supported digest algorithms for canonical anchors and vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DigestAlg {
    /// SHA-256 (the only algorithm the vector packs use).
    #[serde(rename = "sha-256")]
    Sha256,
}

/// Algorithm + digest bytes, encoded as lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Digest {
    /// Digest algorithm (currently always `sha-256`).
    pub alg: DigestAlg,
    /// Lowercase hex digest bytes (64 characters for SHA-256).
    pub hex: String,
}

impl Digest {
    /// Constructs a validated digest from its hex form.
    pub fn new(alg: DigestAlg, hex: impl Into<String>) -> Result<Self, ValidationError> {
        let hex = hex.into();
        let matches = Regex::new(r"^[0-9a-f]{64}$")
            .map(|re| re.is_match(&hex))
            .unwrap_or(false);
        if !matches {
            return Err(ValidationError::PatternMismatch {
                field: "digest",
                value: hex,
            });
        }
        Ok(Digest { alg, hex })
    }

    /// SHA-256 over raw bytes.
    pub fn of_bytes(bytes: &[u8]) -> Self {
        let hash = Sha256::digest(bytes);
        Digest {
            alg: DigestAlg::Sha256,
            hex: hex::encode(hash),
        }
    }

    /// Lowercase hex form, as stored in vector packs.
    pub fn as_hex(&self) -> &str {
        &self.hex
    }

    /// True when `hex` is exactly this digest's hex form.
    pub fn matches_hex(&self, hex: &str) -> bool {
        self.hex == hex
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex)
    }
}

/// SHA-256 digest of UTF-8 bytes.
pub fn digest(bytes: &[u8]) -> Digest {
    Digest::of_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_has_known_sha256() {
        assert_eq!(
            digest(b"").as_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn rejects_uppercase_hex() {
        let upper = "E3B0C44298FC1C149AFBF4C8996FB92427AE41E4649B934CA495991B7852B855";
        assert!(Digest::new(DigestAlg::Sha256, upper).is_err());
    }

    #[test]
    fn computed_digest_round_trips_through_validation() {
        let computed = digest(b"hello world");
        let parsed = Digest::new(DigestAlg::Sha256, computed.hex.clone()).unwrap();
        assert_eq!(parsed, computed);
        assert_eq!(computed.to_string(), computed.hex);
    }
}
