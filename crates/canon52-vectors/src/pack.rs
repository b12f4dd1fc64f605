use std::fs;
use std::path::{Path, PathBuf};

use canon52_canonical::{pack_digest, Digest};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ReplayError;

/// File name of the canonicalization pack inside a vectors directory.
pub const CANON_PACK_FILE: &str = "canon_vectors.json";
/// File name of the adjudication pack inside a vectors directory.
pub const ADJUD_PACK_FILE: &str = "adjud_vectors.json";

/// What a canonicalization vector expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Expectation {
    /// A digest equal to `expected_hash`.
    Hash,
    /// A canonicalization error, optionally with a specific code.
    Error,
    /// Anything else; such a vector can never pass.
    #[serde(other)]
    Unrecognized,
}

/// One canonicalization vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonVector {
    /// Vector identifier.
    pub id: String,
    /// `text` or `json`; other kinds fail with `BAD_KIND`.
    pub kind: String,
    /// Input before canonicalization.
    pub raw: String,
    /// Expected outcome.
    pub expected: Expectation,
    /// Hex digest when `expected` is `hash`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_hash: Option<String>,
    /// Error code when `expected` is `error`; absent or empty accepts any error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_error: Option<String>,
}

/// One adjudication vector. The request stays untyped so a malformed request
/// fails only its own vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjudicationVector {
    /// Vector identifier.
    pub id: String,
    /// Request mapping.
    pub req: Value,
    /// Full expected decision record.
    pub expected: Value,
}

/// A loaded pack: the document as read (what anchors hash) plus its typed
/// `vectors` list.
#[derive(Debug, Clone)]
pub struct VectorPack<V> {
    document: Value,
    vectors: Vec<V>,
}

/// Canonicalization pack.
pub type CanonPack = VectorPack<CanonVector>;
/// Adjudication pack.
pub type AdjudicationPack = VectorPack<AdjudicationVector>;

impl<V: DeserializeOwned> VectorPack<V> {
    /// Builds a pack from a parsed document. A missing `vectors` key yields
    /// an empty pack.
    pub fn from_document(document: Value) -> Result<Self, ReplayError> {
        let Some(obj) = document.as_object() else {
            return Err(ReplayError::MalformedPack(
                "pack document must be a JSON object".to_string(),
            ));
        };
        let vectors = match obj.get("vectors") {
            None => Vec::new(),
            Some(list) => Vec::<V>::deserialize(list)
                .map_err(|e| ReplayError::MalformedPack(format!("vectors: {e}")))?,
        };
        Ok(Self { document, vectors })
    }
}

impl<V> VectorPack<V> {
    /// Vectors in document order.
    pub fn vectors(&self) -> &[V] {
        &self.vectors
    }

    /// The document as loaded.
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Pack-level integrity digest.
    pub fn digest(&self) -> Result<Digest, ReplayError> {
        Ok(pack_digest(&self.document)?)
    }
}

/// Locations of the two packs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackPaths {
    /// Canonicalization pack.
    pub canon: PathBuf,
    /// Adjudication pack.
    pub adjud: PathBuf,
}

impl PackPaths {
    /// Standard file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            canon: dir.join(CANON_PACK_FILE),
            adjud: dir.join(ADJUD_PACK_FILE),
        }
    }
}

fn read_document(path: &Path) -> Result<Value, ReplayError> {
    let raw = fs::read_to_string(path).map_err(|source| ReplayError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ReplayError::JsonParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads and types a pack file.
pub fn load_pack<V: DeserializeOwned>(path: impl AsRef<Path>) -> Result<VectorPack<V>, ReplayError> {
    VectorPack::from_document(read_document(path.as_ref())?)
}

/// Reads the canonicalization pack.
pub fn load_canon_pack(path: impl AsRef<Path>) -> Result<CanonPack, ReplayError> {
    load_pack(path)
}

/// Reads the adjudication pack.
pub fn load_adjudication_pack(path: impl AsRef<Path>) -> Result<AdjudicationPack, ReplayError> {
    load_pack(path)
}

/// Reads both packs; all I/O finishes before any vector is evaluated.
pub fn load_packs(paths: &PackPaths) -> Result<(CanonPack, AdjudicationPack), ReplayError> {
    let canon = load_canon_pack(&paths.canon)?;
    let adjud = load_adjudication_pack(&paths.adjud)?;
    Ok((canon, adjud))
}

/// Writes `document` pretty-printed (2-space indent, non-ASCII kept
/// literal, keys in document order, no trailing newline), creating parent
/// directories as needed.
pub fn write_pack(path: impl AsRef<Path>, document: &Value) -> Result<(), ReplayError> {
    let path = path.as_ref();
    let io_err = |source| ReplayError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let text = serde_json::to_string_pretty(document).map_err(ReplayError::Record)?;
    fs::write(path, text).map_err(io_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_vectors_is_empty() {
        let pack = CanonPack::from_document(json!({"version": "1"})).unwrap();
        assert!(pack.vectors().is_empty());
    }

    #[test]
    fn non_object_document_is_malformed() {
        let err = CanonPack::from_document(json!([])).unwrap_err();
        assert!(matches!(err, ReplayError::MalformedPack(_)));
    }

    #[test]
    fn unknown_expectation_still_loads() {
        let pack = CanonPack::from_document(json!({
            "vectors": [{"id": "x", "kind": "text", "raw": "a", "expected": "maybe"}]
        }))
        .unwrap();
        assert_eq!(pack.vectors()[0].expected, Expectation::Unrecognized);
    }

    #[test]
    fn written_pack_keeps_key_order() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("pack.json");
        let document: Value =
            serde_json::from_str(r#"{"version": "1.1", "vectors": [{"id": "é", "kind": "text"}]}"#)
                .unwrap();

        write_pack(&path, &document).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "{\n  \"version\": \"1.1\",\n  \"vectors\": [\n    {\n      \"id\": \"é\",\n      \"kind\": \"text\"\n    }\n  ]\n}"
        );
    }

    #[test]
    fn paths_use_standard_names() {
        let paths = PackPaths::in_dir("vectors");
        assert_eq!(paths.canon, Path::new("vectors").join("canon_vectors.json"));
        assert_eq!(paths.adjud, Path::new("vectors").join("adjud_vectors.json"));
    }
}
