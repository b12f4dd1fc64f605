use serde::de::{self, DeserializeSeed, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::emit::to_ascii_string;
use crate::hygiene::{HygieneReport, HygieneStatus};
use crate::identifiers::ProfileId;
use std::cmp::Ordering;
use std::fmt;

/// Marker carried through serde's custom error so a float can be told apart
/// from other parse failures.
const FLOAT_MARKER: &str = "canon52: float literal";

/// Single map key under which serde_json hands over numbers that do not fit
/// in 64 bits.
const NUMBER_TOKEN: &str = "$serde_json::private::Number";

/// Bare non-finite constants accepted by lenient JSON producers.
const NON_FINITE_TOKENS: [&str; 3] = ["-Infinity", "Infinity", "NaN"];

/// Error returned when canonicalization fails.
///
/// Every variant maps to a stable wire code (see [`CanonicalizationError::code`])
/// that vector packs assert against.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CanonicalizationError {
    /// A TAB character survived normalization.
    #[error("TAB character at char offset {offset}")]
    TabForbidden {
        /// Char offset in the normalized text.
        offset: usize,
    },
    /// One of U+200B, U+200C, U+200D or U+FEFF was found.
    #[error("zero-width character U+{codepoint:04X} at char offset {offset}")]
    ZeroWidthForbidden {
        /// Char offset in the normalized text.
        offset: usize,
        /// Offending code point.
        codepoint: u32,
    },
    /// A control character below U+0020 (other than LF) or U+007F was found.
    #[error("control character U+{codepoint:04X} at char offset {offset}")]
    ControlCharForbidden {
        /// Char offset in the normalized text.
        offset: usize,
        /// Offending code point.
        codepoint: u32,
    },
    /// A number with a fraction or exponent was encountered.
    #[error("float literal at {at}")]
    FloatForbidden {
        /// Parse location or JSON path of the float.
        at: String,
    },
    /// An object key was not a string.
    #[error("non-string object key: {0}")]
    NonStringKey(String),
    /// A value could not be represented in the JSON data model.
    #[error("unsupported JSON type {type_name}: {detail}")]
    UnsupportedJsonType {
        /// Rust type that was being canonicalized.
        type_name: String,
        /// Serializer diagnostic.
        detail: String,
    },
    /// Input was not well-formed JSON.
    #[error("invalid JSON: {0}")]
    InvalidJson(String),
    /// `canon_then_hash` was asked for a kind other than `text`/`json`.
    #[error("unknown canonicalization kind '{0}'")]
    UnknownKind(String),
}

impl CanonicalizationError {
    /// Stable error code used by vector packs (`expected_error`).
    pub fn code(&self) -> String {
        match self {
            Self::TabForbidden { .. } => "TAB_FORBIDDEN".to_string(),
            Self::ZeroWidthForbidden { .. } => "ZERO_WIDTH_FORBIDDEN".to_string(),
            Self::ControlCharForbidden { .. } => "CONTROL_CHAR_FORBIDDEN".to_string(),
            Self::FloatForbidden { .. } => "FLOAT_FORBIDDEN".to_string(),
            Self::NonStringKey(_) => "NON_STRING_KEY".to_string(),
            Self::UnsupportedJsonType { type_name, .. } => {
                format!("UNSUPPORTED_JSON_TYPE:{}", type_name)
            }
            Self::InvalidJson(_) => "INVALID_JSON".to_string(),
            Self::UnknownKind(_) => "BAD_KIND".to_string(),
        }
    }
}

/// Result of canonicalization.
#[derive(Debug)]
pub struct CanonicalizationResult {
    /// Canonical UTF-8 bytes for the input value.
    pub bytes: Vec<u8>,
    /// Hygiene report describing what normalization rewrote.
    pub report: HygieneReport,
}

impl CanonicalizationResult {
    /// Canonical form as a string (always ASCII).
    pub fn as_str(&self) -> &str {
        // Emitter output is ASCII by construction.
        std::str::from_utf8(&self.bytes).unwrap_or_default()
    }
}

/// Helper for building JSON paths during canonicalization.
#[derive(Debug, Clone)]
struct Path {
    segments: Vec<String>,
}

impl Path {
    fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    fn push_field(&self, field: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(field.to_string());
        Self { segments }
    }

    fn push_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(format!("[{}]", index));
        Self { segments }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            write!(f, "root")
        } else {
            write!(f, "{}", self.segments.join("."))
        }
    }
}

/// Integer of any size, ordered by sign and then magnitude.
///
/// Built from the decimal token, so `-0` and leading zeros normalize away.
#[derive(Debug, Clone, PartialEq, Eq)]
struct IntKey {
    negative: bool,
    digits: String,
}

impl IntKey {
    /// Parses `-?[0-9]+`; anything else (fraction, exponent) is `None`.
    fn parse(token: &str) -> Option<Self> {
        let (negative, digits) = match token.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, token),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let digits = match digits.trim_start_matches('0') {
            "" => "0",
            trimmed => trimmed,
        };
        Some(Self {
            negative: negative && digits != "0",
            digits: digits.to_string(),
        })
    }

    fn of(n: &Number) -> Option<Self> {
        Self::parse(&n.to_string())
    }

    fn is_zero(&self) -> bool {
        self.digits == "0"
    }

    fn cmp_magnitude(&self, other: &Self) -> Ordering {
        self.digits
            .len()
            .cmp(&other.digits.len())
            .then_with(|| self.digits.cmp(&other.digits))
    }
}

impl Ord for IntKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.negative, other.negative) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => self.cmp_magnitude(other),
            (true, true) => other.cmp_magnitude(self),
        }
    }
}

impl PartialOrd for IntKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Type-rank sort key for array elements:
/// null < bool < integer < string < everything else (by canonical text).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum RankKey {
    Null,
    Bool(bool),
    Int(IntKey),
    Str(String),
    Other(String),
}

fn rank_key(value: &Value, path: &Path) -> Result<RankKey, CanonicalizationError> {
    Ok(match value {
        Value::Null => RankKey::Null,
        Value::Bool(b) => RankKey::Bool(*b),
        Value::Number(n) => match IntKey::of(n) {
            Some(int) => RankKey::Int(int),
            None => {
                return Err(CanonicalizationError::FloatForbidden {
                    at: path.to_string(),
                })
            }
        },
        Value::String(s) => RankKey::Str(s.clone()),
        other => RankKey::Other(to_ascii_string(other)),
    })
}

/// Counters collected while parsing.
#[derive(Debug, Default)]
struct ParseStats {
    duplicate_keys: u64,
}

/// Streaming parser seed: rejects floats the moment the tokenizer yields
/// one, keeps integers of any size and counts duplicate keys (last value
/// wins).
struct ValueSeed<'a> {
    stats: &'a mut ParseStats,
}

impl<'de, 'a> DeserializeSeed<'de> for ValueSeed<'a> {
    type Value = Value;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }
}

impl<'de, 'a> Visitor<'de> for ValueSeed<'a> {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("any JSON value without floats")
    }

    fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Value::Number(v.into()))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Value::Number(v.into()))
    }

    fn visit_f64<E>(self, _v: f64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Err(de::Error::custom(FLOAT_MARKER))
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E> {
        Ok(Value::String(v.to_owned()))
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E> {
        Ok(Value::String(v))
    }

    fn visit_none<E>(self) -> Result<Self::Value, E> {
        Ok(Value::Null)
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E> {
        Ok(Value::Null)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let stats = self.stats;
        let mut items = Vec::new();
        while let Some(item) = seq.next_element_seed(ValueSeed {
            stats: &mut *stats,
        })? {
            items.push(item);
        }
        Ok(Value::Array(items))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let stats = self.stats;
        let mut obj = Map::new();
        while let Some(key) = map.next_key::<String>()? {
            if obj.is_empty() && key == NUMBER_TOKEN {
                let token: String = map.next_value()?;
                return number_from_token(&token);
            }
            let value = map.next_value_seed(ValueSeed {
                stats: &mut *stats,
            })?;
            if obj.insert(key, value).is_some() {
                stats.duplicate_keys += 1;
            }
        }
        Ok(Value::Object(obj))
    }
}

/// Out-of-range numbers arrive as their literal token; only a fraction or
/// exponent makes one a float.
fn number_from_token<E: de::Error>(token: &str) -> Result<Value, E> {
    if token.contains(|c: char| matches!(c, '.' | 'e' | 'E')) {
        return Err(E::custom(FLOAT_MARKER));
    }
    token.parse::<Number>().map(Value::Number).map_err(E::custom)
}

fn parse_error(err: serde_json::Error) -> CanonicalizationError {
    if err.to_string().starts_with(FLOAT_MARKER) {
        CanonicalizationError::FloatForbidden {
            at: format!("line {} column {}", err.line(), err.column()),
        }
    } else {
        CanonicalizationError::InvalidJson(err.to_string())
    }
}

/// Replaces bare `NaN`/`Infinity`/`-Infinity` outside string literals with
/// `null`. Returns the rewritten text and the first constant seen, or `None`
/// when the input has none.
fn mask_non_finite(raw: &str) -> Option<(String, &'static str)> {
    let mut out = String::with_capacity(raw.len());
    let mut first = None;
    let mut in_string = false;
    let mut escaped = false;
    let mut rest = raw;
    while let Some(c) = rest.chars().next() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            in_string = true;
        } else if let Some(token) = NON_FINITE_TOKENS.iter().find(|t| rest.starts_with(**t)) {
            out.push_str("null");
            rest = &rest[token.len()..];
            if first.is_none() {
                first = Some(*token);
            }
            continue;
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }
    first.map(|token| (out, token))
}

/// Parses `raw`, failing with `FloatForbidden` on the first float literal.
///
/// Non-finite constants parse as floats too, but only once the whole
/// document is otherwise well formed: a later syntax error still wins.
fn parse_without_floats(raw: &str, stats: &mut ParseStats) -> Result<Value, CanonicalizationError> {
    match mask_non_finite(raw) {
        None => parse_strict(raw, stats),
        Some((masked, token)) => {
            parse_strict(&masked, stats)?;
            Err(CanonicalizationError::FloatForbidden {
                at: format!("constant {}", token),
            })
        }
    }
}

fn parse_strict(raw: &str, stats: &mut ParseStats) -> Result<Value, CanonicalizationError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    let value = ValueSeed { stats }
        .deserialize(&mut deserializer)
        .map_err(parse_error)?;
    deserializer.end().map_err(parse_error)?;
    Ok(value)
}

/// CanonJSON canonicalizer: sorted keys, type-ranked arrays, ASCII output.
pub struct Canonicalizer {
    profile: ProfileId,
}

impl Default for Canonicalizer {
    fn default() -> Self {
        Self::new(ProfileId::canon_json())
    }
}

impl Canonicalizer {
    /// Creates a new canonicalizer for the provided profile.
    pub fn new(profile: ProfileId) -> Self {
        Self { profile }
    }

    /// Parses raw JSON text and produces canonical bytes + hygiene report.
    pub fn canonicalize_str(&self, raw: &str) -> Result<CanonicalizationResult, CanonicalizationError> {
        self.canonicalize_str_with_report(raw).map_err(|(err, _)| err)
    }

    /// Like [`Canonicalizer::canonicalize_str`], returning the report even on error.
    pub fn canonicalize_str_with_report(
        &self,
        raw: &str,
    ) -> Result<CanonicalizationResult, (CanonicalizationError, HygieneReport)> {
        let mut report = HygieneReport::new(self.profile.clone());
        let mut stats = ParseStats::default();

        let parsed = parse_without_floats(raw, &mut stats);
        report.note("DuplicateKeys", "duplicate_keys", stats.duplicate_keys);
        let value = match parsed {
            Ok(value) => value,
            Err(e) => {
                report.status = HygieneStatus::Invalid;
                return Err((e, report));
            }
        };

        self.finish(value, report)
    }

    /// Canonicalizes an already-parsed JSON tree.
    pub fn canonicalize(&self, value: &Value) -> Result<CanonicalizationResult, CanonicalizationError> {
        let report = HygieneReport::new(self.profile.clone());
        self.finish(value.clone(), report).map_err(|(err, _)| err)
    }

    /// Canonicalizes any serializable Rust value.
    ///
    /// This is the only entry point where `NonStringKey` and
    /// `UnsupportedJsonType` can occur: the value is first lowered to a JSON
    /// tree and lowering failures are classified.
    pub fn canonicalize_serializable<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<CanonicalizationResult, CanonicalizationError> {
        let tree = to_json_tree(value)?;
        self.canonicalize(&tree)
    }

    fn finish(
        &self,
        value: Value,
        mut report: HygieneReport,
    ) -> Result<CanonicalizationResult, (CanonicalizationError, HygieneReport)> {
        match canonicalize_value(value, &Path::root(), &mut report) {
            Ok(canonical) => {
                let bytes = to_ascii_string(&canonical).into_bytes();
                Ok(CanonicalizationResult { bytes, report })
            }
            Err(e) => {
                report.status = HygieneStatus::Invalid;
                Err((e, report))
            }
        }
    }
}

/// Lowers a serializable value to a JSON tree, classifying failures.
pub(crate) fn to_json_tree<T: Serialize>(value: &T) -> Result<Value, CanonicalizationError> {
    serde_json::to_value(value).map_err(|err| {
        let detail = err.to_string();
        if detail.contains("key must be a string") {
            CanonicalizationError::NonStringKey(detail)
        } else {
            CanonicalizationError::UnsupportedJsonType {
                type_name: short_type_name::<T>().to_string(),
                detail,
            }
        }
    })
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Recursively canonicalizes a JSON value: objects keep code point key
/// order, arrays are re-ordered by [`RankKey`].
fn canonicalize_value(
    value: Value,
    path: &Path,
    report: &mut HygieneReport,
) -> Result<Value, CanonicalizationError> {
    match value {
        Value::Object(map) => {
            let mut out = Map::new();
            for (key, child) in map {
                let child = canonicalize_value(child, &path.push_field(&key), report)?;
                out.insert(key, child);
            }
            Ok(Value::Object(out))
        }
        Value::Array(items) => {
            let mut keyed = Vec::with_capacity(items.len());
            for (idx, item) in items.into_iter().enumerate() {
                let item_path = path.push_index(idx);
                let item = canonicalize_value(item, &item_path, report)?;
                keyed.push((rank_key(&item, &item_path)?, item));
            }
            let already_sorted = keyed.windows(2).all(|pair| pair[0].0 <= pair[1].0);
            if !already_sorted {
                keyed.sort_by(|a, b| a.0.cmp(&b.0));
                report.note("ArrayReordered", "arrays_reordered", 1);
            }
            Ok(Value::Array(keyed.into_iter().map(|(_, v)| v).collect()))
        }
        Value::Number(n) => match IntKey::of(&n) {
            Some(int) if int.is_zero() => Ok(Value::Number(0u8.into())),
            Some(_) => Ok(Value::Number(n)),
            None => Err(CanonicalizationError::FloatForbidden {
                at: path.to_string(),
            }),
        },
        scalar @ (Value::String(_) | Value::Bool(_) | Value::Null) => Ok(scalar),
    }
}

/// Canonical CanonJSON bytes for raw JSON text.
pub fn canon_json(raw: &str) -> Result<Vec<u8>, CanonicalizationError> {
    Canonicalizer::default()
        .canonicalize_str(raw)
        .map(|result| result.bytes)
}
