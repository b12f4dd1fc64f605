use crate::validation::ValidationError;
use regex::Regex;
use serde::{Deserialize, Serialize};

macro_rules! newtype {
    ($name:ident, $doc:expr, $pattern:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new instance without validation; callers are responsible for conformity.
            pub fn new(value: String) -> Self {
                Self(value)
            }

            /// Parses a validated identifier from a string.
            pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
                let s = value.into();
                let matches = Regex::new($pattern)
                    .map(|re| re.is_match(&s))
                    .unwrap_or(false);
                if !matches {
                    return Err(ValidationError::PatternMismatch {
                        field: stringify!($name),
                        value: s,
                    });
                }
                Ok(Self(s))
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

newtype!(
    ProfileId,
    "Identifier for canonicalization profiles (pattern: `[A-Za-z0-9_-]{16,128}`)",
    r"^[A-Za-z0-9_-]{16,128}$"
);

/// Profile identifier stamped on CanonText hygiene reports.
pub const CANON_TEXT_PROFILE: &str = "canon52_canontext_v1";
/// Profile identifier stamped on CanonJSON hygiene reports.
pub const CANON_JSON_PROFILE: &str = "canon52_canonjson_v1";

impl ProfileId {
    /// Profile for the CanonText v1 rules.
    pub fn canon_text() -> Self {
        Self(CANON_TEXT_PROFILE.to_string())
    }

    /// Profile for the CanonJSON v1 rules.
    pub fn canon_json() -> Self {
        Self(CANON_JSON_PROFILE.to_string())
    }
}
