//! Serde helpers shared by requests and records.
//!
//! Request mappings come from JSON written by hand or by other checkers, so
//! flags and small integers are accepted in either spelling: `true`/`1`,
//! `false`/`0`.

use serde::de::{self, Deserializer, Visitor};
use serde::Serializer;
use std::fmt;
use std::num::NonZeroI64;

struct FlagVisitor;

impl<'de> Visitor<'de> for FlagVisitor {
    type Value = bool;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a boolean or integer flag")
    }

    fn visit_bool<E>(self, v: bool) -> Result<bool, E> {
        Ok(v)
    }

    fn visit_i64<E>(self, v: i64) -> Result<bool, E> {
        Ok(v != 0)
    }

    fn visit_u64<E>(self, v: u64) -> Result<bool, E> {
        Ok(v != 0)
    }

    // An explicit null is falsy, so `"valid_id": null` routes SAFE.
    fn visit_unit<E>(self) -> Result<bool, E> {
        Ok(false)
    }

    fn visit_none<E>(self) -> Result<bool, E> {
        Ok(false)
    }
}

struct IntVisitor;

impl<'de> Visitor<'de> for IntVisitor {
    type Value = i64;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an integer or boolean")
    }

    fn visit_bool<E>(self, v: bool) -> Result<i64, E> {
        Ok(i64::from(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<i64, E> {
        Ok(v)
    }

    fn visit_u64<E>(self, v: u64) -> Result<i64, E>
    where
        E: de::Error,
    {
        i64::try_from(v).map_err(|_| E::custom(format!("integer {v} exceeds i64 range")))
    }
}

/// Boolean flag that also accepts integers (non-zero is true) and null.
pub(crate) mod flag {
    use super::*;

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        deserializer.deserialize_any(FlagVisitor)
    }
}

/// Integer field that also accepts booleans.
pub(crate) mod int {
    use super::*;

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        deserializer.deserialize_any(IntVisitor)
    }
}

/// Requested world-effect magnitude; zero is rejected.
pub(crate) mod magnitude {
    use super::*;

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NonZeroI64, D::Error> {
        let raw = deserializer.deserialize_any(IntVisitor)?;
        NonZeroI64::new(raw)
            .ok_or_else(|| de::Error::custom("delta_omega_req must be non-zero"))
    }
}

/// Boolean carried on the wire as `0`/`1`, as the vector packs record
/// attack flags.
pub(crate) mod bit {
    use super::*;

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        deserializer.deserialize_any(FlagVisitor)
    }
}
