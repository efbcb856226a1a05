//! Serde helpers for `U256` fields.
//!
//! Values are written as decimal strings. On input, decimal strings,
//! `0x`-prefixed hex strings and plain JSON integers are accepted.

use primitive_types::U256;
use serde::de::{self, Visitor};
use serde::{Deserializer, Serializer};
use std::fmt;

/// Parses a decimal or `0x`-hex string into a `U256`.
pub fn parse_u256(s: &str) -> Result<U256, String> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        U256::from_str_radix(hex, 16).map_err(|e| format!("invalid hex integer {s}: {e:?}"))
    } else {
        U256::from_dec_str(s).map_err(|e| format!("invalid decimal integer {s}: {e:?}"))
    }
}

pub fn serialize<S>(value: &U256, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_string())
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<U256, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(U256Visitor)
}

struct U256Visitor;

impl Visitor<'_> for U256Visitor {
    type Value = U256;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an unsigned integer or a decimal/hex string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<U256, E> {
        Ok(U256::from(v))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<U256, E> {
        Ok(U256::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<U256, E> {
        u64::try_from(v)
            .map(U256::from)
            .map_err(|_| E::custom(format!("negative value {v} for unsigned integer")))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<U256, E> {
        parse_u256(v).map_err(E::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize)]
    struct Wrapper {
        #[serde(with = "crate::serde_u256")]
        value: U256,
    }

    #[test]
    fn test_parse_decimal_and_hex() {
        assert_eq!(parse_u256("4295128739").unwrap(), U256::from(4_295_128_739u64));
        assert_eq!(parse_u256("0x1000276a3").unwrap(), U256::from(4_295_128_739u64));
        assert!(parse_u256("not-a-number").is_err());
    }

    #[test]
    fn test_serializes_as_decimal_string() {
        let w = Wrapper {
            value: U256::one() << 96,
        };
        let json = serde_json::to_string(&w).unwrap();
        assert_eq!(json, r#"{"value":"79228162514264337593543950336"}"#);
    }

    #[test]
    fn test_deserializes_numbers_and_strings() {
        let w: Wrapper = serde_json::from_str(r#"{"value":42}"#).unwrap();
        assert_eq!(w.value, U256::from(42));
        let w: Wrapper = serde_json::from_str(r#"{"value":"0x2a"}"#).unwrap();
        assert_eq!(w.value, U256::from(42));
        assert!(serde_json::from_str::<Wrapper>(r#"{"value":-1}"#).is_err());
    }
}
