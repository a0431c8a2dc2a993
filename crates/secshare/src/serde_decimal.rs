//! Arbitrary-precision integers as JSON decimal literals.
//!
//! `serde_json` is built with `arbitrary_precision`, so a [`Number`] keeps the
//! exact literal it was parsed from and emits it unchanged.

use crate::{Error, Result};
use num_bigint::{BigInt, BigUint};
use secshare_math::parse_integer;
use serde::{de, Deserialize, Deserializer, Serializer};
use serde_json::{Number, Value};
use std::str::FromStr;

/// Encode an unsigned integer as a JSON number literal.
pub(crate) fn number(value: &BigUint) -> Value {
    let text = value.to_string();
    match Number::from_str(&text) {
        Ok(n) => Value::Number(n),
        Err(_) => Value::String(text),
    }
}

/// Encode a signed integer as a JSON number literal.
pub(crate) fn signed_number(value: &BigInt) -> Value {
    let text = value.to_string();
    match Number::from_str(&text) {
        Ok(n) => Value::Number(n),
        Err(_) => Value::String(text),
    }
}

/// Decode an integer from a JSON number literal or a decimal string.
pub(crate) fn bigint_from_value(value: &Value) -> Result<BigInt> {
    let parsed = match value {
        Value::Number(n) => parse_integer(&n.to_string()),
        Value::String(s) => parse_integer(s),
        _ => return Err(Error::Parse(format!("expected an integer, found {}", value))),
    };
    parsed.map_err(|_| Error::Parse(format!("expected an integer, found {}", value)))
}

/// Decode a non-negative integer from a JSON number literal or a decimal string.
pub(crate) fn biguint_from_value(value: &Value) -> Result<BigUint> {
    let signed = bigint_from_value(value)?;
    signed
        .to_biguint()
        .ok_or_else(|| Error::Parse(format!("expected a non-negative integer, found {}", signed)))
}

/// `#[serde(with = ...)]` adapter for a single [`BigUint`].
pub(crate) mod biguint {
    use super::*;

    pub(crate) fn serialize<S: Serializer>(value: &BigUint, s: S) -> std::result::Result<S::Ok, S::Error> {
        serde::Serialize::serialize(&number(value), s)
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<BigUint, D::Error> {
        let value = Value::deserialize(d)?;
        biguint_from_value(&value).map_err(de::Error::custom)
    }
}

/// `#[serde(deserialize_with = ...)]` adapter for a vector of [`BigUint`].
pub(crate) mod biguint_vec {
    use super::*;

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> std::result::Result<Vec<BigUint>, D::Error> {
        let values = Vec::<Value>::deserialize(d)?;
        values
            .iter()
            .map(biguint_from_value)
            .collect::<Result<Vec<_>>>()
            .map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::One;

    #[test]
    fn literals_keep_full_precision() {
        let big = (BigUint::one() << 200u32) + 7u8;
        let json = serde_json::to_string(&number(&big)).unwrap();
        assert_eq!(json, big.to_string());

        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(biguint_from_value(&value).unwrap(), big);
    }

    #[test]
    fn accepts_decimal_strings() {
        let value = Value::String("-12".to_string());
        assert_eq!(bigint_from_value(&value).unwrap(), BigInt::from(-12));
        assert!(matches!(biguint_from_value(&value), Err(Error::Parse(_))));
    }

    #[test]
    fn rejects_non_integers() {
        for json in ["1.5", "true", "null", "[1]", "\"0x1\""] {
            let value: Value = serde_json::from_str(json).unwrap();
            assert!(bigint_from_value(&value).is_err(), "{json} should be rejected");
        }
    }
}
