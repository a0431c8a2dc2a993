use crate::{Error, Result};
use num_bigint::{BigInt, BigUint};
use std::str::FromStr;

/// Parse a base-10, optionally signed, integer literal.
///
/// Surrounding whitespace is ignored. Digit separators, radix prefixes and
/// fractional parts are rejected.
pub fn parse_integer(text: &str) -> Result<BigInt> {
    let trimmed = text.trim();
    let digits = trimmed
        .strip_prefix('-')
        .or_else(|| trimmed.strip_prefix('+'))
        .unwrap_or(trimmed);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::Parse(text.to_string()));
    }
    BigInt::from_str(trimmed).map_err(|_| Error::Parse(text.to_string()))
}

/// Computes `(a + b) mod modulus`.
///
/// Both operands may be arbitrarily large; the reduction happens once on the
/// exact sum.
pub fn mod_add(a: &BigUint, b: &BigUint, modulus: &BigUint) -> BigUint {
    (a + b) % modulus
}
