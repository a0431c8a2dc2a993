//! Plaintext values and decryption results.

use crate::serde_decimal::signed_number;
use crate::{Error, MatchTag, Result};
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use secshare_math::parse_integer;
use serde_json::Value;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A value to encrypt.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Plaintext {
    /// An integer of arbitrary size.
    Integer(BigInt),
    /// A text, encrypted character by character.
    Text(String),
}

impl Plaintext {
    /// Interpret host input: an integer literal if it parses as one, text otherwise.
    pub fn parse(input: &str) -> Self {
        match parse_integer(input) {
            Ok(value) => Plaintext::Integer(value),
            Err(_) => Plaintext::Text(input.to_string()),
        }
    }

    /// Like [`Plaintext::parse`], but only an integer written exactly as it
    /// prints (no `+`, leading zeros or surrounding whitespace) is an integer.
    pub fn parse_canonical(input: &str) -> Self {
        match Self::parse(input) {
            Plaintext::Integer(value) if value.to_string() != input => {
                Plaintext::Text(input.to_string())
            }
            pt => pt,
        }
    }

    /// The character codes of the plaintext; an integer is a single code.
    pub(crate) fn codes(&self) -> Vec<BigInt> {
        match self {
            Plaintext::Integer(value) => vec![value.clone()],
            Plaintext::Text(text) => text.chars().map(|c| BigInt::from(u32::from(c))).collect(),
        }
    }
}

impl From<i64> for Plaintext {
    fn from(value: i64) -> Self {
        Plaintext::Integer(BigInt::from(value))
    }
}

impl From<BigInt> for Plaintext {
    fn from(value: BigInt) -> Self {
        Plaintext::Integer(value)
    }
}

impl From<&str> for Plaintext {
    fn from(value: &str) -> Self {
        Plaintext::Text(value.to_string())
    }
}

impl From<String> for Plaintext {
    fn from(value: String) -> Self {
        Plaintext::Text(value)
    }
}

/// Representation requested for a decrypted value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OutputKind {
    /// Decimal integers.
    #[default]
    Number,
    /// Character codes mapped back to text.
    Text,
}

impl FromStr for OutputKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "number" => Ok(OutputKind::Number),
            "string" | "text" => Ok(OutputKind::Text),
            _ => Err(Error::Parse(format!("Invalid output type {:?}", s))),
        }
    }
}

/// The result of a decryption.
///
/// MATCH ciphertexts cannot be inverted: decrypting one yields the
/// [`Decrypted::MatchToken`] associated with the plaintext under the key, which
/// is only useful for equality tests against other MATCH ciphertexts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decrypted {
    /// A reconstructed SUM plaintext.
    Integer(BigInt),
    /// Reconstructed STORE character codes.
    Codes(Vec<BigInt>),
    /// A reconstructed STORE integer.
    StoredInteger(BigInt),
    /// The opaque comparison token of a MATCH ciphertext.
    MatchToken(MatchTag),
}

impl Decrypted {
    /// The reconstructed integer, when the ciphertext held one.
    pub fn as_integer(&self) -> Option<&BigInt> {
        match self {
            Decrypted::Integer(value) | Decrypted::StoredInteger(value) => Some(value),
            Decrypted::Codes(codes) if codes.len() == 1 => codes.first(),
            _ => None,
        }
    }

    /// Map the reconstructed codes back to text.
    pub fn to_text(&self) -> Result<String> {
        match self {
            Decrypted::Codes(codes) => codes.iter().map(code_to_char).collect(),
            Decrypted::StoredInteger(value) => Ok(value.to_string()),
            Decrypted::Integer(_) => Err(Error::sum_requires_number_output()),
            Decrypted::MatchToken(tag) => Ok(tag.to_hex()),
        }
    }

    /// Render the value the way the host asked for it.
    ///
    /// Numbers are decimal; several STORE codes render as a JSON array. MATCH
    /// tokens render as hexadecimal whatever the output kind.
    pub fn render(&self, output: OutputKind) -> Result<String> {
        match output {
            OutputKind::Number => Ok(self.to_string()),
            OutputKind::Text => self.to_text(),
        }
    }
}

impl Display for Decrypted {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Decrypted::Integer(value) | Decrypted::StoredInteger(value) => write!(f, "{}", value),
            Decrypted::Codes(codes) if codes.len() == 1 => write!(f, "{}", codes[0]),
            Decrypted::Codes(codes) => {
                let array = Value::Array(codes.iter().map(signed_number).collect());
                write!(f, "{}", array)
            }
            Decrypted::MatchToken(tag) => f.write_str(&tag.to_hex()),
        }
    }
}

fn code_to_char(code: &BigInt) -> Result<char> {
    code.to_u32()
        .and_then(char::from_u32)
        .ok_or_else(|| Error::Parse(format!("{} is not a valid character code", code)))
}

#[cfg(test)]
mod tests {
    use super::{Decrypted, OutputKind, Plaintext};
    use crate::{Error, MatchTag};
    use num_bigint::BigInt;

    #[test]
    fn parse_host_input() {
        assert_eq!(Plaintext::parse("42"), Plaintext::from(42));
        assert_eq!(Plaintext::parse("-7"), Plaintext::from(-7));
        assert_eq!(Plaintext::parse("hi"), Plaintext::from("hi"));
        assert_eq!(Plaintext::parse("4 2"), Plaintext::from("4 2"));
        assert_eq!(Plaintext::parse(""), Plaintext::from(""));
        assert_eq!(Plaintext::parse("007"), Plaintext::from(7));
    }

    #[test]
    fn parse_canonical_host_input() {
        assert_eq!(Plaintext::parse_canonical("42"), Plaintext::from(42));
        assert_eq!(Plaintext::parse_canonical("-5"), Plaintext::from(-5));
        for text in ["007", "+7", " 7", "-0", "hi"] {
            assert_eq!(Plaintext::parse_canonical(text), Plaintext::from(text));
        }
    }

    #[test]
    fn codes() {
        let codes = Plaintext::from("hé").codes();
        assert_eq!(codes, vec![BigInt::from(104), BigInt::from(233)]);
        assert_eq!(Plaintext::from(7).codes(), vec![BigInt::from(7)]);
    }

    #[test]
    fn output_kind_names() {
        assert_eq!("Number".parse::<OutputKind>().unwrap(), OutputKind::Number);
        assert_eq!("String".parse::<OutputKind>().unwrap(), OutputKind::Text);
        assert!("Bytes".parse::<OutputKind>().is_err());
    }

    #[test]
    fn render() {
        let hi = Decrypted::Codes(vec![BigInt::from(104), BigInt::from(105)]);
        assert_eq!(hi.render(OutputKind::Text).unwrap(), "hi");
        assert_eq!(hi.render(OutputKind::Number).unwrap(), "[104,105]");

        let single = Decrypted::Codes(vec![BigInt::from(42)]);
        assert_eq!(single.render(OutputKind::Number).unwrap(), "42");
        assert_eq!(single.as_integer(), Some(&BigInt::from(42)));

        let sum = Decrypted::Integer(BigInt::from(-3));
        assert_eq!(sum.render(OutputKind::Number).unwrap(), "-3");
        assert_eq!(
            sum.render(OutputKind::Text),
            Err(Error::TypeMismatch(
                "SUM mode can only output as Number".to_string()
            ))
        );

        let stored = Decrypted::StoredInteger(BigInt::from(-5));
        assert_eq!(stored.render(OutputKind::Text).unwrap(), "-5");
        assert_eq!(stored.render(OutputKind::Number).unwrap(), "-5");

        let bad = Decrypted::Codes(vec![BigInt::from(0xD800)]);
        assert!(matches!(bad.to_text(), Err(Error::Parse(_))));

        let token = Decrypted::MatchToken(MatchTag::from_bytes([0xab; 64]));
        assert_eq!(token.render(OutputKind::Text).unwrap(), "ab".repeat(64));
    }
}
