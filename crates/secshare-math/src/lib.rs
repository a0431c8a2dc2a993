#![crate_name = "secshare_math"]
#![crate_type = "lib"]
#![warn(missing_docs, unused_imports)]

//! Arbitrary-precision modular arithmetic used by the secshare library.
//!
//! Every value that flows through share splitting or share summation is a
//! [`num_bigint::BigInt`] or [`num_bigint::BigUint`]; no fixed-width integer is
//! used on that path.

mod parse;
pub mod zq;

pub use parse::{mod_add, parse_integer};

/// The Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

/// Enum encapsulating all the possible errors from this library.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Indicates that a textual integer could not be parsed.
    #[error("Invalid integer literal: {0:?}")]
    Parse(String),

    /// Indicates an invalid modulus.
    #[error("Invalid modulus: {0}")]
    InvalidModulus(String),

    /// Indicates that a value does not fit the range allowed by the modulus.
    #[error("Value {0} is outside of the representable range")]
    OutOfRange(String),
}
