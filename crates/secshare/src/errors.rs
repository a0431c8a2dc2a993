//! Error helpers.

use crate::Mode;
use num_bigint::{BigInt, BigUint};

/// The Result type for this library.
pub type Result<T> = std::result::Result<T, crate::Error>;

/// Helper functions to create errors with consistent messages.
impl crate::Error {
    /// Create an invalid node count error.
    pub fn invalid_node_count(provided: usize) -> Self {
        Self::InvalidCluster(format!(
            "node count {} must be at least 1",
            provided
        ))
    }

    /// Create an error for a mode that the key was not generated with.
    pub fn capability_mismatch(mode: Mode) -> Self {
        Self::CapabilityMismatch(format!(
            "Cannot perform {} operation: not enabled on this key",
            mode.as_str().to_uppercase()
        ))
    }

    /// Create an error for a capability set without any mode.
    pub fn no_capabilities() -> Self {
        Self::CapabilityMismatch("At least one of sum, store or match must be enabled".to_string())
    }

    /// Create the error returned for text plaintexts in SUM mode.
    pub fn sum_requires_integer() -> Self {
        Self::TypeMismatch("SUM mode can only be used with numeric input".to_string())
    }

    /// Create the error returned for a textual output in SUM mode.
    pub fn sum_requires_number_output() -> Self {
        Self::TypeMismatch("SUM mode can only output as Number".to_string())
    }

    /// Create the error returned when the share combinator does not receive two arrays.
    pub fn expected_two_arrays() -> Self {
        Self::TypeMismatch(
            "Both inputs must be arrays separated by ';'. E.g., [1,2]; [3,4]".to_string(),
        )
    }

    /// Create the error returned when two share vectors differ in length.
    pub fn unequal_lengths(left: usize, right: usize) -> Self {
        Self::ShapeMismatch(format!(
            "Both arrays must have the same length. E.g., [1,2]; [3,4] (got {} and {})",
            left, right
        ))
    }

    /// Create an error for a ciphertext whose node count differs from the key.
    pub fn node_count_mismatch(expected: usize, found: usize) -> Self {
        Self::ShapeMismatch(format!(
            "Ciphertext has shares for {} nodes but the key is bound to {} nodes",
            found, expected
        ))
    }

    /// Create an error for a ciphertext with an inconsistent internal shape.
    pub fn malformed_ciphertext<S: Into<String>>(msg: S) -> Self {
        Self::ShapeMismatch(format!("Malformed ciphertext: {}", msg.into()))
    }

    /// Create an error for a plaintext outside of the supported bound.
    pub fn out_of_range(value: &BigInt, bound: &BigUint) -> Self {
        Self::OutOfRange {
            value: value.to_string(),
            bound: bound.to_string(),
        }
    }

    /// Create an error for a ciphertext whose mode cannot be inferred.
    pub fn mode_required<S: Into<String>>(msg: S) -> Self {
        Self::ModeRequired(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization<E: std::fmt::Display>(e: E) -> Self {
        Self::Serialization(e.to_string())
    }
}
