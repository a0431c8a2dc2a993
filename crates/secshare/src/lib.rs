#![crate_name = "secshare"]
#![crate_type = "lib"]
#![warn(missing_docs, unused_imports)]

//! Secret-shared encryption for multi-party computation.
//!
//! A plaintext is split into one share per computation node so that no single
//! node learns the value, nodes can add shares without reconstructing anything,
//! and only the holder of the key material can recover or compare values.
//!
//! Three modes are supported:
//! - [`Mode::Sum`]: additive shares of an integer, summable by the nodes;
//! - [`Mode::Store`]: additive shares of every character code of a text;
//! - [`Mode::Match`]: a deterministic tag supporting equality tests.
//!
//! ```
//! use secshare::{Cluster, KeyMaterial, Mode, Operations, Plaintext, SecretKey};
//! use rand::rngs::OsRng;
//!
//! let cluster = Cluster::new(3)?;
//! let sk = SecretKey::generate(&cluster, Operations::only(Mode::Sum), None)?;
//! let key = KeyMaterial::from(sk);
//! let ct = key.encrypt(Mode::Sum, &Plaintext::from(42), &mut OsRng)?;
//! assert_eq!(key.decrypt(&ct)?.to_string(), "42");
//! # Ok::<(), secshare::Error>(())
//! ```

mod ciphertext;
mod cluster;
mod combine;
mod errors;
pub mod keys;
pub mod operations;
mod parameters;
mod plaintext;
mod schemes;
mod serde_decimal;

pub use ciphertext::{Ciphertext, CiphertextBody, MatchTag, StoreKind, MATCH_TAG_LEN};
pub use cluster::{Cluster, Mode, Node, Operations};
pub use combine::{combine_shares, format_shares, parse_share_pair};
pub use errors::Result;
pub use keys::{ClusterKey, KeyGenerator, KeyMaterial, KeyRegime, SecretKey, Seed};
pub use parameters::{Parameters, ParametersBuilder};
pub use plaintext::{Decrypted, OutputKind, Plaintext};

/// Enum encapsulating all the possible errors from this library.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Indicates an error in the arithmetic layer.
    #[error("{0}")]
    MathError(#[from] secshare_math::Error),

    /// Indicates malformed numeric or structured input.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Indicates a cluster without nodes.
    #[error("Invalid cluster: {0}")]
    InvalidCluster(String),

    /// Indicates a mode that is not enabled on the key.
    #[error("{0}")]
    CapabilityMismatch(String),

    /// Indicates a plaintext or output type that the mode does not support.
    #[error("{0}")]
    TypeMismatch(String),

    /// Indicates mismatched share-vector lengths or ciphertext shapes.
    #[error("{0}")]
    ShapeMismatch(String),

    /// Indicates that the mode of a ciphertext cannot be determined.
    #[error("Mode required: {0}")]
    ModeRequired(String),

    /// Indicates an integer plaintext outside of the supported bound.
    #[error("Plaintext {value} is outside of the supported range [-{bound}, {bound}]")]
    OutOfRange {
        /// The rejected value.
        value: String,
        /// The bound on the magnitude of plaintexts.
        bound: String,
    },

    /// Indicates that a ciphertext carries no key to decrypt itself with.
    #[error("Ciphertext does not carry key material")]
    MissingKey,

    /// Indicates invalid parameters.
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// Indicates a failure to (de)serialize a wire record.
    #[error("Serialization error: {0}")]
    Serialization(String),
}
