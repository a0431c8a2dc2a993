#![crate_name = "secshare_traits"]
#![crate_type = "lib"]
#![warn(missing_docs, unused_imports)]

//! Traits for secret-shared encryption.

use rand::{CryptoRng, RngCore};

/// The number of nodes and the enabled modes a value is bound to.
pub trait ShareParametrized {
    /// The type of the enabled-capability set.
    type Capabilities;

    /// Number of computation nodes the value is bound to.
    fn node_count(&self) -> usize;

    /// The capabilities the value was generated with.
    fn capabilities(&self) -> &Self::Capabilities;
}

/// Encrypt a plaintext into node shares.
pub trait ShareEncrypter<P: ?Sized, C> {
    /// The type of error returned.
    type Error;

    /// Try to encrypt a plaintext, drawing fresh randomness from `rng`.
    fn try_encrypt<R: RngCore + CryptoRng>(&self, pt: &P, rng: &mut R)
        -> Result<C, Self::Error>;
}

/// Decrypt node shares back into a plaintext.
pub trait ShareDecrypter<C, P> {
    /// The type of error returned.
    type Error;

    /// Try to decrypt a ciphertext.
    fn try_decrypt(&self, ct: &C) -> Result<P, Self::Error>;
}

/// Serialization into the JSON-compatible wire record.
pub trait Serialize {
    /// Serialize `Self` into UTF-8 JSON bytes.
    fn to_bytes(&self) -> Vec<u8>;
}

/// Deserialization from the JSON-compatible wire record.
pub trait Deserialize
where
    Self: Sized,
{
    /// The type of error returned.
    type Error;

    /// Attempt to deserialize from UTF-8 JSON bytes.
    fn try_deserialize(bytes: &[u8]) -> Result<Self, Self::Error>;
}
