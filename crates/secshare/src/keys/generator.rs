//! Key generation, random or seeded.

use super::material::KeyCore;
use super::{ClusterKey, KeyMaterial, KeyRegime, SecretKey};
use crate::{Cluster, Operations, Parameters, Result};
use rand::rngs::OsRng;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use sha2::{Digest, Sha256};
use std::fmt::Debug;
use std::sync::Arc;
use tracing::debug;

const KEY_DERIVATION_DOMAIN: &[u8] = b"secshare/key-generation/v1";

/// Seed for deterministic key generation.
///
/// Identical seeds, node counts, capabilities, regimes and parameters yield
/// bit-identical key material.
#[derive(Clone, PartialEq, Eq, zeroize_derive::Zeroize, zeroize_derive::ZeroizeOnDrop)]
pub struct Seed(Vec<u8>);

impl Debug for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Seed(<redacted>)")
    }
}

impl Seed {
    /// Create a seed from arbitrary bytes.
    pub fn new<B: Into<Vec<u8>>>(bytes: B) -> Self {
        Self(bytes.into())
    }

    /// The seed `"42"`, for reproducible fixtures.
    ///
    /// Never used implicitly: key generation without a seed draws from the
    /// operating system.
    pub fn fixture() -> Self {
        Self::new(*b"42")
    }

    /// Interpret a host argument; an empty string means no seed.
    pub fn from_host(text: &str) -> Option<Self> {
        (!text.is_empty()).then(|| Self::new(text.as_bytes()))
    }

    /// The seed bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Derive the sampling stream of a seeded key generation.
pub(crate) fn seeded_rng(
    par: &Parameters,
    cluster: &Cluster,
    operations: Operations,
    regime: KeyRegime,
    seed: &Seed,
) -> ChaCha20Rng {
    let mut hasher = Sha256::new();
    hasher.update(KEY_DERIVATION_DOMAIN);
    hasher.update([regime.tag()]);
    hasher.update((cluster.node_count() as u64).to_le_bytes());
    hasher.update([operations.flags()]);
    hasher.update(par.modulus().modulus().to_bytes_le());
    hasher.update(seed.as_bytes());

    let mut stream_seed = <ChaCha20Rng as SeedableRng>::Seed::default();
    stream_seed.copy_from_slice(&hasher.finalize());
    ChaCha20Rng::from_seed(stream_seed)
}

/// Generator of key material for a fixed set of parameters.
#[derive(Debug, Clone)]
pub struct KeyGenerator {
    par: Arc<Parameters>,
}

impl Default for KeyGenerator {
    fn default() -> Self {
        Self::new(&Parameters::default_arc())
    }
}

impl KeyGenerator {
    /// Create a generator for the given parameters.
    pub fn new(par: &Arc<Parameters>) -> Self {
        Self { par: par.clone() }
    }

    /// The parameters of the generated keys.
    pub fn parameters(&self) -> &Arc<Parameters> {
        &self.par
    }

    /// Generate key material for a cluster of `node_count` nodes.
    ///
    /// Fails with [`crate::Error::InvalidCluster`] when `node_count` is zero and
    /// with [`crate::Error::CapabilityMismatch`] when no mode is enabled.
    pub fn generate(
        &self,
        node_count: usize,
        operations: Operations,
        regime: KeyRegime,
        seed: Option<&Seed>,
    ) -> Result<KeyMaterial> {
        let cluster = Cluster::new(node_count)?;
        let core = self.generate_core(&cluster, operations, regime, seed)?;
        Ok(match regime {
            KeyRegime::Coordinating => KeyMaterial::Coordinating(SecretKey { core }),
            KeyRegime::Cluster => KeyMaterial::Cluster(ClusterKey { core }),
        })
    }

    pub(crate) fn generate_core(
        &self,
        cluster: &Cluster,
        operations: Operations,
        regime: KeyRegime,
        seed: Option<&Seed>,
    ) -> Result<KeyCore> {
        debug!(
            %regime,
            node_count = cluster.node_count(),
            seeded = seed.is_some(),
            "generating key material"
        );
        match seed {
            Some(seed) => {
                let mut rng = seeded_rng(&self.par, cluster, operations, regime, seed);
                KeyCore::generate(&self.par, cluster, operations, &mut rng)
            }
            None => KeyCore::generate(&self.par, cluster, operations, &mut OsRng),
        }
    }
}
