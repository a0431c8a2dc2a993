//! Cluster keys.

use super::material::KeyCore;
use super::{KeyGenerator, KeyRegime, Seed};
use crate::{Ciphertext, Cluster, Decrypted, Error, Mode, Operations, Parameters};
use crate::{Plaintext, Result};
use rand::{CryptoRng, RngCore};
use secshare_traits::{ShareDecrypter, ShareEncrypter, ShareParametrized};
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};
use serde_json::Value;
use std::fmt::Debug;
use std::sync::Arc;

/// Key material distributed with the cluster.
///
/// Ciphertexts produced under a cluster key carry a copy of the key, so any
/// holder of the ciphertext can decrypt it with
/// [`ClusterKey::decrypt_self_contained`].
#[derive(Clone, PartialEq, Eq, SerdeSerialize, SerdeDeserialize)]
#[serde(transparent)]
pub struct ClusterKey {
    pub(crate) core: KeyCore,
}

impl Debug for ClusterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusterKey")
            .field("node_count", &self.core.node_count())
            .field("operations", &self.core.operations)
            .finish()
    }
}

impl ClusterKey {
    /// Generate a [`ClusterKey`] with the default parameters.
    pub fn generate(cluster: &Cluster, operations: Operations, seed: Option<&Seed>) -> Result<Self> {
        Self::generate_with_parameters(&Parameters::default_arc(), cluster, operations, seed)
    }

    /// Generate a [`ClusterKey`] for the given parameters.
    pub fn generate_with_parameters(
        par: &Arc<Parameters>,
        cluster: &Cluster,
        operations: Operations,
        seed: Option<&Seed>,
    ) -> Result<Self> {
        let core =
            KeyGenerator::new(par).generate_core(cluster, operations, KeyRegime::Cluster, seed)?;
        Ok(Self { core })
    }

    /// The cluster the key is bound to.
    pub fn cluster(&self) -> &Cluster {
        &self.core.cluster
    }

    /// Encode as the JSON key record.
    pub fn to_value(&self) -> Value {
        self.core.to_value()
    }

    /// Encrypt a plaintext in `mode`; the ciphertext embeds this key.
    pub fn encrypt<R: RngCore + CryptoRng>(
        &self,
        mode: Mode,
        pt: &Plaintext,
        rng: &mut R,
    ) -> Result<Ciphertext> {
        let body = self.core.encrypt(mode, pt, rng)?;
        Ok(Ciphertext::new(body, Some(self.clone())))
    }

    /// Decrypt a ciphertext with this key.
    pub fn decrypt(&self, ct: &Ciphertext) -> Result<Decrypted> {
        self.core.decrypt(ct)
    }

    /// Decrypt a ciphertext with the key it carries.
    pub fn decrypt_self_contained(ct: &Ciphertext) -> Result<Decrypted> {
        ct.embedded_key().ok_or(Error::MissingKey)?.decrypt(ct)
    }
}

impl ShareParametrized for ClusterKey {
    type Capabilities = Operations;

    fn node_count(&self) -> usize {
        self.core.node_count()
    }

    fn capabilities(&self) -> &Operations {
        &self.core.operations
    }
}

impl ShareEncrypter<Plaintext, Ciphertext> for ClusterKey {
    type Error = Error;

    fn try_encrypt<R: RngCore + CryptoRng>(&self, pt: &Plaintext, rng: &mut R) -> Result<Ciphertext> {
        self.encrypt(self.core.operations.single_mode()?, pt, rng)
    }
}

impl ShareDecrypter<Ciphertext, Decrypted> for ClusterKey {
    type Error = Error;

    fn try_decrypt(&self, ct: &Ciphertext) -> Result<Decrypted> {
        self.decrypt(ct)
    }
}
