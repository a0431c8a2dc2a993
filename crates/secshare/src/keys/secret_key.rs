//! Coordinating secret keys.

use super::material::KeyCore;
use super::{KeyGenerator, KeyRegime, Seed};
use crate::schemes::match_tag;
use crate::{Ciphertext, Cluster, Decrypted, Error, Mode, Operations, Parameters};
use crate::{Plaintext, Result};
use rand::{CryptoRng, RngCore};
use secshare_traits::{
    Deserialize, Serialize, ShareDecrypter, ShareEncrypter, ShareParametrized,
};
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};
use serde_json::Value;
use std::fmt::Debug;
use std::sync::Arc;

/// Coordinating key: the only material able to decrypt SUM and STORE
/// ciphertexts and to test MATCH ciphertexts against plaintexts.
#[derive(Clone, PartialEq, Eq, SerdeSerialize, SerdeDeserialize)]
#[serde(transparent)]
pub struct SecretKey {
    pub(crate) core: KeyCore,
}

impl Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretKey")
            .field("node_count", &self.core.node_count())
            .field("operations", &self.core.operations)
            .finish()
    }
}

impl SecretKey {
    /// Generate a [`SecretKey`] with the default parameters.
    ///
    /// Without a seed the material is drawn from the operating system.
    pub fn generate(cluster: &Cluster, operations: Operations, seed: Option<&Seed>) -> Result<Self> {
        Self::generate_with_parameters(&Parameters::default_arc(), cluster, operations, seed)
    }

    /// Generate a [`SecretKey`] for the given parameters.
    pub fn generate_with_parameters(
        par: &Arc<Parameters>,
        cluster: &Cluster,
        operations: Operations,
        seed: Option<&Seed>,
    ) -> Result<Self> {
        let core = KeyGenerator::new(par).generate_core(
            cluster,
            operations,
            KeyRegime::Coordinating,
            seed,
        )?;
        Ok(Self { core })
    }

    /// Generate a random [`SecretKey`] from the provided generator.
    pub fn random<R: RngCore + CryptoRng>(
        par: &Arc<Parameters>,
        cluster: &Cluster,
        operations: Operations,
        rng: &mut R,
    ) -> Result<Self> {
        let core = KeyCore::generate(par, cluster, operations, rng)?;
        Ok(Self { core })
    }

    /// The cluster the key is bound to.
    pub fn cluster(&self) -> &Cluster {
        &self.core.cluster
    }

    /// The parameters of the key.
    pub fn parameters(&self) -> &Arc<Parameters> {
        &self.core.par
    }

    /// Encode as the JSON key record.
    pub fn to_value(&self) -> Value {
        self.core.to_value()
    }

    /// Encrypt a plaintext in `mode`.
    pub fn encrypt<R: RngCore + CryptoRng>(
        &self,
        mode: Mode,
        pt: &Plaintext,
        rng: &mut R,
    ) -> Result<Ciphertext> {
        let body = self.core.encrypt(mode, pt, rng)?;
        Ok(Ciphertext::new(body, None))
    }

    /// Decrypt a ciphertext.
    pub fn decrypt(&self, ct: &Ciphertext) -> Result<Decrypted> {
        self.core.decrypt(ct)
    }

    /// Whether a MATCH ciphertext encrypts `pt` under this key.
    pub fn matches(&self, ct: &Ciphertext, pt: &Plaintext) -> Result<bool> {
        self.core.operations.require(Mode::Match)?;
        let Decrypted::MatchToken(token) = self.decrypt(ct)? else {
            return Err(Error::TypeMismatch(
                "Equality testing requires a MATCH ciphertext".to_string(),
            ));
        };
        Ok(token == match_tag(self.core.salt()?, pt))
    }
}

impl ShareParametrized for SecretKey {
    type Capabilities = Operations;

    fn node_count(&self) -> usize {
        self.core.node_count()
    }

    fn capabilities(&self) -> &Operations {
        &self.core.operations
    }
}

impl ShareEncrypter<Plaintext, Ciphertext> for SecretKey {
    type Error = Error;

    /// Encrypt in the single mode enabled on the key.
    fn try_encrypt<R: RngCore + CryptoRng>(&self, pt: &Plaintext, rng: &mut R) -> Result<Ciphertext> {
        self.encrypt(self.core.operations.single_mode()?, pt, rng)
    }
}

impl ShareDecrypter<Ciphertext, Decrypted> for SecretKey {
    type Error = Error;

    fn try_decrypt(&self, ct: &Ciphertext) -> Result<Decrypted> {
        self.decrypt(ct)
    }
}

impl Serialize for SecretKey {
    fn to_bytes(&self) -> Vec<u8> {
        self.to_value().to_string().into_bytes()
    }
}

impl Deserialize for SecretKey {
    type Error = Error;

    fn try_deserialize(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(Error::serialization)
    }
}
