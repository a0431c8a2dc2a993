//! Key material for secret-shared encryption.

mod cluster_key;
mod generator;
mod material;
mod secret_key;

pub use cluster_key::ClusterKey;
pub use generator::{KeyGenerator, Seed};
pub use secret_key::SecretKey;

pub(crate) use material::{KeyCore, Salt};

use crate::{Ciphertext, Decrypted, Error, Mode, Operations, Parameters, Plaintext, Result};
use rand::{CryptoRng, RngCore};
use secshare_traits::{ShareDecrypter, ShareEncrypter, ShareParametrized};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

/// Who holds the key material.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum KeyRegime {
    /// A coordinating party holds a [`SecretKey`].
    #[default]
    Coordinating,
    /// The key travels with the ciphertexts as a [`ClusterKey`].
    Cluster,
}

impl KeyRegime {
    pub(crate) const fn tag(self) -> u8 {
        match self {
            KeyRegime::Coordinating => 0,
            KeyRegime::Cluster => 1,
        }
    }
}

impl Display for KeyRegime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            KeyRegime::Coordinating => "SecretKey",
            KeyRegime::Cluster => "ClusterKey",
        })
    }
}

impl FromStr for KeyRegime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "secretkey" | "secret" | "coordinating" => Ok(KeyRegime::Coordinating),
            "clusterkey" | "cluster" => Ok(KeyRegime::Cluster),
            _ => Err(Error::Parse(format!("Invalid key type {:?}", s))),
        }
    }
}

/// Key material of either regime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyMaterial {
    /// A coordinating secret key.
    Coordinating(SecretKey),
    /// A cluster key.
    Cluster(ClusterKey),
}

impl KeyMaterial {
    pub(crate) fn core(&self) -> &KeyCore {
        match self {
            KeyMaterial::Coordinating(sk) => &sk.core,
            KeyMaterial::Cluster(ck) => &ck.core,
        }
    }

    /// The regime of the key.
    pub fn regime(&self) -> KeyRegime {
        match self {
            KeyMaterial::Coordinating(_) => KeyRegime::Coordinating,
            KeyMaterial::Cluster(_) => KeyRegime::Cluster,
        }
    }

    /// The number of nodes the key is bound to.
    pub fn node_count(&self) -> usize {
        self.core().node_count()
    }

    /// The modes enabled on the key.
    pub fn operations(&self) -> Operations {
        self.core().operations
    }

    /// The parameters of the key.
    pub fn parameters(&self) -> &Arc<Parameters> {
        &self.core().par
    }

    /// Encrypt a plaintext in `mode`.
    pub fn encrypt<R: RngCore + CryptoRng>(
        &self,
        mode: Mode,
        pt: &Plaintext,
        rng: &mut R,
    ) -> Result<Ciphertext> {
        match self {
            KeyMaterial::Coordinating(sk) => sk.encrypt(mode, pt, rng),
            KeyMaterial::Cluster(ck) => ck.encrypt(mode, pt, rng),
        }
    }

    /// Decrypt a ciphertext.
    pub fn decrypt(&self, ct: &Ciphertext) -> Result<Decrypted> {
        self.core().decrypt(ct)
    }
}

impl From<SecretKey> for KeyMaterial {
    fn from(sk: SecretKey) -> Self {
        KeyMaterial::Coordinating(sk)
    }
}

impl From<ClusterKey> for KeyMaterial {
    fn from(ck: ClusterKey) -> Self {
        KeyMaterial::Cluster(ck)
    }
}

impl ShareParametrized for KeyMaterial {
    type Capabilities = Operations;

    fn node_count(&self) -> usize {
        self.core().node_count()
    }

    fn capabilities(&self) -> &Operations {
        &self.core().operations
    }
}

impl ShareEncrypter<Plaintext, Ciphertext> for KeyMaterial {
    type Error = Error;

    fn try_encrypt<R: RngCore + CryptoRng>(&self, pt: &Plaintext, rng: &mut R) -> Result<Ciphertext> {
        self.encrypt(self.operations().single_mode()?, pt, rng)
    }
}

impl ShareDecrypter<Ciphertext, Decrypted> for KeyMaterial {
    type Error = Error;

    fn try_decrypt(&self, ct: &Ciphertext) -> Result<Decrypted> {
        self.decrypt(ct)
    }
}

#[cfg(test)]
mod tests {
    use super::{KeyGenerator, KeyMaterial, KeyRegime};
    use crate::{Mode, Operations, Plaintext};
    use rand::thread_rng;
    use secshare_traits::{ShareDecrypter, ShareEncrypter, ShareParametrized};
    use std::error::Error as StdError;

    #[test]
    fn regime_names() {
        assert_eq!("SecretKey".parse::<KeyRegime>().unwrap(), KeyRegime::Coordinating);
        assert_eq!("ClusterKey".parse::<KeyRegime>().unwrap(), KeyRegime::Cluster);
        assert_eq!(KeyRegime::Cluster.to_string(), "ClusterKey");
        assert!("PublicKey".parse::<KeyRegime>().is_err());
    }

    #[test]
    fn both_regimes_roundtrip() -> Result<(), Box<dyn StdError>> {
        let generator = KeyGenerator::default();
        for regime in [KeyRegime::Coordinating, KeyRegime::Cluster] {
            let key = generator.generate(4, Operations::only(Mode::Sum), regime, None)?;
            assert_eq!(key.regime(), regime);
            assert_eq!(key.node_count(), 4);
            assert_eq!(key.capabilities(), &Operations::only(Mode::Sum));

            let ct = key.try_encrypt(&Plaintext::from(-5), &mut thread_rng())?;
            assert_eq!(ct.embedded_key().is_some(), regime == KeyRegime::Cluster);
            assert_eq!(key.try_decrypt(&ct)?.to_string(), "-5");
        }
        Ok(())
    }

    #[test]
    fn conversions() -> Result<(), Box<dyn StdError>> {
        let key = KeyGenerator::default().generate(1, Operations::only(Mode::Match), KeyRegime::Coordinating, None)?;
        let KeyMaterial::Coordinating(sk) = key.clone() else {
            panic!("expected a coordinating key");
        };
        assert_eq!(KeyMaterial::from(sk), key);
        Ok(())
    }
}
