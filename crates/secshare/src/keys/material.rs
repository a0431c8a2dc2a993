//! Key material shared by both key regimes.

use crate::parameters::ParametersRecord;
use crate::schemes::{scheme, Encrypt};
use crate::serde_decimal;
use crate::{Ciphertext, CiphertextBody, Cluster, Decrypted, Error, Mode, Operations, Parameters};
use crate::{Plaintext, Result};
use num_bigint::BigUint;
use num_traits::Zero;
use rand::{CryptoRng, Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt::Debug;
use std::sync::Arc;
use tracing::trace;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length in bytes of the MATCH salt.
pub(crate) const SALT_LEN: usize = 64;

/// Secret salt keying the MATCH tags.
#[derive(Clone, PartialEq, Eq, zeroize_derive::Zeroize, zeroize_derive::ZeroizeOnDrop)]
pub(crate) struct Salt([u8; SALT_LEN]);

impl Salt {
    pub(crate) fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut bytes = [0u8; SALT_LEN];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Salt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        let mut bytes = [0u8; SALT_LEN];
        hex::decode_to_slice(&text, &mut bytes).map_err(serde::de::Error::custom)?;
        Ok(Self(bytes))
    }
}

/// The per-node masks and the MATCH salt.
#[derive(Clone, PartialEq, Eq, Default, Deserialize)]
pub(crate) struct Material {
    /// One multiplicative mask per node, each a unit modulo p.
    #[serde(default, deserialize_with = "serde_decimal::biguint_vec::deserialize")]
    pub(crate) masks: Vec<BigUint>,
    #[serde(default)]
    pub(crate) salt: Option<Salt>,
}

impl Material {
    fn to_value(&self) -> Value {
        let mut record = Map::new();
        if !self.masks.is_empty() {
            let masks = self.masks.iter().map(serde_decimal::number).collect();
            record.insert("masks".to_string(), Value::Array(masks));
        }
        if let Some(salt) = &self.salt {
            record.insert("salt".to_string(), Value::String(hex::encode(salt.0)));
        }
        Value::Object(record)
    }
}

impl Zeroize for Material {
    fn zeroize(&mut self) {
        self.masks.iter_mut().for_each(|mask| mask.set_zero());
        self.masks.clear();
        self.salt.zeroize();
    }
}

impl Drop for Material {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ZeroizeOnDrop for Material {}

/// The state common to coordinating and cluster keys.
#[derive(Clone, PartialEq, Eq)]
pub(crate) struct KeyCore {
    pub(crate) par: Arc<Parameters>,
    pub(crate) cluster: Cluster,
    pub(crate) operations: Operations,
    pub(crate) material: Material,
}

impl Debug for KeyCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyCore")
            .field("par", &self.par)
            .field("node_count", &self.node_count())
            .field("operations", &self.operations)
            .finish()
    }
}

impl KeyCore {
    /// Sample fresh key material from `rng`.
    pub(crate) fn generate<R: RngCore + CryptoRng>(
        par: &Arc<Parameters>,
        cluster: &Cluster,
        operations: Operations,
        rng: &mut R,
    ) -> Result<Self> {
        cluster.validate()?;
        if operations.is_empty() {
            return Err(Error::no_capabilities());
        }

        let masks = if operations.needs_masks() {
            (0..cluster.node_count())
                .map(|_| par.modulus().random_unit(rng))
                .collect()
        } else {
            vec![]
        };
        let salt = operations.matching.then(|| Salt::random(rng));

        Ok(Self {
            par: par.clone(),
            cluster: cluster.clone(),
            operations,
            material: Material { masks, salt },
        })
    }

    pub(crate) fn node_count(&self) -> usize {
        self.cluster.node_count()
    }

    /// Inverses of the node masks.
    pub(crate) fn inverse_masks(&self) -> Result<Vec<BigUint>> {
        self.material
            .masks
            .iter()
            .map(|mask| {
                self.par
                    .modulus()
                    .inv(mask)
                    .ok_or_else(|| Error::InvalidParameters("node mask is not invertible".to_string()))
            })
            .collect()
    }

    pub(crate) fn salt(&self) -> Result<&Salt> {
        self.material
            .salt
            .as_ref()
            .ok_or_else(|| Error::capability_mismatch(Mode::Match))
    }

    /// Encrypt `pt` in `mode`, after checking the capability and the plaintext.
    pub(crate) fn encrypt<R: RngCore + CryptoRng>(
        &self,
        mode: Mode,
        pt: &Plaintext,
        rng: &mut R,
    ) -> Result<CiphertextBody> {
        self.operations.require(mode)?;
        let scheme = scheme(mode);
        (scheme.validate)(&self.par, pt)?;
        trace!(%mode, node_count = self.node_count(), "encrypting");

        match scheme.encrypt {
            Encrypt::Randomized(encrypt) => {
                let mut stream = ChaCha20Rng::from_seed(rng.gen());
                encrypt(self, pt, &mut stream)
            }
            Encrypt::Deterministic(encrypt) => encrypt(self, pt),
        }
    }

    /// Decrypt `ct`, after checking the capability and the shape.
    pub(crate) fn decrypt(&self, ct: &Ciphertext) -> Result<Decrypted> {
        let mode = ct.mode();
        self.operations.require(mode)?;
        if ct.node_count() != self.node_count() {
            return Err(Error::node_count_mismatch(
                self.node_count(),
                ct.node_count(),
            ));
        }
        trace!(%mode, node_count = self.node_count(), "decrypting");
        (scheme(mode).decrypt)(self, &ct.body)
    }

    /// The key record `{"material","cluster","operations","parameters"}`.
    pub(crate) fn to_value(&self) -> Value {
        let mut record = Map::new();
        record.insert("material".to_string(), self.material.to_value());
        record.insert("cluster".to_string(), self.cluster.to_value());
        record.insert("operations".to_string(), self.operations.to_value());
        record.insert(
            "parameters".to_string(),
            ParametersRecord::from(self.par.as_ref()).to_value(),
        );
        Value::Object(record)
    }

    /// Check the invariants of material read from the wire.
    fn validate(&self) -> Result<()> {
        self.cluster.validate()?;
        if self.operations.is_empty() {
            return Err(Error::no_capabilities());
        }
        let masks = &self.material.masks;
        if self.operations.needs_masks() {
            if masks.len() != self.node_count() {
                return Err(Error::Serialization(format!(
                    "expected {} node masks, found {}",
                    self.node_count(),
                    masks.len()
                )));
            }
            if !masks.iter().all(|m| self.par.modulus().is_unit(m)) {
                return Err(Error::Serialization(
                    "node masks must be invertible".to_string(),
                ));
            }
        }
        if self.operations.matching && self.material.salt.is_none() {
            return Err(Error::Serialization("missing MATCH salt".to_string()));
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct KeyRecord {
    material: Material,
    cluster: Cluster,
    operations: Operations,
    parameters: ParametersRecord,
}

impl Serialize for KeyCore {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for KeyCore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let record = KeyRecord::deserialize(deserializer)?;
        let core = Self {
            par: record.parameters.try_into().map_err(serde::de::Error::custom)?,
            cluster: record.cluster,
            operations: record.operations,
            material: record.material,
        };
        core.validate().map_err(serde::de::Error::custom)?;
        Ok(core)
    }
}
