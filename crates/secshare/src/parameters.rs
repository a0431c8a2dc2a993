//! Create parameters for secret-shared encryption

use crate::serde_decimal;
use crate::{Error, Result};
use num_bigint::{BigInt, BigUint};
use num_traits::One;
use once_cell::sync::Lazy;
use secshare_math::zq::Modulus;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::Debug;
use std::sync::Arc;

/// Parameters shared by every key, ciphertext and node.
#[derive(Clone, PartialEq, Eq)]
pub struct Parameters {
    /// Working modulus for share arithmetic.
    modulus: Modulus,

    /// Largest magnitude of an integer plaintext (or character code).
    plaintext_bound: BigUint,
}

impl Debug for Parameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parameters")
            .field("modulus_bits", &self.modulus.bits())
            .field("plaintext_bound_bits", &self.plaintext_bound.bits())
            .finish()
    }
}

static DEFAULT_PARAMETERS: Lazy<Arc<Parameters>> = Lazy::new(|| {
    Arc::new(Parameters {
        modulus: Parameters::default_modulus(),
        plaintext_bound: BigUint::one() << Parameters::DEFAULT_PLAINTEXT_BOUND_BITS,
    })
});

impl Parameters {
    /// Size in bits of the default Mersenne prime modulus 2^127 - 1.
    pub const DEFAULT_MODULUS_BITS: u32 = 127;

    /// The default plaintext bound is 2^96, leaving room for 2^29 additions
    /// of maximal plaintexts before the centered lift becomes ambiguous.
    pub const DEFAULT_PLAINTEXT_BOUND_BITS: u32 = 96;

    fn default_modulus() -> Modulus {
        let p = (BigUint::one() << Self::DEFAULT_MODULUS_BITS) - 1u8;
        match Modulus::new(p) {
            Ok(modulus) => modulus,
            Err(_) => unreachable!("2^127 - 1 is a valid modulus"),
        }
    }

    /// The default parameters: modulus 2^127 - 1 and plaintexts within ±2^96.
    pub fn default_arc() -> Arc<Self> {
        DEFAULT_PARAMETERS.clone()
    }

    /// Returns the working modulus.
    pub fn modulus(&self) -> &Modulus {
        &self.modulus
    }

    /// Returns the bound on the magnitude of integer plaintexts.
    pub fn plaintext_bound(&self) -> &BigUint {
        &self.plaintext_bound
    }

    /// Reduce an integer plaintext, refusing values that could wrap.
    pub(crate) fn encode_integer(&self, value: &BigInt) -> Result<BigUint> {
        self.modulus
            .reduce_bounded(value, &self.plaintext_bound)
            .map_err(|_| Error::out_of_range(value, &self.plaintext_bound))
    }

    /// Map a reconstructed residue back to a signed integer.
    pub(crate) fn decode_integer(&self, residue: &BigUint) -> BigInt {
        self.modulus.lift_centered(residue)
    }
}

/// Builder for parameters.
#[derive(Debug, Default)]
pub struct ParametersBuilder {
    modulus: Option<BigUint>,
    plaintext_bound: Option<BigUint>,
}

impl ParametersBuilder {
    /// Creates a new instance of the builder
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the working modulus; `build` fails if it is smaller than 3.
    pub fn set_modulus(&mut self, modulus: BigUint) -> &mut Self {
        self.modulus = Some(modulus);
        self
    }

    /// Sets the bound on the magnitude of integer plaintexts.
    pub fn set_plaintext_bound(&mut self, bound: BigUint) -> &mut Self {
        self.plaintext_bound = Some(bound);
        self
    }

    /// Sets the plaintext bound to 2^bits.
    pub fn set_plaintext_bound_bits(&mut self, bits: u32) -> &mut Self {
        self.set_plaintext_bound(BigUint::one() << bits)
    }

    /// Build a new `Parameters` inside an `Arc`.
    pub fn build_arc(&self) -> Result<Arc<Parameters>> {
        self.build().map(Arc::new)
    }

    /// Build a new `Parameters`.
    ///
    /// Without an explicit modulus the default 2^127 - 1 is used. Without an
    /// explicit bound, the bound is 2^96 capped to a quarter of the modulus.
    pub fn build(&self) -> Result<Parameters> {
        let modulus = match &self.modulus {
            Some(p) => Modulus::new(p.clone())?,
            None => Parameters::default_modulus(),
        };
        let plaintext_bound = match &self.plaintext_bound {
            Some(bound) => bound.clone(),
            None => {
                let default = BigUint::one() << Parameters::DEFAULT_PLAINTEXT_BOUND_BITS;
                let quarter = modulus.modulus() >> 2u32;
                default.min(quarter)
            }
        };
        // Every value in [-bound, bound] must have a distinct residue.
        if (&plaintext_bound << 1u32) >= *modulus.modulus() {
            return Err(Error::InvalidParameters(format!(
                "plaintext bound {} must be less than half of the modulus {}",
                plaintext_bound,
                modulus.modulus()
            )));
        }
        Ok(Parameters {
            modulus,
            plaintext_bound,
        })
    }
}

/// Wire form of the parameters, embedded in serialized keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ParametersRecord {
    #[serde(with = "serde_decimal::biguint")]
    modulus: BigUint,
    #[serde(with = "serde_decimal::biguint")]
    plaintext_bound: BigUint,
}

impl From<&Parameters> for ParametersRecord {
    fn from(par: &Parameters) -> Self {
        Self {
            modulus: par.modulus.modulus().clone(),
            plaintext_bound: par.plaintext_bound.clone(),
        }
    }
}

impl ParametersRecord {
    /// The record as a JSON object of decimal literals.
    pub(crate) fn to_value(&self) -> Value {
        let mut record = Map::new();
        record.insert("modulus".to_string(), serde_decimal::number(&self.modulus));
        record.insert(
            "plaintextBound".to_string(),
            serde_decimal::number(&self.plaintext_bound),
        );
        Value::Object(record)
    }
}

impl TryFrom<ParametersRecord> for Arc<Parameters> {
    type Error = Error;

    fn try_from(record: ParametersRecord) -> Result<Self> {
        let default = Parameters::default_arc();
        if *default.modulus.modulus() == record.modulus
            && default.plaintext_bound == record.plaintext_bound
        {
            return Ok(default);
        }
        ParametersBuilder::new()
            .set_modulus(record.modulus)
            .set_plaintext_bound(record.plaintext_bound)
            .build_arc()
    }
}
