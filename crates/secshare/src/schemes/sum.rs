//! SUM: masked additive shares of an integer.

use crate::keys::KeyCore;
use crate::{CiphertextBody, Decrypted, Error, Parameters, Plaintext, Result};
use num_bigint::BigUint;
use num_traits::Zero;
use rand::{CryptoRng, RngCore};
use rand_chacha::ChaCha20Rng;
use secshare_math::zq::Modulus;

pub(super) fn validate(par: &Parameters, pt: &Plaintext) -> Result<()> {
    match pt {
        Plaintext::Integer(value) => par.encode_integer(value).map(|_| ()),
        Plaintext::Text(_) => Err(Error::sum_requires_integer()),
    }
}

pub(super) fn encrypt(
    key: &KeyCore,
    pt: &Plaintext,
    rng: &mut ChaCha20Rng,
) -> Result<CiphertextBody> {
    let Plaintext::Integer(value) = pt else {
        return Err(Error::sum_requires_integer());
    };
    let residue = key.par.encode_integer(value)?;
    Ok(CiphertextBody::Sum(share_value(
        key.par.modulus(),
        &residue,
        &key.material.masks,
        rng,
    )))
}

pub(super) fn decrypt(key: &KeyCore, body: &CiphertextBody) -> Result<Decrypted> {
    let CiphertextBody::Sum(shares) = body else {
        return Err(Error::malformed_ciphertext("expected SUM shares"));
    };
    let inverses = key.inverse_masks()?;
    let residue = reconstruct_value(key.par.modulus(), shares, &inverses);
    Ok(Decrypted::Integer(key.par.decode_integer(&residue)))
}

/// Split `residue` into one masked share per mask.
///
/// The unmasked shares are uniform except the last, which fixes their sum to
/// `residue` modulo p.
pub(crate) fn share_value<R: RngCore + CryptoRng>(
    modulus: &Modulus,
    residue: &BigUint,
    masks: &[BigUint],
    rng: &mut R,
) -> Vec<BigUint> {
    let mut last = residue.clone();
    let mut shares = Vec::with_capacity(masks.len());
    for _ in 1..masks.len() {
        let share = modulus.random(rng);
        last = modulus.sub(&last, &share);
        shares.push(share);
    }
    shares.push(last);
    shares
        .iter()
        .zip(masks)
        .map(|(share, mask)| modulus.mul(share, mask))
        .collect()
}

/// Unmask and sum the shares of one value.
pub(crate) fn reconstruct_value<'a, I>(modulus: &Modulus, shares: I, inverses: &[BigUint]) -> BigUint
where
    I: IntoIterator<Item = &'a BigUint>,
{
    shares
        .into_iter()
        .zip(inverses)
        .fold(BigUint::zero(), |acc, (share, inverse)| {
            modulus.add(&acc, &modulus.mul(&modulus.reduce_biguint(share), inverse))
        })
}
