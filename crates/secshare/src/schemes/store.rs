//! STORE: masked additive shares of every character code.
//!
//! An integer plaintext is stored as a single code and the ciphertext records
//! it, so that it decrypts back to the integer rather than to a character.

use super::sum::{reconstruct_value, share_value};
use crate::keys::KeyCore;
use crate::{CiphertextBody, Decrypted, Error, Parameters, Plaintext, Result, StoreKind};
use ndarray::{Array2, Axis};
use num_bigint::{BigInt, BigUint};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rayon::prelude::*;

pub(super) fn validate(par: &Parameters, pt: &Plaintext) -> Result<()> {
    pt.codes()
        .iter()
        .try_for_each(|code| par.encode_integer(code).map(|_| ()))
}

pub(super) fn encrypt(
    key: &KeyCore,
    pt: &Plaintext,
    rng: &mut ChaCha20Rng,
) -> Result<CiphertextBody> {
    let residues = pt
        .codes()
        .iter()
        .map(|code| key.par.encode_integer(code))
        .collect::<Result<Vec<_>>>()?;
    let modulus = key.par.modulus();
    let masks = &key.material.masks;

    // One stream per column, so that columns can be shared in parallel.
    let seeds: Vec<<ChaCha20Rng as SeedableRng>::Seed> =
        (0..residues.len()).map(|_| rng.gen()).collect();
    let columns: Vec<Vec<BigUint>> = residues
        .par_iter()
        .zip(seeds.par_iter())
        .map(|(residue, seed)| {
            let mut rng = ChaCha20Rng::from_seed(*seed);
            share_value(modulus, residue, masks, &mut rng)
        })
        .collect();

    let table = Array2::from_shape_vec((residues.len(), masks.len()), columns.concat())
        .map_err(|e| Error::malformed_ciphertext(e.to_string()))?;
    let kind = match pt {
        Plaintext::Integer(_) => StoreKind::Integer,
        Plaintext::Text(_) => StoreKind::Text,
    };
    // Rows are nodes.
    Ok(CiphertextBody::Store {
        shares: table.reversed_axes(),
        kind,
    })
}

pub(super) fn decrypt(key: &KeyCore, body: &CiphertextBody) -> Result<Decrypted> {
    let CiphertextBody::Store { shares: table, kind } = body else {
        return Err(Error::malformed_ciphertext("expected a STORE table"));
    };

    let inverses = key.inverse_masks()?;
    let modulus = key.par.modulus();

    let columns: Vec<_> = table.axis_iter(Axis(1)).collect();
    let codes: Vec<BigInt> = columns
        .par_iter()
        .map(|column| {
            let residue = reconstruct_value(modulus, column.iter(), &inverses);
            key.par.decode_integer(&residue)
        })
        .collect();
    if *kind == StoreKind::Integer {
        let [value] = <[BigInt; 1]>::try_from(codes).map_err(|codes| {
            Error::malformed_ciphertext(format!(
                "an integer is stored in one column, found {}",
                codes.len()
            ))
        })?;
        return Ok(Decrypted::StoredInteger(value));
    }
    Ok(Decrypted::Codes(codes))
}

#[cfg(test)]
mod tests {
    use crate::{Cluster, Decrypted, Error, Mode, Operations, OutputKind, ParametersBuilder};
    use crate::{Ciphertext, Plaintext, SecretKey, StoreKind};
    use num_bigint::{BigInt, BigUint};
    use rand::thread_rng;
    use std::error::Error as StdError;

    #[test]
    fn integer_is_a_single_column() -> Result<(), Box<dyn StdError>> {
        let sk = SecretKey::generate(&Cluster::new(3)?, Operations::only(Mode::Store), None)?;
        let ct = sk.encrypt(Mode::Store, &Plaintext::from(-12), &mut thread_rng())?;
        assert_eq!(ct.table().map(|t| t.dim()), Some((3, 1)));
        assert_eq!(ct.store_kind(), Some(StoreKind::Integer));
        let decrypted = sk.decrypt(&ct)?;
        assert_eq!(decrypted, Decrypted::StoredInteger(BigInt::from(-12)));
        assert_eq!(decrypted.render(OutputKind::Text)?, "-12");
        assert_eq!(decrypted.render(OutputKind::Number)?, "-12");
        Ok(())
    }

    #[test]
    fn integer_tables_have_one_column() -> Result<(), Box<dyn StdError>> {
        let sk = SecretKey::generate(&Cluster::new(2)?, Operations::only(Mode::Store), None)?;
        let ct = Ciphertext::from_json(
            r#"{"kind":"integer","mode":"store","shares":[[1,2],[3,4]]}"#,
            None,
        )?;
        assert!(matches!(sk.decrypt(&ct), Err(Error::ShapeMismatch(_))));
        Ok(())
    }

    #[test]
    fn digits_as_text_stay_text() -> Result<(), Box<dyn StdError>> {
        let sk = SecretKey::generate(&Cluster::new(3)?, Operations::only(Mode::Store), None)?;
        let ct = sk.encrypt(Mode::Store, &Plaintext::from("42"), &mut thread_rng())?;
        assert_eq!(ct.store_kind(), Some(StoreKind::Text));
        assert_eq!(sk.decrypt(&ct)?.render(OutputKind::Text)?, "42");
        assert_eq!(sk.decrypt(&ct)?.render(OutputKind::Number)?, "[52,50]");
        Ok(())
    }

    #[test]
    fn node_rows_hide_the_text() -> Result<(), Box<dyn StdError>> {
        let sk = SecretKey::generate(&Cluster::new(2)?, Operations::only(Mode::Store), None)?;
        let ct = sk.encrypt(Mode::Store, &Plaintext::from("aaaa"), &mut thread_rng())?;
        let row = ct.node_shares(0).unwrap_or_default();
        assert!(row.iter().all(|share| share != &BigUint::from(97u8)));
        Ok(())
    }

    #[test]
    fn codes_must_fit_the_bound() -> Result<(), Box<dyn StdError>> {
        let par = ParametersBuilder::new()
            .set_modulus(BigUint::from(1009u32))
            .build_arc()?;
        let sk = SecretKey::generate_with_parameters(
            &par,
            &Cluster::new(2)?,
            Operations::only(Mode::Store),
            None,
        )?;
        let ct = sk.encrypt(Mode::Store, &Plaintext::from("ok"), &mut thread_rng())?;
        assert_eq!(sk.decrypt(&ct)?.to_text()?, "ok");
        assert!(matches!(
            sk.encrypt(Mode::Store, &Plaintext::from("€"), &mut thread_rng()),
            Err(Error::OutOfRange { .. })
        ));
        Ok(())
    }
}
