//! Node-side combination of share vectors.

use crate::serde_decimal::{bigint_from_value, number};
use crate::{Error, Result};
use itertools::Itertools;
use num_bigint::{BigInt, BigUint};
use secshare_math::zq::Modulus;
use secshare_math::mod_add;
use serde_json::Value;

/// Add two share vectors element-wise modulo the working modulus.
///
/// Adding the shares of two SUM ciphertexts produced under the same key yields
/// shares of the sum of their plaintexts. No key material is involved.
pub fn combine_shares(a: &[BigInt], b: &[BigInt], modulus: &Modulus) -> Result<Vec<BigUint>> {
    if a.len() != b.len() {
        return Err(Error::unequal_lengths(a.len(), b.len()));
    }
    Ok(a.iter()
        .zip(b)
        .map(|(x, y)| mod_add(&modulus.reduce(x), &modulus.reduce(y), modulus.modulus()))
        .collect())
}

/// Parse the host form `"[1,2,3]; [4,5,6]"` into two share vectors.
pub fn parse_share_pair(input: &str) -> Result<(Vec<BigInt>, Vec<BigInt>)> {
    let Some((left, right)) = input.split(';').collect_tuple() else {
        return Err(Error::expected_two_arrays());
    };
    Ok((parse_share_array(left)?, parse_share_array(right)?))
}

fn parse_share_array(text: &str) -> Result<Vec<BigInt>> {
    let value: Value =
        serde_json::from_str(text.trim()).map_err(|e| Error::Parse(e.to_string()))?;
    let Value::Array(items) = value else {
        return Err(Error::expected_two_arrays());
    };
    items.iter().map(bigint_from_value).collect()
}

/// Render shares as a JSON array of decimal literals, e.g. `[5,7,9]`.
pub fn format_shares(shares: &[BigUint]) -> String {
    Value::Array(shares.iter().map(number).collect()).to_string()
}

#[cfg(test)]
mod tests {
    use super::{combine_shares, format_shares, parse_share_pair};
    use crate::{Error, Parameters};
    use num_bigint::{BigInt, BigUint};
    use num_traits::One;
    use proptest::prelude::*;
    use secshare_math::zq::Modulus;
    use std::error::Error as StdError;

    fn ints(values: &[i64]) -> Vec<BigInt> {
        values.iter().map(|v| BigInt::from(*v)).collect()
    }

    #[test]
    fn combine_small_vectors() -> Result<(), Box<dyn StdError>> {
        let par = Parameters::default_arc();
        let (a, b) = parse_share_pair("[1,2,3];[4,5,6]")?;
        let sum = combine_shares(&a, &b, par.modulus())?;
        assert_eq!(format_shares(&sum), "[5,7,9]");
        Ok(())
    }

    #[test]
    fn combine_wraps_around_the_modulus() -> Result<(), Box<dyn StdError>> {
        let par = Parameters::default_arc();
        let p = par.modulus().modulus().clone();
        let big = BigInt::from(p.clone() - 1u8);
        let sum = combine_shares(&[big.clone()], &[big], par.modulus())?;
        assert_eq!(sum, vec![p - 2u8]);

        let q = Modulus::new(BigUint::from(7u8))?;
        assert_eq!(
            combine_shares(&ints(&[-1]), &ints(&[3]), &q)?,
            vec![BigUint::from(2u8)]
        );
        Ok(())
    }

    #[test]
    fn large_literals_keep_their_precision() -> Result<(), Box<dyn StdError>> {
        let par = Parameters::default_arc();
        let big = "123456789012345678901234567890";
        let (a, b) = parse_share_pair(&format!("[{big}]; [\"1\"]"))?;
        let sum = combine_shares(&a, &b, par.modulus())?;
        assert_eq!(format_shares(&sum), "[123456789012345678901234567891]");
        assert!(BigInt::from(par.modulus().modulus().clone()) > a[0].clone() + BigInt::one());
        Ok(())
    }

    #[test]
    fn malformed_inputs() {
        assert_eq!(
            parse_share_pair("[1,2]").unwrap_err().to_string(),
            "Both inputs must be arrays separated by ';'. E.g., [1,2]; [3,4]"
        );
        assert!(matches!(
            parse_share_pair("[1];[2];[3]"),
            Err(Error::TypeMismatch(_))
        ));
        assert!(matches!(
            parse_share_pair("5;[2]"),
            Err(Error::TypeMismatch(_))
        ));
        assert!(matches!(parse_share_pair("[1,x];[2,3]"), Err(Error::Parse(_))));
        assert!(matches!(parse_share_pair("[1.5];[2]"), Err(Error::Parse(_))));

        let par = Parameters::default_arc();
        let err = combine_shares(&ints(&[1, 2]), &ints(&[1, 2, 3]), par.modulus()).unwrap_err();
        assert!(err
            .to_string()
            .starts_with("Both arrays must have the same length"));
    }

    proptest! {
        #[test]
        fn differing_lengths_are_rejected(a in prop::collection::vec(any::<i64>(), 0..8), b in prop::collection::vec(any::<i64>(), 0..8)) {
            prop_assume!(a.len() != b.len());
            let par = Parameters::default_arc();
            let result = combine_shares(&ints(&a), &ints(&b), par.modulus());
            prop_assert!(matches!(result, Err(Error::ShapeMismatch(_))));
        }
    }
}
