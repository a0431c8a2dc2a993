//! Ring of integers modulo p.

use crate::{Error, Result};
use num_bigint::{BigInt, BigUint, RandBigInt, Sign};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};
use std::fmt::Debug;

/// Structure encapsulating an integer modulus of arbitrary size.
///
/// The modulus is not required to be prime; elements that are not units simply
/// have no inverse.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Modulus {
    p: BigUint,
    half: BigUint,
}

impl Debug for Modulus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Modulus")
            .field("p", &self.p.to_string())
            .finish()
    }
}

impl Modulus {
    /// Create a modulus from an integer of at least 3.
    pub fn new(p: BigUint) -> Result<Self> {
        if p < BigUint::from(3u8) {
            Err(Error::InvalidModulus(format!(
                "{p} is smaller than the minimum modulus 3"
            )))
        } else {
            let half = &p >> 1u32;
            Ok(Self { p, half })
        }
    }

    /// Returns the value of the modulus.
    pub const fn modulus(&self) -> &BigUint {
        &self.p
    }

    /// Returns the number of bits of the modulus.
    pub fn bits(&self) -> u64 {
        self.p.bits()
    }

    /// Reduce a signed integer into `[0, p)`.
    pub fn reduce(&self, a: &BigInt) -> BigUint {
        let p = BigInt::from_biguint(Sign::Plus, self.p.clone());
        // mod_floor keeps the result non-negative for a positive modulus.
        a.mod_floor(&p)
            .to_biguint()
            .unwrap_or_else(BigUint::zero)
    }

    /// Reduce an unsigned integer into `[0, p)`.
    pub fn reduce_biguint(&self, a: &BigUint) -> BigUint {
        a % &self.p
    }

    /// Modular addition of two residues.
    pub fn add(&self, a: &BigUint, b: &BigUint) -> BigUint {
        crate::mod_add(a, b, &self.p)
    }

    /// Modular subtraction of two residues.
    pub fn sub(&self, a: &BigUint, b: &BigUint) -> BigUint {
        let a = self.reduce_biguint(a);
        let b = self.reduce_biguint(b);
        if a >= b {
            a - b
        } else {
            &self.p - b + a
        }
    }

    /// Modular multiplication of two residues.
    pub fn mul(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a * b) % &self.p
    }

    /// Modular negation.
    pub fn neg(&self, a: &BigUint) -> BigUint {
        self.sub(&BigUint::zero(), a)
    }

    /// Modular inverse, or `None` when `a` is not a unit.
    pub fn inv(&self, a: &BigUint) -> Option<BigUint> {
        let p = BigInt::from_biguint(Sign::Plus, self.p.clone());
        let a = BigInt::from_biguint(Sign::Plus, self.reduce_biguint(a));
        let egcd = a.extended_gcd(&p);
        if !egcd.gcd.is_one() {
            return None;
        }
        egcd.x.mod_floor(&p).to_biguint()
    }

    /// Returns whether `a` is invertible modulo p.
    pub fn is_unit(&self, a: &BigUint) -> bool {
        !a.is_zero() && self.reduce_biguint(a).gcd(&self.p).is_one()
    }

    /// Sample a residue uniformly in `[0, p)`.
    pub fn random<R: RngCore + CryptoRng>(&self, rng: &mut R) -> BigUint {
        rng.gen_biguint_below(&self.p)
    }

    /// Sample a unit uniformly among the invertible residues.
    pub fn random_unit<R: RngCore + CryptoRng>(&self, rng: &mut R) -> BigUint {
        loop {
            let candidate = self.random(rng);
            if self.is_unit(&candidate) {
                return candidate;
            }
        }
    }

    /// Map a residue to its centered representative in `(-p/2, p/2]`.
    pub fn lift_centered(&self, a: &BigUint) -> BigInt {
        let a = self.reduce_biguint(a);
        if a > self.half {
            BigInt::from_biguint(Sign::Plus, a) - BigInt::from_biguint(Sign::Plus, self.p.clone())
        } else {
            BigInt::from_biguint(Sign::Plus, a)
        }
    }

    /// Reduce a signed value whose magnitude must not exceed `bound`.
    ///
    /// Returns an error instead of silently wrapping values outside the bound.
    pub fn reduce_bounded(&self, a: &BigInt, bound: &BigUint) -> Result<BigUint> {
        if a.magnitude() > bound {
            return Err(Error::OutOfRange(a.to_string()));
        }
        Ok(self.reduce(a))
    }
}

#[cfg(test)]
mod tests {
    use super::Modulus;
    use crate::Error;
    use num_bigint::{BigInt, BigUint};
    use num_traits::Zero;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn mersenne_127() -> Modulus {
        Modulus::new((BigUint::from(1u8) << 127u32) - 1u8).unwrap()
    }

    #[test]
    fn constructor() {
        assert!(Modulus::new(BigUint::from(3u8)).is_ok());
        assert!(Modulus::new(BigUint::from(1u64 << 40)).is_ok());
        assert!(matches!(
            Modulus::new(BigUint::from(2u8)),
            Err(Error::InvalidModulus(_))
        ));
        assert!(Modulus::new(BigUint::zero()).is_err());
    }

    #[test]
    fn reduce_negative() {
        let q = Modulus::new(BigUint::from(11u8)).unwrap();
        assert_eq!(q.reduce(&BigInt::from(-1)), BigUint::from(10u8));
        assert_eq!(q.reduce(&BigInt::from(-23)), BigUint::from(10u8));
        assert_eq!(q.reduce(&BigInt::from(23)), BigUint::from(1u8));
    }

    #[test]
    fn lift_centered() {
        let q = Modulus::new(BigUint::from(11u8)).unwrap();
        assert_eq!(q.lift_centered(&BigUint::from(5u8)), BigInt::from(5));
        assert_eq!(q.lift_centered(&BigUint::from(6u8)), BigInt::from(-5));
        assert_eq!(q.lift_centered(&BigUint::from(10u8)), BigInt::from(-1));
    }

    #[test]
    fn inverse_of_non_unit() {
        let q = Modulus::new(BigUint::from(12u8)).unwrap();
        assert_eq!(q.inv(&BigUint::from(5u8)), Some(BigUint::from(5u8)));
        assert_eq!(q.inv(&BigUint::from(4u8)), None);
        assert_eq!(q.inv(&BigUint::zero()), None);
        assert!(!q.is_unit(&BigUint::from(6u8)));
    }

    #[test]
    fn random_unit_is_invertible() {
        let q = Modulus::new(BigUint::from(30u8)).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        for _ in 0..100 {
            let u = q.random_unit(&mut rng);
            let inv = q.inv(&u).unwrap();
            assert_eq!(q.mul(&u, &inv), BigUint::from(1u8));
        }
    }

    #[test]
    fn reduce_bounded() {
        let q = Modulus::new(BigUint::from(101u8)).unwrap();
        let bound = BigUint::from(50u8);
        assert_eq!(
            q.reduce_bounded(&BigInt::from(-50), &bound).unwrap(),
            BigUint::from(51u8)
        );
        assert_eq!(
            q.reduce_bounded(&BigInt::from(51), &bound),
            Err(Error::OutOfRange("51".to_string()))
        );
    }

    proptest! {
        #[test]
        fn add_sub_neg(a in any::<u128>(), b in any::<u128>()) {
            let q = mersenne_127();
            let a = q.reduce_biguint(&BigUint::from(a));
            let b = q.reduce_biguint(&BigUint::from(b));
            let sum = q.add(&a, &b);
            prop_assert_eq!(q.sub(&sum, &b), a.clone());
            prop_assert_eq!(q.add(&a, &q.neg(&a)), BigUint::zero());
        }

        #[test]
        fn lift_inverts_reduce(x in any::<i64>()) {
            let q = mersenne_127();
            let x = BigInt::from(x);
            prop_assert_eq!(q.lift_centered(&q.reduce(&x)), x);
        }
    }
}
