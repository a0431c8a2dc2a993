//! Algorithm table of the operating modes.

mod matching;
mod store;
mod sum;

pub(crate) use matching::match_tag;

use crate::keys::KeyCore;
use crate::{CiphertextBody, Decrypted, Mode, Parameters, Plaintext, Result};
use rand_chacha::ChaCha20Rng;

/// Check a plaintext before any randomness is drawn.
pub(crate) type ValidateFn = fn(&Parameters, &Plaintext) -> Result<()>;
/// Split a validated plaintext into node shares.
pub(crate) type EncryptFn = fn(&KeyCore, &Plaintext, &mut ChaCha20Rng) -> Result<CiphertextBody>;
/// Encrypt a validated plaintext without drawing randomness.
pub(crate) type DeterministicEncryptFn = fn(&KeyCore, &Plaintext) -> Result<CiphertextBody>;
/// Recover a value from node shares of the expected mode and node count.
pub(crate) type DecryptFn = fn(&KeyCore, &CiphertextBody) -> Result<Decrypted>;

/// How a mode encrypts.
pub(crate) enum Encrypt {
    /// Draws from a stream seeded by the caller's generator.
    Randomized(EncryptFn),
    /// Consumes no randomness.
    Deterministic(DeterministicEncryptFn),
}

/// The algorithms of one mode.
pub(crate) struct Scheme {
    pub(crate) mode: Mode,
    pub(crate) validate: ValidateFn,
    pub(crate) encrypt: Encrypt,
    pub(crate) decrypt: DecryptFn,
}

static SCHEMES: [Scheme; 3] = [
    Scheme {
        mode: Mode::Sum,
        validate: sum::validate,
        encrypt: Encrypt::Randomized(sum::encrypt),
        decrypt: sum::decrypt,
    },
    Scheme {
        mode: Mode::Store,
        validate: store::validate,
        encrypt: Encrypt::Randomized(store::encrypt),
        decrypt: store::decrypt,
    },
    Scheme {
        mode: Mode::Match,
        validate: matching::validate,
        encrypt: Encrypt::Deterministic(matching::encrypt),
        decrypt: matching::decrypt,
    },
];

/// The algorithms of `mode`.
pub(crate) fn scheme(mode: Mode) -> &'static Scheme {
    let scheme = &SCHEMES[mode.index()];
    debug_assert_eq!(scheme.mode, mode);
    scheme
}

#[cfg(test)]
mod tests {
    use super::{scheme, Encrypt};
    use crate::Mode;

    #[test]
    fn table_is_indexed_by_mode() {
        for mode in Mode::ALL {
            assert_eq!(scheme(mode).mode, mode);
        }
        assert!(matches!(scheme(Mode::Match).encrypt, Encrypt::Deterministic(_)));
        assert!(matches!(scheme(Mode::Sum).encrypt, Encrypt::Randomized(_)));
        assert!(matches!(scheme(Mode::Store).encrypt, Encrypt::Randomized(_)));
    }
}
