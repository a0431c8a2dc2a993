//! MATCH: deterministic salted tags.

use crate::keys::{KeyCore, Salt};
use crate::{CiphertextBody, Decrypted, Error, MatchTag, Parameters, Plaintext, Result};
use sha2::{Digest, Sha512};

const KIND_INTEGER: u8 = 0;
const KIND_TEXT: u8 = 1;

pub(super) fn validate(_: &Parameters, _: &Plaintext) -> Result<()> {
    Ok(())
}

/// The tag of `pt` under `salt`.
///
/// Integers are hashed as their decimal text, with a kind byte that keeps them
/// apart from the same text.
pub(crate) fn match_tag(salt: &Salt, pt: &Plaintext) -> MatchTag {
    let mut hasher = Sha512::new();
    hasher.update(salt.as_bytes());
    match pt {
        Plaintext::Integer(value) => {
            hasher.update([KIND_INTEGER]);
            hasher.update(value.to_string().as_bytes());
        }
        Plaintext::Text(text) => {
            hasher.update([KIND_TEXT]);
            hasher.update(text.as_bytes());
        }
    }
    let mut bytes = [0u8; 64];
    bytes.copy_from_slice(&hasher.finalize());
    MatchTag::from_bytes(bytes)
}

pub(super) fn encrypt(key: &KeyCore, pt: &Plaintext) -> Result<CiphertextBody> {
    let tag = match_tag(key.salt()?, pt);
    Ok(CiphertextBody::Match(vec![tag; key.node_count()]))
}

pub(super) fn decrypt(_: &KeyCore, body: &CiphertextBody) -> Result<Decrypted> {
    let CiphertextBody::Match(tags) = body else {
        return Err(Error::malformed_ciphertext("expected MATCH tags"));
    };
    let Some(first) = tags.first() else {
        return Err(Error::malformed_ciphertext("no MATCH tags"));
    };
    if tags.iter().any(|tag| tag != first) {
        return Err(Error::malformed_ciphertext("MATCH tags differ between nodes"));
    }
    Ok(Decrypted::MatchToken(*first))
}
