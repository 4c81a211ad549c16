//! Short, comparable identity fingerprint.

use husher_crypto_core::keys::PUBLIC_KEY_LEN;
use husher_crypto_core::{sha256, KeyPair, PublicKey};

use crate::identity::Identity;

/// Number of 32-bit words in a fingerprint.
pub const FINGERPRINT_WORDS: usize = 8;

/// `SHA-256(encPub || signPub)` over the raw `x || y` keys, read as eight
/// big-endian signed 32-bit words. Without a signing key only the
/// encryption key is hashed.
#[must_use]
pub fn fingerprint_of(encryption: &PublicKey, signing: Option<&PublicKey>) -> [i32; FINGERPRINT_WORDS] {
    let mut material = Vec::with_capacity(PUBLIC_KEY_LEN.saturating_mul(2));
    material.extend_from_slice(&encryption.to_bytes());
    if let Some(signing) = signing {
        material.extend_from_slice(&signing.to_bytes());
    }
    let digest = sha256(&material);

    let mut words = [0i32; FINGERPRINT_WORDS];
    for (word, chunk) in words.iter_mut().zip(digest.chunks_exact(4)) {
        *word = i32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    words
}

impl Identity {
    #[must_use]
    pub fn fingerprint(&self) -> [i32; FINGERPRINT_WORDS] {
        fingerprint_of(
            self.encryption_key.public(),
            self.signing_key.as_ref().map(KeyPair::public),
        )
    }
}
