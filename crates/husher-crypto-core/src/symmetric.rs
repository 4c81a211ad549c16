//! AES-256-CCM authenticated encryption for short values and wrapped keys.
//!
//! This module provides:
//! - [`encrypt`]: seal plaintext under a 256-bit key, bound to non-empty `adata`
//! - [`decrypt`]: authenticate and open a [`SymmetricEnvelope`]
//! - [`random_key`]: fresh 256-bit key as base64 text
//!
//! # Nonce sizing
//!
//! CCM trades nonce length against the maximum message length: the length
//! field takes `L` bytes and the nonce `15 - L`. `L` is the smallest value in
//! `2..=4` that can encode the plaintext length, so values under 64 KiB get a
//! 13-byte nonce. New envelopes store exactly the nonce as `iv`. Stored
//! envelopes carrying a 16-byte `iv` are accepted and truncated.

use crate::b64;
use crate::error::CryptoError;
use crate::memory::{SecretBuffer, SecretBytes};
use aes::Aes256;
use ccm::aead::consts::{U11, U12, U13, U16};
use ccm::aead::generic_array::{ArrayLength, GenericArray};
use ccm::aead::{Aead, KeyInit, Payload};
use ccm::{Ccm, NonceSize};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// AES-256 key length in bytes.
pub const KEY_LEN: usize = 32;

/// CCM authentication tag length in bytes (128 bits).
pub const TAG_LEN: usize = 16;

/// `iv` length written by older clients; only a prefix is used as nonce.
pub const LEGACY_IV_LEN: usize = 16;

/// `(exclusive plaintext length limit, nonce length)` for `L` = 2, 3, 4.
const NONCE_SIZES: [(u64, usize); 3] = [(1 << 16, 13), (1 << 24, 12), (1 << 32, 11)];

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Authenticated ciphertext: `{iv, ct, adata}`.
///
/// `iv` and `ct` serialize as base64; `ct` is ciphertext followed by the
/// 16-byte tag. `adata` is authenticated but travels in the clear as text.
#[must_use = "encrypted data must be stored or transmitted"]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymmetricEnvelope {
    #[serde(with = "crate::b64::serde_bytes")]
    pub iv: Vec<u8>,
    #[serde(with = "crate::b64::serde_bytes")]
    pub ct: Vec<u8>,
    pub adata: String,
}

// ---------------------------------------------------------------------------
// Core encryption
// ---------------------------------------------------------------------------

/// Encrypt `plaintext` with AES-256-CCM under `key`, binding `adata`.
///
/// # Errors
///
/// Returns `CryptoError::MissingAssociatedData` if `adata` is empty. This
/// check runs before the key is even looked at.
/// Returns `CryptoError::Encryption` if the key is not 32 bytes or the
/// plaintext is too long for CCM.
pub fn encrypt(plaintext: &[u8], key: &[u8], adata: &str) -> Result<SymmetricEnvelope, CryptoError> {
    if adata.is_empty() {
        return Err(CryptoError::MissingAssociatedData);
    }
    check_key(key)?;

    let nonce_len = nonce_len_for(plaintext.len())
        .ok_or_else(|| CryptoError::Encryption("plaintext too long for CCM".into()))?;
    let mut iv = vec![0u8; nonce_len];
    OsRng
        .try_fill_bytes(&mut iv)
        .map_err(|e| CryptoError::SecureMemory(format!("CSPRNG fill failed: {e}")))?;

    let payload = Payload {
        msg: plaintext,
        aad: adata.as_bytes(),
    };
    let ct = match nonce_len {
        13 => seal::<U13>(key, &iv, payload),
        12 => seal::<U12>(key, &iv, payload),
        11 => seal::<U11>(key, &iv, payload),
        _ => None,
    }
    .ok_or_else(|| CryptoError::Encryption("AES-256-CCM encryption failed".into()))?;

    Ok(SymmetricEnvelope {
        iv,
        ct,
        adata: adata.to_owned(),
    })
}

/// Authenticate and decrypt an envelope.
///
/// Wrong key, altered `ct`, altered `iv` and altered `adata` all produce the
/// same `CryptoError::Decryption`.
///
/// One exception: a 16-byte `iv` (the layout older clients stored) is cut
/// down to the nonce length before use, so the bytes past the nonce are not
/// authenticated and changing them goes unnoticed. Envelopes written by
/// [`encrypt`] never carry those extra bytes.
///
/// # Errors
///
/// Returns `CryptoError::MissingAssociatedData` if the envelope has empty `adata`.
/// Returns `CryptoError::MalformedEnvelope` if `ct` is shorter than a tag or
/// the `iv` length is neither the nonce length nor 16.
/// Returns `CryptoError::Encryption` if the key is not 32 bytes.
/// Returns `CryptoError::Decryption` if authentication fails.
pub fn decrypt(envelope: &SymmetricEnvelope, key: &[u8]) -> Result<SecretBuffer, CryptoError> {
    if envelope.adata.is_empty() {
        return Err(CryptoError::MissingAssociatedData);
    }
    check_key(key)?;

    let pt_len = envelope.ct.len().checked_sub(TAG_LEN).ok_or_else(|| {
        CryptoError::MalformedEnvelope(format!(
            "ciphertext too short: {} bytes (minimum {TAG_LEN})",
            envelope.ct.len()
        ))
    })?;
    let nonce_len = nonce_len_for(pt_len)
        .ok_or_else(|| CryptoError::MalformedEnvelope("ciphertext too long for CCM".into()))?;
    if envelope.iv.len() != nonce_len && envelope.iv.len() != LEGACY_IV_LEN {
        return Err(CryptoError::MalformedEnvelope(format!(
            "invalid iv length: {} bytes (expected {nonce_len} or {LEGACY_IV_LEN})",
            envelope.iv.len()
        )));
    }
    let nonce = &envelope.iv[..nonce_len];

    let payload = Payload {
        msg: &envelope.ct,
        aad: envelope.adata.as_bytes(),
    };
    let plaintext = match nonce_len {
        13 => open::<U13>(key, nonce, payload),
        12 => open::<U12>(key, nonce, payload),
        11 => open::<U11>(key, nonce, payload),
        _ => None,
    }
    .ok_or(CryptoError::Decryption)?;

    Ok(SecretBuffer::from_vec(plaintext))
}

/// A fresh 256-bit key as base64 text.
///
/// # Errors
///
/// Returns `CryptoError::SecureMemory` if the CSPRNG fails.
pub fn random_key() -> Result<String, CryptoError> {
    let key = SecretBytes::<KEY_LEN>::random()?;
    Ok(b64::encode(key.expose()))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn check_key(key: &[u8]) -> Result<(), CryptoError> {
    if key.len() != KEY_LEN {
        return Err(CryptoError::Encryption(format!(
            "invalid key length: {} bytes (expected {KEY_LEN})",
            key.len()
        )));
    }
    Ok(())
}

/// CCM nonce length (`15 - L`) for a message of `len` bytes.
fn nonce_len_for(len: usize) -> Option<usize> {
    let len = u64::try_from(len).ok()?;
    NONCE_SIZES
        .iter()
        .find(|&&(limit, _)| len < limit)
        .map(|&(_, nonce_len)| nonce_len)
}

fn seal<N>(key: &[u8], nonce: &[u8], payload: Payload<'_, '_>) -> Option<Vec<u8>>
where
    N: ArrayLength<u8> + NonceSize,
{
    if nonce.len() != N::USIZE {
        return None;
    }
    let cipher = Ccm::<Aes256, U16, N>::new_from_slice(key).ok()?;
    cipher.encrypt(GenericArray::from_slice(nonce), payload).ok()
}

fn open<N>(key: &[u8], nonce: &[u8], payload: Payload<'_, '_>) -> Option<Vec<u8>>
where
    N: ArrayLength<u8> + NonceSize,
{
    if nonce.len() != N::USIZE {
        return None;
    }
    let cipher = Ccm::<Aes256, U16, N>::new_from_slice(key).ok()?;
    cipher.decrypt(GenericArray::from_slice(nonce), payload).ok()
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
