//! Envelope encryption dispatched on the shape of the key argument.
//!
//! This module provides:
//! - [`encrypt`] / [`decrypt`]: one entry point for all three key modes
//! - [`EncryptionKey`] / [`DecryptionKey`]: the key shapes
//! - [`Envelope`]: `{iv, ct, adata}` plus the mode-specific fields
//! - [`kem`] / [`unkem`]: one-time key agreement against a P-384 public key
//!
//! # Modes
//!
//! | Key shape | Envelope extras | Content key |
//! |---|---|---|
//! | `Public` / `Secret` | `kemtag` | SHA-256 of the shared point |
//! | `Symmetric` | none | the 256-bit key as given |
//! | `Passphrase` | `salt`, `iter` | PBKDF2-HMAC-SHA256 of the passphrase |
//!
//! In every mode the payload is sealed by [`crate::symmetric`] with the
//! caller's `adata`, so the associated-data policy is the same everywhere.
//!
//! # KEM
//!
//! The sender draws an ephemeral scalar `t` and publishes `T = t·G` as the
//! `kemtag` (raw `x || y`). Both sides compute the point `t·P = s·T` and hash
//! its raw `x || y` coordinates with SHA-256 to get the AES key.

use crate::error::CryptoError;
use crate::hash::sha256;
use crate::kdf::{pbkdf2_sha256, DERIVED_KEY_LEN};
use crate::keys::{point_to_raw, KeyPair, PublicKey, SecretKey, PUBLIC_KEY_LEN};
use crate::memory::{SecretBuffer, SecretBytes};
use crate::symmetric::{self, SymmetricEnvelope};
use p384::elliptic_curve::sec1::ToEncodedPoint;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// PBKDF2 iterations for new passphrase envelopes.
pub const PASSPHRASE_ITERATIONS: u32 = 1000;

/// Salt length for passphrase envelopes.
pub const PASSPHRASE_SALT_LEN: usize = 8;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Key argument for [`encrypt`].
#[derive(Clone, Copy, Debug)]
pub enum EncryptionKey<'a> {
    /// Recipient's P-384 public key; runs the KEM.
    Public(&'a PublicKey),
    /// Raw 256-bit AES key.
    Symmetric(&'a SecretBytes<DERIVED_KEY_LEN>),
    /// Text passphrase, stretched with PBKDF2.
    Passphrase(&'a str),
}

/// Key argument for [`decrypt`].
#[derive(Clone, Copy, Debug)]
pub enum DecryptionKey<'a> {
    /// Own P-384 secret key; reverses the KEM.
    Secret(&'a SecretKey),
    /// Raw 256-bit AES key.
    Symmetric(&'a SecretBytes<DERIVED_KEY_LEN>),
    /// Text passphrase, stretched with PBKDF2.
    Passphrase(&'a str),
}

/// Self-describing ciphertext for every key mode.
///
/// Serialized flat: `{iv, ct, adata}` plus `kemtag` (public-key mode) or
/// `salt`/`iter` (passphrase mode). Absent extras are omitted.
#[must_use = "encrypted data must be stored or transmitted"]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(flatten)]
    pub sealed: SymmetricEnvelope,
    /// Ephemeral public point `t·G`, raw `x || y`.
    #[serde(
        default,
        with = "crate::b64::serde_opt_bytes",
        skip_serializing_if = "Option::is_none"
    )]
    pub kemtag: Option<Vec<u8>>,
    /// PBKDF2 salt.
    #[serde(
        default,
        with = "crate::b64::serde_opt_bytes",
        skip_serializing_if = "Option::is_none"
    )]
    pub salt: Option<Vec<u8>>,
    /// PBKDF2 iteration count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iter: Option<u32>,
}

impl Envelope {
    const fn plain(sealed: SymmetricEnvelope) -> Self {
        Self {
            sealed,
            kemtag: None,
            salt: None,
            iter: None,
        }
    }
}

// ---------------------------------------------------------------------------
// KEM
// ---------------------------------------------------------------------------

/// Derive a one-time AES key for `recipient`.
///
/// Returns the `kemtag` to publish and the key.
///
/// # Errors
///
/// Returns `CryptoError::KeyGeneration` if no ephemeral key can be drawn.
pub fn kem(
    recipient: &PublicKey,
) -> Result<([u8; PUBLIC_KEY_LEN], SecretBytes<DERIVED_KEY_LEN>), CryptoError> {
    let ephemeral = KeyPair::generate()?;
    let tag = ephemeral.public().to_bytes();
    let key = shared_key(ephemeral.secret(), recipient);
    Ok((tag, key))
}

/// Recover the AES key from a `kemtag` with the recipient's secret key.
///
/// # Errors
///
/// Returns `CryptoError::MalformedEnvelope` if the tag is not a valid point.
pub fn unkem(
    secret: &SecretKey,
    kemtag: &[u8],
) -> Result<SecretBytes<DERIVED_KEY_LEN>, CryptoError> {
    let tag = PublicKey::from_bytes(kemtag)
        .map_err(|e| CryptoError::MalformedEnvelope(format!("invalid kemtag: {e}")))?;
    Ok(shared_key(secret, &tag))
}

/// `SHA-256(x || y)` of `secret · point`.
fn shared_key(secret: &SecretKey, point: &PublicKey) -> SecretBytes<DERIVED_KEY_LEN> {
    let scalar = secret.as_inner().to_nonzero_scalar();
    let shared = p384::AffinePoint::from(point.as_inner().to_projective() * *scalar);
    let mut raw = point_to_raw(&shared.to_encoded_point(false));
    let key = sha256(&raw);
    raw.zeroize();
    SecretBytes::new(key)
}

// ---------------------------------------------------------------------------
// Encrypt / decrypt
// ---------------------------------------------------------------------------

/// Encrypt `plaintext` under `key`, binding `adata`.
///
/// # Errors
///
/// Returns `CryptoError::MissingAssociatedData` if `adata` is empty, before
/// any key agreement or derivation runs. Other errors come from the KEM,
/// PBKDF2 or [`symmetric::encrypt`].
pub fn encrypt(
    plaintext: &[u8],
    key: EncryptionKey<'_>,
    adata: &str,
) -> Result<Envelope, CryptoError> {
    if adata.is_empty() {
        return Err(CryptoError::MissingAssociatedData);
    }
    match key {
        EncryptionKey::Public(recipient) => {
            let (tag, content_key) = kem(recipient)?;
            let sealed = symmetric::encrypt(plaintext, content_key.expose(), adata)?;
            Ok(Envelope {
                kemtag: Some(tag.to_vec()),
                ..Envelope::plain(sealed)
            })
        }
        EncryptionKey::Symmetric(k) => {
            symmetric::encrypt(plaintext, k.expose(), adata).map(Envelope::plain)
        }
        EncryptionKey::Passphrase(passphrase) => {
            let mut salt = vec![0u8; PASSPHRASE_SALT_LEN];
            OsRng
                .try_fill_bytes(&mut salt)
                .map_err(|e| CryptoError::SecureMemory(format!("CSPRNG fill failed: {e}")))?;
            let content_key = pbkdf2_sha256(passphrase.as_bytes(), &salt, PASSPHRASE_ITERATIONS)?;
            let sealed = symmetric::encrypt(plaintext, content_key.expose(), adata)?;
            Ok(Envelope {
                salt: Some(salt),
                iter: Some(PASSPHRASE_ITERATIONS),
                ..Envelope::plain(sealed)
            })
        }
    }
}

/// Decrypt an [`Envelope`] with the key matching its mode.
///
/// # Errors
///
/// Returns `CryptoError::MalformedEnvelope` if the envelope's extras do not
/// match the key shape (for example a secret key against an envelope with
/// no `kemtag`). Returns `CryptoError::Decryption` on authentication failure.
pub fn decrypt(envelope: &Envelope, key: DecryptionKey<'_>) -> Result<SecretBuffer, CryptoError> {
    let content_key = match key {
        DecryptionKey::Secret(secret) => {
            let tag = envelope.kemtag.as_deref().ok_or_else(|| {
                CryptoError::MalformedEnvelope("secret key given but envelope has no kemtag".into())
            })?;
            unkem(secret, tag)?
        }
        DecryptionKey::Symmetric(k) => {
            if envelope.kemtag.is_some() || envelope.salt.is_some() {
                return Err(CryptoError::MalformedEnvelope(
                    "symmetric key given but envelope is not in symmetric mode".into(),
                ));
            }
            k.clone()
        }
        DecryptionKey::Passphrase(passphrase) => {
            let (Some(salt), Some(iter)) = (envelope.salt.as_deref(), envelope.iter) else {
                return Err(CryptoError::MalformedEnvelope(
                    "passphrase given but envelope has no salt/iter".into(),
                ));
            };
            pbkdf2_sha256(passphrase.as_bytes(), salt, iter)?
        }
    };
    symmetric::decrypt(&envelope.sealed, content_key.expose())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
