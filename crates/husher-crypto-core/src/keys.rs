//! NIST P-384 key pairs for both the encryption and the signing role.
//!
//! This module provides:
//! - [`PublicKey`]: affine point, exchanged as base64 of raw `x || y` (96 bytes)
//! - [`SecretKey`]: non-zero scalar, stored as 48 big-endian bytes
//! - [`KeyPair`]: both halves, generated by [`KeyPair::generate`]
//!
//! The same curve and key type serve confidentiality (KEM) and authenticity
//! (ECDSA); the role is decided by the caller.

use crate::b64;
use crate::error::CryptoError;
use crate::memory::SecretBytes;
use p384::elliptic_curve::sec1::ToEncodedPoint;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use zeroize::Zeroize;

/// Raw public key length: `x || y`, 48 bytes each.
pub const PUBLIC_KEY_LEN: usize = 96;

/// Secret scalar length in bytes.
pub const SECRET_KEY_LEN: usize = 48;

/// SEC1 tag byte for an uncompressed point.
const SEC1_UNCOMPRESSED: u8 = 0x04;

/// Scalars drawn before key generation gives up. A single draw is out of
/// range with probability below 2^-190.
const MAX_GENERATION_ATTEMPTS: usize = 4;

// ---------------------------------------------------------------------------
// PublicKey
// ---------------------------------------------------------------------------

/// P-384 public key. Always a valid, non-identity curve point.
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKey {
    inner: p384::PublicKey,
}

impl PublicKey {
    /// Parse raw `x || y` coordinates.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidKeyMaterial` if the input is not 96 bytes
    /// or the point is not on the curve.
    pub fn from_bytes(raw: &[u8]) -> Result<Self, CryptoError> {
        if raw.len() != PUBLIC_KEY_LEN {
            return Err(CryptoError::InvalidKeyMaterial(format!(
                "invalid public key length: {} bytes (expected {PUBLIC_KEY_LEN})",
                raw.len()
            )));
        }
        let mut sec1 = Vec::with_capacity(PUBLIC_KEY_LEN.saturating_add(1));
        sec1.push(SEC1_UNCOMPRESSED);
        sec1.extend_from_slice(raw);
        let inner = p384::PublicKey::from_sec1_bytes(&sec1)
            .map_err(|_| CryptoError::InvalidKeyMaterial("point is not on P-384".into()))?;
        Ok(Self { inner })
    }

    /// Raw `x || y` coordinates.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_LEN] {
        point_to_raw(&self.inner.to_encoded_point(false))
    }

    /// # Errors
    ///
    /// Returns `CryptoError::MalformedEnvelope` for bad base64 and
    /// `CryptoError::InvalidKeyMaterial` for a bad point.
    pub fn from_base64(text: &str) -> Result<Self, CryptoError> {
        Self::from_bytes(&b64::decode("pub", text)?)
    }

    #[must_use]
    pub fn to_base64(&self) -> String {
        b64::encode(&self.to_bytes())
    }

    pub(crate) const fn from_inner(inner: p384::PublicKey) -> Self {
        Self { inner }
    }

    pub(crate) const fn as_inner(&self) -> &p384::PublicKey {
        &self.inner
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_base64())
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base64())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::from_base64(&text).map_err(de::Error::custom)
    }
}

/// Strip the SEC1 tag from an uncompressed encoding.
pub(crate) fn point_to_raw(point: &p384::EncodedPoint) -> [u8; PUBLIC_KEY_LEN] {
    let mut raw = [0u8; PUBLIC_KEY_LEN];
    if let Some(xy) = point.as_bytes().get(1..) {
        if xy.len() == PUBLIC_KEY_LEN {
            raw.copy_from_slice(xy);
        }
    }
    raw
}

// ---------------------------------------------------------------------------
// SecretKey
// ---------------------------------------------------------------------------

/// P-384 secret scalar in `[1, n)`.
///
/// Intentionally does NOT implement `Serialize`; the only way out of the
/// process is wrapped inside an identity document.
#[derive(Clone)]
pub struct SecretKey {
    inner: p384::SecretKey,
}

impl SecretKey {
    /// Parse a 48-byte big-endian scalar.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidKeyMaterial` for a wrong length, a zero
    /// scalar or a scalar not below the group order.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != SECRET_KEY_LEN {
            return Err(CryptoError::InvalidKeyMaterial(format!(
                "invalid secret key length: {} bytes (expected {SECRET_KEY_LEN})",
                bytes.len()
            )));
        }
        let inner = p384::SecretKey::from_slice(bytes)
            .map_err(|_| CryptoError::InvalidKeyMaterial("scalar out of range".into()))?;
        Ok(Self { inner })
    }

    /// The scalar as 48 big-endian bytes.
    #[must_use]
    pub fn to_bytes(&self) -> SecretBytes<SECRET_KEY_LEN> {
        let mut field = self.inner.to_bytes();
        let mut out = [0u8; SECRET_KEY_LEN];
        out.copy_from_slice(field.as_slice());
        field.as_mut_slice().zeroize();
        SecretBytes::new(out)
    }

    #[must_use]
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_inner(self.inner.public_key())
    }

    pub(crate) const fn as_inner(&self) -> &p384::SecretKey {
        &self.inner
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(***)")
    }
}

// ---------------------------------------------------------------------------
// KeyPair
// ---------------------------------------------------------------------------

/// A public key together with its secret scalar.
#[derive(Clone)]
pub struct KeyPair {
    public: PublicKey,
    secret: SecretKey,
}

impl KeyPair {
    /// Generate a fresh key pair from the OS CSPRNG.
    ///
    /// Candidate scalars are drawn as 48 random bytes and rejected if zero
    /// or not below the group order. Generation stops after a fixed number
    /// of attempts instead of looping forever.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::KeyGeneration` if the CSPRNG fails or no valid
    /// scalar was produced.
    pub fn generate() -> Result<Self, CryptoError> {
        let mut candidate = [0u8; SECRET_KEY_LEN];
        for _ in 0..MAX_GENERATION_ATTEMPTS {
            OsRng
                .try_fill_bytes(&mut candidate)
                .map_err(|e| CryptoError::KeyGeneration(format!("CSPRNG fill failed: {e}")))?;
            let parsed = SecretKey::from_bytes(&candidate);
            candidate.zeroize();
            if let Ok(secret) = parsed {
                return Ok(Self::from_secret(secret));
            }
        }
        Err(CryptoError::KeyGeneration(format!(
            "no valid P-384 scalar after {MAX_GENERATION_ATTEMPTS} attempts"
        )))
    }

    /// Rebuild a pair from its secret half.
    #[must_use]
    pub fn from_secret(secret: SecretKey) -> Self {
        Self {
            public: secret.public_key(),
            secret,
        }
    }

    /// Rebuild a pair from a stored public key and an unwrapped secret,
    /// checking that they belong together.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidKeyMaterial` if `secret` does not
    /// produce `public`.
    pub fn from_parts(public: PublicKey, secret: SecretKey) -> Result<Self, CryptoError> {
        if secret.public_key() != public {
            return Err(CryptoError::InvalidKeyMaterial(
                "secret key does not match public key".into(),
            ));
        }
        Ok(Self { public, secret })
    }

    #[must_use]
    pub const fn public(&self) -> &PublicKey {
        &self.public
    }

    #[must_use]
    pub const fn secret(&self) -> &SecretKey {
        &self.secret
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &self.public)
            .field("secret", &self.secret)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
