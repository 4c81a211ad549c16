//! ECDSA over P-384.
//!
//! Signatures use SHA-384 as the message digest and RFC 6979 deterministic
//! nonces, and travel as base64 of the fixed-width `r || s` encoding.

use crate::b64;
use crate::error::CryptoError;
use crate::keys::{PublicKey, SecretKey};
use p384::ecdsa::signature::{Signer, Verifier};
use p384::ecdsa::{Signature as EcdsaSignature, SigningKey, VerifyingKey};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Fixed-width signature length: `r || s`, 48 bytes each.
pub const SIGNATURE_LEN: usize = 96;

/// A detached signature.
///
/// Holds whatever bytes were received; a value of the wrong length or with
/// out-of-range components simply fails [`verify`].
#[derive(Clone, PartialEq, Eq)]
pub struct Signature(Vec<u8>);

impl Signature {
    #[must_use]
    pub const fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// # Errors
    ///
    /// Returns `CryptoError::MalformedEnvelope` for invalid base64.
    pub fn from_base64(text: &str) -> Result<Self, CryptoError> {
        b64::decode("signature", text).map(Self)
    }

    #[must_use]
    pub fn to_base64(&self) -> String {
        b64::encode(&self.0)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self.to_base64())
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base64())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::from_base64(&text).map_err(de::Error::custom)
    }
}

/// Sign `message` with a P-384 secret key.
///
/// # Errors
///
/// Returns `CryptoError::Signature` if the signer fails.
pub fn sign(message: &[u8], key: &SecretKey) -> Result<Signature, CryptoError> {
    let signing_key = SigningKey::from(key.as_inner());
    let signature: EcdsaSignature = signing_key
        .try_sign(message)
        .map_err(|e| CryptoError::Signature(format!("ECDSA signing failed: {e}")))?;
    Ok(Signature(signature.to_bytes().to_vec()))
}

/// Check a signature. Never errors: any malformed or invalid signature is `false`.
#[must_use]
pub fn verify(message: &[u8], signature: &Signature, key: &PublicKey) -> bool {
    if signature.0.len() != SIGNATURE_LEN {
        return false;
    }
    let Ok(parsed) = EcdsaSignature::from_slice(&signature.0) else {
        return false;
    };
    VerifyingKey::from(key.as_inner())
        .verify(message, &parsed)
        .is_ok()
}
