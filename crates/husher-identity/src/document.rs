//! The persisted identity document.
//!
//! Two JSON shapes exist and both are read:
//!
//! ```text
//! current (version 2)                    legacy (no version, or 1)
//! {                                      {
//!   "scrypt": {scryptSalt, pN, pr, pp},    "scryptSalt", "pN", "pr", "pp",
//!   "encKey": {macSalt, pub, sec},         "pub": "...",
//!   "signingKey": {pub, sec},              "sec": {iv, ct, adata},
//!   "authHash": "...",                     "authHash": "..."
//!   "version": 2                         }
//! }
//! ```
//!
//! In the current shape every `sec` is `{macSalt, iv, ct, adata}`: the
//! secret scalar sealed under `HMAC-SHA256(macKey, macSalt)`. In the legacy
//! shape `sec` is sealed directly under `macKey`. The plaintext is the
//! base64 text of the 48-byte scalar in both cases.
//!
//! Dispatch looks at `version` only. Which fields are present never decides
//! the format.

use husher_crypto_core::hash::SHA256_LEN;
use husher_crypto_core::kdf::SCRYPT_SALT_LEN;
use husher_crypto_core::{PublicKey, ScryptParams, SymmetricEnvelope};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::IdentityError;

/// Format version written for identities with a signing key.
pub const CURRENT_VERSION: u64 = 2;

/// Format version assumed when `version` is absent.
pub const LEGACY_VERSION: u64 = 1;

/// Length of a `macSalt`.
pub const MAC_SALT_LEN: usize = 32;

// ---------------------------------------------------------------------------
// Current format
// ---------------------------------------------------------------------------

/// `scrypt` block: salt plus cost parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScryptSection {
    #[serde(rename = "scryptSalt", with = "husher_crypto_core::b64::serde_array")]
    pub salt: [u8; SCRYPT_SALT_LEN],
    #[serde(flatten)]
    pub params: ScryptParams,
}

/// A secret scalar sealed under a key derived from `macKey` and `macSalt`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrappedSecret {
    #[serde(rename = "macSalt", with = "husher_crypto_core::b64::serde_array")]
    pub mac_salt: [u8; MAC_SALT_LEN],
    #[serde(flatten)]
    pub envelope: SymmetricEnvelope,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptionKeySection {
    /// Mirrors `sec.macSalt`. Readers use the one inside `sec`.
    #[serde(rename = "macSalt", with = "husher_crypto_core::b64::serde_array")]
    pub mac_salt: [u8; MAC_SALT_LEN],
    #[serde(rename = "pub")]
    pub public: PublicKey,
    pub sec: WrappedSecret,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningKeySection {
    #[serde(rename = "pub")]
    pub public: PublicKey,
    pub sec: WrappedSecret,
}

/// Version 2 document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentDocument {
    pub scrypt: ScryptSection,
    #[serde(rename = "encKey")]
    pub enc_key: EncryptionKeySection,
    #[serde(rename = "signingKey")]
    pub signing_key: SigningKeySection,
    #[serde(rename = "authHash", with = "husher_crypto_core::b64::serde_array")]
    pub auth_hash: [u8; SHA256_LEN],
    pub version: u64,
}

// ---------------------------------------------------------------------------
// Legacy format
// ---------------------------------------------------------------------------

/// Pre-signing-key document. Has one key pair and no `version` field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyDocument {
    #[serde(rename = "scryptSalt", with = "husher_crypto_core::b64::serde_array")]
    pub scrypt_salt: [u8; SCRYPT_SALT_LEN],
    #[serde(flatten)]
    pub scrypt_params: ScryptParams,
    #[serde(rename = "pub")]
    pub public: PublicKey,
    pub sec: SymmetricEnvelope,
    #[serde(rename = "authHash", with = "husher_crypto_core::b64::serde_array")]
    pub auth_hash: [u8; SHA256_LEN],
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Either document shape, chosen by the `version` field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IdentityDocument {
    Current(CurrentDocument),
    Legacy(LegacyDocument),
}

impl IdentityDocument {
    /// Parse a JSON value, dispatching on `version`.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::UnsupportedVersion` for any `version` other
    /// than absent, `null`, 1 or 2, and `IdentityError::MalformedDocument`
    /// if the shape for that version does not deserialize.
    pub fn from_value(value: Value) -> Result<Self, IdentityError> {
        match format_version(&value)? {
            LEGACY_VERSION => Ok(Self::Legacy(serde_json::from_value(value)?)),
            CURRENT_VERSION => Ok(Self::Current(serde_json::from_value(value)?)),
            other => Err(IdentityError::UnsupportedVersion(other.to_string())),
        }
    }

    /// Parse JSON text.
    ///
    /// # Errors
    ///
    /// See [`IdentityDocument::from_value`].
    pub fn from_json(text: &str) -> Result<Self, IdentityError> {
        Self::from_value(serde_json::from_str(text)?)
    }

    /// # Errors
    ///
    /// Returns `IdentityError::MalformedDocument` if serialization fails.
    pub fn to_value(&self) -> Result<Value, IdentityError> {
        Ok(match self {
            Self::Current(doc) => serde_json::to_value(doc)?,
            Self::Legacy(doc) => serde_json::to_value(doc)?,
        })
    }

    /// # Errors
    ///
    /// Returns `IdentityError::MalformedDocument` if serialization fails.
    pub fn to_json(&self) -> Result<String, IdentityError> {
        Ok(serde_json::to_string(&self.to_value()?)?)
    }

    /// `1` for legacy documents, `2` for current ones.
    #[must_use]
    pub const fn version(&self) -> u64 {
        match self {
            Self::Current(_) => CURRENT_VERSION,
            Self::Legacy(_) => LEGACY_VERSION,
        }
    }

    /// Identifier the secrets are bound to (their `adata`).
    #[must_use]
    pub fn identifier(&self) -> &str {
        match self {
            Self::Current(doc) => &doc.enc_key.sec.envelope.adata,
            Self::Legacy(doc) => &doc.sec.adata,
        }
    }

    /// Stored encryption public key.
    #[must_use]
    pub const fn encryption_public_key(&self) -> &PublicKey {
        match self {
            Self::Current(doc) => &doc.enc_key.public,
            Self::Legacy(doc) => &doc.public,
        }
    }

    /// Stored signing public key, if the document has one.
    #[must_use]
    pub const fn signing_public_key(&self) -> Option<&PublicKey> {
        match self {
            Self::Current(doc) => Some(&doc.signing_key.public),
            Self::Legacy(_) => None,
        }
    }
}

impl Serialize for IdentityDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Current(doc) => doc.serialize(serializer),
            Self::Legacy(doc) => doc.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for IdentityDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(de::Error::custom)
    }
}

fn format_version(value: &Value) -> Result<u64, IdentityError> {
    let object = value
        .as_object()
        .ok_or_else(|| IdentityError::MalformedDocument("document is not a JSON object".into()))?;
    match object.get("version") {
        None | Some(Value::Null) => Ok(LEGACY_VERSION),
        Some(v) => v
            .as_u64()
            .ok_or_else(|| IdentityError::UnsupportedVersion(v.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
