//! Standard padded base64, the encoding of every binary field in envelopes
//! and identity documents.
//!
//! The `serde_*` submodules plug into `#[serde(with = "...")]` so malformed
//! base64 or a wrong fixed length is rejected while the JSON is parsed.

use crate::error::CryptoError;
use data_encoding::BASE64;

#[must_use]
pub fn encode(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

/// Decode a base64 field, naming it in the error.
///
/// # Errors
///
/// Returns `CryptoError::MalformedEnvelope` on invalid base64.
pub fn decode(field: &str, value: &str) -> Result<Vec<u8>, CryptoError> {
    BASE64
        .decode(value.as_bytes())
        .map_err(|e| CryptoError::MalformedEnvelope(format!("invalid base64 in `{field}`: {e}")))
}

/// Decode a base64 field that must hold exactly `N` bytes.
///
/// # Errors
///
/// Returns `CryptoError::MalformedEnvelope` on invalid base64 or length.
pub fn decode_array<const N: usize>(field: &str, value: &str) -> Result<[u8; N], CryptoError> {
    let bytes = decode(field, value)?;
    bytes.as_slice().try_into().map_err(|_| {
        CryptoError::MalformedEnvelope(format!(
            "`{field}` must be {N} bytes, got {}",
            bytes.len()
        ))
    })
}

/// `Vec<u8>` as a base64 string.
pub mod serde_bytes {
    use data_encoding::BASE64;
    use serde::{de, Deserialize, Deserializer, Serializer};

    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64.encode(bytes))
    }

    /// # Errors
    ///
    /// Fails on non-string input or invalid base64.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        BASE64.decode(text.as_bytes()).map_err(de::Error::custom)
    }
}

/// `Option<Vec<u8>>` as an optional base64 string.
pub mod serde_opt_bytes {
    use data_encoding::BASE64;
    use serde::{de, Deserialize, Deserializer, Serializer};

    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(
        bytes: &Option<Vec<u8>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match bytes {
            Some(b) => serializer.serialize_some(&BASE64.encode(b)),
            None => serializer.serialize_none(),
        }
    }

    /// # Errors
    ///
    /// Fails on non-string input or invalid base64.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<u8>>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|text| BASE64.decode(text.as_bytes()).map_err(de::Error::custom))
            .transpose()
    }
}

/// `[u8; N]` as a base64 string of exactly `N` bytes.
pub mod serde_array {
    use data_encoding::BASE64;
    use serde::{de, Deserialize, Deserializer, Serializer};

    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer, const N: usize>(
        bytes: &[u8; N],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64.encode(bytes))
    }

    /// # Errors
    ///
    /// Fails on non-string input, invalid base64 or a length other than `N`.
    pub fn deserialize<'de, D: Deserializer<'de>, const N: usize>(
        deserializer: D,
    ) -> Result<[u8; N], D::Error> {
        let text = String::deserialize(deserializer)?;
        let bytes = BASE64.decode(text.as_bytes()).map_err(de::Error::custom)?;
        let len = bytes.len();
        bytes
            .try_into()
            .map_err(|_| de::Error::custom(format!("expected {N} bytes, got {len}")))
    }
}
