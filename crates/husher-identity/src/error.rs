//! Identity error types for `husher-identity`.

use husher_crypto_core::CryptoError;
use thiserror::Error;

/// Errors produced by identity operations.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Cryptographic operation failed (delegated from crypto-core).
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// Identity document is structurally invalid: missing field, wrong type,
    /// corrupt base64 or a key that is not on the curve.
    #[error("malformed identity document: {0}")]
    MalformedDocument(String),

    /// Identity document declares a format version this crate cannot read.
    #[error("unsupported identity document version: {0}")]
    UnsupportedVersion(String),

    /// Password does not match the document's `authHash`.
    #[error("invalid password")]
    InvalidPassword,

    /// Signing was requested on an identity that has no signing key.
    #[error("identity has no signing key")]
    MissingSigningKey,

    /// Verification was requested with no public key given and none on the identity.
    #[error("no public key available for verification")]
    MissingPublicKey,

    /// A multi-recipient bundle has no entry for the requested recipient.
    #[error("no key entry for recipient: {0}")]
    UnknownRecipient(String),

    /// A distributed key does not carry a valid signature from the claimed sender.
    #[error("distributed key signature does not verify")]
    InvalidSignature,

    /// The background derivation task panicked or was cancelled.
    #[error("key derivation task failed: {0}")]
    DerivationTask(String),
}

impl From<serde_json::Error> for IdentityError {
    fn from(e: serde_json::Error) -> Self {
        Self::MalformedDocument(e.to_string())
    }
}
