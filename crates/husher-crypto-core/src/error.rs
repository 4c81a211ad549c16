//! Cryptographic error types for `husher-crypto-core`.

use thiserror::Error;

/// Errors produced by cryptographic operations.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The CSPRNG could not produce a valid P-384 key pair.
    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    /// Key derivation failed (scrypt parameter validation, PBKDF2 input).
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    /// Derivation parameters exceed the memory/time bound.
    #[error("resource limit exceeded: {0}")]
    ResourceLimit(String),

    /// Symmetric encryption was requested without associated data.
    #[error("Only authenticated CCM supported")]
    MissingAssociatedData,

    /// Symmetric or stream encryption failure (AES-256-CCM, AES-256-GCM).
    #[error("encryption error: {0}")]
    Encryption(String),

    /// Authentication tag verification failed: ciphertext tampered, wrong key
    /// or wrong associated data. Deliberately carries no detail.
    #[error("decryption failed: authentication tag mismatch")]
    Decryption,

    /// Envelope or parameter block is structurally invalid (bad base64,
    /// wrong field length, key mode mismatch).
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// Invalid key material (wrong length, point not on curve, zero scalar).
    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(String),

    /// Digital signature creation failure.
    #[error("signature error: {0}")]
    Signature(String),

    /// Secure memory allocation failure (mlock, CSPRNG fill).
    #[error("secure memory error: {0}")]
    SecureMemory(String),
}
