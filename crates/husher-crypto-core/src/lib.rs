//! `husher-crypto-core`: primitives for the husher identity core.
//!
//! Everything that touches P-384, AES, SHA-256 or scrypt lives here. The
//! crate is synchronous, performs no I/O and never logs, so it can be
//! audited on its own.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod error;
pub mod memory;

pub mod b64;
pub mod hash;

pub mod kdf;
pub mod keys;

pub mod symmetric;

pub mod asymmetric;

pub mod binary;

pub mod signing;

pub mod suite;

pub use asymmetric::{DecryptionKey, EncryptionKey, Envelope};
pub use binary::{
    decrypt_binary, encrypt_binary, encrypt_binary_chunked, BinaryCiphertext, BinaryParams,
    StreamDecryptor, StreamEncryptor,
};
pub use error::CryptoError;
pub use hash::{constant_time_eq, hmac_sha256, sha256};
pub use kdf::{scrypt_salt_for, strengthen, ScryptParams, StrengthenedKey};
pub use keys::{KeyPair, PublicKey, SecretKey};
pub use memory::{SecretBuffer, SecretBytes};
pub use signing::{sign, verify, Signature};
pub use suite::CipherSuite;
pub use symmetric::{random_key, SymmetricEnvelope};
