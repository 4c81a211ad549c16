//! `husher-identity`: password-protected identities for husher.
//!
//! Builds on `husher-crypto-core`: password strengthening, key pairs,
//! envelopes and signatures come from there. This crate adds the identity
//! lifecycle (generate, persist, load, snapshot), multi-recipient key
//! distribution and fingerprints. Derivation runs on tokio's blocking pool.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod derivation;
pub mod error;

pub mod document;
pub mod identity;
pub mod serializer;
pub mod session;

pub mod distribution;
pub mod fingerprint;

pub use derivation::strengthen_async;
pub use distribution::MultiRecipientBundle;
pub use document::{
    CurrentDocument, IdentityDocument, LegacyDocument, CURRENT_VERSION, LEGACY_VERSION,
};
pub use error::IdentityError;
pub use fingerprint::{fingerprint_of, FINGERPRINT_WORDS};
pub use identity::Identity;
pub use session::IdentitySession;

pub use husher_crypto_core::{
    random_key, BinaryCiphertext, BinaryParams, CipherSuite, CryptoError, DecryptionKey,
    EncryptionKey, Envelope, KeyPair, PublicKey, ScryptParams, Signature,
};
