//! Password strengthening: scrypt for identities, PBKDF2 for passphrase envelopes.
//!
//! This module provides:
//! - [`strengthen`]: stretch a password into two independent 256-bit keys
//! - [`scrypt_salt_for`]: the deterministic 64-bit salt bound to an identifier
//! - [`ScryptParams`]: serializable cost parameters (persisted in documents)
//! - [`pbkdf2_sha256`]: key for passphrase-mode envelopes
//!
//! # Key split
//!
//! One scrypt call produces 64 bytes. The first half is `key` (the `macKey`
//! that wraps private keys), the second half is `key2` (the `authKey` whose
//! hash proves password knowledge). Neither half can be computed from the other.

use crate::error::CryptoError;
use crate::hash::sha256;
use crate::memory::SecretBytes;
use rand::rngs::OsRng;
use rand::RngCore;
use ring::pbkdf2;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use zeroize::Zeroize;

/// Length of each derived key in bytes (256 bits).
pub const DERIVED_KEY_LEN: usize = 32;

/// scrypt salt length in bytes (64 bits).
pub const SCRYPT_SALT_LEN: usize = 8;

/// Suffix appended to the identifier before hashing it into a salt.
pub const SALT_CONTEXT_SUFFIX: &str = "-crypho.com";

/// Total scrypt output: `key || key2`.
const SCRYPT_OUTPUT_LEN: usize = DERIVED_KEY_LEN * 2;

/// Upper bound on scrypt working memory (256 MiB).
const MAX_SCRYPT_MEMORY: u64 = 256 * 1024 * 1024;

/// Upper bound on the scrypt block size.
const MAX_SCRYPT_R: u32 = 32;

/// Upper bound on scrypt parallelism.
const MAX_SCRYPT_P: u32 = 16;

/// Upper bound on PBKDF2 iterations accepted from an envelope.
pub const MAX_PBKDF2_ITERATIONS: u32 = 10_000_000;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// scrypt cost parameters, stored next to the salt in every identity document.
///
/// Field names follow the document format: `pN`, `pr`, `pp`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScryptParams {
    /// CPU/memory cost `N`. Must be a power of two.
    #[serde(rename = "pN")]
    pub n: u32,
    /// Block size `r`.
    #[serde(rename = "pr")]
    pub r: u32,
    /// Parallelism `p`.
    #[serde(rename = "pp")]
    pub p: u32,
}

impl Default for ScryptParams {
    fn default() -> Self {
        Self {
            n: 16_384,
            r: 8,
            p: 1,
        }
    }
}

impl ScryptParams {
    /// Estimated working memory in bytes: `128 * N * r * p`.
    #[must_use]
    pub fn memory_bytes(&self) -> Option<u64> {
        128u64
            .checked_mul(u64::from(self.n))?
            .checked_mul(u64::from(self.r))?
            .checked_mul(u64::from(self.p))
    }

    /// Check the parameters against the resource bounds and return `log2(N)`.
    ///
    /// Runs before any derivation so a corrupted or hostile document cannot
    /// make the caller allocate unbounded memory.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::ResourceLimit` if `N` is not a power of two
    /// (or is below 2), `r`/`p` are zero or above their caps, or the memory
    /// estimate exceeds 256 MiB.
    pub fn validate(&self) -> Result<u8, CryptoError> {
        if self.n < 2 || !self.n.is_power_of_two() {
            return Err(CryptoError::ResourceLimit(format!(
                "scrypt N must be a power of 2 and at least 2, got {}",
                self.n
            )));
        }
        if self.r == 0 || self.r > MAX_SCRYPT_R {
            return Err(CryptoError::ResourceLimit(format!(
                "scrypt r must be in 1..={MAX_SCRYPT_R}, got {}",
                self.r
            )));
        }
        if self.p == 0 || self.p > MAX_SCRYPT_P {
            return Err(CryptoError::ResourceLimit(format!(
                "scrypt p must be in 1..={MAX_SCRYPT_P}, got {}",
                self.p
            )));
        }
        match self.memory_bytes() {
            Some(bytes) if bytes <= MAX_SCRYPT_MEMORY => {}
            _ => {
                return Err(CryptoError::ResourceLimit(format!(
                    "scrypt parameters N={} r={} p={} exceed the {MAX_SCRYPT_MEMORY}-byte memory bound",
                    self.n, self.r, self.p
                )));
            }
        }
        // Safe: N is a u32 power of two, so trailing_zeros <= 31 fits u8.
        #[allow(clippy::cast_possible_truncation)]
        Ok(self.n.trailing_zeros() as u8)
    }
}

/// Output of [`strengthen`].
///
/// Does not implement `Serialize`; `Debug` masks both keys.
#[must_use]
pub struct StrengthenedKey {
    /// First 256 bits of the scrypt output (`macKey`).
    pub key: SecretBytes<DERIVED_KEY_LEN>,
    /// Second 256 bits of the scrypt output (`authKey`).
    pub key2: SecretBytes<DERIVED_KEY_LEN>,
    /// Salt that was used. Not secret.
    pub salt: [u8; SCRYPT_SALT_LEN],
}

impl std::fmt::Debug for StrengthenedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrengthenedKey")
            .field("key", &self.key)
            .field("key2", &self.key2)
            .field("salt", &self.salt)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// scrypt
// ---------------------------------------------------------------------------

/// Deterministic scrypt salt for `identifier`:
/// the first 8 bytes of `SHA-256(identifier || "-crypho.com")`.
#[must_use]
pub fn scrypt_salt_for(identifier: &str) -> [u8; SCRYPT_SALT_LEN] {
    let mut context = String::with_capacity(identifier.len().saturating_add(SALT_CONTEXT_SUFFIX.len()));
    context.push_str(identifier);
    context.push_str(SALT_CONTEXT_SUFFIX);
    let digest = sha256(context.as_bytes());
    let mut salt = [0u8; SCRYPT_SALT_LEN];
    salt.copy_from_slice(&digest[..SCRYPT_SALT_LEN]);
    salt
}

/// Stretch `password` with scrypt into two independent 256-bit keys.
///
/// With `salt = None` a fresh random salt is drawn; pass the stored salt to
/// re-derive. For a fixed `(password, salt, params)` the output is identical
/// on every call.
///
/// This is CPU- and memory-bound (≈16 MiB, tens of milliseconds at the
/// default cost). Async callers should run it on a blocking thread.
///
/// # Errors
///
/// Returns `CryptoError::ResourceLimit` if `params` fail [`ScryptParams::validate`].
/// Returns `CryptoError::KeyDerivation` if the scrypt call itself fails.
pub fn strengthen(
    password: &[u8],
    salt: Option<[u8; SCRYPT_SALT_LEN]>,
    params: &ScryptParams,
) -> Result<StrengthenedKey, CryptoError> {
    let log_n = params.validate()?;

    let salt = match salt {
        Some(s) => s,
        None => {
            let mut s = [0u8; SCRYPT_SALT_LEN];
            OsRng
                .try_fill_bytes(&mut s)
                .map_err(|e| CryptoError::SecureMemory(format!("CSPRNG fill failed: {e}")))?;
            s
        }
    };

    let scrypt_params = scrypt::Params::new(log_n, params.r, params.p, SCRYPT_OUTPUT_LEN)
        .map_err(|e| CryptoError::KeyDerivation(format!("invalid scrypt params: {e}")))?;

    let mut output = [0u8; SCRYPT_OUTPUT_LEN];
    if let Err(e) = scrypt::scrypt(password, &salt, &scrypt_params, &mut output) {
        output.zeroize();
        return Err(CryptoError::KeyDerivation(format!(
            "scrypt derivation failed: {e}"
        )));
    }

    let key = SecretBytes::from_slice(&output[..DERIVED_KEY_LEN]);
    let key2 = SecretBytes::from_slice(&output[DERIVED_KEY_LEN..]);
    output.zeroize();

    Ok(StrengthenedKey {
        key: key?,
        key2: key2?,
        salt,
    })
}

// ---------------------------------------------------------------------------
// PBKDF2
// ---------------------------------------------------------------------------

/// PBKDF2-HMAC-SHA256 key for passphrase-mode envelopes.
///
/// # Errors
///
/// Returns `CryptoError::KeyDerivation` if `iterations` is zero.
/// Returns `CryptoError::ResourceLimit` if it exceeds [`MAX_PBKDF2_ITERATIONS`].
pub fn pbkdf2_sha256(
    passphrase: &[u8],
    salt: &[u8],
    iterations: u32,
) -> Result<SecretBytes<DERIVED_KEY_LEN>, CryptoError> {
    if iterations > MAX_PBKDF2_ITERATIONS {
        return Err(CryptoError::ResourceLimit(format!(
            "PBKDF2 iteration count {iterations} exceeds {MAX_PBKDF2_ITERATIONS}"
        )));
    }
    let iterations = NonZeroU32::new(iterations)
        .ok_or_else(|| CryptoError::KeyDerivation("PBKDF2 iteration count is zero".into()))?;

    let mut out = [0u8; DERIVED_KEY_LEN];
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        iterations,
        salt,
        passphrase,
        &mut out,
    );
    Ok(SecretBytes::new(out))
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
