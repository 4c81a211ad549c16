//! SHA-256, HMAC-SHA256 and constant-time comparison (via `ring`).

use crate::memory::SecretBytes;
use ring::{digest, hmac};

/// SHA-256 output length in bytes.
pub const SHA256_LEN: usize = 32;

#[must_use]
pub fn sha256(data: &[u8]) -> [u8; SHA256_LEN] {
    let d = digest::digest(&digest::SHA256, data);
    let mut out = [0u8; SHA256_LEN];
    out.copy_from_slice(d.as_ref());
    out
}

/// HMAC-SHA256 of `message` under `key`. Used to derive per-field wrap keys.
#[must_use]
pub fn hmac_sha256(key: &[u8], message: &[u8]) -> SecretBytes<SHA256_LEN> {
    let k = hmac::Key::new(hmac::HMAC_SHA256, key);
    let tag = hmac::sign(&k, message);
    let mut out = [0u8; SHA256_LEN];
    out.copy_from_slice(tag.as_ref());
    SecretBytes::new(out)
}

/// Constant-time byte comparison.
///
/// Returns `true` iff both slices have equal length and identical contents.
/// Lengths are not secret (both sides are fixed-size digests).
#[must_use]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
