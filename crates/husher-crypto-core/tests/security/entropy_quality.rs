//! Entropy smoke tests for CSPRNG-backed outputs.
//!
//! Thresholds are well below the expected Shannon entropy for each sample
//! size so natural variance never trips them; they catch all-zero or
//! repeating output.

use husher_crypto_core::memory::{SecretBuffer, SecretBytes};
use husher_crypto_core::{b64, random_key, KeyPair};

/// Shannon entropy of a byte slice (bits per byte).
#[allow(clippy::cast_precision_loss)]
fn shannon_entropy(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let mut freq = [0u64; 256];
    for &b in data {
        freq[b as usize] = freq[b as usize].saturating_add(1);
    }
    let len = data.len() as f64;
    freq.iter()
        .filter(|&&f| f > 0)
        .map(|&f| {
            let p = f as f64 / len;
            -p * p.log2()
        })
        .sum()
}

#[test]
fn secret_buffer_random_64kb_entropy() {
    let buf = SecretBuffer::random(65536).expect("CSPRNG should succeed");
    let entropy = shannon_entropy(buf.expose());
    assert!(entropy > 7.99, "entropy too low: {entropy:.4}");
}

#[test]
fn secret_bytes_random_32_entropy() {
    let key = SecretBytes::<32>::random().expect("CSPRNG should succeed");
    let entropy = shannon_entropy(key.expose());
    assert!(entropy > 4.0, "entropy too low: {entropy:.4}");
}

#[test]
fn random_keys_concatenated_entropy() {
    let mut pool = Vec::with_capacity(32 * 64);
    for _ in 0..64 {
        pool.extend(b64::decode("key", &random_key().unwrap()).unwrap());
    }
    let entropy = shannon_entropy(&pool);
    assert!(entropy > 7.5, "entropy too low: {entropy:.4}");
}

#[test]
fn generated_secret_scalars_differ() {
    let a = KeyPair::generate().unwrap();
    let b = KeyPair::generate().unwrap();
    assert_ne!(a.secret().to_bytes().expose(), b.secret().to_bytes().expose());
    assert_ne!(a.public(), b.public());
}
