//! AES-256-CCM known answers.
//!
//! Key: bytes 0x00..=0x1f. Nonce: "defghijklmnop" (13 bytes).
//! Plaintext: "foo". Associated data: "foo@bar.com".

use husher_crypto_core::b64;
use husher_crypto_core::symmetric::{decrypt, SymmetricEnvelope, KEY_LEN};
use husher_crypto_core::CryptoError;

fn counting_key() -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    for (i, b) in key.iter_mut().enumerate() {
        *b = u8::try_from(i).unwrap();
    }
    key
}

fn envelope(iv: &str) -> SymmetricEnvelope {
    SymmetricEnvelope {
        iv: b64::decode("iv", iv).unwrap(),
        ct: b64::decode("ct", "CksKQSPj+RecFJH5mxYMgqOPDQ==").unwrap(),
        adata: "foo@bar.com".into(),
    }
}

#[test]
fn thirteen_byte_nonce() {
    let pt = decrypt(&envelope("ZGVmZ2hpamtsbW5vcA=="), &counting_key()).unwrap();
    assert_eq!(pt.expose(), b"foo");
}

#[test]
fn sixteen_byte_legacy_iv() {
    // Same nonce followed by three bytes that are never used.
    let pt = decrypt(&envelope("ZGVmZ2hpamtsbW5vcHFycw=="), &counting_key()).unwrap();
    assert_eq!(pt.expose(), b"foo");
}

#[test]
fn other_adata_rejected() {
    let mut env = envelope("ZGVmZ2hpamtsbW5vcA==");
    env.adata = "bar@foo.com".into();
    assert!(matches!(
        decrypt(&env, &counting_key()),
        Err(CryptoError::Decryption)
    ));
}
