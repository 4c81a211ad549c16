//! Exhaustive single-bit tampering over small envelopes.

use husher_crypto_core::asymmetric::{self, DecryptionKey, EncryptionKey};
use husher_crypto_core::binary::{decrypt_binary, encrypt_binary_chunked};
use husher_crypto_core::symmetric::{decrypt, encrypt};
use husher_crypto_core::{CryptoError, KeyPair};

const KEY: [u8; 32] = [0x17; 32];

#[test]
fn every_bit_of_symmetric_envelope_is_authenticated() {
    let env = encrypt(b"short secret", &KEY, "foo@bar.com").unwrap();
    for i in 0..env.ct.len() {
        for bit in 0..8 {
            let mut bad = env.clone();
            bad.ct[i] ^= 1 << bit;
            assert!(matches!(decrypt(&bad, &KEY), Err(CryptoError::Decryption)));
        }
    }
    for i in 0..env.iv.len() {
        let mut bad = env.clone();
        bad.iv[i] ^= 0x01;
        assert!(matches!(decrypt(&bad, &KEY), Err(CryptoError::Decryption)));
    }
}

#[test]
fn every_byte_of_binary_stream_is_authenticated() {
    let out = encrypt_binary_chunked(&[0x5A; 100], &KEY, "foo@bar.com", 32).unwrap();
    for i in 0..out.ct.len() {
        let mut bad = out.ct.clone();
        bad[i] ^= 0x80;
        assert!(matches!(
            decrypt_binary(&bad, &KEY, &out.params),
            Err(CryptoError::Decryption)
        ));
    }
    for i in 0..out.params.iv.len() {
        let mut params = out.params.clone();
        params.iv[i] ^= 0x01;
        assert!(matches!(
            decrypt_binary(&out.ct, &KEY, &params),
            Err(CryptoError::Decryption)
        ));
    }
}

#[test]
fn reordered_stream_chunks_rejected() {
    let out = encrypt_binary_chunked(&[0x11; 96], &KEY, "ctx", 32).unwrap();
    let sealed = 32 + 16;
    let mut swapped = out.ct.clone();
    let (first, rest) = swapped.split_at_mut(sealed);
    first.swap_with_slice(&mut rest[..sealed]);
    assert!(matches!(
        decrypt_binary(&swapped, &KEY, &out.params),
        Err(CryptoError::Decryption)
    ));
}

#[test]
fn public_key_envelope_ciphertext_is_authenticated() {
    let kp = KeyPair::generate().unwrap();
    let env = asymmetric::encrypt(b"foo", EncryptionKey::Public(kp.public()), "ctx").unwrap();
    for i in 0..env.sealed.ct.len() {
        let mut bad = env.clone();
        bad.sealed.ct[i] ^= 0x04;
        assert!(matches!(
            asymmetric::decrypt(&bad, DecryptionKey::Secret(kp.secret())),
            Err(CryptoError::Decryption)
        ));
    }
}
