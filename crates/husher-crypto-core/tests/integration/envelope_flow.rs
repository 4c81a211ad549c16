//! Two parties exchanging envelopes over JSON.

use husher_crypto_core::asymmetric::{decrypt, encrypt, DecryptionKey, EncryptionKey, Envelope};
use husher_crypto_core::signing::{sign, verify, Signature};
use husher_crypto_core::{b64, random_key, KeyPair, SecretBytes};

/// Alice sends Bob a fresh content key, signs it, and Bob uses it to open
/// a symmetric envelope. Everything crosses the wire as JSON.
#[test]
fn key_transport_then_symmetric_message() {
    let alice_sign = KeyPair::generate().unwrap();
    let bob = KeyPair::generate().unwrap();

    let content_key = random_key().unwrap();
    let wrapped = encrypt(
        content_key.as_bytes(),
        EncryptionKey::Public(bob.public()),
        "alice@example.com",
    )
    .unwrap();
    let signature = sign(content_key.as_bytes(), alice_sign.secret()).unwrap();
    let key_bytes = SecretBytes::<32>::from_slice(&b64::decode("key", &content_key).unwrap()).unwrap();
    let message = encrypt(b"hello bob", EncryptionKey::Symmetric(&key_bytes), "thread-1").unwrap();

    let wire_wrapped = serde_json::to_string(&wrapped).unwrap();
    let wire_sig = serde_json::to_string(&signature).unwrap();
    let wire_message = serde_json::to_string(&message).unwrap();

    let wrapped: Envelope = serde_json::from_str(&wire_wrapped).unwrap();
    let signature: Signature = serde_json::from_str(&wire_sig).unwrap();
    let message: Envelope = serde_json::from_str(&wire_message).unwrap();

    let received = decrypt(&wrapped, DecryptionKey::Secret(bob.secret())).unwrap();
    assert!(verify(received.expose(), &signature, alice_sign.public()));

    let key = b64::decode("key", received.expose_str().unwrap()).unwrap();
    let key = SecretBytes::<32>::from_slice(&key).unwrap();
    let plaintext = decrypt(&message, DecryptionKey::Symmetric(&key)).unwrap();
    assert_eq!(plaintext.expose(), b"hello bob");
}

#[test]
fn passphrase_envelope_survives_json() {
    let env = encrypt(b"foo", EncryptionKey::Passphrase("s3cr1t"), "auth_data").unwrap();
    let value = serde_json::to_value(&env).unwrap();
    assert_eq!(value["iter"], 1000);
    assert!(value.get("kemtag").is_none());
    let back: Envelope = serde_json::from_value(value).unwrap();
    let pt = decrypt(&back, DecryptionKey::Passphrase("s3cr1t")).unwrap();
    assert_eq!(pt.expose(), b"foo");
}

#[test]
fn oversized_iteration_count_is_refused() {
    let mut env = encrypt(b"foo", EncryptionKey::Passphrase("s3cr1t"), "auth_data").unwrap();
    env.iter = Some(u32::MAX);
    assert!(decrypt(&env, DecryptionKey::Passphrase("s3cr1t")).is_err());
}
