//! Identities without a signing key.

use super::cheap_identity;
use husher_identity::{Identity, IdentityDocument, IdentityError, LEGACY_VERSION};
use std::collections::BTreeMap;

async fn legacy_identity() -> (Identity, Identity) {
    let full = cheap_identity("secret", "foo@bar.com").await;
    let legacy_doc = IdentityDocument::Legacy(full.to_legacy_document().unwrap());
    let legacy = Identity::from_document("secret", &legacy_doc).await.unwrap();
    (full, legacy)
}

#[tokio::test]
async fn legacy_roundtrip_cross_decrypt() {
    let (full, legacy) = legacy_identity().await;

    let env = full.encrypt(b"foo", None, None).unwrap();
    assert_eq!(legacy.decrypt(&env, None).unwrap().expose(), b"foo");
    let env = legacy.encrypt(b"bar", None, None).unwrap();
    assert_eq!(full.decrypt(&env, None).unwrap().expose(), b"bar");
}

#[tokio::test]
async fn identity_without_signing_key_serializes_as_legacy() {
    let (_, legacy) = legacy_identity().await;
    let document = legacy.to_document().unwrap();
    assert_eq!(document.version(), LEGACY_VERSION);
    let value = document.to_value().unwrap();
    assert!(value.get("version").is_none());
    assert!(value.get("signingKey").is_none());
    assert!(value["scryptSalt"].is_string());

    let reloaded = Identity::from_json("secret", value).await.unwrap();
    assert_eq!(reloaded.auth_hash(), legacy.auth_hash());
}

#[tokio::test]
async fn legacy_capabilities() {
    let (full, legacy) = legacy_identity().await;
    assert!(matches!(legacy.sign(b"foo"), Err(IdentityError::MissingSigningKey)));

    let sig = full.sign(b"foo").unwrap();
    assert!(matches!(
        legacy.verify(b"foo", &sig, None),
        Err(IdentityError::MissingPublicKey)
    ));
    let signer = full.signing_key().unwrap().public();
    assert!(legacy.verify(b"foo", &sig, Some(signer)).unwrap());

    assert!(matches!(
        legacy.generate_key_and_encrypt_to_public_keys(&BTreeMap::new()),
        Err(IdentityError::MissingSigningKey)
    ));
}

#[tokio::test]
async fn legacy_fingerprint_covers_encryption_key_only() {
    let (full, legacy) = legacy_identity().await;
    assert_ne!(legacy.fingerprint(), full.fingerprint());
    assert_eq!(
        legacy.fingerprint(),
        husher_identity::fingerprint_of(full.encryption_key().public(), None)
    );
}
