//! Generate → persist → reload → snapshot.

use super::{cheap_identity, CHEAP};
use husher_identity::{
    CipherSuite, CryptoError, DecryptionKey, EncryptionKey, Identity, IdentityDocument,
    IdentityError, CURRENT_VERSION,
};

#[tokio::test]
async fn current_roundtrip_cross_sign_and_verify() {
    let original = cheap_identity("secret", "foo@bar.com").await;
    let json = original.to_json().unwrap();
    assert_eq!(json["version"], CURRENT_VERSION);

    let text = serde_json::to_string(&json).unwrap();
    let document = IdentityDocument::from_json(&text).unwrap();
    let reloaded = Identity::from_document("secret", &document).await.unwrap();

    let sig = original.sign(b"foo").unwrap();
    assert!(reloaded.verify(b"foo", &sig, None).unwrap());
    let sig = reloaded.sign(b"bar").unwrap();
    assert!(original.verify(b"bar", &sig, None).unwrap());

    let env = original.encrypt(b"foo", None, None).unwrap();
    assert_eq!(reloaded.decrypt(&env, None).unwrap().expose(), b"foo");
    assert_eq!(reloaded.fingerprint(), original.fingerprint());
    assert_eq!(reloaded.scrypt_params(), CHEAP);
}

#[tokio::test]
async fn session_roundtrip() {
    let original = cheap_identity("secret", "foo@bar.com").await;
    let env = original.encrypt(b"foo", None, None).unwrap();
    let sig = original.sign(b"foo").unwrap();

    let restored = Identity::from_session(original.to_session());
    assert_eq!(restored.auth_hash(), original.auth_hash());
    assert_eq!(restored.decrypt(&env, None).unwrap().expose(), b"foo");
    assert!(restored.verify(b"foo", &sig, None).unwrap());
}

#[tokio::test]
async fn encrypt_without_adata_in_symmetric_mode_is_refused() {
    let id = cheap_identity("secret", "foo@bar.com").await;
    let key = husher_identity::random_key().unwrap();
    let key = husher_crypto_core::SecretBytes::<32>::from_slice(
        &husher_crypto_core::b64::decode("key", &key).unwrap(),
    )
    .unwrap();
    let err = id
        .encrypt(b"foo", Some(EncryptionKey::Symmetric(&key)), None)
        .unwrap_err();
    assert!(matches!(
        err,
        IdentityError::Crypto(CryptoError::MissingAssociatedData)
    ));
    assert_eq!(err.to_string(), "Only authenticated CCM supported");

    let env = id
        .encrypt(b"foo", Some(EncryptionKey::Symmetric(&key)), Some("auth_data"))
        .unwrap();
    let pt = id
        .decrypt(&env, Some(DecryptionKey::Symmetric(&key)))
        .unwrap();
    assert_eq!(pt.expose(), b"foo");
}

#[tokio::test]
async fn passphrase_mode_roundtrip() {
    let id = cheap_identity("secret", "foo@bar.com").await;
    let env = id
        .encrypt(b"foo", Some(EncryptionKey::Passphrase("s3cr1t")), Some("auth_data"))
        .unwrap();
    let pt = id
        .decrypt(&env, Some(DecryptionKey::Passphrase("s3cr1t")))
        .unwrap();
    assert_eq!(pt.expose(), b"foo");
}

#[tokio::test]
async fn hostile_cost_parameters_refused_at_generation() {
    let suite = CipherSuite::default().with_scrypt(husher_identity::ScryptParams {
        n: 1 << 22,
        r: 8,
        p: 1,
    });
    let err = Identity::generate_with_suite("secret", "foo@bar.com", suite)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        IdentityError::Crypto(CryptoError::ResourceLimit(_))
    ));
}

#[tokio::test]
async fn async_strengthen_matches_generated_auth_hash() {
    let id = cheap_identity("secret", "foo@bar.com").await;
    let derived = husher_identity::strengthen_async("secret", Some(id.scrypt_salt()), CHEAP)
        .await
        .unwrap();
    let hash = husher_crypto_core::b64::encode(&husher_crypto_core::sha256(derived.key2.expose()));
    assert_eq!(hash, id.auth_hash());
}
