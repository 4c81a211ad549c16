//! Multi-recipient key distribution between identities.

use super::cheap_identity;
use husher_identity::{IdentityError, MultiRecipientBundle};
use std::collections::BTreeMap;

#[tokio::test]
async fn recipients_share_the_signed_key() {
    let alice = cheap_identity("secret", "alice@example.com").await;
    let bob = cheap_identity("secret", "bob@example.com").await;
    let carol = cheap_identity("secret", "carol@example.com").await;

    let recipients = BTreeMap::from([
        (bob.identifier().to_owned(), bob.encryption_key().public().clone()),
        (carol.identifier().to_owned(), carol.encryption_key().public().clone()),
    ]);
    let bundle = alice
        .generate_key_and_encrypt_to_public_keys(&recipients)
        .unwrap();

    let wire = serde_json::to_string(&bundle).unwrap();
    let bundle: MultiRecipientBundle = serde_json::from_str(&wire).unwrap();

    let k_bob = bob.decrypt(&bundle.keys["bob@example.com"], None).unwrap();
    let k_carol = carol.decrypt(&bundle.keys["carol@example.com"], None).unwrap();
    assert_eq!(k_bob.expose(), k_carol.expose());

    let alice_signing = alice.signing_key().unwrap().public();
    assert!(bob
        .verify(k_bob.expose(), &bundle.signature, Some(alice_signing))
        .unwrap());

    let opened = bundle
        .open("bob@example.com", bob.encryption_key().secret(), alice_signing)
        .unwrap();
    assert_eq!(opened.expose(), k_bob.expose());
}

#[tokio::test]
async fn each_bundle_has_a_fresh_key() {
    let alice = cheap_identity("secret", "alice@example.com").await;
    let recipients = BTreeMap::from([(
        alice.identifier().to_owned(),
        alice.encryption_key().public().clone(),
    )]);
    let a = alice.generate_key_and_encrypt_to_public_keys(&recipients).unwrap();
    let b = alice.generate_key_and_encrypt_to_public_keys(&recipients).unwrap();
    let ka = alice.decrypt(&a.keys["alice@example.com"], None).unwrap();
    let kb = alice.decrypt(&b.keys["alice@example.com"], None).unwrap();
    assert_ne!(ka.expose(), kb.expose());
}

#[tokio::test]
async fn non_recipient_cannot_open() {
    let alice = cheap_identity("secret", "alice@example.com").await;
    let bob = cheap_identity("secret", "bob@example.com").await;
    let eve = cheap_identity("secret", "eve@example.com").await;
    let recipients = BTreeMap::from([(
        bob.identifier().to_owned(),
        bob.encryption_key().public().clone(),
    )]);
    let bundle = alice
        .generate_key_and_encrypt_to_public_keys(&recipients)
        .unwrap();
    let signer = alice.signing_key().unwrap().public();
    assert!(matches!(
        bundle.open("bob@example.com", eve.encryption_key().secret(), signer),
        Err(IdentityError::Crypto(_))
    ));
    assert!(matches!(
        bundle.open("eve@example.com", eve.encryption_key().secret(), signer),
        Err(IdentityError::UnknownRecipient(_))
    ));
}
