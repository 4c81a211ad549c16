//! Secret-bearing types never print their contents and always run drop glue.

use husher_crypto_core::kdf::{strengthen, ScryptParams, StrengthenedKey};
use husher_crypto_core::memory::{SecretBuffer, SecretBytes};
use husher_crypto_core::{b64, KeyPair, SecretKey};

#[test]
fn secret_types_need_drop() {
    assert!(std::mem::needs_drop::<SecretBuffer>());
    assert!(std::mem::needs_drop::<SecretBytes<32>>());
    assert!(std::mem::needs_drop::<SecretKey>());
    assert!(std::mem::needs_drop::<KeyPair>());
    assert!(std::mem::needs_drop::<StrengthenedKey>());
}

#[test]
fn secret_key_debug_is_masked() {
    let kp = KeyPair::generate().unwrap();
    let raw = b64::encode(kp.secret().to_bytes().expose());
    let secret_debug = format!("{:?}", kp.secret());
    let pair_debug = format!("{kp:?}");
    assert!(!secret_debug.contains(&raw));
    assert!(!pair_debug.contains(&raw));
    assert!(pair_debug.contains(&kp.public().to_base64()));
}

#[test]
fn strengthened_key_debug_is_masked() {
    let params = ScryptParams { n: 16, r: 1, p: 1 };
    let derived = strengthen(b"secret", Some([0u8; 8]), &params).unwrap();
    let text = format!("{derived:?}");
    assert!(!text.contains(&b64::encode(derived.key.expose())));
    assert!(!text.contains(&b64::encode(derived.key2.expose())));
    assert!(text.contains("***"));
}

#[test]
fn secret_bytes_display_is_masked() {
    let key = SecretBytes::new([0xAB; 32]);
    assert!(!format!("{key}").contains("171"));
    assert!(!format!("{key:?}").to_lowercase().contains("ab"));
}
