//! P-384 known answers.
//!
//! Key pair and signature from RFC 6979 appendix A.2.6 (SHA-384, "sample").
//! The agreement vector uses the same secret against the tag `2·G`.

use husher_crypto_core::asymmetric::unkem;
use husher_crypto_core::b64;
use husher_crypto_core::keys::SecretKey;
use husher_crypto_core::signing::{sign, verify};

const SECRET_HEX: &str = "6b9d3dad2e1b8c1c05b19875b6659f4de23c3b667bf297ba9aa47740787137d896d5724e4c70a825f872c9ea60d2edf5";
const PUBLIC_B64: &str = "7DpOQVtOGaRWhhgCn0J/pdqai8SukuAuBqrlKGswDGTe+PDqkFWGYGSiVFFUgLwTgBXZty19VyROqO+awMYhiWcIpZNn+d+59UyoSz8cnbEoiyMcOuDU/nNE/SUzJkcg";
const SIG_HEX: &str = "94edbb92a5ecb8aad4736e56c691916b3f88140666ce9fa73d64c4ea95ad133c81a648152e44acf96e36dd1e80fabe46\
                       99ef4aeb15f178cea1fe40db2603138f130e740a19624526203b6351d0a3a94fa329c145786e679e7b82c71a38628ac8";
const TWO_G_B64: &str = "CNmZBXuj0tlpJgBFxVuX8IkCWVmm9DTWUdIH0Z+5bp5P4Ohuvg5k+FuWqcdSld9hjoDx+lsbPO23v+jf/W26dLJ12HW8bMQ+kE5QXyVqtCVf/UPpTTniLWFQHnAKlA6A";

fn hex(text: &str) -> Vec<u8> {
    data_encoding::HEXLOWER.decode(text.as_bytes()).unwrap()
}

fn secret() -> SecretKey {
    SecretKey::from_bytes(&hex(SECRET_HEX)).unwrap()
}

#[test]
fn public_key_from_secret() {
    assert_eq!(secret().public_key().to_base64(), PUBLIC_B64);
}

#[test]
fn rfc6979_signature() {
    let sig = sign(b"sample", &secret()).unwrap();
    assert_eq!(sig.as_bytes(), hex(SIG_HEX).as_slice());
    assert!(verify(b"sample", &sig, &secret().public_key()));
}

#[test]
fn key_agreement_against_fixed_tag() {
    let tag = b64::decode("kemtag", TWO_G_B64).unwrap();
    let key = unkem(&secret(), &tag).unwrap();
    assert_eq!(
        b64::encode(key.expose()),
        "pL3G/T/+USEdWye5QkcJqnlI5Q4ChxPg2nAL3OJ0lsk="
    );
}
