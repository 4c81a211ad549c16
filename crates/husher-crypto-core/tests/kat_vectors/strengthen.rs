//! scrypt known answers for password "secret" and identifier "foo@bar.com".

use husher_crypto_core::b64;
use husher_crypto_core::kdf::{scrypt_salt_for, strengthen, ScryptParams};
use husher_crypto_core::sha256;

const PASSWORD: &[u8] = b"secret";
const SALT_B64: &str = "MUkhdycPtis=";

#[test]
fn salt_for_identifier() {
    assert_eq!(b64::encode(&scrypt_salt_for("foo@bar.com")), SALT_B64);
}

/// Default cost: N=16384, r=8, p=1.
#[test]
fn default_cost_keys_and_auth_hash() {
    let salt = b64::decode_array::<8>("salt", SALT_B64).unwrap();
    let derived = strengthen(PASSWORD, Some(salt), &ScryptParams::default()).unwrap();
    assert_eq!(
        b64::encode(derived.key.expose()),
        "aCG5Vg9uQJJPZqoqaEgMJUipOLHZUe8JbtUDnBXKuWA="
    );
    assert_eq!(
        b64::encode(derived.key2.expose()),
        "6uqP5oPsQYHI/0LHE2aXi6rG9lRVuyro3JmNOgY9mTo="
    );
    assert_eq!(
        b64::encode(&sha256(derived.key2.expose())),
        "d+XnaY7zS3ytE46kOdUDnvb1gVWFz1IAR1lAeVyRgjg="
    );
}

/// Cheap cost used throughout the test suites: N=1024, r=8, p=1.
#[test]
fn cheap_cost_keys() {
    let params = ScryptParams { n: 1024, r: 8, p: 1 };
    let salt = scrypt_salt_for("foo@bar.com");
    let derived = strengthen(PASSWORD, Some(salt), &params).unwrap();
    assert_eq!(
        b64::encode(derived.key.expose()),
        "L1sddsCGpw2ta8dxi1Zj5TbI0cFFOu1TZ2u/rqsLjzw="
    );
    assert_eq!(
        b64::encode(derived.key2.expose()),
        "N6nkxpL1hr7px47oNk8hvXg0alzrphsyG1re/CMJ0sA="
    );
}
