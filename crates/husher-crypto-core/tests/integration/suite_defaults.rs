//! Default cipher suite values.

use husher_crypto_core::binary::DEFAULT_CHUNK_SIZE;
use husher_crypto_core::{CipherSuite, ScryptParams};

#[test]
fn default_suite() {
    let suite = CipherSuite::default();
    assert_eq!(suite.scrypt, ScryptParams { n: 16_384, r: 8, p: 1 });
    assert_eq!(suite.stream_chunk_size, DEFAULT_CHUNK_SIZE);
    assert_eq!(suite.scrypt.memory_bytes(), Some(16 * 1024 * 1024));
}

#[test]
fn with_scrypt_keeps_chunk_size() {
    let cheap = ScryptParams { n: 1024, r: 8, p: 1 };
    let suite = CipherSuite::default().with_scrypt(cheap);
    assert_eq!(suite.scrypt, cheap);
    assert_eq!(suite.stream_chunk_size, DEFAULT_CHUNK_SIZE);
    assert!(suite.scrypt.validate().is_ok());
}
