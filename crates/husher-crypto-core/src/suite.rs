//! The cipher suite an identity operates under.
//!
//! Curve, AEAD modes and hash are fixed by the types in this crate. What can
//! vary is cost: the scrypt work factor and the streaming chunk size. A
//! [`CipherSuite`] value carries those and is handed to every operation that
//! needs them, so tests can run with cheap parameters without touching any
//! global state.

use crate::binary::DEFAULT_CHUNK_SIZE;
use crate::kdf::ScryptParams;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CipherSuite {
    /// Work factor for new identities. Loaded identities use the
    /// parameters stored in their document.
    pub scrypt: ScryptParams,
    /// Plaintext bytes per chunk for binary stream encryption.
    pub stream_chunk_size: u32,
}

impl Default for CipherSuite {
    fn default() -> Self {
        Self {
            scrypt: ScryptParams::default(),
            stream_chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl CipherSuite {
    /// Same suite with different scrypt parameters.
    #[must_use]
    pub const fn with_scrypt(mut self, scrypt: ScryptParams) -> Self {
        self.scrypt = scrypt;
        self
    }
}
