//! Streaming authenticated encryption for large binary payloads.
//!
//! Chunked AES-256-GCM (the STREAM construction): the payload is cut into
//! fixed-size chunks, each sealed with its own nonce
//!
//! ```text
//! prefix (7 bytes, random per stream) || counter (u32 BE) || last (0x00 / 0x01)
//! ```
//!
//! and the stream's `adata`. The counter orders chunks and the final flag
//! marks the end, so reordering, dropping or appending chunks, or truncating
//! the stream at a chunk boundary, all fail authentication.
//!
//! Output is the concatenation of `ciphertext || tag` for every chunk. The
//! decryptor only needs the key and the [`BinaryParams`].

use crate::error::CryptoError;
use crate::symmetric::KEY_LEN;
use rand::rngs::OsRng;
use rand::RngCore;
use ring::aead;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, Zeroizing};

/// Random per-stream nonce prefix length.
pub const NONCE_PREFIX_LEN: usize = 7;

/// GCM tag length per chunk.
pub const TAG_LEN: usize = 16;

/// Default plaintext bytes per chunk (64 KiB).
pub const DEFAULT_CHUNK_SIZE: u32 = 64 * 1024;

/// Largest chunk size accepted from stream parameters (16 MiB).
pub const MAX_CHUNK_SIZE: u32 = 16 * 1024 * 1024;

const NONCE_LEN: usize = 12;
const FLAG_INDEX: usize = NONCE_LEN - 1;
const LAST_CHUNK: u8 = 0x01;
const MIDDLE_CHUNK: u8 = 0x00;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Parameters a receiver needs besides the key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryParams {
    /// Nonce prefix.
    #[serde(with = "crate::b64::serde_bytes")]
    pub iv: Vec<u8>,
    /// Associated data bound into every chunk.
    pub adata: String,
    /// Plaintext bytes per chunk.
    #[serde(rename = "chunkSize")]
    pub chunk_size: u32,
}

/// Result of [`encrypt_binary`].
#[must_use = "encrypted data must be stored or transmitted"]
#[derive(Clone, Debug)]
pub struct BinaryCiphertext {
    pub ct: Vec<u8>,
    pub params: BinaryParams,
}

// ---------------------------------------------------------------------------
// Shared chunk cipher
// ---------------------------------------------------------------------------

struct ChunkCipher {
    key: aead::LessSafeKey,
    prefix: [u8; NONCE_PREFIX_LEN],
    adata: String,
    counter: u32,
}

impl ChunkCipher {
    fn new(key: &[u8], prefix: [u8; NONCE_PREFIX_LEN], adata: &str) -> Result<Self, CryptoError> {
        if adata.is_empty() {
            return Err(CryptoError::MissingAssociatedData);
        }
        if key.len() != KEY_LEN {
            return Err(CryptoError::Encryption(format!(
                "invalid key length: {} bytes (expected {KEY_LEN})",
                key.len()
            )));
        }
        let unbound = aead::UnboundKey::new(&aead::AES_256_GCM, key)
            .map_err(|_| CryptoError::Encryption("failed to create AES-256-GCM key".into()))?;
        Ok(Self {
            key: aead::LessSafeKey::new(unbound),
            prefix,
            adata: adata.to_owned(),
            counter: 0,
        })
    }

    /// Nonce for the current chunk; advances the counter.
    fn next_nonce(&mut self, last: bool) -> Result<aead::Nonce, CryptoError> {
        let mut nonce = [0u8; NONCE_LEN];
        nonce[..NONCE_PREFIX_LEN].copy_from_slice(&self.prefix);
        nonce[NONCE_PREFIX_LEN..FLAG_INDEX].copy_from_slice(&self.counter.to_be_bytes());
        nonce[FLAG_INDEX] = if last { LAST_CHUNK } else { MIDDLE_CHUNK };
        self.counter = self
            .counter
            .checked_add(1)
            .ok_or_else(|| CryptoError::Encryption("stream chunk counter exhausted".into()))?;
        Ok(aead::Nonce::assume_unique_for_key(nonce))
    }

    fn seal(&mut self, chunk: &[u8], last: bool, out: &mut Vec<u8>) -> Result<(), CryptoError> {
        let nonce = self.next_nonce(last)?;
        let mut in_out = chunk.to_vec();
        let Ok(tag) = self.key.seal_in_place_separate_tag(
            nonce,
            aead::Aad::from(self.adata.as_bytes()),
            &mut in_out,
        ) else {
            in_out.zeroize();
            return Err(CryptoError::Encryption(
                "AES-256-GCM chunk encryption failed".into(),
            ));
        };
        out.extend_from_slice(&in_out);
        out.extend_from_slice(tag.as_ref());
        Ok(())
    }

    fn open(&mut self, chunk: &[u8], last: bool, out: &mut Vec<u8>) -> Result<(), CryptoError> {
        let nonce = self.next_nonce(last)?;
        let mut in_out = chunk.to_vec();
        let plaintext = self
            .key
            .open_in_place(nonce, aead::Aad::from(self.adata.as_bytes()), &mut in_out)
            .map_err(|_| CryptoError::Decryption)?;
        out.extend_from_slice(plaintext);
        in_out.zeroize();
        Ok(())
    }
}

fn check_chunk_size(chunk_size: u32) -> Result<usize, CryptoError> {
    if chunk_size == 0 || chunk_size > MAX_CHUNK_SIZE {
        return Err(CryptoError::MalformedEnvelope(format!(
            "chunk size {chunk_size} outside 1..={MAX_CHUNK_SIZE}"
        )));
    }
    usize::try_from(chunk_size)
        .map_err(|_| CryptoError::MalformedEnvelope("chunk size does not fit in memory".into()))
}

// ---------------------------------------------------------------------------
// Incremental API
// ---------------------------------------------------------------------------

/// Encrypts a payload that arrives in pieces.
///
/// [`update`](Self::update) returns ciphertext for every chunk that is
/// known not to be the last; [`finish`](Self::finish) seals the remainder
/// (possibly empty) as the final chunk.
pub struct StreamEncryptor {
    cipher: ChunkCipher,
    chunk_size: usize,
    pending: Zeroizing<Vec<u8>>,
    params: BinaryParams,
}

impl StreamEncryptor {
    /// # Errors
    ///
    /// Returns `CryptoError::MissingAssociatedData` if `adata` is empty,
    /// `CryptoError::Encryption` for a bad key and
    /// `CryptoError::MalformedEnvelope` for an out-of-range chunk size.
    pub fn new(key: &[u8], adata: &str, chunk_size: u32) -> Result<Self, CryptoError> {
        let mut prefix = [0u8; NONCE_PREFIX_LEN];
        OsRng
            .try_fill_bytes(&mut prefix)
            .map_err(|e| CryptoError::SecureMemory(format!("CSPRNG fill failed: {e}")))?;
        let cipher = ChunkCipher::new(key, prefix, adata)?;
        let size = check_chunk_size(chunk_size)?;
        Ok(Self {
            cipher,
            chunk_size: size,
            pending: Zeroizing::new(Vec::new()),
            params: BinaryParams {
                iv: prefix.to_vec(),
                adata: adata.to_owned(),
                chunk_size,
            },
        })
    }

    #[must_use]
    pub const fn params(&self) -> &BinaryParams {
        &self.params
    }

    /// Feed more plaintext.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Encryption` if a chunk cannot be sealed.
    pub fn update(&mut self, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.pending.extend_from_slice(data);
        let mut out = Vec::new();
        let mut start = 0usize;
        // Keep at least one byte back: a full chunk could still be the last.
        while self.pending.len().saturating_sub(start) > self.chunk_size {
            let end = start.saturating_add(self.chunk_size);
            self.cipher.seal(&self.pending[start..end], false, &mut out)?;
            start = end;
        }
        self.pending[..start].zeroize();
        self.pending.drain(..start);
        Ok(out)
    }

    /// Seal the final chunk.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Encryption` if the chunk cannot be sealed.
    pub fn finish(mut self) -> Result<Vec<u8>, CryptoError> {
        let mut out = Vec::new();
        self.cipher.seal(&self.pending, true, &mut out)?;
        Ok(out)
    }
}

/// Decrypts a stream produced by [`StreamEncryptor`], piece by piece.
///
/// Plaintext from [`update`](Self::update) is authenticated chunk by chunk
/// but the stream as a whole is only complete once [`finish`](Self::finish)
/// succeeds.
pub struct StreamDecryptor {
    cipher: ChunkCipher,
    sealed_chunk_len: usize,
    pending: Vec<u8>,
}

impl StreamDecryptor {
    /// # Errors
    ///
    /// Returns `CryptoError::MalformedEnvelope` for a bad nonce prefix or
    /// chunk size, `CryptoError::MissingAssociatedData` for empty `adata`
    /// and `CryptoError::Encryption` for a bad key.
    pub fn new(key: &[u8], params: &BinaryParams) -> Result<Self, CryptoError> {
        let prefix: [u8; NONCE_PREFIX_LEN] = params.iv.as_slice().try_into().map_err(|_| {
            CryptoError::MalformedEnvelope(format!(
                "invalid stream iv length: {} bytes (expected {NONCE_PREFIX_LEN})",
                params.iv.len()
            ))
        })?;
        let size = check_chunk_size(params.chunk_size)?;
        let cipher = ChunkCipher::new(key, prefix, &params.adata)?;
        Ok(Self {
            cipher,
            sealed_chunk_len: size.saturating_add(TAG_LEN),
            pending: Vec::new(),
        })
    }

    /// Feed more ciphertext.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Decryption` if a chunk fails authentication.
    pub fn update(&mut self, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.pending.extend_from_slice(data);
        let mut out = Vec::new();
        let mut start = 0usize;
        while self.pending.len().saturating_sub(start) > self.sealed_chunk_len {
            let end = start.saturating_add(self.sealed_chunk_len);
            self.cipher.open(&self.pending[start..end], false, &mut out)?;
            start = end;
        }
        self.pending.drain(..start);
        Ok(out)
    }

    /// Authenticate the final chunk.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Decryption` if the stream was truncated or the
    /// final chunk fails authentication.
    pub fn finish(mut self) -> Result<Vec<u8>, CryptoError> {
        if self.pending.len() < TAG_LEN {
            return Err(CryptoError::Decryption);
        }
        let mut out = Vec::new();
        self.cipher.open(&self.pending, true, &mut out)?;
        Ok(out)
    }
}

// ---------------------------------------------------------------------------
// One-shot API
// ---------------------------------------------------------------------------

/// Encrypt a whole payload with the default chunk size.
///
/// # Errors
///
/// See [`StreamEncryptor::new`].
pub fn encrypt_binary(
    plaintext: &[u8],
    key: &[u8],
    adata: &str,
) -> Result<BinaryCiphertext, CryptoError> {
    encrypt_binary_chunked(plaintext, key, adata, DEFAULT_CHUNK_SIZE)
}

/// Encrypt a whole payload with an explicit chunk size.
///
/// # Errors
///
/// See [`StreamEncryptor::new`].
pub fn encrypt_binary_chunked(
    plaintext: &[u8],
    key: &[u8],
    adata: &str,
    chunk_size: u32,
) -> Result<BinaryCiphertext, CryptoError> {
    let mut enc = StreamEncryptor::new(key, adata, chunk_size)?;
    let params = enc.params().clone();
    let mut ct = enc.update(plaintext)?;
    ct.extend_from_slice(&enc.finish()?);
    Ok(BinaryCiphertext { ct, params })
}

/// Decrypt a whole payload.
///
/// # Errors
///
/// Returns `CryptoError::Decryption` on any authentication failure, wrong
/// key or mismatched `adata`; see also [`StreamDecryptor::new`].
pub fn decrypt_binary(ct: &[u8], key: &[u8], params: &BinaryParams) -> Result<Vec<u8>, CryptoError> {
    let mut dec = StreamDecryptor::new(key, params)?;
    let mut pt = dec.update(ct)?;
    pt.extend_from_slice(&dec.finish()?);
    Ok(pt)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
