//! A user's cryptographic identity.
//!
//! An [`Identity`] owns two P-384 key pairs (one for key agreement, one for
//! ECDSA) and the two keys scrypt derives from the user's password:
//!
//! - `mac_key` wraps the secret scalars when the identity is written out
//! - `auth_key` is never used for encryption; its SHA-256 is the `authHash`
//!   a server stores to check the password without learning it
//!
//! Identities created before signing keys existed have only the encryption
//! pair. They keep working for everything except [`Identity::sign`], and are
//! written back in the legacy document shape.

use std::fmt;

use husher_crypto_core::asymmetric;
use husher_crypto_core::b64;
use husher_crypto_core::binary::{self, BinaryCiphertext, BinaryParams};
use husher_crypto_core::kdf::{DERIVED_KEY_LEN, SCRYPT_SALT_LEN};
use husher_crypto_core::{
    scrypt_salt_for, sha256, signing, strengthen, CipherSuite, CryptoError, DecryptionKey,
    EncryptionKey, Envelope, KeyPair, PublicKey, ScryptParams, SecretBuffer, SecretBytes,
    Signature,
};

use crate::derivation::run_blocking;
use crate::error::IdentityError;

/// Password-protected identity.
pub struct Identity {
    pub(crate) identifier: String,
    pub(crate) encryption_key: KeyPair,
    pub(crate) signing_key: Option<KeyPair>,
    pub(crate) mac_key: SecretBytes<DERIVED_KEY_LEN>,
    pub(crate) auth_key: SecretBytes<DERIVED_KEY_LEN>,
    pub(crate) scrypt_salt: [u8; SCRYPT_SALT_LEN],
    pub(crate) scrypt_params: ScryptParams,
    pub(crate) suite: CipherSuite,
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("identifier", &self.identifier)
            .field("encryption_key", &self.encryption_key.public())
            .field("signing_key", &self.signing_key.as_ref().map(KeyPair::public))
            .field("mac_key", &"***")
            .field("auth_key", &"***")
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl Identity {
    /// Create a new identity for `identifier` with default parameters.
    ///
    /// # Errors
    ///
    /// See [`Identity::generate_with_suite`].
    pub async fn generate(password: &str, identifier: &str) -> Result<Self, IdentityError> {
        Self::generate_with_suite(password, identifier, CipherSuite::default()).await
    }

    /// Create a new identity: derive the password keys with the salt for
    /// `identifier` and generate both key pairs.
    ///
    /// Runs on the blocking thread pool.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::MissingAssociatedData` (wrapped) if `identifier`
    /// is empty, since it is the associated data for every wrapped secret.
    /// Returns `CryptoError::ResourceLimit` (wrapped) for out-of-range
    /// scrypt parameters.
    pub async fn generate_with_suite(
        password: &str,
        identifier: &str,
        suite: CipherSuite,
    ) -> Result<Self, IdentityError> {
        if identifier.is_empty() {
            return Err(CryptoError::MissingAssociatedData.into());
        }
        let password = SecretBuffer::new(password.as_bytes())?;
        let identifier = identifier.to_owned();

        let identity = run_blocking(move || {
            let salt = scrypt_salt_for(&identifier);
            let derived = strengthen(password.expose(), Some(salt), &suite.scrypt)?;
            Ok(Self {
                identifier,
                encryption_key: KeyPair::generate()?,
                signing_key: Some(KeyPair::generate()?),
                mac_key: derived.key,
                auth_key: derived.key2,
                scrypt_salt: derived.salt,
                scrypt_params: suite.scrypt,
                suite,
            })
        })
        .await?;

        tracing::info!(
            identifier = %identity.identifier,
            scrypt_n = identity.scrypt_params.n,
            "identity generated"
        );
        Ok(identity)
    }
}

// ---------------------------------------------------------------------------
// Accessors
// ---------------------------------------------------------------------------

impl Identity {
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    #[must_use]
    pub const fn encryption_key(&self) -> &KeyPair {
        &self.encryption_key
    }

    #[must_use]
    pub const fn signing_key(&self) -> Option<&KeyPair> {
        self.signing_key.as_ref()
    }

    #[must_use]
    pub const fn scrypt_salt(&self) -> [u8; SCRYPT_SALT_LEN] {
        self.scrypt_salt
    }

    #[must_use]
    pub const fn scrypt_params(&self) -> ScryptParams {
        self.scrypt_params
    }

    #[must_use]
    pub const fn suite(&self) -> CipherSuite {
        self.suite
    }

    /// Base64 of `SHA-256(auth_key)`, the server-side password verifier.
    #[must_use]
    pub fn auth_hash(&self) -> String {
        b64::encode(&sha256(self.auth_key.expose()))
    }

    /// Whether this identity can sign; `false` means legacy.
    #[must_use]
    pub const fn has_signing_key(&self) -> bool {
        self.signing_key.is_some()
    }
}

// ---------------------------------------------------------------------------
// Encryption
// ---------------------------------------------------------------------------

impl Identity {
    /// Encrypt `plaintext`.
    ///
    /// `key` defaults to this identity's own encryption public key. For
    /// public-key mode `adata` defaults to the identifier; symmetric and
    /// passphrase modes have no default and need it spelled out.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::MissingAssociatedData` (wrapped) when no
    /// associated data is given or defaulted, or it is empty.
    pub fn encrypt(
        &self,
        plaintext: &[u8],
        key: Option<EncryptionKey<'_>>,
        adata: Option<&str>,
    ) -> Result<Envelope, IdentityError> {
        let key = key.unwrap_or(EncryptionKey::Public(self.encryption_key.public()));
        let adata = match (adata, key) {
            (Some(adata), _) => adata,
            (None, EncryptionKey::Public(_)) => self.identifier.as_str(),
            (None, _) => return Err(CryptoError::MissingAssociatedData.into()),
        };
        Ok(asymmetric::encrypt(plaintext, key, adata)?)
    }

    /// Decrypt an envelope. `key` defaults to this identity's own
    /// encryption secret key.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Decryption` (wrapped) on authentication failure
    /// and `CryptoError::MalformedEnvelope` when the envelope does not match
    /// the key mode.
    pub fn decrypt(
        &self,
        envelope: &Envelope,
        key: Option<DecryptionKey<'_>>,
    ) -> Result<SecretBuffer, IdentityError> {
        let key = key.unwrap_or(DecryptionKey::Secret(self.encryption_key.secret()));
        Ok(asymmetric::decrypt(envelope, key)?)
    }

    /// Encrypt a binary payload with the stream cipher, using this
    /// identity's chunk size.
    ///
    /// # Errors
    ///
    /// Propagates stream cipher errors; `adata` must be non-empty.
    pub fn encrypt_binary(
        &self,
        plaintext: &[u8],
        key: &[u8],
        adata: &str,
    ) -> Result<BinaryCiphertext, IdentityError> {
        Ok(binary::encrypt_binary_chunked(
            plaintext,
            key,
            adata,
            self.suite.stream_chunk_size,
        )?)
    }

    /// Decrypt a binary payload produced by [`Identity::encrypt_binary`] or
    /// any other stream encryptor.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Decryption` (wrapped) if any chunk fails to
    /// authenticate or the stream was truncated.
    pub fn decrypt_binary(
        &self,
        ciphertext: &[u8],
        key: &[u8],
        params: &BinaryParams,
    ) -> Result<Vec<u8>, IdentityError> {
        Ok(binary::decrypt_binary(ciphertext, key, params)?)
    }
}

// ---------------------------------------------------------------------------
// Signatures
// ---------------------------------------------------------------------------

impl Identity {
    /// Sign `message` with the signing key.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::MissingSigningKey` for legacy identities.
    pub fn sign(&self, message: &[u8]) -> Result<Signature, IdentityError> {
        let signing_key = self
            .signing_key
            .as_ref()
            .ok_or(IdentityError::MissingSigningKey)?;
        Ok(signing::sign(message, signing_key.secret())?)
    }

    /// Verify a signature against `key`, or against this identity's own
    /// signing public key when `key` is `None`.
    ///
    /// Invalid signatures are `Ok(false)`, never an error.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::MissingPublicKey` if `key` is `None` and the
    /// identity has no signing key.
    pub fn verify(
        &self,
        message: &[u8],
        signature: &Signature,
        key: Option<&PublicKey>,
    ) -> Result<bool, IdentityError> {
        let key = key
            .or_else(|| self.signing_key.as_ref().map(KeyPair::public))
            .ok_or(IdentityError::MissingPublicKey)?;
        Ok(signing::verify(message, signature, key))
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
