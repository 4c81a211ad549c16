//! Writing an [`Identity`] out as a document and reading it back.
//!
//! Loading re-derives `macKey` and `authKey` from the password with the
//! stored salt and parameters, checks `authHash` before touching any
//! ciphertext, then unwraps each secret scalar and checks it against the
//! stored public key.

use husher_crypto_core::b64;
use husher_crypto_core::kdf::{DERIVED_KEY_LEN, SCRYPT_SALT_LEN};
use husher_crypto_core::{
    constant_time_eq, hmac_sha256, sha256, strengthen, symmetric, CipherSuite, CryptoError, KeyPair,
    PublicKey, ScryptParams, SecretBuffer, SecretBytes, SecretKey, StrengthenedKey,
    SymmetricEnvelope,
};
use rand::rngs::OsRng;
use rand::RngCore;
use serde_json::Value;
use zeroize::{Zeroize, Zeroizing};

use crate::derivation::run_blocking;
use crate::document::{
    CurrentDocument, EncryptionKeySection, IdentityDocument, LegacyDocument, ScryptSection,
    SigningKeySection, WrappedSecret, CURRENT_VERSION, MAC_SALT_LEN,
};
use crate::error::IdentityError;
use crate::identity::Identity;

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

impl Identity {
    /// Build the persisted document.
    ///
    /// Identities with a signing key produce the current shape; those
    /// without produce the legacy shape. Every call wraps the secrets under
    /// fresh `macSalt`s and nonces, so two documents of the same identity
    /// differ byte for byte.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::Crypto` if the CSPRNG or a seal fails.
    pub fn to_document(&self) -> Result<IdentityDocument, IdentityError> {
        match &self.signing_key {
            Some(signing_key) => Ok(IdentityDocument::Current(
                self.to_current_document(signing_key)?,
            )),
            None => {
                tracing::debug!(
                    identifier = %self.identifier,
                    "no signing key, writing legacy document"
                );
                Ok(IdentityDocument::Legacy(self.to_legacy_document()?))
            }
        }
    }

    /// [`Identity::to_document`] as a JSON value.
    ///
    /// # Errors
    ///
    /// See [`Identity::to_document`].
    pub fn to_json(&self) -> Result<Value, IdentityError> {
        self.to_document()?.to_value()
    }

    /// Legacy document regardless of whether a signing key exists. The
    /// signing key, if any, is not written.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::Crypto` if sealing the secret fails.
    pub fn to_legacy_document(&self) -> Result<LegacyDocument, IdentityError> {
        let sealed = seal_secret(
            self.mac_key.expose(),
            self.encryption_key.secret(),
            &self.identifier,
        )?;
        Ok(LegacyDocument {
            scrypt_salt: self.scrypt_salt,
            scrypt_params: self.scrypt_params,
            public: self.encryption_key.public().clone(),
            sec: sealed,
            auth_hash: sha256(self.auth_key.expose()),
        })
    }

    fn to_current_document(&self, signing_key: &KeyPair) -> Result<CurrentDocument, IdentityError> {
        let enc_sec = wrap_secret(&self.mac_key, self.encryption_key.secret(), &self.identifier)?;
        let sign_sec = wrap_secret(&self.mac_key, signing_key.secret(), &self.identifier)?;
        Ok(CurrentDocument {
            scrypt: ScryptSection {
                salt: self.scrypt_salt,
                params: self.scrypt_params,
            },
            enc_key: EncryptionKeySection {
                mac_salt: enc_sec.mac_salt,
                public: self.encryption_key.public().clone(),
                sec: enc_sec,
            },
            signing_key: SigningKeySection {
                public: signing_key.public().clone(),
                sec: sign_sec,
            },
            auth_hash: sha256(self.auth_key.expose()),
            version: CURRENT_VERSION,
        })
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

impl Identity {
    /// Load an identity from a parsed document.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::InvalidPassword` if the password does not
    /// match `authHash`, `IdentityError::MalformedDocument` if an unwrapped
    /// secret does not match its public key, and `IdentityError::Crypto`
    /// for out-of-range scrypt parameters or a corrupt ciphertext.
    pub async fn from_document(
        password: &str,
        document: &IdentityDocument,
    ) -> Result<Self, IdentityError> {
        match document {
            IdentityDocument::Current(doc) => Self::from_current_document(password, doc).await,
            IdentityDocument::Legacy(doc) => Self::from_legacy_document(password, doc).await,
        }
    }

    /// Parse and load a JSON document of either version.
    ///
    /// # Errors
    ///
    /// See [`IdentityDocument::from_value`] and [`Identity::from_document`].
    pub async fn from_json(password: &str, value: Value) -> Result<Self, IdentityError> {
        let document = IdentityDocument::from_value(value)?;
        Self::from_document(password, &document).await
    }

    /// Load a version 2 document.
    ///
    /// # Errors
    ///
    /// See [`Identity::from_document`].
    pub async fn from_current_document(
        password: &str,
        document: &CurrentDocument,
    ) -> Result<Self, IdentityError> {
        let identifier = bound_identifier(&document.enc_key.sec.envelope)?;
        if bound_identifier(&document.signing_key.sec.envelope)? != identifier {
            return Err(IdentityError::MalformedDocument(
                "wrapped secrets are bound to different identifiers".into(),
            ));
        }
        let password = SecretBuffer::new(password.as_bytes())?;
        let doc = document.clone();

        let identity = run_blocking(move || {
            let derived = derive_and_check(
                &password,
                doc.scrypt.salt,
                &doc.scrypt.params,
                &doc.auth_hash,
            )?;
            let encryption_key =
                unwrap_pair(&derived.key, &doc.enc_key.sec, doc.enc_key.public)?;
            let signing_key =
                unwrap_pair(&derived.key, &doc.signing_key.sec, doc.signing_key.public)?;
            Ok(Self {
                identifier,
                encryption_key,
                signing_key: Some(signing_key),
                mac_key: derived.key,
                auth_key: derived.key2,
                scrypt_salt: derived.salt,
                scrypt_params: doc.scrypt.params,
                suite: CipherSuite::default().with_scrypt(doc.scrypt.params),
            })
        })
        .await?;

        tracing::info!(
            identifier = %identity.identifier,
            version = CURRENT_VERSION,
            "identity loaded"
        );
        Ok(identity)
    }

    /// Load a legacy document. The result has no signing key.
    ///
    /// # Errors
    ///
    /// See [`Identity::from_document`].
    pub async fn from_legacy_document(
        password: &str,
        document: &LegacyDocument,
    ) -> Result<Self, IdentityError> {
        let identifier = bound_identifier(&document.sec)?;
        let password = SecretBuffer::new(password.as_bytes())?;
        let doc = document.clone();

        let identity = run_blocking(move || {
            let derived = derive_and_check(
                &password,
                doc.scrypt_salt,
                &doc.scrypt_params,
                &doc.auth_hash,
            )?;
            let secret = open_secret(derived.key.expose(), &doc.sec)?;
            let encryption_key = KeyPair::from_parts(doc.public, secret)
                .map_err(|e| IdentityError::MalformedDocument(e.to_string()))?;
            Ok(Self {
                identifier,
                encryption_key,
                signing_key: None,
                mac_key: derived.key,
                auth_key: derived.key2,
                scrypt_salt: derived.salt,
                scrypt_params: doc.scrypt_params,
                suite: CipherSuite::default().with_scrypt(doc.scrypt_params),
            })
        })
        .await?;

        tracing::info!(identifier = %identity.identifier, "legacy identity loaded");
        Ok(identity)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn bound_identifier(envelope: &SymmetricEnvelope) -> Result<String, IdentityError> {
    if envelope.adata.is_empty() {
        return Err(IdentityError::MalformedDocument(
            "wrapped secret has no associated data".into(),
        ));
    }
    Ok(envelope.adata.clone())
}

fn derive_and_check(
    password: &SecretBuffer,
    salt: [u8; SCRYPT_SALT_LEN],
    params: &ScryptParams,
    expected: &[u8],
) -> Result<StrengthenedKey, IdentityError> {
    let derived = strengthen(password.expose(), Some(salt), params)?;
    if !constant_time_eq(&sha256(derived.key2.expose()), expected) {
        tracing::warn!("identity load rejected: password does not match authHash");
        return Err(IdentityError::InvalidPassword);
    }
    Ok(derived)
}

/// Key that seals one secret: `HMAC-SHA256(macKey, macSalt)`.
fn wrap_key(
    mac_key: &SecretBytes<DERIVED_KEY_LEN>,
    mac_salt: &[u8; MAC_SALT_LEN],
) -> SecretBytes<DERIVED_KEY_LEN> {
    hmac_sha256(mac_key.expose(), mac_salt)
}

fn wrap_secret(
    mac_key: &SecretBytes<DERIVED_KEY_LEN>,
    secret: &SecretKey,
    identifier: &str,
) -> Result<WrappedSecret, IdentityError> {
    let mut mac_salt = [0u8; MAC_SALT_LEN];
    OsRng
        .try_fill_bytes(&mut mac_salt)
        .map_err(|e| CryptoError::SecureMemory(format!("CSPRNG fill failed: {e}")))?;
    let key = wrap_key(mac_key, &mac_salt);
    let envelope = seal_secret(key.expose(), secret, identifier)?;
    Ok(WrappedSecret { mac_salt, envelope })
}

fn unwrap_pair(
    mac_key: &SecretBytes<DERIVED_KEY_LEN>,
    wrapped: &WrappedSecret,
    public: PublicKey,
) -> Result<KeyPair, IdentityError> {
    let key = wrap_key(mac_key, &wrapped.mac_salt);
    let secret = open_secret(key.expose(), &wrapped.envelope)?;
    KeyPair::from_parts(public, secret).map_err(|e| IdentityError::MalformedDocument(e.to_string()))
}

/// Seal the base64 text of `secret`'s scalar.
fn seal_secret(
    key: &[u8],
    secret: &SecretKey,
    identifier: &str,
) -> Result<SymmetricEnvelope, IdentityError> {
    let encoded = Zeroizing::new(b64::encode(secret.to_bytes().expose()));
    Ok(symmetric::encrypt(encoded.as_bytes(), key, identifier)?)
}

fn open_secret(key: &[u8], envelope: &SymmetricEnvelope) -> Result<SecretKey, IdentityError> {
    let plaintext = symmetric::decrypt(envelope, key)?;
    let mut raw = b64::decode("sec", plaintext.expose_str()?)?;
    let secret = SecretKey::from_bytes(&raw);
    raw.zeroize();
    secret.map_err(|e| IdentityError::MalformedDocument(format!("wrapped secret: {e}")))
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
