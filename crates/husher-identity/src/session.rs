//! In-process snapshot of an unlocked identity.
//!
//! A session carries everything an [`Identity`] holds, including the
//! derived keys, so it can be restored without the password and without
//! running scrypt again. It never leaves the process: it has no `Serialize`
//! impl and its `Debug` output shows public material only. Use a document
//! for anything that gets written out.

use std::fmt;

use husher_crypto_core::b64;
use husher_crypto_core::kdf::{DERIVED_KEY_LEN, SCRYPT_SALT_LEN};
use husher_crypto_core::{sha256, CipherSuite, KeyPair, ScryptParams, SecretBytes};

use crate::identity::Identity;

/// Snapshot produced by [`Identity::to_session`].
#[derive(Clone)]
pub struct IdentitySession {
    identifier: String,
    encryption_key: KeyPair,
    signing_key: Option<KeyPair>,
    mac_key: SecretBytes<DERIVED_KEY_LEN>,
    auth_key: SecretBytes<DERIVED_KEY_LEN>,
    scrypt_salt: [u8; SCRYPT_SALT_LEN],
    scrypt_params: ScryptParams,
    suite: CipherSuite,
}

impl IdentitySession {
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Same value as [`Identity::auth_hash`] on the identity it came from.
    #[must_use]
    pub fn auth_hash(&self) -> String {
        b64::encode(&sha256(self.auth_key.expose()))
    }
}

impl fmt::Debug for IdentitySession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentitySession")
            .field("identifier", &self.identifier)
            .field("encryption_key", &self.encryption_key.public())
            .field("signing_key", &self.signing_key.as_ref().map(KeyPair::public))
            .field("scrypt_params", &self.scrypt_params)
            .finish_non_exhaustive()
    }
}

impl Identity {
    /// Snapshot this identity, derived keys included.
    #[must_use]
    pub fn to_session(&self) -> IdentitySession {
        IdentitySession {
            identifier: self.identifier.clone(),
            encryption_key: self.encryption_key.clone(),
            signing_key: self.signing_key.clone(),
            mac_key: self.mac_key.clone(),
            auth_key: self.auth_key.clone(),
            scrypt_salt: self.scrypt_salt,
            scrypt_params: self.scrypt_params,
            suite: self.suite,
        }
    }

    /// Restore an identity from a snapshot. Runs no derivation.
    #[must_use]
    pub fn from_session(session: IdentitySession) -> Self {
        tracing::debug!(identifier = %session.identifier, "identity restored from session");
        Self {
            identifier: session.identifier,
            encryption_key: session.encryption_key,
            signing_key: session.signing_key,
            mac_key: session.mac_key,
            auth_key: session.auth_key,
            scrypt_salt: session.scrypt_salt,
            scrypt_params: session.scrypt_params,
            suite: session.suite,
        }
    }
}
