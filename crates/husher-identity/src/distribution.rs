//! Handing one fresh symmetric key to several recipients.
//!
//! The sender draws a random 256-bit key `K` (as base64 text), encrypts that
//! text to each recipient's public key with the sender's identifier as
//! associated data, and signs the text once. Every recipient gets the same
//! `K` and can check that it came from the sender.

use std::collections::BTreeMap;

use husher_crypto_core::{
    asymmetric, random_key, signing, DecryptionKey, EncryptionKey, Envelope, PublicKey,
    SecretBuffer, SecretKey, Signature,
};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::IdentityError;
use crate::identity::Identity;

/// Per-recipient envelopes plus the sender's signature over `K`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiRecipientBundle {
    pub keys: BTreeMap<String, Envelope>,
    pub signature: Signature,
}

impl Identity {
    /// Generate a key and encrypt it to every entry of `recipients`.
    ///
    /// An empty map yields an empty `keys` map with a valid signature.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::MissingSigningKey` for legacy identities,
    /// before any key is generated.
    pub fn generate_key_and_encrypt_to_public_keys(
        &self,
        recipients: &BTreeMap<String, PublicKey>,
    ) -> Result<MultiRecipientBundle, IdentityError> {
        let signing_key = self
            .signing_key
            .as_ref()
            .ok_or(IdentityError::MissingSigningKey)?;
        let key = Zeroizing::new(random_key()?);

        let keys = recipients
            .iter()
            .map(|(id, public)| {
                let envelope = asymmetric::encrypt(
                    key.as_bytes(),
                    EncryptionKey::Public(public),
                    &self.identifier,
                )?;
                Ok((id.clone(), envelope))
            })
            .collect::<Result<BTreeMap<_, _>, IdentityError>>()?;
        let signature = signing::sign(key.as_bytes(), signing_key.secret())?;

        tracing::info!(
            identifier = %self.identifier,
            recipients = keys.len(),
            "key distributed"
        );
        Ok(MultiRecipientBundle { keys, signature })
    }
}

impl MultiRecipientBundle {
    /// Recipient side: decrypt the entry for `recipient` and check the
    /// sender's signature over it. Returns `K` as base64 text.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::UnknownRecipient` if there is no entry,
    /// `IdentityError::Crypto` if it does not decrypt, and
    /// `IdentityError::InvalidSignature` if the signature does not verify.
    pub fn open(
        &self,
        recipient: &str,
        secret: &SecretKey,
        sender: &PublicKey,
    ) -> Result<SecretBuffer, IdentityError> {
        let envelope = self
            .keys
            .get(recipient)
            .ok_or_else(|| IdentityError::UnknownRecipient(recipient.to_owned()))?;
        let key = asymmetric::decrypt(envelope, DecryptionKey::Secret(secret))?;
        if !signing::verify(key.expose(), &self.signature, sender) {
            return Err(IdentityError::InvalidSignature);
        }
        Ok(key)
    }
}
