//! Off-runtime execution of CPU-bound work.
//!
//! scrypt at the default cost and P-384 key generation take long enough to
//! stall an async executor, so every constructor of an identity funnels its
//! work through [`run_blocking`]. The password is moved into the blocking
//! task inside a [`SecretBuffer`] and zeroized when the task ends.

use husher_crypto_core::kdf::SCRYPT_SALT_LEN;
use husher_crypto_core::{strengthen, ScryptParams, SecretBuffer, StrengthenedKey};

use crate::error::IdentityError;

/// Run `work` on the blocking thread pool and wait for it.
///
/// # Errors
///
/// Returns whatever `work` returns, or `IdentityError::DerivationTask` if
/// the task panicked or the runtime shut down under it.
pub(crate) async fn run_blocking<T, F>(work: F) -> Result<T, IdentityError>
where
    F: FnOnce() -> Result<T, IdentityError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| IdentityError::DerivationTask(e.to_string()))?
}

/// Strengthen `password` without blocking the calling task.
///
/// Same output as [`husher_crypto_core::strengthen`] for the same inputs.
///
/// # Errors
///
/// Returns `IdentityError::Crypto` for invalid parameters or a failed
/// derivation and `IdentityError::DerivationTask` if the task is lost.
pub async fn strengthen_async(
    password: &str,
    salt: Option<[u8; SCRYPT_SALT_LEN]>,
    params: ScryptParams,
) -> Result<StrengthenedKey, IdentityError> {
    let password = SecretBuffer::new(password.as_bytes())?;
    run_blocking(move || Ok(strengthen(password.expose(), salt, &params)?)).await
}
