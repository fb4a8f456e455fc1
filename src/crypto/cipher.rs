//! AES-256-GCM sealing and opening.
//!
//! Each call to `seal` generates a fresh random 12-byte nonce and
//! bundles it with the cipher output into an [`Envelope`].  `open`
//! splits the nonce back out, decrypts, and verifies the tag before
//! releasing any plaintext.
//!
//! Both calls are pure, stateless transforms: no session state is
//! held between them, and concurrent calls with different keys or
//! envelopes are fully independent.

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};

use crate::errors::{Result, VaultError};

use super::envelope::Envelope;
use super::keys::VaultKey;

/// Seal `plaintext` under `key`.
///
/// Generates a random nonce, encrypts and authenticates the
/// plaintext (no associated data), and returns the envelope.  The
/// envelope is always exactly 12 + plaintext length + 16 bytes, and
/// two seals of the same plaintext differ because of the fresh nonce.
pub fn seal(key: &VaultKey, plaintext: &[u8]) -> Result<Envelope> {
    // Build the cipher from the raw key bytes.  A `VaultKey` is
    // 32 bytes by construction, so this cannot fail in practice.
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| VaultError::SealFailure(format!("invalid key length: {e}")))?;

    // Generate a random 12-byte nonce.  Never caller-supplied: nonce
    // reuse under the same key breaks GCM confidentiality.
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    // Encrypt and authenticate the plaintext.
    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| VaultError::SealFailure(format!("encryption error: {e}")))?;

    Ok(Envelope::from_parts(&nonce, &ciphertext))
}

/// Open an envelope that was produced by `seal`.
///
/// Verifies the authentication tag before any plaintext is released.
/// A wrong key, a flipped bit anywhere in the ciphertext or tag, or
/// corruption that preserves the envelope structure all fail with
/// [`VaultError::AuthenticationFailed`]; partial plaintext is never
/// returned.  On success the plaintext is byte-identical to what was
/// sealed.
pub fn open(key: &VaultKey, envelope: &Envelope) -> Result<Vec<u8>> {
    // Split nonce from ciphertext.  The envelope's length invariant
    // guarantees both parts are present.
    let (nonce_bytes, ciphertext) = envelope.split();
    let nonce = Nonce::from_slice(nonce_bytes);

    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|_| VaultError::AuthenticationFailed)?;

    // Decrypt and verify the auth tag.
    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| VaultError::AuthenticationFailed)
}
