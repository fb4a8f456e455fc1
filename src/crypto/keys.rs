//! Caller-owned 256-bit keys.
//!
//! The key lifecycle lives entirely with the caller: vaultbox
//! generates fresh random keys on request and otherwise treats them
//! as opaque.  Keys are never serialized, never logged, and never
//! written into an envelope or a record store.

use aes_gcm::aead::{KeyInit, OsRng};
use aes_gcm::Aes256Gcm;
use zeroize::Zeroize;

use crate::errors::{Result, VaultError};

/// Length of a vault key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// A 256-bit secret key that automatically zeroes its memory when
/// dropped, so key material cannot linger after it is no longer
/// needed.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct VaultKey {
    bytes: [u8; KEY_LEN],
}

impl VaultKey {
    /// Generate a fresh random key from the OS secure random source.
    pub fn generate() -> Self {
        let generated = Aes256Gcm::generate_key(&mut OsRng);
        let mut bytes = [0u8; KEY_LEN];
        bytes.copy_from_slice(&generated);
        Self { bytes }
    }

    /// Build a key from raw bytes supplied by the caller.
    ///
    /// The slice must be exactly 32 bytes; anything else is a caller
    /// bug and is rejected up front.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != KEY_LEN {
            return Err(VaultError::InvalidKeyLength(bytes.len()));
        }
        let mut key = [0u8; KEY_LEN];
        key.copy_from_slice(bytes);
        Ok(Self { bytes: key })
    }

    /// Access the raw key bytes (e.g. to build the cipher).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}
