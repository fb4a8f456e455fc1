//! Cryptographic core of vaultbox.
//!
//! This module provides:
//! - AES-256-GCM sealing and opening of secret values (`cipher`)
//! - The storable nonce + ciphertext + tag envelope and its hex
//!   wire encoding (`envelope`)
//! - Caller-owned 256-bit key handling (`keys`)

pub mod cipher;
pub mod envelope;
pub mod keys;

// Re-export the most commonly used items so callers can write:
//   use vaultbox::crypto::{seal, open, Envelope, VaultKey};
pub use cipher::{open, seal};
pub use envelope::{Envelope, ALGORITHM, NONCE_LEN, TAG_LEN};
pub use keys::{VaultKey, KEY_LEN};
