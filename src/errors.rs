use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in vaultbox.
#[derive(Debug, Error)]
pub enum VaultError {
    // --- Cipher errors ---
    #[error("Invalid key length: expected 32 bytes, got {0}")]
    InvalidKeyLength(usize),

    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    #[error("Authentication failed: wrong key or tampered ciphertext")]
    AuthenticationFailed,

    #[error("Encryption failed: {0}")]
    SealFailure(String),

    // --- Store errors ---
    #[error("Record store not found at {0}")]
    StoreNotFound(PathBuf),

    #[error("Record store already exists at {0}")]
    StoreAlreadyExists(PathBuf),

    #[error("Invalid store format: {0}")]
    InvalidStoreFormat(String),

    #[error("Store digest mismatch: file may be corrupted")]
    ChecksumMismatch,

    #[error("User id {0} not found")]
    UserNotFound(u64),

    #[error("User '{0}' already exists")]
    UserAlreadyExists(String),

    #[error("Record '{0}' not found")]
    RecordNotFound(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Convenience type alias for vaultbox results.
pub type Result<T> = std::result::Result<T, VaultError>;
