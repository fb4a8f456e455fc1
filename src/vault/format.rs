//! Binary store file format and digest verification.
//!
//! A `.vrec` store file has this layout:
//!
//! ```text
//! [VREC: 4 bytes][version: 1 byte][snapshot JSON][SHA-256: 32 bytes]
//! ```
//!
//! - **Magic** (`VREC`): identifies the file as a vaultbox record store.
//! - **Version**: format version (currently `1`).
//! - **Snapshot JSON**: serialized `StoreSnapshot` (users + records).
//! - **SHA-256**: 32-byte digest computed over the snapshot bytes.
//!
//! The digest is keyless: the store holds no plaintext secrets, so it
//! only needs to catch accidental corruption of the file.  Content
//! tampering with an individual envelope is still caught
//! cryptographically when the envelope is opened.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tracing::warn;

use super::record::{VaultRecord, VaultUser};
use crate::errors::{Result, VaultError};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Magic bytes at the start of every store file.
const MAGIC: &[u8; 4] = b"VREC";

/// Current binary format version.
pub const CURRENT_VERSION: u8 = 1;

/// Size of the digest appended to the file (SHA-256 = 32 bytes).
const DIGEST_LEN: usize = 32;

/// Fixed-size prefix: 4 (magic) + 1 (version).
const PREFIX_LEN: usize = 5;

// ---------------------------------------------------------------------------
// StoreSnapshot
// ---------------------------------------------------------------------------

/// Everything a record store persists, as one serializable unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// Next user id to hand out.
    pub next_user_id: u64,

    pub users: Vec<VaultUser>,

    /// All records across all users.  Envelope strings are carried
    /// verbatim through serialization.
    pub records: Vec<VaultRecord>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Write a store file to disk **atomically**.
///
/// 1. Serialize the snapshot to JSON.
/// 2. Compute SHA-256 over the snapshot bytes.
/// 3. Write to a temp file in the same directory.
/// 4. Rename temp file over the target path.
///
/// The rename ensures readers never see a half-written file.
pub fn write_store(path: &Path, snapshot: &StoreSnapshot) -> Result<()> {
    let body = serde_json::to_vec(snapshot)
        .map_err(|e| VaultError::Serialization(format!("snapshot: {e}")))?;

    let digest = Sha256::digest(&body);

    let mut buf = Vec::with_capacity(PREFIX_LEN + body.len() + DIGEST_LEN);
    buf.extend_from_slice(MAGIC); // 4 bytes
    buf.push(CURRENT_VERSION); // 1 byte
    buf.extend_from_slice(&body); // snapshot JSON
    buf.extend_from_slice(&digest); // 32 bytes

    // Atomic write: write to a temp file, then rename.  The temp file
    // is in the same directory so the rename stays on one filesystem.
    let parent = path.parent().unwrap_or(Path::new("."));
    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    fs::write(&tmp_path, &buf)?;
    fs::rename(&tmp_path, path)?;

    Ok(())
}

/// Read a store file from disk and verify its digest.
///
/// The digest is checked over the exact snapshot bytes read from disk,
/// before deserialization, using a constant-time comparison.
pub fn read_store(path: &Path) -> Result<StoreSnapshot> {
    if !path.exists() {
        return Err(VaultError::StoreNotFound(path.to_path_buf()));
    }

    let data = fs::read(path)?;

    // Minimum size: prefix + digest.
    if data.len() < PREFIX_LEN + DIGEST_LEN {
        return Err(VaultError::InvalidStoreFormat(
            "file too small to be a valid store".into(),
        ));
    }

    // --- Parse the fixed-size prefix ---

    if &data[0..4] != MAGIC {
        return Err(VaultError::InvalidStoreFormat(
            "missing VREC magic bytes".into(),
        ));
    }

    let version = data[4];
    if version != CURRENT_VERSION {
        return Err(VaultError::InvalidStoreFormat(format!(
            "unsupported version {version}, expected {CURRENT_VERSION}"
        )));
    }

    // --- Verify the digest over the raw snapshot bytes ---

    let body_end = data.len() - DIGEST_LEN;
    let body = &data[PREFIX_LEN..body_end];
    let stored_digest = &data[body_end..];

    let computed = Sha256::digest(body);
    if !bool::from(computed.as_slice().ct_eq(stored_digest)) {
        warn!(path = %path.display(), "store digest mismatch");
        return Err(VaultError::ChecksumMismatch);
    }

    serde_json::from_slice(body)
        .map_err(|e| VaultError::InvalidStoreFormat(format!("snapshot JSON: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn empty_snapshot() -> StoreSnapshot {
        StoreSnapshot {
            next_user_id: 1,
            users: Vec::new(),
            records: Vec::new(),
        }
    }

    #[test]
    fn write_then_read_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.vrec");

        write_store(&path, &empty_snapshot()).unwrap();
        let snapshot = read_store(&path).unwrap();
        assert_eq!(snapshot.next_user_id, 1);
        assert!(snapshot.users.is_empty());
    }

    #[test]
    fn flipped_body_byte_fails_digest_check() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.vrec");
        write_store(&path, &empty_snapshot()).unwrap();

        let mut data = fs::read(&path).unwrap();
        let mid = data.len() / 2;
        data[mid] ^= 0xFF;
        fs::write(&path, &data).unwrap();

        let result = read_store(&path);
        assert!(matches!(result, Err(VaultError::ChecksumMismatch)));
    }

    #[test]
    fn wrong_magic_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.vrec");
        write_store(&path, &empty_snapshot()).unwrap();

        let mut data = fs::read(&path).unwrap();
        data[0] = b'X';
        fs::write(&path, &data).unwrap();

        let result = read_store(&path);
        assert!(matches!(result, Err(VaultError::InvalidStoreFormat(_))));
    }

    #[test]
    fn unknown_version_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.vrec");
        write_store(&path, &empty_snapshot()).unwrap();

        let mut data = fs::read(&path).unwrap();
        data[4] = 99;
        fs::write(&path, &data).unwrap();

        let result = read_store(&path);
        assert!(matches!(result, Err(VaultError::InvalidStoreFormat(_))));
    }
}
