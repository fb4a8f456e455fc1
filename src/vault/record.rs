//! VaultRecord, VaultUser and RecordMetadata types stored in a record
//! store.
//!
//! A record holds its owner, title, the sealed envelope as a hex
//! string, and sidecar metadata (record kind, algorithm identifier,
//! optional key label, timestamps).  The metadata lives beside the
//! envelope, never inside it, and is not covered by the envelope's
//! authentication tag.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A user who owns vault records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultUser {
    /// Store-assigned numeric id.
    pub user_id: u64,

    /// Unique username (e.g. "vaultuser").
    pub username: String,

    pub email: String,

    pub created_at: DateTime<Utc>,
}

/// A single vault record: one sealed secret plus its metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultRecord {
    /// Id of the owning user.
    pub user_id: u64,

    /// Record title, unique per user (e.g. "Bank Login").
    pub title: String,

    /// The sealed envelope in its hex storage form, kept verbatim:
    /// the store never normalizes, trims, or re-encodes it.
    pub envelope: String,

    /// Free-form record kind (e.g. "password", "login", "note").
    pub kind: String,

    /// Algorithm identifier for the envelope, currently always
    /// "AES-256-GCM".
    pub algorithm: String,

    /// Opaque label identifying which key sealed the envelope.
    /// Never the key itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_id: Option<String>,

    /// When this record was first created.  Preserved when the
    /// envelope is replaced.
    pub created_at: DateTime<Utc>,

    /// When the envelope was last replaced.
    pub updated_at: DateTime<Utc>,
}

impl VaultRecord {
    /// SHA-256 of the stored envelope string, hex-encoded.
    ///
    /// Lets callers prove the store round-trips envelopes
    /// byte-for-byte: equal checksums before a save and after a
    /// reload mean no silent mutation happened in between.
    pub fn checksum(&self) -> String {
        hex::encode(Sha256::digest(self.envelope.as_bytes()))
    }
}

/// Lightweight metadata about a record (no envelope contents).
///
/// Returned by `RecordStore::list_records` so callers can display
/// titles and timestamps without touching any ciphertext.
#[derive(Debug, Clone)]
pub struct RecordMetadata {
    pub title: String,
    pub kind: String,
    pub algorithm: String,
    pub key_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
