//! High-level record store operations.
//!
//! `RecordStore` plays the part of the external record store in the
//! seal-store-retrieve-open workflow: it persists envelopes verbatim
//! next to their sidecar metadata and knows nothing about keys or
//! plaintext.  Sealing and opening stay with the caller, so a
//! compromised store file never yields a secret.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::debug;

use crate::crypto::envelope::{Envelope, ALGORITHM};
use crate::errors::{Result, VaultError};

use super::format::{self, StoreSnapshot};
use super::record::{RecordMetadata, VaultRecord, VaultUser};

/// The main store handle.  Create one with `RecordStore::create` or
/// `RecordStore::open`, then use its methods to manage users and
/// records.
pub struct RecordStore {
    /// Path to the `.vrec` file on disk.
    path: PathBuf,

    /// Next user id to hand out.
    next_user_id: u64,

    /// In-memory map of user id -> user.
    users: HashMap<u64, VaultUser>,

    /// In-memory map of user id -> (title -> record).
    records: HashMap<u64, HashMap<String, VaultRecord>>,
}

impl RecordStore {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Create a brand-new store file at `path`.
    pub fn create(path: &Path) -> Result<Self> {
        if path.exists() {
            return Err(VaultError::StoreAlreadyExists(path.to_path_buf()));
        }

        let store = Self {
            path: path.to_path_buf(),
            next_user_id: 1,
            users: HashMap::new(),
            records: HashMap::new(),
        };

        // Persist the empty store to disk.
        store.save()?;

        Ok(store)
    }

    /// Open an existing store file, verifying its digest.
    pub fn open(path: &Path) -> Result<Self> {
        let snapshot = format::read_store(path)?;

        let users: HashMap<u64, VaultUser> = snapshot
            .users
            .into_iter()
            .map(|u| (u.user_id, u))
            .collect();

        let mut records: HashMap<u64, HashMap<String, VaultRecord>> = HashMap::new();
        for record in snapshot.records {
            // Cascade deletion means a record always has an owner; a
            // dangling reference can only come from a writer bug.
            if !users.contains_key(&record.user_id) {
                return Err(VaultError::InvalidStoreFormat(format!(
                    "record '{}' references unknown user id {}",
                    record.title, record.user_id
                )));
            }
            records
                .entry(record.user_id)
                .or_default()
                .insert(record.title.clone(), record);
        }

        debug!(
            users = users.len(),
            records = records.values().map(HashMap::len).sum::<usize>(),
            "opened record store"
        );

        Ok(Self {
            path: path.to_path_buf(),
            next_user_id: snapshot.next_user_id,
            users,
            records,
        })
    }

    // ------------------------------------------------------------------
    // User operations
    // ------------------------------------------------------------------

    /// Add a user and return the assigned id.
    pub fn add_user(&mut self, username: &str, email: &str) -> Result<u64> {
        if self.users.values().any(|u| u.username == username) {
            return Err(VaultError::UserAlreadyExists(username.to_string()));
        }

        let user_id = self.next_user_id;
        self.next_user_id += 1;

        self.users.insert(
            user_id,
            VaultUser {
                user_id,
                username: username.to_string(),
                email: email.to_string(),
                created_at: Utc::now(),
            },
        );

        debug!(user_id, username, "created vault user");
        Ok(user_id)
    }

    /// Look up a user by username.
    pub fn find_user(&self, username: &str) -> Option<&VaultUser> {
        self.users.values().find(|u| u.username == username)
    }

    /// Remove a user and every record they own.
    pub fn remove_user(&mut self, user_id: u64) -> Result<()> {
        if self.users.remove(&user_id).is_none() {
            return Err(VaultError::UserNotFound(user_id));
        }

        let dropped = self.records.remove(&user_id).map_or(0, |m| m.len());
        debug!(user_id, dropped, "removed user and cascade-deleted records");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Record operations
    // ------------------------------------------------------------------

    /// Store a sealed envelope under `(user_id, title)`.
    ///
    /// Inserts a new record or replaces the envelope of an existing
    /// one wholesale.  On replace the original `created_at` is
    /// preserved and `updated_at` is refreshed.  The envelope is
    /// stored in its hex form exactly as encoded, never normalized.
    pub fn put_record(
        &mut self,
        user_id: u64,
        title: &str,
        envelope: &Envelope,
        kind: &str,
        key_id: Option<&str>,
    ) -> Result<()> {
        if !self.users.contains_key(&user_id) {
            return Err(VaultError::UserNotFound(user_id));
        }

        let now = Utc::now();
        let user_records = self.records.entry(user_id).or_default();

        // If the record already exists, preserve the original created_at.
        let created_at = user_records
            .get(title)
            .map_or(now, |existing| existing.created_at);

        let record = VaultRecord {
            user_id,
            title: title.to_string(),
            envelope: envelope.to_hex(),
            kind: kind.to_string(),
            algorithm: ALGORITHM.to_string(),
            key_id: key_id.map(str::to_string),
            created_at,
            updated_at: now,
        };

        let replaced = user_records.insert(title.to_string(), record).is_some();
        debug!(user_id, title, replaced, "stored vault record");
        Ok(())
    }

    /// Fetch a record by owner and title.
    pub fn record(&self, user_id: u64, title: &str) -> Result<&VaultRecord> {
        if !self.users.contains_key(&user_id) {
            return Err(VaultError::UserNotFound(user_id));
        }
        self.records
            .get(&user_id)
            .and_then(|m| m.get(title))
            .ok_or_else(|| VaultError::RecordNotFound(title.to_string()))
    }

    /// Decode a record's stored envelope back into an [`Envelope`].
    ///
    /// Structural checks run again on the stored string, so storage
    /// corruption that breaks the envelope shape surfaces here as
    /// `MalformedEnvelope` rather than at decryption time.
    pub fn envelope(&self, user_id: u64, title: &str) -> Result<Envelope> {
        let record = self.record(user_id, title)?;
        Envelope::from_hex(&record.envelope)
    }

    /// Remove a record.
    pub fn delete_record(&mut self, user_id: u64, title: &str) -> Result<()> {
        if !self.users.contains_key(&user_id) {
            return Err(VaultError::UserNotFound(user_id));
        }
        let removed = self
            .records
            .get_mut(&user_id)
            .and_then(|m| m.remove(title));
        if removed.is_none() {
            return Err(VaultError::RecordNotFound(title.to_string()));
        }
        debug!(user_id, title, "deleted vault record");
        Ok(())
    }

    /// List metadata for a user's records, sorted by title.
    ///
    /// This is a metadata-only view; no envelope contents are touched.
    pub fn list_records(&self, user_id: u64) -> Result<Vec<RecordMetadata>> {
        if !self.users.contains_key(&user_id) {
            return Err(VaultError::UserNotFound(user_id));
        }

        let mut list: Vec<RecordMetadata> = self
            .records
            .get(&user_id)
            .map(|m| {
                m.values()
                    .map(|r| RecordMetadata {
                        title: r.title.clone(),
                        kind: r.kind.clone(),
                        algorithm: r.algorithm.clone(),
                        key_id: r.key_id.clone(),
                        created_at: r.created_at,
                        updated_at: r.updated_at,
                    })
                    .collect()
            })
            .unwrap_or_default();

        list.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(list)
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Serialize the store and write it to disk atomically.
    ///
    /// Users and records are sorted for deterministic output before
    /// the digest is computed.
    pub fn save(&self) -> Result<()> {
        let mut users: Vec<VaultUser> = self.users.values().cloned().collect();
        users.sort_by_key(|u| u.user_id);

        let mut records: Vec<VaultRecord> = self
            .records
            .values()
            .flat_map(|m| m.values().cloned())
            .collect();
        records.sort_by(|a, b| {
            (a.user_id, a.title.as_str()).cmp(&(b.user_id, b.title.as_str()))
        });

        let snapshot = StoreSnapshot {
            next_user_id: self.next_user_id,
            users,
            records,
        };

        format::write_store(&self.path, &snapshot)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Returns the path to the store file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the number of users in the store.
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Returns the number of records owned by a user.
    pub fn record_count(&self, user_id: u64) -> usize {
        self.records.get(&user_id).map_or(0, HashMap::len)
    }
}
