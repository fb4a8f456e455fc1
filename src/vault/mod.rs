//! Vault record storage.
//!
//! This module provides:
//! - Record and user types with sidecar metadata (`record`)
//! - The binary store file format and digest verification (`format`)
//! - High-level store operations (`store`)

pub mod format;
pub mod record;
pub mod store;

pub use record::{RecordMetadata, VaultRecord, VaultUser};
pub use store::RecordStore;
