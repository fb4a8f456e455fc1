//! The storable envelope produced by sealing a plaintext.
//!
//! Layout of the envelope bytes:
//!
//! ```text
//! [ 12-byte nonce | ciphertext + 16-byte auth tag ]
//! ```
//!
//! For storage the envelope is a single hex string: lowercase on
//! encode, case-insensitive on decode.  The first 24 hex characters
//! are the nonce, the rest is the ciphertext with the tag at the end.
//! An envelope is immutable once created; replacing a stored value
//! means sealing a new envelope and swapping it in wholesale.

use crate::errors::{Result, VaultError};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// Smallest possible envelope: a nonce plus a tag-only ciphertext
/// (the sealing of an empty plaintext).
const MIN_LEN: usize = NONCE_LEN + TAG_LEN;

/// Algorithm identifier recorded in sidecar metadata.
pub const ALGORITHM: &str = "AES-256-GCM";

/// A sealed secret: nonce followed by ciphertext and tag.
///
/// Structural validity (hex decodes, length at least nonce + tag) is
/// enforced at construction.  Cryptographic validity is only known
/// once [`open`](super::cipher::open) verifies the tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    bytes: Vec<u8>,
}

impl Envelope {
    /// Assemble an envelope from a freshly generated nonce and the
    /// cipher output.  Only the sealing path constructs envelopes
    /// this way, so no length check is needed.
    pub(crate) fn from_parts(nonce: &[u8], ciphertext_and_tag: &[u8]) -> Self {
        let mut bytes = Vec::with_capacity(nonce.len() + ciphertext_and_tag.len());
        bytes.extend_from_slice(nonce);
        bytes.extend_from_slice(ciphertext_and_tag);
        Self { bytes }
    }

    /// Build an envelope from raw bytes, checking the length invariant.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        if bytes.len() < MIN_LEN {
            return Err(VaultError::MalformedEnvelope(format!(
                "envelope is {} bytes, minimum is {MIN_LEN} (nonce + tag)",
                bytes.len()
            )));
        }
        Ok(Self { bytes })
    }

    /// Decode an envelope from its hex storage form.
    ///
    /// Rejects non-hex characters, odd-length strings, and anything
    /// shorter than a nonce plus a tag.  All of these are structural
    /// failures reported before any decryption is attempted.
    pub fn from_hex(encoded: &str) -> Result<Self> {
        let bytes = hex::decode(encoded)
            .map_err(|e| VaultError::MalformedEnvelope(format!("invalid hex: {e}")))?;
        Self::from_bytes(bytes)
    }

    /// Encode the envelope for storage as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// The raw envelope bytes (nonce || ciphertext || tag).
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The 12-byte nonce this envelope was sealed under.
    pub fn nonce(&self) -> &[u8] {
        &self.bytes[..NONCE_LEN]
    }

    /// Split into (nonce, ciphertext + tag) for decryption.
    pub(crate) fn split(&self) -> (&[u8], &[u8]) {
        self.bytes.split_at(NONCE_LEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_roundtrip_preserves_bytes() {
        let bytes: Vec<u8> = (0u8..40).collect();
        let envelope = Envelope::from_bytes(bytes.clone()).unwrap();
        let decoded = Envelope::from_hex(&envelope.to_hex()).unwrap();
        assert_eq!(decoded.as_bytes(), &bytes[..]);
    }

    #[test]
    fn encoding_is_lowercase() {
        let envelope = Envelope::from_bytes(vec![0xAB; 30]).unwrap();
        assert_eq!(envelope.to_hex(), "ab".repeat(30));
    }

    #[test]
    fn decoding_accepts_uppercase() {
        let envelope = Envelope::from_hex(&"AB".repeat(30)).unwrap();
        assert_eq!(envelope.as_bytes(), &[0xAB; 30][..]);
    }

    #[test]
    fn rejects_non_hex_input() {
        let result = Envelope::from_hex(&"zz".repeat(20));
        assert!(matches!(result, Err(VaultError::MalformedEnvelope(_))));
    }

    #[test]
    fn rejects_odd_length_input() {
        let result = Envelope::from_hex(&"a".repeat(57));
        assert!(matches!(result, Err(VaultError::MalformedEnvelope(_))));
    }

    #[test]
    fn rejects_short_envelope() {
        // 27 bytes is one short of the nonce + tag minimum.
        let result = Envelope::from_hex(&"00".repeat(27));
        assert!(matches!(result, Err(VaultError::MalformedEnvelope(_))));
    }
}
