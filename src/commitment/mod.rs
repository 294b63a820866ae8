//! Keyed content commitments.
//!
//! A document is committed to by hashing its raw bytes with SHA-256 and
//! binding the digest under HMAC-SHA256 with a process-wide secret key.
//! Only the commitment is persisted; reproducing it requires both the key
//! and the original bytes. Verification recomputes and compares in
//! constant time.

use crate::error::AttestorError;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use std::fmt;

type HmacSha256 = Hmac<Sha256>;

/// Process-wide commitment key. Raw key material is private to this
/// module and the Debug form is redacted.
#[derive(Clone)]
pub struct CommitmentKey(Vec<u8>);

impl CommitmentKey {
    pub fn new(secret: &str) -> Self {
        Self(secret.as_bytes().to_vec())
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for CommitmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CommitmentKey(<redacted>)")
    }
}

/// SHA-256 digest of raw content, as 64 lowercase hex characters.
pub fn hash_content(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}

/// Binds a content digest under the commitment key with HMAC-SHA256.
pub fn commit(digest: &str, key: &CommitmentKey) -> Result<String, AttestorError> {
    let mut mac = HmacSha256::new_from_slice(key.as_bytes())
        .map_err(|e| AttestorError::CryptoError(format!("Failed to create HMAC instance: {}", e)))?;

    mac.update(digest.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Recomputes the commitment for `digest` and checks it against the stored
/// value in constant time. A stored value that is not valid hex can never
/// match.
pub fn verify(digest: &str, key: &CommitmentKey, commitment: &str) -> Result<bool, AttestorError> {
    let mut mac = HmacSha256::new_from_slice(key.as_bytes())
        .map_err(|e| AttestorError::CryptoError(format!("Failed to create HMAC instance: {}", e)))?;

    mac.update(digest.as_bytes());

    let commitment_bytes = match hex::decode(commitment) {
        Ok(bytes) => bytes,
        Err(_) => return Ok(false),
    };

    match mac.verify_slice(&commitment_bytes) {
        Ok(()) => Ok(true),
        Err(_) => Ok(false),
    }
}

/// Abbreviated form for display: first and last ten characters.
pub fn preview(commitment: &str) -> String {
    if commitment.len() <= 20 {
        return commitment.to_string();
    }
    format!(
        "{}...{}",
        &commitment[..10],
        &commitment[commitment.len() - 10..]
    )
}
