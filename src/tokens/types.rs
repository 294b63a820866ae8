//! Verification Token Types

use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Redemptions granted when the issuer does not choose a limit.
pub const DEFAULT_USAGE_LIMIT: i64 = 5;

const SECRET_BYTES: usize = 16;

/// A bounded-use bearer credential scoped to one document.
///
/// The `secret` is what gets shared with third parties; the record id
/// alone never grants verification access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationToken {
    pub id: String,
    pub document_id: String,
    pub secret: String,
    pub created_by: String,
    pub usage_limit: i64,
    pub usage_count: i64,
    pub created_at: DateTime<Utc>,
}

impl VerificationToken {
    /// A token is valid while redemptions remain.
    pub fn is_valid(&self) -> bool {
        self.usage_count < self.usage_limit
    }

    /// Exhaustion is permanent: the counter only ever grows.
    pub fn is_exhausted(&self) -> bool {
        !self.is_valid()
    }

    /// Fresh 32-hex bearer secret (128 random bits).
    pub fn generate_secret() -> String {
        let mut bytes = [0u8; SECRET_BYTES];
        OsRng.fill_bytes(&mut bytes);
        hex::encode(bytes)
    }
}

/// Counter snapshot returned by an atomic usage claim.
#[derive(Debug, Clone, Copy)]
pub struct TokenUsage {
    pub usage_count: i64,
    pub usage_limit: i64,
}

/// A token paired with the title of its document, for owner listings.
#[derive(Debug, Clone)]
pub struct OwnedToken {
    pub token: VerificationToken,
    pub document_title: String,
}
