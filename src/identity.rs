//! Entity identifier generation and validation.
//!
//! Documents, tokens, and audit entries all carry 24-character hex
//! identifiers (96 random bits). Caller-supplied ids are checked against
//! this shape at the API boundary before they reach a storage query.

use crate::error::AttestorError;
use rand::rngs::OsRng;
use rand::RngCore;
use regex::Regex;
use std::sync::LazyLock;

const ENTITY_ID_BYTES: usize = 12;

static ENTITY_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-fA-F]{24}$").expect("valid entity id pattern"));

/// Generates a fresh 24-hex entity identifier.
pub fn generate_id() -> String {
    let mut bytes = [0u8; ENTITY_ID_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Checks whether a caller-supplied identifier has the 24-hex shape.
pub fn is_valid_id(id: &str) -> bool {
    ENTITY_ID_PATTERN.is_match(id)
}

/// Rejects malformed identifiers with a `BadRequestError` before any query
/// runs. `label` names the entity kind in the client-facing message.
pub fn require_valid_id(id: &str, label: &str) -> Result<(), AttestorError> {
    if is_valid_id(id) {
        Ok(())
    } else {
        Err(AttestorError::BadRequestError(format!(
            "Invalid {} ID format",
            label
        )))
    }
}
