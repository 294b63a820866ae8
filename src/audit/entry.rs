//! Audit Entry Types

use crate::identity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The closed set of auditable actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    View,
    Verify,
    VerifyPublic,
    Update,
    Delete,
    Create,
    GenerateToken,
    DeleteToken,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::View => "view",
            AuditAction::Verify => "verify",
            AuditAction::VerifyPublic => "verify_public",
            AuditAction::Update => "update",
            AuditAction::Delete => "delete",
            AuditAction::Create => "create",
            AuditAction::GenerateToken => "generate_token",
            AuditAction::DeleteToken => "delete_token",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "view" => Some(AuditAction::View),
            "verify" => Some(AuditAction::Verify),
            "verify_public" => Some(AuditAction::VerifyPublic),
            "update" => Some(AuditAction::Update),
            "delete" => Some(AuditAction::Delete),
            "create" => Some(AuditAction::Create),
            "generate_token" => Some(AuditAction::GenerateToken),
            "delete_token" => Some(AuditAction::DeleteToken),
            _ => None,
        }
    }
}

/// One recorded operation against a document.
///
/// `user_id` is absent for anonymous token-scoped verifications. `details`
/// is a free-form JSON object whose shape varies by action.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: String,
    pub document_id: String,
    pub action: AuditAction,
    pub user_id: Option<String>,
    pub success: bool,
    pub details: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

impl AuditEntry {
    /// Creates an entry stamped with the current time.
    pub fn new(
        document_id: &str,
        action: AuditAction,
        user_id: Option<&str>,
        success: bool,
        details: serde_json::Value,
    ) -> Self {
        Self {
            id: identity::generate_id(),
            document_id: document_id.to_string(),
            action,
            user_id: user_id.map(|u| u.to_string()),
            success,
            details,
            timestamp: Utc::now(),
        }
    }
}
