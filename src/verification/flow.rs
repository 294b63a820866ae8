//! Owner and token-scoped verification.

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::info;

use crate::audit::{AuditAction, AuditEntry, AuditLog};
use crate::commitment::{self, CommitmentKey};
use crate::documents::DocumentStore;
use crate::error::AttestorError;
use crate::identity;
use crate::tokens::TokenStore;

/// Result of an owner-authenticated verification.
#[derive(Debug, Clone)]
pub struct VerificationOutcome {
    pub verified: bool,
    pub document_id: String,
    pub document_name: String,
    pub timestamp: DateTime<Utc>,
}

/// Result of a token-scoped verification. Carries no document metadata.
#[derive(Debug, Clone)]
pub struct PublicVerificationOutcome {
    pub verified: bool,
    pub timestamp: DateTime<Utc>,
}

/// Runs both verification flows against the stores.
#[derive(Clone)]
pub struct VerificationFlow {
    documents: DocumentStore,
    tokens: TokenStore,
    audit: AuditLog,
    key: CommitmentKey,
}

impl VerificationFlow {
    pub fn new(
        documents: DocumentStore,
        tokens: TokenStore,
        audit: AuditLog,
        key: CommitmentKey,
    ) -> Self {
        Self {
            documents,
            tokens,
            audit,
            key,
        }
    }

    /// Owner-authenticated verification of re-submitted content.
    ///
    /// A mismatch is a normal outcome, not an error. Every attempt that
    /// reaches the comparison leaves exactly one audit entry, and an
    /// attempt by a non-owner leaves a failed `verify` entry before being
    /// refused.
    pub async fn verify_owned(
        &self,
        document_id: &str,
        requester_id: &str,
        content: &[u8],
    ) -> Result<VerificationOutcome, AttestorError> {
        identity::require_valid_id(document_id, "document")?;

        let document = self
            .documents
            .find_by_id(document_id)
            .await?
            .ok_or_else(|| AttestorError::NotFoundError("Document not found".to_string()))?;

        if !document.is_owned_by(requester_id) {
            self.audit
                .record(AuditEntry::new(
                    &document.id,
                    AuditAction::Verify,
                    Some(requester_id),
                    false,
                    json!({ "reason": "Unauthorized verification attempt" }),
                ))
                .await;
            return Err(AttestorError::ForbiddenError(
                "Access denied. You can only verify your own documents.".to_string(),
            ));
        }

        let digest = commitment::hash_content(content);
        let verified = commitment::verify(&digest, &self.key, &document.commitment)?;

        self.audit
            .record(AuditEntry::new(
                &document.id,
                AuditAction::Verify,
                Some(requester_id),
                verified,
                json!({
                    "filename": document.filename,
                    "verificationResult": verified,
                }),
            ))
            .await;

        info!(
            "Owner verification for document {}: {}",
            document.id,
            if verified { "match" } else { "mismatch" }
        );

        Ok(VerificationOutcome {
            verified,
            document_id: document.id,
            document_name: document.filename,
            timestamp: Utc::now(),
        })
    }

    /// Token-scoped verification for anonymous callers.
    ///
    /// Resolution order is fixed: token by secret, validity, document,
    /// atomic usage claim, then the comparison. One redemption is consumed
    /// by every attempt that reaches the comparison, match or not. An
    /// exhausted or unknown token consumes nothing.
    pub async fn verify_public(
        &self,
        secret: &str,
        content: &[u8],
    ) -> Result<PublicVerificationOutcome, AttestorError> {
        let token = self
            .tokens
            .find_by_secret(secret)
            .await?
            .ok_or(AttestorError::InvalidTokenError)?;

        if token.is_exhausted() {
            return Err(AttestorError::TokenExhaustedError {
                usage_count: token.usage_count,
                usage_limit: token.usage_limit,
            });
        }

        let document = self
            .documents
            .find_by_id(&token.document_id)
            .await?
            .ok_or_else(|| AttestorError::NotFoundError("Document not found".to_string()))?;

        // A concurrent claimant may have taken the last redemption since
        // the validity check above; the claim itself decides.
        let usage = self.tokens.record_usage(&token.id).await?.ok_or(
            AttestorError::TokenExhaustedError {
                usage_count: token.usage_limit,
                usage_limit: token.usage_limit,
            },
        )?;

        let digest = commitment::hash_content(content);
        let verified = commitment::verify(&digest, &self.key, &document.commitment)?;

        self.audit
            .record(AuditEntry::new(
                &document.id,
                AuditAction::VerifyPublic,
                None,
                verified,
                json!({
                    "filename": document.filename,
                    "verificationResult": verified,
                    "tokenId": token.id,
                    "usageCount": usage.usage_count,
                    "usageLimit": usage.usage_limit,
                }),
            ))
            .await;

        info!(
            "Public verification for document {} via token {}: {} ({}/{} uses)",
            document.id,
            token.id,
            if verified { "match" } else { "mismatch" },
            usage.usage_count,
            usage.usage_limit
        );

        Ok(PublicVerificationOutcome {
            verified,
            timestamp: Utc::now(),
        })
    }
}
