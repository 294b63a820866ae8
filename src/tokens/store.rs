//! Database-backed verification token store.

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use tracing::info;

use crate::error::AttestorError;
use crate::identity;
use crate::tokens::types::{OwnedToken, TokenUsage, VerificationToken, DEFAULT_USAGE_LIMIT};

#[derive(Clone)]
pub struct TokenStore {
    pool: SqlitePool,
}

impl TokenStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Issues a fresh token for a document.
    ///
    /// A `usage_limit` of `None` falls back to [`DEFAULT_USAGE_LIMIT`];
    /// an explicit non-positive value is rejected.
    pub async fn issue(
        &self,
        document_id: &str,
        created_by: &str,
        usage_limit: Option<i64>,
    ) -> Result<VerificationToken, AttestorError> {
        let usage_limit = match usage_limit {
            Some(limit) if limit < 1 => {
                return Err(AttestorError::BadRequestError(
                    "Usage limit must be a positive integer".to_string(),
                ))
            }
            Some(limit) => limit,
            None => DEFAULT_USAGE_LIMIT,
        };

        let token = VerificationToken {
            id: identity::generate_id(),
            document_id: document_id.to_string(),
            secret: VerificationToken::generate_secret(),
            created_by: created_by.to_string(),
            usage_limit,
            usage_count: 0,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO verification_tokens
            (id, document_id, secret, created_by, usage_limit, usage_count, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&token.id)
        .bind(&token.document_id)
        .bind(&token.secret)
        .bind(&token.created_by)
        .bind(token.usage_limit)
        .bind(token.usage_count)
        .bind(token.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AttestorError::StorageError(format!("Failed to issue token: {}", e)))?;

        info!(
            "Issued verification token {} for document {} (limit {})",
            token.id, document_id, token.usage_limit
        );
        Ok(token)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<VerificationToken>, AttestorError> {
        let row = sqlx::query(
            r#"
            SELECT id, document_id, secret, created_by, usage_limit, usage_count, created_at
            FROM verification_tokens
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AttestorError::StorageError(format!("Failed to fetch token: {}", e)))?;

        row.map(|r| Self::token_from_row(&r)).transpose()
    }

    /// Looks a token up by its bearer secret.
    pub async fn find_by_secret(
        &self,
        secret: &str,
    ) -> Result<Option<VerificationToken>, AttestorError> {
        let row = sqlx::query(
            r#"
            SELECT id, document_id, secret, created_by, usage_limit, usage_count, created_at
            FROM verification_tokens
            WHERE secret = ?
            "#,
        )
        .bind(secret)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AttestorError::StorageError(format!("Failed to fetch token: {}", e)))?;

        row.map(|r| Self::token_from_row(&r)).transpose()
    }

    /// Tokens issued against one document, newest first.
    pub async fn list_for_document(
        &self,
        document_id: &str,
    ) -> Result<Vec<VerificationToken>, AttestorError> {
        let rows = sqlx::query(
            r#"
            SELECT id, document_id, secret, created_by, usage_limit, usage_count, created_at
            FROM verification_tokens
            WHERE document_id = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(document_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AttestorError::StorageError(format!("Failed to list tokens: {}", e)))?;

        rows.iter().map(Self::token_from_row).collect()
    }

    /// Tokens across every document a user owns, newest first, each
    /// paired with its document title.
    pub async fn list_for_owner(&self, owner_id: &str) -> Result<Vec<OwnedToken>, AttestorError> {
        let rows = sqlx::query(
            r#"
            SELECT t.id, t.document_id, t.secret, t.created_by,
                   t.usage_limit, t.usage_count, t.created_at,
                   d.title AS document_title
            FROM verification_tokens t
            JOIN documents d ON d.id = t.document_id
            WHERE d.owner_id = ?
            ORDER BY t.created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AttestorError::StorageError(format!("Failed to list tokens: {}", e)))?;

        rows.iter()
            .map(|row| {
                Ok(OwnedToken {
                    token: Self::token_from_row(row)?,
                    document_title: row.get::<String, _>("document_title"),
                })
            })
            .collect()
    }

    /// Atomically claims one redemption.
    ///
    /// The conditional update and the increment happen in a single
    /// statement, so two racing claims can never both take the last
    /// redemption. Returns the fresh counters, or `None` when the token
    /// was already exhausted (in which case nothing changed).
    pub async fn record_usage(&self, token_id: &str) -> Result<Option<TokenUsage>, AttestorError> {
        let row = sqlx::query(
            r#"
            UPDATE verification_tokens
            SET usage_count = usage_count + 1
            WHERE id = ? AND usage_count < usage_limit
            RETURNING usage_count, usage_limit
            "#,
        )
        .bind(token_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AttestorError::StorageError(format!("Failed to record token usage: {}", e)))?;

        Ok(row.map(|r| TokenUsage {
            usage_count: r.get::<i64, _>("usage_count"),
            usage_limit: r.get::<i64, _>("usage_limit"),
        }))
    }

    /// Deletes a token on behalf of the owning document's owner.
    ///
    /// Returns the deleted record so callers can still reference its
    /// document. A token whose document has since been deleted has no
    /// owner left to authorize against, so it stays refused.
    pub async fn revoke(
        &self,
        token_id: &str,
        requester_id: &str,
    ) -> Result<VerificationToken, AttestorError> {
        let row = sqlx::query(
            r#"
            SELECT t.id, t.document_id, t.secret, t.created_by,
                   t.usage_limit, t.usage_count, t.created_at,
                   d.owner_id AS document_owner
            FROM verification_tokens t
            LEFT JOIN documents d ON d.id = t.document_id
            WHERE t.id = ?
            "#,
        )
        .bind(token_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AttestorError::StorageError(format!("Failed to fetch token: {}", e)))?
        .ok_or_else(|| AttestorError::NotFoundError("Token not found".to_string()))?;

        let token = Self::token_from_row(&row)?;
        let document_owner = row.get::<Option<String>, _>("document_owner");
        if document_owner.as_deref() != Some(requester_id) {
            return Err(AttestorError::ForbiddenError(
                "Access denied. You can only delete tokens for your documents".to_string(),
            ));
        }

        sqlx::query("DELETE FROM verification_tokens WHERE id = ?")
            .bind(token_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AttestorError::StorageError(format!("Failed to delete token: {}", e)))?;

        info!("Revoked verification token {}", token_id);
        Ok(token)
    }

    fn token_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<VerificationToken, AttestorError> {
        Ok(VerificationToken {
            id: row.get::<String, _>("id"),
            document_id: row.get::<String, _>("document_id"),
            secret: row.get::<String, _>("secret"),
            created_by: row.get::<String, _>("created_by"),
            usage_limit: row.get::<i64, _>("usage_limit"),
            usage_count: row.get::<i64, _>("usage_count"),
            created_at: DateTime::parse_from_rfc3339(&row.get::<String, _>("created_at"))
                .map_err(|e| AttestorError::ValidationError(format!("Invalid timestamp: {}", e)))?
                .with_timezone(&Utc),
        })
    }
}
