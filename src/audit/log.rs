//! Database-backed audit log.

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use tracing::error;

use crate::audit::entry::{AuditAction, AuditEntry};
use crate::error::AttestorError;

/// Append-only store for audit entries. Offers no update or delete.
#[derive(Clone)]
pub struct AuditLog {
    pool: SqlitePool,
}

impl AuditLog {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Records an entry on a best-effort basis.
    ///
    /// A failed insert is logged server-side and swallowed; it must never
    /// disturb the operation that produced the entry.
    pub async fn record(&self, entry: AuditEntry) {
        if let Err(e) = self.append(&entry).await {
            error!(
                "Failed to record audit entry ({} on document {}): {}",
                entry.action.as_str(),
                entry.document_id,
                e
            );
        }
    }

    /// Appends an entry, surfacing storage failures to the caller.
    pub async fn append(&self, entry: &AuditEntry) -> Result<(), AttestorError> {
        sqlx::query(
            r#"
            INSERT INTO audit_log (id, document_id, action, user_id, success, details, timestamp)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entry.id)
        .bind(&entry.document_id)
        .bind(entry.action.as_str())
        .bind(&entry.user_id)
        .bind(entry.success)
        .bind(serde_json::to_string(&entry.details)?)
        .bind(entry.timestamp.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AttestorError::StorageError(format!("Failed to append audit entry: {}", e)))?;

        Ok(())
    }

    /// All entries for one document, most recent first.
    pub async fn by_document(&self, document_id: &str) -> Result<Vec<AuditEntry>, AttestorError> {
        let rows = sqlx::query(
            r#"
            SELECT id, document_id, action, user_id, success, details, timestamp
            FROM audit_log
            WHERE document_id = ?
            ORDER BY timestamp DESC
            "#,
        )
        .bind(document_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AttestorError::StorageError(format!("Failed to fetch audit log: {}", e)))?;

        rows.iter().map(Self::entry_from_row).collect()
    }

    /// All entries attributed to one user, most recent first.
    pub async fn by_user(&self, user_id: &str) -> Result<Vec<AuditEntry>, AttestorError> {
        let rows = sqlx::query(
            r#"
            SELECT id, document_id, action, user_id, success, details, timestamp
            FROM audit_log
            WHERE user_id = ?
            ORDER BY timestamp DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AttestorError::StorageError(format!("Failed to fetch audit log: {}", e)))?;

        rows.iter().map(Self::entry_from_row).collect()
    }

    fn entry_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<AuditEntry, AttestorError> {
        let action = AuditAction::from_str(&row.get::<String, _>("action")).ok_or_else(|| {
            AttestorError::ValidationError(format!(
                "Unknown audit action: {}",
                row.get::<String, _>("action")
            ))
        })?;

        Ok(AuditEntry {
            id: row.get::<String, _>("id"),
            document_id: row.get::<String, _>("document_id"),
            action,
            user_id: row.get::<Option<String>, _>("user_id"),
            success: row.get::<bool, _>("success"),
            details: serde_json::from_str(&row.get::<String, _>("details"))?,
            timestamp: DateTime::parse_from_rfc3339(&row.get::<String, _>("timestamp"))
                .map_err(|e| AttestorError::ValidationError(format!("Invalid timestamp: {}", e)))?
                .with_timezone(&Utc),
        })
    }
}
