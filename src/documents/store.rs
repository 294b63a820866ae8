//! Database-backed document store.

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use tracing::info;

use crate::documents::types::Document;
use crate::error::AttestorError;
use crate::identity;

#[derive(Clone)]
pub struct DocumentStore {
    pool: SqlitePool,
}

impl DocumentStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Persists a new document record and returns it.
    pub async fn create(
        &self,
        title: &str,
        description: &str,
        filename: &str,
        commitment: &str,
        owner_id: &str,
    ) -> Result<Document, AttestorError> {
        let document = Document {
            id: identity::generate_id(),
            title: title.to_string(),
            description: description.to_string(),
            filename: filename.to_string(),
            commitment: commitment.to_string(),
            owner_id: owner_id.to_string(),
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO documents
            (id, title, description, filename, commitment, owner_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&document.id)
        .bind(&document.title)
        .bind(&document.description)
        .bind(&document.filename)
        .bind(&document.commitment)
        .bind(&document.owner_id)
        .bind(document.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AttestorError::StorageError(format!("Failed to create document: {}", e)))?;

        info!(
            "Registered document {} ({})",
            document.id, document.filename
        );
        Ok(document)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Document>, AttestorError> {
        let row = sqlx::query(
            r#"
            SELECT id, title, description, filename, commitment, owner_id, created_at
            FROM documents
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AttestorError::StorageError(format!("Failed to fetch document: {}", e)))?;

        row.map(|r| Self::document_from_row(&r)).transpose()
    }

    /// Documents owned by one user, newest first.
    pub async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Document>, AttestorError> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, description, filename, commitment, owner_id, created_at
            FROM documents
            WHERE owner_id = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AttestorError::StorageError(format!("Failed to list documents: {}", e)))?;

        rows.iter().map(Self::document_from_row).collect()
    }

    /// Applies metadata changes. Absent fields keep their stored value;
    /// the commitment is never touched.
    pub async fn update_metadata(
        &self,
        id: &str,
        title: Option<&str>,
        description: Option<&str>,
    ) -> Result<(), AttestorError> {
        sqlx::query(
            r#"
            UPDATE documents
            SET title = COALESCE(?, title),
                description = COALESCE(?, description)
            WHERE id = ?
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AttestorError::StorageError(format!("Failed to update document: {}", e)))?;

        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<(), AttestorError> {
        sqlx::query("DELETE FROM documents WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AttestorError::StorageError(format!("Failed to delete document: {}", e)))?;

        info!("Deleted document {}", id);
        Ok(())
    }

    fn document_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Document, AttestorError> {
        Ok(Document {
            id: row.get::<String, _>("id"),
            title: row.get::<String, _>("title"),
            description: row.get::<String, _>("description"),
            filename: row.get::<String, _>("filename"),
            commitment: row.get::<String, _>("commitment"),
            owner_id: row.get::<String, _>("owner_id"),
            created_at: DateTime::parse_from_rfc3339(&row.get::<String, _>("created_at"))
                .map_err(|e| AttestorError::ValidationError(format!("Invalid timestamp: {}", e)))?
                .with_timezone(&Utc),
        })
    }
}
