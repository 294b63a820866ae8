//! Document endpoints.

use axum::extract::{Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::auth;
use crate::api::{read_upload_form, AppState};
use crate::audit::{AuditAction, AuditEntry};
use crate::commitment;
use crate::error::AttestorError;
use crate::identity;

/// POST /api/documents - register a document for attestation.
///
/// Content is hashed and committed in memory; the bytes are dropped when
/// the request completes.
pub async fn upload(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Value>), AttestorError> {
    let user = auth::authenticate(&headers, &state.config.jwt_secret)?;

    let form = read_upload_form(multipart).await?;
    let file = form.require_file()?;

    let title = form.field("title").map(str::trim).unwrap_or_default();
    let description = form.field("description").map(str::trim).unwrap_or_default();
    if title.is_empty() || description.is_empty() {
        return Err(AttestorError::BadRequestError(
            "Title and description are required".to_string(),
        ));
    }

    let digest = commitment::hash_content(&file.bytes);
    let commitment_hex = commitment::commit(&digest, &state.key)?;

    let document = state
        .documents
        .create(title, description, &file.filename, &commitment_hex, &user.id)
        .await?;

    state
        .audit
        .record(AuditEntry::new(
            &document.id,
            AuditAction::Create,
            Some(&user.id),
            true,
            json!({
                "filename": document.filename,
                "title": document.title,
            }),
        ))
        .await;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "document": {
                "id": document.id,
                "title": document.title,
                "description": document.description,
                "filename": document.filename,
                "createdAt": document.created_at,
            }
        })),
    ))
}

/// GET /api/documents - the caller's documents, newest first. The
/// commitment itself is never included.
pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, AttestorError> {
    let user = auth::authenticate(&headers, &state.config.jwt_secret)?;

    let documents = state.documents.list_by_owner(&user.id).await?;

    let listed: Vec<Value> = documents
        .iter()
        .map(|d| {
            json!({
                "id": d.id,
                "title": d.title,
                "description": d.description,
                "filename": d.filename,
                "createdAt": d.created_at,
            })
        })
        .collect();

    Ok(Json(Value::Array(listed)))
}

/// GET /api/documents/:id - details for one owned document.
pub async fn detail(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, AttestorError> {
    let user = auth::authenticate(&headers, &state.config.jwt_secret)?;
    identity::require_valid_id(&id, "document")?;

    let document = state
        .documents
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AttestorError::NotFoundError("Document not found".to_string()))?;

    if !document.is_owned_by(&user.id) {
        state
            .audit
            .record(AuditEntry::new(
                &document.id,
                AuditAction::View,
                Some(&user.id),
                false,
                json!({ "reason": "Unauthorized access attempt" }),
            ))
            .await;
        return Err(AttestorError::ForbiddenError(
            "Not authorized to access this document".to_string(),
        ));
    }

    state
        .audit
        .record(AuditEntry::new(
            &document.id,
            AuditAction::View,
            Some(&user.id),
            true,
            json!({}),
        ))
        .await;

    Ok(Json(json!({
        "id": document.id,
        "title": document.title,
        "description": document.description,
        "filename": document.filename,
        "createdAt": document.created_at,
        "commitmentPreview": commitment::preview(&document.commitment),
    })))
}

#[derive(Debug, Deserialize)]
pub struct UpdateDocumentRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// PUT /api/documents/:id - update title and description only.
pub async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<UpdateDocumentRequest>,
) -> Result<Json<Value>, AttestorError> {
    let user = auth::authenticate(&headers, &state.config.jwt_secret)?;
    identity::require_valid_id(&id, "document")?;

    let document = state
        .documents
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AttestorError::NotFoundError("Document not found".to_string()))?;

    if !document.is_owned_by(&user.id) {
        return Err(AttestorError::ForbiddenError(
            "Not authorized to update this document".to_string(),
        ));
    }

    // Blank values count as absent, same as omitting the field.
    let title = body.title.as_deref().filter(|t| !t.trim().is_empty());
    let description = body
        .description
        .as_deref()
        .filter(|d| !d.trim().is_empty());

    state
        .documents
        .update_metadata(&document.id, title, description)
        .await?;

    let mut changes = serde_json::Map::new();
    if let Some(title) = title {
        changes.insert("title".to_string(), json!(title));
    }
    if let Some(description) = description {
        changes.insert("description".to_string(), json!(description));
    }

    state
        .audit
        .record(AuditEntry::new(
            &document.id,
            AuditAction::Update,
            Some(&user.id),
            true,
            Value::Object(changes),
        ))
        .await;

    Ok(Json(json!({
        "document": {
            "id": document.id,
            "title": title.unwrap_or(&document.title),
            "description": description.unwrap_or(&document.description),
            "createdAt": document.created_at,
        }
    })))
}

/// DELETE /api/documents/:id - delete a document record.
pub async fn remove(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, AttestorError> {
    let user = auth::authenticate(&headers, &state.config.jwt_secret)?;
    identity::require_valid_id(&id, "document")?;

    let document = state
        .documents
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AttestorError::NotFoundError("Document not found".to_string()))?;

    if !document.is_owned_by(&user.id) {
        state
            .audit
            .record(AuditEntry::new(
                &document.id,
                AuditAction::Delete,
                Some(&user.id),
                false,
                json!({ "reason": "Unauthorized delete attempt" }),
            ))
            .await;
        return Err(AttestorError::ForbiddenError(
            "Not authorized to delete this document".to_string(),
        ));
    }

    // Audit before the row disappears; the entry outlives the document.
    state
        .audit
        .record(AuditEntry::new(
            &document.id,
            AuditAction::Delete,
            Some(&user.id),
            true,
            json!({
                "title": document.title,
                "filename": document.filename,
            }),
        ))
        .await;

    state.documents.delete(&document.id).await?;

    Ok(Json(json!({ "message": "Document removed" })))
}
