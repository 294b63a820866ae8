//! Verification token endpoints.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::auth;
use crate::api::AppState;
use crate::audit::{AuditAction, AuditEntry};
use crate::error::AttestorError;
use crate::identity;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTokenRequest {
    pub document_id: Option<String>,
    pub usage_limit: Option<i64>,
}

/// POST /api/tokens - issue a verification token for an owned document.
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateTokenRequest>,
) -> Result<(StatusCode, Json<Value>), AttestorError> {
    let user = auth::authenticate(&headers, &state.config.jwt_secret)?;

    let document_id = body
        .document_id
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AttestorError::BadRequestError("Document ID is required".to_string()))?;

    identity::require_valid_id(document_id, "document")?;

    let document = state
        .documents
        .find_by_id(document_id)
        .await?
        .ok_or_else(|| AttestorError::NotFoundError("Document not found".to_string()))?;

    if !document.is_owned_by(&user.id) {
        return Err(AttestorError::ForbiddenError(
            "Access denied. You can only generate tokens for your documents".to_string(),
        ));
    }

    let token = state
        .tokens
        .issue(&document.id, &user.id, body.usage_limit)
        .await?;

    state
        .audit
        .record(AuditEntry::new(
            &document.id,
            AuditAction::GenerateToken,
            Some(&user.id),
            true,
            json!({
                "tokenId": token.id,
                "usageLimit": token.usage_limit,
            }),
        ))
        .await;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "token": token.secret,
            "id": token.id,
            "usageLimit": token.usage_limit,
            "usageCount": token.usage_count,
            "message": "Verification token generated successfully",
        })),
    ))
}

/// GET /api/tokens - every token across the caller's documents.
pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, AttestorError> {
    let user = auth::authenticate(&headers, &state.config.jwt_secret)?;

    let owned = state.tokens.list_for_owner(&user.id).await?;

    let listed: Vec<Value> = owned
        .iter()
        .map(|o| {
            json!({
                "id": o.token.id,
                "token": o.token.secret,
                "document": o.token.document_id,
                "documentTitle": o.document_title,
                "usageLimit": o.token.usage_limit,
                "usageCount": o.token.usage_count,
                "isValid": o.token.is_valid(),
            })
        })
        .collect();

    Ok(Json(Value::Array(listed)))
}

/// GET /api/tokens/:id - tokens for one owned document.
pub async fn list_for_document(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(document_id): Path<String>,
) -> Result<Json<Value>, AttestorError> {
    let user = auth::authenticate(&headers, &state.config.jwt_secret)?;
    identity::require_valid_id(&document_id, "document")?;

    let document = state
        .documents
        .find_by_id(&document_id)
        .await?
        .ok_or_else(|| AttestorError::NotFoundError("Document not found".to_string()))?;

    if !document.is_owned_by(&user.id) {
        return Err(AttestorError::ForbiddenError(
            "Access denied. You can only view tokens for your documents".to_string(),
        ));
    }

    let tokens = state.tokens.list_for_document(&document.id).await?;

    let listed: Vec<Value> = tokens
        .iter()
        .map(|t| {
            json!({
                "id": t.id,
                "token": t.secret,
                "usageLimit": t.usage_limit,
                "usageCount": t.usage_count,
                "isValid": t.is_valid(),
                "isExhausted": t.is_exhausted(),
                "createdAt": t.created_at,
            })
        })
        .collect();

    Ok(Json(Value::Array(listed)))
}

/// DELETE /api/tokens/:id - revoke a token.
pub async fn remove(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, AttestorError> {
    let user = auth::authenticate(&headers, &state.config.jwt_secret)?;
    identity::require_valid_id(&id, "token")?;

    let token = state.tokens.revoke(&id, &user.id).await?;

    state
        .audit
        .record(AuditEntry::new(
            &token.document_id,
            AuditAction::DeleteToken,
            Some(&user.id),
            true,
            json!({ "tokenId": token.id }),
        ))
        .await;

    Ok(Json(json!({ "message": "Token removed" })))
}
