//! Audit trail endpoints.

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::Json;
use serde_json::{json, Value};

use crate::api::auth;
use crate::api::AppState;
use crate::error::AttestorError;
use crate::identity;

/// GET /api/audit/documents/:id - the trail for one owned document,
/// most recent first.
pub async fn for_document(
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
        return Err(AttestorError::ForbiddenError(
            "Not authorized to access audit log for this document".to_string(),
        ));
    }

    let entries = state.audit.by_document(&document.id).await?;

    Ok(Json(json!({
        "auditLogs": entries,
        "total": entries.len(),
    })))
}

/// GET /api/audit/me - the caller's own recorded activity, most recent
/// first.
pub async fn for_current_user(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, AttestorError> {
    let user = auth::authenticate(&headers, &state.config.jwt_secret)?;

    let entries = state.audit.by_user(&user.id).await?;

    Ok(Json(json!({
        "auditLogs": entries,
        "total": entries.len(),
    })))
}
