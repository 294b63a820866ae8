//! Verification endpoints.

use axum::extract::{Multipart, State};
use axum::http::HeaderMap;
use axum::response::Json;
use serde_json::{json, Value};

use crate::api::auth;
use crate::api::{read_upload_form, AppState};
use crate::error::AttestorError;

fn outcome_message(verified: bool) -> &'static str {
    if verified {
        "Document verification successful"
    } else {
        "Document verification failed"
    }
}

/// POST /api/verify - owner-authenticated verification of re-submitted
/// content.
pub async fn verify_owned(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<Value>, AttestorError> {
    let user = auth::authenticate(&headers, &state.config.jwt_secret)?;

    let form = read_upload_form(multipart).await?;
    let file = form.require_file()?;

    let document_id = form
        .field("documentId")
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AttestorError::BadRequestError("Document ID is required".to_string()))?;

    let outcome = state
        .flow
        .verify_owned(document_id, &user.id, &file.bytes)
        .await?;

    Ok(Json(json!({
        "verified": outcome.verified,
        "documentId": outcome.document_id,
        "documentName": outcome.document_name,
        "timestamp": outcome.timestamp,
        "message": outcome_message(outcome.verified),
    })))
}

/// POST /api/public/verify - anonymous verification against a bearer
/// token. No caller identity is required or recorded.
pub async fn verify_public(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Value>, AttestorError> {
    let form = read_upload_form(multipart).await?;
    let file = form.require_file()?;

    let secret = form
        .field("verificationToken")
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            AttestorError::BadRequestError("Verification token required".to_string())
        })?;

    let outcome = state.flow.verify_public(secret, &file.bytes).await?;

    Ok(Json(json!({
        "verified": outcome.verified,
        "timestamp": outcome.timestamp,
        "message": outcome_message(outcome.verified),
    })))
}
