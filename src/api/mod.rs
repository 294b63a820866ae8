//! HTTP surface.
//!
//! Thin handlers over the stores and the verification flow. Every
//! endpoint except `/health` and `/api/public/verify` requires a caller
//! identity token.

pub mod audit;
pub mod auth;
pub mod documents;
pub mod tokens;
pub mod verify;

use axum::body::Bytes;
use axum::extract::Multipart;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use serde_json::Value;
use std::collections::HashMap;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::audit::AuditLog;
use crate::commitment::CommitmentKey;
use crate::config::AppConfig;
use crate::database::Database;
use crate::documents::DocumentStore;
use crate::error::AttestorError;
use crate::tokens::TokenStore;
use crate::verification::VerificationFlow;

/// Shared handler state: configuration, stores, commitment key, and the
/// verification flow.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub documents: DocumentStore,
    pub tokens: TokenStore,
    pub audit: AuditLog,
    pub key: CommitmentKey,
    pub flow: VerificationFlow,
}

impl AppState {
    pub fn new(config: AppConfig, database: &Database) -> Self {
        let documents = DocumentStore::new(database.pool().clone());
        let tokens = TokenStore::new(database.pool().clone());
        let audit = AuditLog::new(database.pool().clone());
        let key = CommitmentKey::new(&config.commitment_secret);
        let flow = VerificationFlow::new(
            documents.clone(),
            tokens.clone(),
            audit.clone(),
            key.clone(),
        );

        Self {
            config,
            documents,
            tokens,
            audit,
            key,
            flow,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/api/documents",
            post(documents::upload).get(documents::list),
        )
        .route(
            "/api/documents/:id",
            get(documents::detail)
                .put(documents::update)
                .delete(documents::remove),
        )
        .route("/api/tokens", post(tokens::create).get(tokens::list))
        .route(
            "/api/tokens/:id",
            get(tokens::list_for_document).delete(tokens::remove),
        )
        .route("/api/verify", post(verify::verify_owned))
        .route("/api/public/verify", post(verify::verify_public))
        .route("/api/audit/documents/:id", get(audit::for_document))
        .route("/api/audit/me", get(audit::for_current_user))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .into_inner(),
        )
        .with_state(state)
}

async fn health_check() -> Json<Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "attestor",
        "timestamp": chrono::Utc::now()
    }))
}

/// Uploaded file plus the remaining text fields of a multipart body.
pub(crate) struct UploadForm {
    pub file: Option<UploadedFile>,
    pub fields: HashMap<String, String>,
}

pub(crate) struct UploadedFile {
    pub filename: String,
    pub bytes: Bytes,
}

impl UploadForm {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|s| s.as_str())
    }

    pub fn require_file(&self) -> Result<&UploadedFile, AttestorError> {
        self.file
            .as_ref()
            .ok_or_else(|| AttestorError::BadRequestError("No document file provided".to_string()))
    }
}

/// Drains a multipart body. The file rides in the `document` field; every
/// other field is treated as text.
pub(crate) async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AttestorError> {
    let mut form = UploadForm {
        file: None,
        fields: HashMap::new(),
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AttestorError::BadRequestError(format!("Malformed upload: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "document" {
            let filename = field.file_name().unwrap_or("document").to_string();
            let bytes = field.bytes().await.map_err(|e| {
                AttestorError::BadRequestError(format!("Failed to read upload: {}", e))
            })?;
            form.file = Some(UploadedFile { filename, bytes });
        } else {
            let value = field.text().await.map_err(|e| {
                AttestorError::BadRequestError(format!("Failed to read field: {}", e))
            })?;
            form.fields.insert(name, value);
        }
    }

    Ok(form)
}
