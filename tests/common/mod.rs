use attestor::api::auth::{Claims, ClaimsUser};
use attestor::api::{self, AppState};
use attestor::config::AppConfig;
use attestor::database::Database;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret";
pub const TEST_COMMITMENT_SECRET: &str = "test-commitment-secret";

/// Setup an in-memory SQLite database for testing
pub async fn setup_test_db() -> Database {
    Database::new_in_memory()
        .await
        .expect("Failed to create test database")
}

/// Test configuration with fixed secrets
pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".to_string(),
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        commitment_secret: TEST_COMMITMENT_SECRET.to_string(),
        jwt_secret: TEST_JWT_SECRET.to_string(),
    }
}

/// Application state over a fresh in-memory database
pub async fn test_state() -> AppState {
    let database = setup_test_db().await;
    AppState::new(test_config(), &database)
}

/// Router plus the state behind it, for tests that inspect the stores
pub async fn test_app() -> (Router, AppState) {
    let state = test_state().await;
    (api::router(state.clone()), state)
}

/// Mint an identity token the way the auth layer expects it
pub fn auth_token(user_id: &str) -> String {
    let claims = Claims {
        user: ClaimsUser {
            id: user_id.to_string(),
        },
        exp: (Utc::now() + Duration::hours(24)).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("Failed to sign test token")
}

/// Send one request through the router and decode the JSON response
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Request did not complete");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Response was not JSON")
    };
    (status, json)
}

pub fn get_request(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("x-auth-token", token)
        .body(Body::empty())
        .unwrap()
}

pub fn delete_request(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .header("x-auth-token", token)
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(
    method: &str,
    uri: &str,
    token: &str,
    payload: &serde_json::Value,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("x-auth-token", token)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

pub fn multipart_request(uri: &str, token: Option<&str>, body: Vec<u8>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, multipart::content_type());
    if let Some(token) = token {
        builder = builder.header("x-auth-token", token);
    }
    builder.body(Body::from(body)).unwrap()
}

/// Upload a document through the API and return its id
pub async fn upload_document(
    app: &Router,
    token: &str,
    filename: &str,
    content: &[u8],
    title: &str,
    description: &str,
) -> String {
    let body = multipart::body_with_file(
        filename,
        content,
        &[("title", title), ("description", description)],
    );
    let (status, json) = send(app, multipart_request("/api/documents", Some(token), body)).await;
    assert_eq!(status, StatusCode::CREATED);
    json["document"]["id"]
        .as_str()
        .expect("Upload response missing document id")
        .to_string()
}

/// Generate a verification token through the API and return its secret
pub async fn generate_token(app: &Router, token: &str, document_id: &str) -> String {
    let payload = serde_json::json!({ "documentId": document_id });
    let (status, json) = send(app, json_request("POST", "/api/tokens", token, &payload)).await;
    assert_eq!(status, StatusCode::CREATED);
    json["token"]
        .as_str()
        .expect("Token response missing secret")
        .to_string()
}

/// Multipart request bodies for the upload and verify endpoints
pub mod multipart {
    pub const BOUNDARY: &str = "----attestor-test-boundary";

    pub fn content_type() -> String {
        format!("multipart/form-data; boundary={}", BOUNDARY)
    }

    fn push_text_field(body: &mut Vec<u8>, name: &str, value: &str) {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }

    /// Body with a `document` file part plus any text fields
    pub fn body_with_file(filename: &str, content: &[u8], fields: &[(&str, &str)]) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, value) in fields {
            push_text_field(&mut body, name, value);
        }
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"document\"; filename=\"{}\"\r\n",
                filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        body
    }

    /// Body with only text fields
    pub fn body_without_file(fields: &[(&str, &str)]) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, value) in fields {
            push_text_field(&mut body, name, value);
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        body
    }
}
