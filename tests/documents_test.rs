//! Document endpoint tests
//!
//! Upload, listing, detail, update, and deletion through the HTTP
//! surface, including ownership checks and the audit entries they leave.

use attestor::audit::AuditAction;
use axum::http::StatusCode;
use serde_json::json;

mod common;
use common::*;

#[tokio::test]
async fn test_upload_returns_created_document() {
    let (app, _state) = test_app().await;
    let token = auth_token("alice");

    let body = multipart::body_with_file(
        "report.pdf",
        b"quarterly figures",
        &[("title", "Q3 Report"), ("description", "Quarterly report")],
    );
    let (status, json) = send(&app, multipart_request("/api/documents", Some(&token), body)).await;

    assert_eq!(status, StatusCode::CREATED);
    let document = &json["document"];
    assert_eq!(document["title"], "Q3 Report");
    assert_eq!(document["description"], "Quarterly report");
    assert_eq!(document["filename"], "report.pdf");
    assert!(document["createdAt"].is_string());

    let id = document["id"].as_str().unwrap();
    assert_eq!(id.len(), 24);
    assert!(id.chars().all(|c| c.is_ascii_hexdigit()));

    // The commitment never leaves the server
    assert!(document.get("commitment").is_none());
}

#[tokio::test]
async fn test_upload_requires_file() {
    let (app, _state) = test_app().await;
    let token = auth_token("alice");

    let body =
        multipart::body_without_file(&[("title", "Q3 Report"), ("description", "Quarterly")]);
    let (status, json) = send(&app, multipart_request("/api/documents", Some(&token), body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "No document file provided");
}

#[tokio::test]
async fn test_upload_requires_title_and_description() {
    let (app, _state) = test_app().await;
    let token = auth_token("alice");

    // Missing description entirely
    let body = multipart::body_with_file("report.pdf", b"content", &[("title", "Q3 Report")]);
    let (status, json) = send(&app, multipart_request("/api/documents", Some(&token), body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Title and description are required");

    // Whitespace-only title is treated as missing
    let body = multipart::body_with_file(
        "report.pdf",
        b"content",
        &[("title", "   "), ("description", "Quarterly")],
    );
    let (status, json) = send(&app, multipart_request("/api/documents", Some(&token), body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Title and description are required");
}

#[tokio::test]
async fn test_upload_requires_identity_token() {
    let (app, _state) = test_app().await;

    let body = multipart::body_with_file(
        "report.pdf",
        b"content",
        &[("title", "Q3 Report"), ("description", "Quarterly")],
    );
    let (status, json) = send(&app, multipart_request("/api/documents", None, body)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["message"], "No token, authorization denied");

    let body = multipart::body_with_file(
        "report.pdf",
        b"content",
        &[("title", "Q3 Report"), ("description", "Quarterly")],
    );
    let (status, json) = send(
        &app,
        multipart_request("/api/documents", Some("not-a-jwt"), body),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["message"], "Token is not valid");
}

#[tokio::test]
async fn test_list_is_scoped_to_owner_newest_first() {
    let (app, _state) = test_app().await;
    let alice = auth_token("alice");
    let bob = auth_token("bob");

    upload_document(&app, &alice, "first.pdf", b"one", "First", "Oldest").await;
    upload_document(&app, &alice, "second.pdf", b"two", "Second", "Newest").await;
    upload_document(&app, &bob, "theirs.pdf", b"three", "Theirs", "Not Alice's").await;

    let (status, listed) = send(&app, get_request("/api/documents", &alice)).await;
    assert_eq!(status, StatusCode::OK);

    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0]["title"], "Second");
    assert_eq!(listed[1]["title"], "First");
    assert!(listed[0].get("commitment").is_none());

    let (_, theirs) = send(&app, get_request("/api/documents", &bob)).await;
    assert_eq!(theirs.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_detail_includes_commitment_preview() {
    let (app, state) = test_app().await;
    let token = auth_token("alice");

    let id = upload_document(&app, &token, "report.pdf", b"content", "Report", "Details").await;

    let (status, detail) = send(&app, get_request(&format!("/api/documents/{}", id), &token)).await;
    assert_eq!(status, StatusCode::OK);

    let preview = detail["commitmentPreview"].as_str().unwrap();
    assert_eq!(preview.len(), 23);
    assert!(preview.contains("..."));
    assert!(detail.get("commitment").is_none());

    // A successful view is audited
    let entries = state.audit.by_document(&id).await.unwrap();
    assert!(entries
        .iter()
        .any(|e| e.action == AuditAction::View && e.success));
}

#[tokio::test]
async fn test_detail_rejects_non_owner() {
    let (app, state) = test_app().await;
    let alice = auth_token("alice");
    let bob = auth_token("bob");

    let id = upload_document(&app, &alice, "report.pdf", b"content", "Report", "Details").await;

    let (status, body) = send(&app, get_request(&format!("/api/documents/{}", id), &bob)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Not authorized to access this document");

    // The refused attempt still leaves a failed view entry
    let entries = state.audit.by_document(&id).await.unwrap();
    let refused = entries
        .iter()
        .find(|e| e.action == AuditAction::View && !e.success)
        .unwrap();
    assert_eq!(refused.user_id.as_deref(), Some("bob"));
}

#[tokio::test]
async fn test_detail_validates_document_id() {
    let (app, _state) = test_app().await;
    let token = auth_token("alice");

    let (status, body) = send(&app, get_request("/api/documents/not-hex", &token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid document ID format");

    let (status, body) = send(
        &app,
        get_request("/api/documents/507f1f77bcf86cd799439011", &token),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Document not found");
}

#[tokio::test]
async fn test_update_changes_only_provided_fields() {
    let (app, _state) = test_app().await;
    let token = auth_token("alice");

    let id = upload_document(&app, &token, "report.pdf", b"content", "Report", "Original").await;

    let (status, updated) = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/documents/{}", id),
            &token,
            &json!({ "title": "Renamed" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["document"]["title"], "Renamed");
    assert_eq!(updated["document"]["description"], "Original");

    // Blank strings count as absent, not as a new value
    let (status, updated) = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/documents/{}", id),
            &token,
            &json!({ "title": "  ", "description": "Rewritten" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["document"]["title"], "Renamed");
    assert_eq!(updated["document"]["description"], "Rewritten");

    let (_, detail) = send(&app, get_request(&format!("/api/documents/{}", id), &token)).await;
    assert_eq!(detail["title"], "Renamed");
    assert_eq!(detail["description"], "Rewritten");
}

#[tokio::test]
async fn test_update_rejects_non_owner() {
    let (app, _state) = test_app().await;
    let alice = auth_token("alice");
    let bob = auth_token("bob");

    let id = upload_document(&app, &alice, "report.pdf", b"content", "Report", "Details").await;

    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/documents/{}", id),
            &bob,
            &json!({ "title": "Hijacked" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Not authorized to update this document");
}

#[tokio::test]
async fn test_remove_deletes_document_but_keeps_audit_trail() {
    let (app, state) = test_app().await;
    let token = auth_token("alice");

    let id = upload_document(&app, &token, "report.pdf", b"content", "Report", "Details").await;

    let (status, body) = send(
        &app,
        delete_request(&format!("/api/documents/{}", id), &token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Document removed");

    let (status, _) = send(&app, get_request(&format!("/api/documents/{}", id), &token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The trail outlives the document
    let entries = state.audit.by_document(&id).await.unwrap();
    assert!(entries
        .iter()
        .any(|e| e.action == AuditAction::Create && e.success));
    let deleted = entries
        .iter()
        .find(|e| e.action == AuditAction::Delete && e.success)
        .unwrap();
    assert_eq!(deleted.details["filename"], "report.pdf");
}

#[tokio::test]
async fn test_remove_rejects_non_owner() {
    let (app, state) = test_app().await;
    let alice = auth_token("alice");
    let bob = auth_token("bob");

    let id = upload_document(&app, &alice, "report.pdf", b"content", "Report", "Details").await;

    let (status, body) = send(&app, delete_request(&format!("/api/documents/{}", id), &bob)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Not authorized to delete this document");

    // Document is still there for the owner
    let (status, _) = send(&app, get_request(&format!("/api/documents/{}", id), &alice)).await;
    assert_eq!(status, StatusCode::OK);

    let entries = state.audit.by_document(&id).await.unwrap();
    assert!(entries
        .iter()
        .any(|e| e.action == AuditAction::Delete && !e.success));
}
