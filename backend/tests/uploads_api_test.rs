//! Integration tests for the upload and route-guard HTTP surface
//!
//! These tests drive the full router in-process:
//! 1. Startup creates both category directories
//! 2. MIME filtering per category
//! 3. Size ceiling enforcement
//! 4. Route guard decisions over JSON

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use marketplace_backend::app::build_router;
use marketplace_backend::state::AppState;
use marketplace_backend::upload::UploadStore;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

const BOUNDARY: &str = "----marketplace-test-boundary";

/// Helper to create a router backed by a fresh upload root
fn create_test_app() -> (Router, TempDir) {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let store = UploadStore::new(temp_dir.path().join("uploads"));
    let state = AppState::new(&store).expect("upload directories");
    (build_router(Arc::new(state)), temp_dir)
}

fn multipart_body(filename: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    multipart_body_with_note(b"hello", filename, content_type, data)
}

fn multipart_body_with_note(
    note: &[u8],
    filename: &str,
    content_type: &str,
    data: &[u8],
) -> Vec<u8> {
    let mut body = Vec::new();
    // A plain text field first, which the handler skips
    body.extend_from_slice(
        format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(note);
    body.extend_from_slice(b"\r\n");
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("request")
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn file_count(dir: &Path) -> usize {
    std::fs::read_dir(dir).expect("read dir").count()
}

fn assert_stored_name(name: &str, prefix: &str, ext: &str) {
    let middle = name
        .strip_prefix(&format!("{prefix}-"))
        .and_then(|rest| rest.strip_suffix(ext))
        .unwrap_or_else(|| panic!("unexpected stored filename: {name}"));
    let parts: Vec<&str> = middle.split('-').collect();
    assert_eq!(parts.len(), 2, "{name}");
    assert!(parts
        .iter()
        .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit())));
}

#[tokio::test]
async fn test_startup_creates_category_directories() {
    let (_app, temp_dir) = create_test_app();
    assert!(temp_dir.path().join("uploads/working-photos").is_dir());
    assert!(temp_dir.path().join("uploads/gp-letters").is_dir());
}

#[tokio::test]
async fn test_working_photo_accepted_and_stored() {
    let (app, temp_dir) = create_test_app();
    let body = multipart_body("kitchen.jpg", "image/jpeg", b"jpeg-bytes");

    let (status, json) = send(app, upload_request("/api/uploads/working-photos", body)).await;

    assert_eq!(status, StatusCode::CREATED);
    let filename = json["filename"].as_str().expect("filename");
    assert_stored_name(filename, "working", ".jpg");
    assert_eq!(json["original_name"], "kitchen.jpg");
    assert_eq!(json["size"], 10);
    assert_eq!(
        json["url"],
        format!("/uploads/working-photos/{filename}").as_str()
    );

    let stored = temp_dir.path().join("uploads/working-photos").join(filename);
    assert_eq!(std::fs::read(stored).expect("stored file"), b"jpeg-bytes");
}

#[tokio::test]
async fn test_working_photo_rejects_non_images() {
    let (app, temp_dir) = create_test_app();

    for content_type in ["application/pdf", "text/plain", "application/octet-stream"] {
        let body = multipart_body("doc.bin", content_type, b"data");
        let (status, json) = send(
            app.clone(),
            upload_request("/api/uploads/working-photos", body),
        )
        .await;

        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE, "{content_type}");
        let message = json["error"].as_str().expect("error message");
        assert!(message.contains("Only image files are allowed"), "{message}");
    }
    assert_eq!(file_count(&temp_dir.path().join("uploads/working-photos")), 0);
}

#[tokio::test]
async fn test_gp_letter_accepts_pdf_and_images() {
    let (app, _temp_dir) = create_test_app();

    for (name, content_type, ext) in [
        ("letter.pdf", "application/pdf", ".pdf"),
        ("letter.png", "image/png", ".png"),
    ] {
        let body = multipart_body(name, content_type, b"letter");
        let (status, json) =
            send(app.clone(), upload_request("/api/uploads/gp-letters", body)).await;

        assert_eq!(status, StatusCode::CREATED, "{content_type}");
        assert_stored_name(json["filename"].as_str().expect("filename"), "gp", ext);
    }
}

#[tokio::test]
async fn test_gp_letter_rejects_other_types() {
    let (app, _temp_dir) = create_test_app();
    let body = multipart_body("letter.docx", "application/msword", b"doc");

    let (status, json) = send(app, upload_request("/api/uploads/gp-letters", body)).await;

    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let message = json["error"].as_str().expect("error message");
    assert!(message.contains("Only image or PDF files are allowed"), "{message}");
}

#[tokio::test]
async fn test_oversize_upload_rejected_without_leftovers() {
    let (app, temp_dir) = create_test_app();
    let data = vec![0u8; 10 * 1024 * 1024 + 1];
    let body = multipart_body("huge.pdf", "application/pdf", &data);

    let (status, _json) = send(app, upload_request("/api/uploads/gp-letters", body)).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(file_count(&temp_dir.path().join("uploads/gp-letters")), 0);
}

#[tokio::test]
async fn test_full_size_file_after_large_text_field() {
    let (app, temp_dir) = create_test_app();
    let note = vec![b'x'; 100 * 1024];
    let data = vec![0u8; 10 * 1024 * 1024];
    let body = multipart_body_with_note(&note, "site.png", "image/png", &data);

    let (status, json) = send(app, upload_request("/api/uploads/working-photos", body)).await;

    assert_eq!(status, StatusCode::CREATED, "{json}");
    assert_eq!(json["size"], 10_485_760);
    assert_eq!(file_count(&temp_dir.path().join("uploads/working-photos")), 1);
}

#[tokio::test]
async fn test_oversize_file_after_text_field_reports_file_limit() {
    let (app, temp_dir) = create_test_app();
    let note = vec![b'x'; 512 * 1024];
    let data = vec![0u8; 11 * 1024 * 1024];
    let body = multipart_body_with_note(&note, "scan.pdf", "application/pdf", &data);

    let (status, json) = send(app, upload_request("/api/uploads/gp-letters", body)).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    let message = json["error"].as_str().expect("error message");
    assert!(message.starts_with("File too large"), "{message}");
    assert_eq!(file_count(&temp_dir.path().join("uploads/gp-letters")), 0);
}

#[tokio::test]
async fn test_request_over_body_limit_is_rejected() {
    let (app, temp_dir) = create_test_app();
    let note = vec![b'x'; 13 * 1024 * 1024];
    let body = multipart_body_with_note(&note, "tiny.png", "image/png", b"png");

    let (status, json) = send(app, upload_request("/api/uploads/working-photos", body)).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    let message = json["error"].as_str().expect("error message");
    assert!(message.starts_with("Request body too large"), "{message}");
    assert_eq!(file_count(&temp_dir.path().join("uploads/working-photos")), 0);
}

#[tokio::test]
async fn test_missing_file_part_is_bad_request() {
    let (app, _temp_dir) = create_test_app();
    let body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\nno file\r\n--{BOUNDARY}--\r\n"
    )
    .into_bytes();

    let (status, json) = send(app, upload_request("/api/uploads/gp-letters", body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "No file provided");
}

#[tokio::test]
async fn test_stored_file_is_served() {
    let (app, _temp_dir) = create_test_app();
    let body = multipart_body("roof.png", "image/png", b"png-bytes");
    let (status, json) = send(
        app.clone(),
        upload_request("/api/uploads/working-photos", body),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let url = json["url"].as_str().expect("url").to_string();
    let response = app
        .oneshot(Request::builder().uri(url).body(Body::empty()).unwrap())
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"png-bytes");
}

async fn guard(app: Router, payload: Value) -> Value {
    let request = Request::builder()
        .method("POST")
        .uri("/api/route-guard")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request");
    let (status, json) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    json
}

#[tokio::test]
async fn test_route_guard_decisions() {
    let (app, _temp_dir) = create_test_app();

    let loading = guard(
        app.clone(),
        serde_json::json!({ "loading": true, "user": { "role": "worker" }, "requiredRole": "admin" }),
    )
    .await;
    assert_eq!(loading, serde_json::json!({ "outcome": "loading" }));

    let anonymous = guard(app.clone(), serde_json::json!({ "loading": false, "user": null })).await;
    assert_eq!(
        anonymous,
        serde_json::json!({ "outcome": "redirect", "to": "/login", "replace": true })
    );

    let mismatch = guard(
        app.clone(),
        serde_json::json!({ "loading": false, "user": { "role": "worker" }, "requiredRole": "admin" }),
    )
    .await;
    assert_eq!(
        mismatch,
        serde_json::json!({ "outcome": "redirect", "to": "/", "replace": true })
    );

    let admin = guard(
        app,
        serde_json::json!({ "loading": false, "user": { "role": "admin" }, "requiredRole": "worker" }),
    )
    .await;
    assert_eq!(admin, serde_json::json!({ "outcome": "render" }));
}

#[tokio::test]
async fn test_health_check() {
    let (app, _temp_dir) = create_test_app();
    let request = Request::builder()
        .uri("/api/health")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
}
