//! Registration endpoint integration tests.
//!
//! Run with: `cargo test -p regdesk-api --test registration_test`

mod helpers;

use axum_test::multipart::MultipartForm;
use helpers::fixtures::{
    create_pdf_of_size, create_test_pdf, form_with_fields, pdf_part, valid_fields, valid_form,
};
use helpers::mocks::{storage_status, table_status, wait_for, CountingStore, CountingTable};
use helpers::{
    setup_test_app, setup_test_app_with, API_KEY_HEADER, MAX_FILE_SIZE_BYTES, TEST_API_KEY,
};

const REGISTER: &str = "/api/register";

#[tokio::test]
async fn test_register_success() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(REGISTER)
        .add_header(API_KEY_HEADER, TEST_API_KEY)
        .multipart(valid_form())
        .await;

    assert_eq!(response.status_code(), 201);
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Success");
    let cv_link = body["cv_link"].as_str().unwrap().to_string();
    let transcript_link = body["transcript_link"].as_str().unwrap().to_string();
    assert_ne!(cv_link, transcript_link);

    let rows = app.table.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows[0],
        vec![
            "Jane Doe".to_string(),
            "jane.doe@example.com".to_string(),
            "12345678901".to_string(),
            "Informatics Engineering".to_string(),
            "A".to_string(),
            cv_link,
            transcript_link,
        ]
    );

    assert_eq!(app.store.put_count(), 2);
    let names = app.store.names.lock().unwrap().clone();
    assert!(names.iter().any(|n| n.starts_with("12345678901_JaneDoe_A_cv_")));
    assert!(names.iter().any(|n| n.starts_with("12345678901_JaneDoe_A_transcript_")));
    assert!(names.iter().all(|n| n.ends_with(".pdf")));
}

#[tokio::test]
async fn test_register_accepts_form_aliases() {
    let app = setup_test_app().await;

    let form = form_with_fields(&[
        ("nama", "siti aminah"),
        ("email", "siti@kampus.ac.id"),
        ("nim", "20210001234"),
        ("prodi", "sistem informasi"),
        ("kelas", "b"),
    ])
    .add_part("cv", pdf_part("cv.pdf", create_test_pdf()))
    .add_part("transcript", pdf_part("transkrip.pdf", create_test_pdf()));

    let response = app
        .client()
        .post(REGISTER)
        .add_header(API_KEY_HEADER, TEST_API_KEY)
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), 201);
    let rows = app.table.rows();
    assert_eq!(rows[0][0], "Siti Aminah");
    assert_eq!(rows[0][2], "20210001234");
    assert_eq!(rows[0][4], "B");
}

#[tokio::test]
async fn test_register_accepts_slashed_class_section() {
    let app = setup_test_app().await;

    let form = form_with_fields(&[
        ("name", "jane doe"),
        ("email", "jane.doe@example.com"),
        ("student_id", "12345678901"),
        ("program", "informatics engineering"),
        ("class_section", "ti/a"),
    ])
    .add_part("cv", pdf_part("cv.pdf", create_test_pdf()))
    .add_part("transcript", pdf_part("transcript.pdf", create_test_pdf()));

    let response = app
        .client()
        .post(REGISTER)
        .add_header(API_KEY_HEADER, TEST_API_KEY)
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), 201);
    let names = app.store.names.lock().unwrap().clone();
    assert_eq!(names.len(), 2);
    assert!(names.iter().all(|n| n.starts_with("12345678901_JaneDoe_TI-A_")));
    // The row keeps the class section as submitted.
    assert_eq!(app.table.rows()[0][4], "TI/A");
}

#[tokio::test]
async fn test_register_requires_api_key() {
    let app = setup_test_app().await;

    let missing = app.client().post(REGISTER).multipart(valid_form()).await;
    assert_eq!(missing.status_code(), 401);
    let body: serde_json::Value = missing.json();
    assert_eq!(body["code"], "UNAUTHORIZED");

    let wrong = app
        .client()
        .post(REGISTER)
        .add_header(API_KEY_HEADER, "test-api-key-0123456780")
        .multipart(valid_form())
        .await;
    assert_eq!(wrong.status_code(), 401);

    assert_eq!(app.store.put_count(), 0);
    assert_eq!(app.table.append_count(), 0);
}

#[tokio::test]
async fn test_register_reports_every_invalid_field() {
    let app = setup_test_app().await;

    let form = form_with_fields(&[
        ("name", "john3"),
        ("email", "john@example.com"),
        ("student_id", "1234567890"),
        ("program", "cs"),
        ("class_section", "a"),
    ])
    .add_part("cv", pdf_part("cv.pdf", create_test_pdf()))
    .add_part("transcript", pdf_part("transcript.pdf", create_test_pdf()));

    let response = app
        .client()
        .post(REGISTER)
        .add_header(API_KEY_HEADER, TEST_API_KEY)
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), 422);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "VALIDATION_FAILED");
    let fields: Vec<&str> = body["field_errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["name", "student_id"]);

    assert_eq!(app.store.put_count(), 0);
    assert_eq!(app.table.append_count(), 0);
}

#[tokio::test]
async fn test_register_rejects_non_pdf() {
    let app = setup_test_app().await;

    let image = axum_test::multipart::Part::bytes(bytes::Bytes::from_static(b"\x89PNG\r\n"))
        .file_name("cv.png")
        .mime_type("image/png");
    let form = form_with_fields(&valid_fields())
        .add_part("cv", image)
        .add_part("transcript", pdf_part("transcript.pdf", create_test_pdf()));

    let response = app
        .client()
        .post(REGISTER)
        .add_header(API_KEY_HEADER, TEST_API_KEY)
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), 415);
    assert_eq!(app.store.put_count(), 0);
}

#[tokio::test]
async fn test_register_size_limit_is_inclusive() {
    let app = setup_test_app().await;

    let at_limit = form_with_fields(&valid_fields())
        .add_part("cv", pdf_part("cv.pdf", create_test_pdf()))
        .add_part(
            "transcript",
            pdf_part("transcript.pdf", create_pdf_of_size(MAX_FILE_SIZE_BYTES)),
        );
    let response = app
        .client()
        .post(REGISTER)
        .add_header(API_KEY_HEADER, TEST_API_KEY)
        .multipart(at_limit)
        .await;
    assert_eq!(response.status_code(), 201);

    let over_limit = form_with_fields(&valid_fields())
        .add_part("cv", pdf_part("cv.pdf", create_test_pdf()))
        .add_part(
            "transcript",
            pdf_part("transcript.pdf", create_pdf_of_size(MAX_FILE_SIZE_BYTES + 1)),
        );
    let response = app
        .client()
        .post(REGISTER)
        .add_header(API_KEY_HEADER, TEST_API_KEY)
        .multipart(over_limit)
        .await;
    assert_eq!(response.status_code(), 413);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "PAYLOAD_TOO_LARGE");

    // Only the accepted submission reached storage.
    assert_eq!(app.store.put_count(), 2);
    assert_eq!(app.table.append_count(), 1);
}

#[tokio::test]
async fn test_register_rejects_oversized_body() {
    let app = setup_test_app().await;

    let form = form_with_fields(&valid_fields())
        .add_part(
            "cv",
            pdf_part("cv.pdf", create_pdf_of_size(MAX_FILE_SIZE_BYTES * 2)),
        )
        .add_part(
            "transcript",
            pdf_part("transcript.pdf", create_pdf_of_size(MAX_FILE_SIZE_BYTES)),
        );

    let response = app
        .client()
        .post(REGISTER)
        .add_header(API_KEY_HEADER, TEST_API_KEY)
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), 413);
    assert_eq!(app.store.put_count(), 0);
}

#[tokio::test]
async fn test_register_missing_or_duplicate_part() {
    let app = setup_test_app().await;

    let missing = form_with_fields(&valid_fields())
        .add_part("cv", pdf_part("cv.pdf", create_test_pdf()));
    let response = app
        .client()
        .post(REGISTER)
        .add_header(API_KEY_HEADER, TEST_API_KEY)
        .multipart(missing)
        .await;
    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("transcript"));

    let duplicate = valid_form().add_part("cv", pdf_part("cv2.pdf", create_test_pdf()));
    let response = app
        .client()
        .post(REGISTER)
        .add_header(API_KEY_HEADER, TEST_API_KEY)
        .multipart(duplicate)
        .await;
    assert_eq!(response.status_code(), 400);

    let alias_duplicate = valid_form().add_text("nim", "12345678901");
    let response = app
        .client()
        .post(REGISTER)
        .add_header(API_KEY_HEADER, TEST_API_KEY)
        .multipart(alias_duplicate)
        .await;
    assert_eq!(response.status_code(), 400);

    assert_eq!(app.store.put_count(), 0);
}

#[tokio::test]
async fn test_register_rejects_non_multipart_body() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(REGISTER)
        .add_header(API_KEY_HEADER, TEST_API_KEY)
        .json(&serde_json::json!({ "name": "Jane Doe" }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_upload_failure_never_appends() {
    let app = setup_test_app_with(
        CountingStore::failing_role("transcript", 403),
        CountingTable::default(),
    )
    .await;

    let response = app
        .client()
        .post(REGISTER)
        .add_header(API_KEY_HEADER, TEST_API_KEY)
        .multipart(valid_form())
        .await;

    assert_eq!(response.status_code(), 500);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "UPLOAD_FAILED");
    assert!(!body.to_string().contains("backend returned"));

    // Permission errors are not retried: one put per file.
    assert_eq!(app.store.put_count(), 2);
    assert_eq!(app.table.append_count(), 0);

    // The cv that did upload is removed again.
    let store = app.store.clone();
    wait_for(move || store.deleted().len() == 1).await;
}

#[tokio::test]
async fn test_transient_upload_failures_are_retried() {
    let app = setup_test_app_with(
        CountingStore::with_put_failures(vec![storage_status(503), storage_status(429)]),
        CountingTable::default(),
    )
    .await;

    let response = app
        .client()
        .post(REGISTER)
        .add_header(API_KEY_HEADER, TEST_API_KEY)
        .multipart(valid_form())
        .await;

    assert_eq!(response.status_code(), 201);
    assert_eq!(app.store.put_count(), 4);
    assert_eq!(app.table.rows().len(), 1);
}

#[tokio::test]
async fn test_exhausted_upload_retries_fail_the_request() {
    let app = setup_test_app_with(
        CountingStore::failing_role("cv", 503),
        CountingTable::default(),
    )
    .await;

    let response = app
        .client()
        .post(REGISTER)
        .add_header(API_KEY_HEADER, TEST_API_KEY)
        .multipart(valid_form())
        .await;

    assert_eq!(response.status_code(), 500);
    // Three cv attempts, one transcript attempt.
    assert_eq!(app.store.put_count(), 4);
    assert_eq!(app.table.append_count(), 0);
}

#[tokio::test]
async fn test_append_failure_after_retries() {
    let app = setup_test_app_with(
        CountingStore::default(),
        CountingTable::with_failures(vec![
            table_status(503),
            table_status(503),
            table_status(503),
        ]),
    )
    .await;

    let response = app
        .client()
        .post(REGISTER)
        .add_header(API_KEY_HEADER, TEST_API_KEY)
        .multipart(valid_form())
        .await;

    assert_eq!(response.status_code(), 500);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "APPEND_FAILED");
    assert_eq!(body["error"], "Sheets update failed");
    assert_eq!(app.table.append_count(), 3);
    assert!(app.table.rows().is_empty());

    let store = app.store.clone();
    wait_for(move || store.deleted().len() == 2).await;
}

#[tokio::test]
async fn test_transient_append_failure_recovers() {
    let app = setup_test_app_with(
        CountingStore::default(),
        CountingTable::with_failures(vec![table_status(500)]),
    )
    .await;

    let response = app
        .client()
        .post(REGISTER)
        .add_header(API_KEY_HEADER, TEST_API_KEY)
        .multipart(valid_form())
        .await;

    assert_eq!(response.status_code(), 201);
    assert_eq!(app.table.append_count(), 2);
    assert_eq!(app.table.rows().len(), 1);
    assert!(app.store.deleted().is_empty());
}

#[tokio::test]
async fn test_root_and_health() {
    let app = setup_test_app().await;

    let root = app.client().get("/").await;
    assert_eq!(root.status_code(), 200);
    let body: serde_json::Value = root.json();
    assert_eq!(body["message"], "Syntesa © 2025");

    let health = app.client().get("/health").await;
    assert_eq!(health.status_code(), 200);
    let body: serde_json::Value = health.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage_backend"], "drive");
    assert_eq!(body["table_backend"], "sheets");
}

#[tokio::test]
async fn test_openapi_document_lists_register() {
    let app = setup_test_app().await;

    let response = app.client().get("/api/openapi.json").await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert!(body["paths"]["/api/register"]["post"].is_object());
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .get("/health")
        .add_header("X-Request-ID", "form-submit-42")
        .await;

    assert_eq!(response.header("x-request-id"), "form-submit-42");
}

#[tokio::test]
async fn test_empty_multipart_lists_all_missing_parts() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(REGISTER)
        .add_header(API_KEY_HEADER, TEST_API_KEY)
        .multipart(MultipartForm::new().add_text("comment", "hello"))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    let error = body["error"].as_str().unwrap();
    for part in ["name", "email", "student_id", "program", "class_section", "cv", "transcript"] {
        assert!(error.contains(part), "{} missing from {}", part, error);
    }
}

#[tokio::test]
async fn test_large_responses_are_gzipped() {
    let app = setup_test_app().await;

    let docs = app
        .client()
        .get("/api/openapi.json")
        .add_header("accept-encoding", "gzip")
        .await;
    assert_eq!(docs.status_code(), 200);
    assert_eq!(docs.header("content-encoding"), "gzip");

    let root = app
        .client()
        .get("/")
        .add_header("accept-encoding", "gzip")
        .await;
    assert_eq!(root.status_code(), 200);
    assert!(root.headers().get("content-encoding").is_none());
}

#[tokio::test]
async fn test_oversized_body_without_key_is_unauthorized() {
    let app = setup_test_app().await;

    let form = form_with_fields(&valid_fields())
        .add_part(
            "cv",
            pdf_part("cv.pdf", create_pdf_of_size(MAX_FILE_SIZE_BYTES * 2)),
        )
        .add_part(
            "transcript",
            pdf_part("transcript.pdf", create_pdf_of_size(MAX_FILE_SIZE_BYTES)),
        );

    let response = app.client().post(REGISTER).multipart(form).await;

    assert_eq!(response.status_code(), 401);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "UNAUTHORIZED");
    assert_eq!(app.store.put_count(), 0);
}
