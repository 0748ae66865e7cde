use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::extract_registration_form;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use regdesk_core::RegistrationResponse;
use regdesk_infra::RequestId;
use std::sync::Arc;

/// Submit a student registration
///
/// Text fields: `name` (`nama`), `email`, `student_id` (`nim`), `program`
/// (`prodi`), `class_section` (`kelas`). Files: `cv` and `transcript`, both PDF.
#[utoipa::path(
    post,
    path = "/api/register",
    tag = "registration",
    params(
        ("X-API-Key" = String, Header, description = "Shared API key")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Registration stored", body = RegistrationResponse),
        (status = 400, description = "Malformed form, missing or duplicate part", body = ErrorResponse),
        (status = 401, description = "Missing or invalid API key", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 415, description = "File is not a PDF", body = ErrorResponse),
        (status = 422, description = "Invalid form fields", body = ErrorResponse),
        (status = 500, description = "Upload or table append failed", body = ErrorResponse),
        (status = 504, description = "Submission deadline exceeded", body = ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    let submission = extract_registration_form(multipart?).await?;

    tracing::info!(
        request_id = %request_id.as_str(),
        cv_bytes = submission.cv.len(),
        transcript_bytes = submission.transcript.len(),
        "Registration received"
    );

    let response = state
        .submissions
        .submit(submission, request_id.as_str())
        .await?;

    Ok((StatusCode::CREATED, Json(response)))
}
