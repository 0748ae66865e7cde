use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use regdesk_core::AppError;
use std::sync::Arc;
use subtle::ConstantTimeEq;

pub const API_KEY_HEADER: &str = "X-API-Key";

#[derive(Clone)]
pub struct AuthState {
    pub api_key: String,
}

fn secure_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Reject requests whose `X-API-Key` is missing or differs from the shared secret.
pub async fn auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    request: Request,
    next: Next,
) -> Response {
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|h| h.to_str().ok());

    match provided {
        Some(key) if secure_compare(key, &auth_state.api_key) => next.run(request).await,
        Some(_) => {
            HttpAppError(AppError::Unauthorized("Invalid API key".to_string())).into_response()
        }
        None => HttpAppError(AppError::Unauthorized(format!(
            "Missing {} header",
            API_KEY_HEADER
        )))
        .into_response(),
    }
}
