use crate::state::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

const SERVICE_BANNER: &str = "Syntesa © 2025";

#[derive(Debug, Serialize, ToSchema)]
pub struct RootResponse {
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
    pub version: String,
    /// `drive` or `local`
    pub storage_backend: String,
    /// `sheets` or `local`
    pub table_backend: String,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "config",
    responses((status = 200, description = "Service banner", body = RootResponse))
)]
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: SERVICE_BANNER.to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "config",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage_backend: state.submissions.storage_backend().to_string(),
        table_backend: state.submissions.table_backend().to_string(),
    })
}
