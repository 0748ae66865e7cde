//! Service initialization

use crate::services::submission::{SubmissionService, SubmissionSettings};
use crate::state::AppState;
use anyhow::{Context, Result};
use regdesk_core::Config;
use regdesk_infra::RetryPolicy;
use regdesk_services::{create_object_store, create_table, ObjectStoreClient, TableClient};
use std::sync::Arc;
use std::time::Duration;

/// Build the backend clients and the application state
pub async fn initialize_services(config: &Config) -> Result<Arc<AppState>> {
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.google_http_timeout_secs()))
        .build()
        .context("Failed to build HTTP client")?;

    let store = create_object_store(config, http_client.clone())
        .await
        .context("Failed to initialize object storage")?;
    tracing::info!(backend = %store.backend_type(), "Object storage initialized");

    let table = create_table(config, http_client)
        .await
        .context("Failed to initialize registration table")?;
    tracing::info!(backend = %table.backend_type(), "Registration table initialized");

    let policy = RetryPolicy::from(config.retry());
    let objects =
        ObjectStoreClient::new(store, policy.clone()).with_orphan_cleanup(config.cleanup_orphans());
    let table = TableClient::new(table, policy);

    let submissions =
        SubmissionService::new(objects, table, SubmissionSettings::from_config(config));

    Ok(Arc::new(AppState::new(config.clone(), submissions)))
}
