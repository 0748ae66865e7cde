//! Test helpers: build AppState and router for integration tests.
//!
//! Collaborators are in-memory counting fakes and retries never sleep, so
//! the suite needs no network and no Google credentials.

pub mod fixtures;
pub mod mocks;

use axum_test::TestServer;
use mocks::{CountingStore, CountingTable};
use regdesk_api::setup::routes;
use regdesk_api::{AppState, SubmissionService, SubmissionSettings};
use regdesk_core::{BaseConfig, Config, IntakeConfig, RetryConfig, StorageBackend, TableBackend};
use regdesk_infra::RetryPolicy;
use regdesk_services::{ObjectStoreClient, TableClient};
use std::sync::Arc;

pub const TEST_API_KEY: &str = "test-api-key-0123456789";
pub const API_KEY_HEADER: &str = "X-API-Key";
pub const MAX_FILE_SIZE_BYTES: usize = 5 * 1024 * 1024;

/// Test application: server plus handles on the fakes behind it.
pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<CountingStore>,
    pub table: Arc<CountingTable>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn test_config() -> Config {
    Config(Box::new(IntakeConfig {
        base: BaseConfig {
            server_port: 0,
            cors_origins: vec!["*".to_string()],
            environment: "test".to_string(),
            http_concurrency_limit: 64,
        },
        api_key: TEST_API_KEY.to_string(),
        max_file_size_bytes: MAX_FILE_SIZE_BYTES,
        storage_backend: StorageBackend::Drive,
        drive_folder_id: Some("test-folder".to_string()),
        local_storage_path: None,
        local_storage_base_url: None,
        table_backend: TableBackend::Sheets,
        spreadsheet_id: Some("test-sheet".to_string()),
        sheet_range: "Sheet1!A:G".to_string(),
        local_table_path: None,
        google_credentials_path: "unused.json".to_string(),
        google_http_timeout_secs: 5,
        retry: RetryConfig::default(),
        submission_timeout_secs: 30,
        cleanup_orphans: true,
    }))
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(CountingStore::default(), CountingTable::default()).await
}

/// Setup test app around the given fakes, with a zero-delay retry budget of 3.
pub async fn setup_test_app_with(store: CountingStore, table: CountingTable) -> TestApp {
    let config = test_config();
    let store = Arc::new(store);
    let table = Arc::new(table);

    let policy = RetryPolicy::no_delay(config.retry().max_attempts);
    let submissions = SubmissionService::new(
        ObjectStoreClient::new(store.clone(), policy.clone()),
        TableClient::new(table.clone(), policy),
        SubmissionSettings::from_config(&config),
    );
    let state = Arc::new(AppState::new(config.clone(), submissions));

    let app = routes::setup_routes(&config, state)
        .await
        .expect("Failed to setup routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        store,
        table,
    }
}
