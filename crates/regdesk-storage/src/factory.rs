#[cfg(feature = "storage-drive")]
use crate::DriveStorage;
#[cfg(feature = "storage-local")]
use crate::LocalStorage;
use crate::{ObjectStore, StorageBackend, StorageError, StorageResult};
use regdesk_core::Config;
use std::sync::Arc;

/// Create an object store backend based on configuration
pub async fn create_object_store(
    config: &Config,
    http_client: reqwest::Client,
) -> StorageResult<Arc<dyn ObjectStore>> {
    match config.storage_backend() {
        #[cfg(feature = "storage-drive")]
        StorageBackend::Drive => {
            use regdesk_infra::{ServiceAccountTokenProvider, DRIVE_SCOPE};

            let folder_id = config
                .drive_folder_id()
                .map(String::from)
                .ok_or_else(|| {
                    StorageError::ConfigError("DRIVE_FOLDER_ID not configured".to_string())
                })?;
            let tokens = ServiceAccountTokenProvider::from_file(
                config.google_credentials_path(),
                DRIVE_SCOPE,
                http_client.clone(),
            )?;

            let storage = DriveStorage::new(http_client, Arc::new(tokens), folder_id);
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-drive"))]
        StorageBackend::Drive => Err(StorageError::ConfigError(
            "Drive storage backend not available (storage-drive feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let base_path = config
                .local_storage_path()
                .map(String::from)
                .ok_or_else(|| {
                    StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
                })?;
            let base_url = config
                .local_storage_base_url()
                .map(String::from)
                .ok_or_else(|| {
                    StorageError::ConfigError("LOCAL_STORAGE_BASE_URL not configured".to_string())
                })?;

            let storage = LocalStorage::new(base_path, base_url).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}
