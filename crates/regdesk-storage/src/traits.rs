//! Object store abstraction
//!
//! This module defines the ObjectStore trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use regdesk_infra::google::is_transient_transport;
use regdesk_infra::{is_transient_status, Retryable, TokenError};
use std::io::ErrorKind;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid object name: {0}")]
    InvalidKey(String),

    #[error("Storage backend returned {status}: {message}")]
    BackendError { status: u16, message: String },

    #[error("Storage request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Storage authentication failed: {0}")]
    Auth(#[from] TokenError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl Retryable for StorageError {
    fn is_transient(&self) -> bool {
        match self {
            StorageError::BackendError { status, .. } => is_transient_status(*status),
            StorageError::Transport(e) => is_transient_transport(e),
            StorageError::Auth(e) => e.is_transient(),
            StorageError::IoError(e) => matches!(
                e.kind(),
                ErrorKind::TimedOut | ErrorKind::Interrupted | ErrorKind::WouldBlock
            ),
            StorageError::UploadFailed(_)
            | StorageError::DeleteFailed(_)
            | StorageError::NotFound(_)
            | StorageError::InvalidKey(_)
            | StorageError::ConfigError(_) => false,
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Handle to an object that was written but not yet made public.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub id: String,
}

/// Object store abstraction
///
/// Storing bytes and publishing them are separate calls so each can be
/// retried on its own without re-sending the file.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `data` under `name` and return the backend's object id.
    async fn put(&self, name: &str, content_type: &str, data: Bytes)
        -> StorageResult<StoredObject>;

    /// Grant anonymous read access and return the public URL.
    async fn grant_public_read(&self, object: &StoredObject) -> StorageResult<String>;

    /// Delete an object. Deleting a missing object succeeds.
    async fn delete(&self, object_id: &str) -> StorageResult<()>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
