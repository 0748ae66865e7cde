//! Append-only registration table
//!
//! Rows are fixed-width lists of strings appended at the end of a named
//! range. Nothing is ever updated or deleted.

pub mod client;
pub mod factory;
#[cfg(feature = "table-local")]
pub mod local;
#[cfg(feature = "table-sheets")]
pub mod sheets;

pub use client::TableClient;
pub use factory::create_table;
#[cfg(feature = "table-local")]
pub use local::LocalTable;
#[cfg(feature = "table-sheets")]
pub use sheets::SheetsTable;

use async_trait::async_trait;
use regdesk_core::TableBackend;
use regdesk_infra::google::is_unsent_transport;
use regdesk_infra::{is_transient_status, Retryable, TokenError};
use std::io::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("Table backend returned {status}: {message}")]
    BackendError { status: u16, message: String },

    #[error("Table request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Table authentication failed: {0}")]
    Auth(#[from] TokenError),

    #[error("Invalid row: {0}")]
    InvalidRow(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Malformed table data: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Appends are not idempotent, so a send that may have reached the backend
/// is never repeated.
impl Retryable for TableError {
    fn is_transient(&self) -> bool {
        match self {
            TableError::BackendError { status, .. } => is_transient_status(*status),
            TableError::Transport(e) => is_unsent_transport(e),
            TableError::Auth(e) => e.is_transient(),
            TableError::IoError(e) => matches!(
                e.kind(),
                ErrorKind::TimedOut | ErrorKind::Interrupted | ErrorKind::WouldBlock
            ),
            TableError::InvalidRow(_)
            | TableError::Serialization(_)
            | TableError::ConfigError(_) => false,
        }
    }
}

pub type TableResult<T> = Result<T, TableError>;

#[async_trait]
pub trait Table: Send + Sync {
    /// Append rows after the last row of the range, as one operation.
    async fn append(&self, rows: &[Vec<String>]) -> TableResult<()>;

    /// Every row currently in the range, in order.
    async fn read_all(&self) -> TableResult<Vec<Vec<String>>>;

    fn backend_type(&self) -> TableBackend;
}
