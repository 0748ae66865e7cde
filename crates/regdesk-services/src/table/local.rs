//! JSON-lines table for development: one JSON array per row.

use super::{Table, TableResult};
use async_trait::async_trait;
use regdesk_core::TableBackend;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

pub struct LocalTable {
    path: PathBuf,
    // Serializes appends so concurrent rows never interleave.
    write_lock: Mutex<()>,
}

impl LocalTable {
    pub async fn new(path: impl Into<PathBuf>) -> TableResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }
}

#[async_trait]
impl Table for LocalTable {
    async fn append(&self, rows: &[Vec<String>]) -> TableResult<()> {
        let mut buffer = String::new();
        for row in rows {
            buffer.push_str(&serde_json::to_string(row)?);
            buffer.push('\n');
        }

        let _guard = self.write_lock.lock().await;
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(buffer.as_bytes()).await?;
        file.sync_all().await?;

        tracing::info!(
            path = %self.path.display(),
            row_count = rows.len(),
            "Local table append successful"
        );
        Ok(())
    }

    async fn read_all(&self) -> TableResult<Vec<Vec<String>>> {
        let _guard = self.write_lock.lock().await;
        if !fs::try_exists(&self.path).await.unwrap_or(false) {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path).await?;
        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| Ok(serde_json::from_str(line)?))
            .collect()
    }

    fn backend_type(&self) -> TableBackend {
        TableBackend::Local
    }
}
