use std::sync::Arc;

use regdesk_core::{RegistrationRow, TableBackend};
use regdesk_infra::{retry_with_policy, RetryPolicy};

use super::{Table, TableError, TableResult};

/// Retrying front end over a [`Table`].
#[derive(Clone)]
pub struct TableClient {
    table: Arc<dyn Table>,
    policy: RetryPolicy,
}

impl TableClient {
    pub fn new(table: Arc<dyn Table>, policy: RetryPolicy) -> Self {
        Self { table, policy }
    }

    pub fn backend_type(&self) -> TableBackend {
        self.table.backend_type()
    }

    /// Append one or more rows of equal width as a single operation.
    pub async fn append(&self, rows: &[Vec<String>]) -> TableResult<()> {
        let width = rows
            .first()
            .map(Vec::len)
            .ok_or_else(|| TableError::InvalidRow("no rows to append".to_string()))?;
        if width == 0 || rows.iter().any(|row| row.len() != width) {
            return Err(TableError::InvalidRow(
                "rows must be non-empty and of equal width".to_string(),
            ));
        }

        retry_with_policy(&self.policy, "table.append", || self.table.append(rows)).await
    }

    pub async fn append_registration(&self, row: RegistrationRow) -> TableResult<()> {
        self.append(&[row.into_values()]).await
    }

    pub async fn read_all(&self) -> TableResult<Vec<Vec<String>>> {
        retry_with_policy(&self.policy, "table.read_all", || self.table.read_all()).await
    }
}
