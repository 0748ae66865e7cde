//! Google Sheets backend

use super::{Table, TableError, TableResult};
use async_trait::async_trait;
use regdesk_core::constants::truncate_message;
use regdesk_core::TableBackend;
use regdesk_infra::TokenProvider;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4";

#[derive(Debug, Default, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

pub struct SheetsTable {
    client: reqwest::Client,
    tokens: Arc<dyn TokenProvider>,
    spreadsheet_id: String,
    range: String,
    api_base: String,
}

impl SheetsTable {
    pub fn new(
        client: reqwest::Client,
        tokens: Arc<dyn TokenProvider>,
        spreadsheet_id: String,
        range: String,
    ) -> Self {
        Self {
            client,
            tokens,
            spreadsheet_id,
            range,
            api_base: SHEETS_API_BASE.to_string(),
        }
    }

    pub fn with_api_base(mut self, api_base: String) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }

    fn values_url(&self) -> String {
        format!(
            "{}/spreadsheets/{}/values/{}",
            self.api_base,
            urlencoding::encode(&self.spreadsheet_id),
            urlencoding::encode(&self.range)
        )
    }

    /// Cells are stored exactly as sent. RAW keeps leading zeros and never
    /// evaluates text starting with `=` as a formula.
    fn append_url(&self) -> String {
        format!(
            "{}:append?valueInputOption=RAW&insertDataOption=INSERT_ROWS",
            self.values_url()
        )
    }

    async fn ensure_success(response: reqwest::Response) -> TableResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(TableError::BackendError {
            status: status.as_u16(),
            message: truncate_message(&body),
        })
    }
}

/// Cells typed in by hand may come back as numbers or booleans; keep their text.
fn cell_to_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[async_trait]
impl Table for SheetsTable {
    async fn append(&self, rows: &[Vec<String>]) -> TableResult<()> {
        let token = self.tokens.access_token().await?;
        let start = std::time::Instant::now();

        let response = self
            .client
            .post(self.append_url())
            .bearer_auth(token)
            .json(&json!({ "range": self.range, "majorDimension": "ROWS", "values": rows }))
            .send()
            .await?;

        Self::ensure_success(response).await?;

        tracing::info!(
            range = %self.range,
            row_count = rows.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Sheets append successful"
        );
        Ok(())
    }

    async fn read_all(&self) -> TableResult<Vec<Vec<String>>> {
        let token = self.tokens.access_token().await?;

        let response = self
            .client
            .get(self.values_url())
            .bearer_auth(token)
            .send()
            .await?;

        let range: ValueRange = Self::ensure_success(response).await?.json().await?;
        Ok(range
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect())
    }

    fn backend_type(&self) -> TableBackend {
        TableBackend::Sheets
    }
}
