use super::{Table, TableError, TableResult};
use regdesk_core::{Config, TableBackend};
use std::sync::Arc;

/// Create a table backend based on configuration
pub async fn create_table(
    config: &Config,
    http_client: reqwest::Client,
) -> TableResult<Arc<dyn Table>> {
    match config.table_backend() {
        #[cfg(feature = "table-sheets")]
        TableBackend::Sheets => {
            use regdesk_infra::{ServiceAccountTokenProvider, SHEETS_SCOPE};

            let spreadsheet_id = config
                .spreadsheet_id()
                .map(String::from)
                .ok_or_else(|| TableError::ConfigError("SPREADSHEET_ID not configured".to_string()))?;
            let tokens = ServiceAccountTokenProvider::from_file(
                config.google_credentials_path(),
                SHEETS_SCOPE,
                http_client.clone(),
            )?;

            let table = super::SheetsTable::new(
                http_client,
                Arc::new(tokens),
                spreadsheet_id,
                config.sheet_range().to_string(),
            );
            Ok(Arc::new(table))
        }

        #[cfg(not(feature = "table-sheets"))]
        TableBackend::Sheets => Err(TableError::ConfigError(
            "Sheets table backend not available (table-sheets feature not enabled)".to_string(),
        )),

        #[cfg(feature = "table-local")]
        TableBackend::Local => {
            let path = config.local_table_path().ok_or_else(|| {
                TableError::ConfigError("LOCAL_TABLE_PATH not configured".to_string())
            })?;
            let table = super::LocalTable::new(path).await?;
            Ok(Arc::new(table))
        }

        #[cfg(not(feature = "table-local"))]
        TableBackend::Local => Err(TableError::ConfigError(
            "Local table backend not available (table-local feature not enabled)".to_string(),
        )),
    }
}
