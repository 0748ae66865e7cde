//! Configuration validation
//!
//! Validates critical configuration values at startup to catch misconfigurations early.

use anyhow::Result;
use regdesk_core::Config;
use std::path::Path;

const MIN_RECOMMENDED_API_KEY_LEN: usize = 16;

/// Validate critical configuration values
///
/// Fails on anything that would make every submission fail, and warns on
/// settings that work but are unsafe.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    let is_production = config.is_production();

    if is_production && config.cors_origins().iter().any(|o| o == "*") {
        return Err(anyhow::anyhow!(
            "CORS configured to allow all origins (*) in production. \
            Set specific allowed origins via CORS_ORIGINS."
        ));
    }

    if config.api_key().len() < MIN_RECOMMENDED_API_KEY_LEN {
        if is_production {
            return Err(anyhow::anyhow!(
                "API_KEY must be at least {} characters in production",
                MIN_RECOMMENDED_API_KEY_LEN
            ));
        }
        tracing::warn!(
            min_len = MIN_RECOMMENDED_API_KEY_LEN,
            "API_KEY is short - use a longer secret outside development"
        );
    }

    let needs_google = config.storage_backend() == regdesk_core::StorageBackend::Drive
        || config.table_backend() == regdesk_core::TableBackend::Sheets;
    if needs_google && !Path::new(config.google_credentials_path()).exists() {
        return Err(anyhow::anyhow!(
            "Google credentials file not found at {}",
            config.google_credentials_path()
        ));
    }

    if !config.cleanup_orphans() {
        tracing::warn!(
            "CLEANUP_ORPHANS disabled - documents from failed submissions stay in storage"
        );
    }

    Ok(())
}
