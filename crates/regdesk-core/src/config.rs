//! Configuration module
//!
//! Configuration for the HTTP server, the object store and table backends,
//! the shared secret and the retry/deadline knobs of the submission pipeline.

use std::env;
use std::fmt;
use std::str::FromStr;

use crate::constants::{DEFAULT_MAX_FILE_SIZE_BYTES, DEFAULT_SHEET_RANGE};
use crate::storage_types::{StorageBackend, TableBackend};

// Common constants
const SERVER_PORT: u16 = 8000;
const HTTP_CONCURRENCY_LIMIT: usize = 1024;
const RETRY_MAX_ATTEMPTS: u32 = 3;
const RETRY_BACKOFF_BASE_SECS: u64 = 4;
const RETRY_BACKOFF_MAX_SECS: u64 = 10;
const SUBMISSION_TIMEOUT_SECS: u64 = 120;
const GOOGLE_HTTP_TIMEOUT_SECS: u64 = 60;
const DEFAULT_CREDENTIALS_PATH: &str = "./env/google-key.json";

/// Base HTTP server configuration
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub http_concurrency_limit: usize,
}

/// Retry budget applied to every external call site
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub backoff_base_secs: u64,
    pub backoff_max_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: RETRY_MAX_ATTEMPTS,
            backoff_base_secs: RETRY_BACKOFF_BASE_SECS,
            backoff_max_secs: RETRY_BACKOFF_MAX_SECS,
        }
    }
}

/// Registration intake configuration
#[derive(Clone)]
pub struct IntakeConfig {
    pub base: BaseConfig,
    pub api_key: String,
    pub max_file_size_bytes: usize,
    // Object store
    pub storage_backend: StorageBackend,
    pub drive_folder_id: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Table
    pub table_backend: TableBackend,
    pub spreadsheet_id: Option<String>,
    pub sheet_range: String,
    pub local_table_path: Option<String>,
    // Google service account
    pub google_credentials_path: String,
    pub google_http_timeout_secs: u64,
    // Pipeline
    pub retry: RetryConfig,
    pub submission_timeout_secs: u64,
    pub cleanup_orphans: bool,
}

impl fmt::Debug for IntakeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntakeConfig")
            .field("base", &self.base)
            .field("api_key", &"<redacted>")
            .field("max_file_size_bytes", &self.max_file_size_bytes)
            .field("storage_backend", &self.storage_backend)
            .field("table_backend", &self.table_backend)
            .field("sheet_range", &self.sheet_range)
            .field("retry", &self.retry)
            .field("submission_timeout_secs", &self.submission_timeout_secs)
            .field("cleanup_orphans", &self.cleanup_orphans)
            .finish_non_exhaustive()
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<IntakeConfig>);

impl Config {
    fn as_intake(&self) -> &IntakeConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_name(&self.as_intake().base.environment)
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = IntakeConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_intake().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.as_intake().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.as_intake().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.as_intake().base.environment
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.as_intake().base.http_concurrency_limit
    }

    pub fn api_key(&self) -> &str {
        &self.as_intake().api_key
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.as_intake().max_file_size_bytes
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.as_intake().storage_backend
    }

    pub fn drive_folder_id(&self) -> Option<&str> {
        self.as_intake().drive_folder_id.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.as_intake().local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.as_intake().local_storage_base_url.as_deref()
    }

    pub fn table_backend(&self) -> TableBackend {
        self.as_intake().table_backend
    }

    pub fn spreadsheet_id(&self) -> Option<&str> {
        self.as_intake().spreadsheet_id.as_deref()
    }

    pub fn sheet_range(&self) -> &str {
        &self.as_intake().sheet_range
    }

    pub fn local_table_path(&self) -> Option<&str> {
        self.as_intake().local_table_path.as_deref()
    }

    pub fn google_credentials_path(&self) -> &str {
        &self.as_intake().google_credentials_path
    }

    pub fn google_http_timeout_secs(&self) -> u64 {
        self.as_intake().google_http_timeout_secs
    }

    pub fn retry(&self) -> RetryConfig {
        self.as_intake().retry
    }

    pub fn submission_timeout_secs(&self) -> u64 {
        self.as_intake().submission_timeout_secs
    }

    pub fn cleanup_orphans(&self) -> bool {
        self.as_intake().cleanup_orphans
    }
}

fn is_production_name(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl IntakeConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        if is_production_name(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
            http_concurrency_limit: env_or("HTTP_CONCURRENCY_LIMIT", HTTP_CONCURRENCY_LIMIT),
        };

        let storage_backend = match env_opt("STORAGE_BACKEND") {
            Some(s) => s.parse()?,
            None => StorageBackend::Drive,
        };
        let table_backend = match env_opt("TABLE_BACKEND") {
            Some(s) => s.parse()?,
            None => TableBackend::Sheets,
        };

        let max_file_size_bytes = env_opt("MAX_FILE_SIZE_MB")
            .and_then(|s| s.parse::<usize>().ok())
            .map(|mb| mb * 1024 * 1024)
            .unwrap_or(DEFAULT_MAX_FILE_SIZE_BYTES);

        let config = IntakeConfig {
            base,
            api_key: env::var("API_KEY")
                .map_err(|_| anyhow::anyhow!("API_KEY must be set for authentication"))?,
            max_file_size_bytes,
            storage_backend,
            drive_folder_id: env_opt("DRIVE_FOLDER_ID"),
            local_storage_path: env_opt("LOCAL_STORAGE_PATH"),
            local_storage_base_url: env_opt("LOCAL_STORAGE_BASE_URL"),
            table_backend,
            spreadsheet_id: env_opt("SPREADSHEET_ID"),
            sheet_range: env_opt("SHEET_RANGE").unwrap_or_else(|| DEFAULT_SHEET_RANGE.to_string()),
            local_table_path: env_opt("LOCAL_TABLE_PATH"),
            google_credentials_path: env_opt("GOOGLE_CREDENTIALS_PATH")
                .unwrap_or_else(|| DEFAULT_CREDENTIALS_PATH.to_string()),
            google_http_timeout_secs: env_or("GOOGLE_HTTP_TIMEOUT_SECS", GOOGLE_HTTP_TIMEOUT_SECS),
            retry: RetryConfig {
                max_attempts: env_or("RETRY_MAX_ATTEMPTS", RETRY_MAX_ATTEMPTS),
                backoff_base_secs: env_or("RETRY_BACKOFF_BASE_SECS", RETRY_BACKOFF_BASE_SECS),
                backoff_max_secs: env_or("RETRY_BACKOFF_MAX_SECS", RETRY_BACKOFF_MAX_SECS),
            },
            submission_timeout_secs: env_or("SUBMISSION_TIMEOUT_SECS", SUBMISSION_TIMEOUT_SECS),
            cleanup_orphans: env::var("CLEANUP_ORPHANS")
                .unwrap_or_else(|_| "true".to_string())
                .to_lowercase()
                .parse()
                .unwrap_or(true),
        };

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.api_key.trim().is_empty() {
            return Err(anyhow::anyhow!("API_KEY cannot be empty"));
        }

        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than 0"));
        }

        match self.storage_backend {
            StorageBackend::Drive => {
                if self.drive_folder_id.is_none() {
                    return Err(anyhow::anyhow!(
                        "DRIVE_FOLDER_ID must be set when STORAGE_BACKEND=drive"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() || self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH and LOCAL_STORAGE_BASE_URL must be set when STORAGE_BACKEND=local"
                    ));
                }
            }
        }

        match self.table_backend {
            TableBackend::Sheets => {
                if self.spreadsheet_id.is_none() {
                    return Err(anyhow::anyhow!(
                        "SPREADSHEET_ID must be set when TABLE_BACKEND=sheets"
                    ));
                }
            }
            TableBackend::Local => {
                if self.local_table_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_TABLE_PATH must be set when TABLE_BACKEND=local"
                    ));
                }
            }
        }

        if self.retry.max_attempts == 0 {
            return Err(anyhow::anyhow!("RETRY_MAX_ATTEMPTS must be at least 1"));
        }

        if self.retry.backoff_base_secs > self.retry.backoff_max_secs {
            return Err(anyhow::anyhow!(
                "RETRY_BACKOFF_BASE_SECS ({}) cannot exceed RETRY_BACKOFF_MAX_SECS ({})",
                self.retry.backoff_base_secs,
                self.retry.backoff_max_secs
            ));
        }

        if self.submission_timeout_secs == 0 {
            return Err(anyhow::anyhow!("SUBMISSION_TIMEOUT_SECS must be greater than 0"));
        }

        Ok(())
    }
}
